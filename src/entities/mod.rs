//! Entity module - `SeaORM` entity definitions for the database.

pub mod gpt_whitelist;

pub use gpt_whitelist::{
    ActiveModel as GptWhitelistActiveModel, Column as GptWhitelistColumn, Entity as GptWhitelist,
    Model as GptWhitelistModel,
};
