//! GPT whitelist entity - one row per user allowed to use the completion module.
//!
//! The table has set semantics: the user id is the primary key, so a user is
//! either present or absent and can never appear twice.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whitelist database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gpt_whitelist")]
pub struct Model {
    /// Discord user id of the whitelisted user
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    /// When the user was added
    pub created_at: DateTime,
}

/// `GptWhitelist` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
