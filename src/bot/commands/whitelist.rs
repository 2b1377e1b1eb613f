//! `/whitelist` - admin-only management of the GPT whitelist.
//!
//! The command is a thin shell: option parsing and the ephemeral reply live
//! here, every decision lives in [`crate::core::whitelist`].

use crate::core::whitelist::WhitelistAction;

/// The `option` choices shown in the Discord client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum WhitelistOption {
    /// Add the user
    #[name = "Add"]
    Add,
    /// Remove the user
    #[name = "Remove"]
    Remove,
    /// Check the user
    #[name = "Check"]
    Check,
}

impl From<WhitelistOption> for WhitelistAction {
    fn from(option: WhitelistOption) -> Self {
        match option {
            WhitelistOption::Add => Self::Add,
            WhitelistOption::Remove => Self::Remove,
            WhitelistOption::Check => Self::Check,
        }
    }
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::WhitelistOption;
    use crate::{
        bot::BotData,
        core::whitelist,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Manages the whitelist for the GPT module.
    ///
    /// Restricted to the administrators listed in `AdminIds`. Every reply is
    /// ephemeral.
    #[poise::command(slash_command, category = "Staff")]
    pub async fn whitelist(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Whitelist"] option: WhitelistOption,
        #[description = "User"] user: serenity::User,
    ) -> Result<()> {
        let data = ctx.data();
        let caller_id = ctx.author().id.to_string();

        let outcome = whitelist::handle_whitelist_command(
            &data.whitelist,
            &data.policy,
            &caller_id,
            option.into(),
            &user.id.to_string(),
        )
        .await?;

        ctx.send(
            poise::CreateReply::default()
                .content(outcome.message())
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }
}

pub use inner::*;
