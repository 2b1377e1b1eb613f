//! GPT whitelist business logic.
//!
//! Holds the store abstraction, its `SeaORM` implementation and the admin-only
//! add/remove/check handler behind the `/whitelist` command.

use crate::{
    config::PolicyConfig,
    core::policy,
    entities::{GptWhitelist, gpt_whitelist},
    errors::Result,
};
use async_trait::async_trait;
use sea_orm::{DatabaseConnection, Set, prelude::*, sea_query::OnConflict};
use tracing::{info, instrument};

/// Durable set of whitelisted user ids. Insert and remove are idempotent.
#[async_trait]
pub trait WhitelistStore: Send + Sync {
    /// Whether `user_id` is present.
    async fn contains(&self, user_id: &str) -> Result<bool>;

    /// Adds `user_id`. Adding a present id changes nothing.
    async fn insert(&self, user_id: &str) -> Result<()>;

    /// Removes `user_id`. Removing an absent id changes nothing.
    async fn remove(&self, user_id: &str) -> Result<()>;
}

/// [`WhitelistStore`] backed by the `gpt_whitelist` table.
#[derive(Debug, Clone)]
pub struct DatabaseWhitelistStore {
    db: DatabaseConnection,
}

impl DatabaseWhitelistStore {
    /// Wraps an open connection. Tables must already exist.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WhitelistStore for DatabaseWhitelistStore {
    async fn contains(&self, user_id: &str) -> Result<bool> {
        let entry = GptWhitelist::find_by_id(user_id.to_string())
            .one(&self.db)
            .await?;
        Ok(entry.is_some())
    }

    async fn insert(&self, user_id: &str) -> Result<()> {
        let entry = gpt_whitelist::ActiveModel {
            user_id: Set(user_id.to_string()),
            created_at: Set(chrono::Utc::now().naive_utc()),
        };

        GptWhitelist::insert(entry)
            .on_conflict(
                OnConflict::column(gpt_whitelist::Column::UserId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    async fn remove(&self, user_id: &str) -> Result<()> {
        GptWhitelist::delete_by_id(user_id.to_string())
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

/// The three `/whitelist` options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitelistAction {
    /// Put the user on the whitelist
    Add,
    /// Take the user off the whitelist
    Remove,
    /// Report whether the user is on the whitelist
    Check,
}

/// Result of a `/whitelist` invocation. Each maps to exactly one reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitelistOutcome {
    /// Caller is not an admin; nothing was read or written
    AccessDenied,
    /// `Add` on a user that was already present
    AlreadyWhitelisted,
    /// `Add` inserted the user
    Added,
    /// `Remove` deleted the user
    Removed,
    /// `Remove` or `Check` on an absent user
    NotWhitelisted,
    /// `Check` on a present user
    IsWhitelisted,
}

impl WhitelistOutcome {
    /// The reply shown to the caller.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::AccessDenied => {
                "⚠️ Access Denied - This command is restricted to administrators only."
            }
            Self::AlreadyWhitelisted => "⚠️ User Already Whitelisted.",
            Self::Added => {
                "✅ User Whitelisted - The user has been successfully added to the whitelist."
            }
            Self::Removed => {
                "✅ User Removed - The user has been successfully removed from the whitelist."
            }
            Self::NotWhitelisted => "⚠️ User is not Whitelisted.",
            Self::IsWhitelisted => "✅️ User is Whitelisted.",
        }
    }
}

/// Runs a `/whitelist` command on behalf of `caller_id` against `target_id`.
///
/// Non-admins get [`WhitelistOutcome::AccessDenied`] without the store being
/// touched. Otherwise the current membership decides the outcome and at most
/// one write is made.
#[instrument(skip(store, policy))]
pub async fn handle_whitelist_command<S>(
    store: &S,
    policy: &PolicyConfig,
    caller_id: &str,
    action: WhitelistAction,
    target_id: &str,
) -> Result<WhitelistOutcome>
where
    S: WhitelistStore + ?Sized,
{
    if !policy::is_admin(policy, caller_id) {
        return Ok(WhitelistOutcome::AccessDenied);
    }

    let is_whitelisted = policy::is_user_whitelisted(store, target_id).await?;

    let outcome = match (action, is_whitelisted) {
        (WhitelistAction::Add, true) => WhitelistOutcome::AlreadyWhitelisted,
        (WhitelistAction::Add, false) => {
            store.insert(target_id).await?;
            info!("User {} added to the GPT whitelist by {}", target_id, caller_id);
            WhitelistOutcome::Added
        }
        (WhitelistAction::Remove, true) => {
            store.remove(target_id).await?;
            info!("User {} removed from the GPT whitelist by {}", target_id, caller_id);
            WhitelistOutcome::Removed
        }
        (WhitelistAction::Remove | WhitelistAction::Check, false) => {
            WhitelistOutcome::NotWhitelisted
        }
        (WhitelistAction::Check, true) => WhitelistOutcome::IsWhitelisted,
    };

    Ok(outcome)
}
