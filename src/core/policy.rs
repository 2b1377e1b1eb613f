//! Authorization predicates.
//!
//! Admins are deny-by-default, guilds are allow-by-default. The asymmetry is
//! intentional: an unconfigured bot should work everywhere but let nobody
//! manage the whitelist.

use crate::{config::PolicyConfig, core::whitelist::WhitelistStore, errors::Result};

/// Whether `caller_id` is one of the configured admins.
#[must_use]
pub fn is_admin(policy: &PolicyConfig, caller_id: &str) -> bool {
    policy.admin_ids.contains(caller_id)
}

/// Whether the bot serves `guild_id`. Always true in open mode.
#[must_use]
pub fn is_guild_allowed(policy: &PolicyConfig, guild_id: &str) -> bool {
    policy
        .server_whitelist
        .as_ref()
        .is_none_or(|allowed| allowed.contains(guild_id))
}

/// Whether `user_id` is on the GPT whitelist.
pub async fn is_user_whitelisted<S>(store: &S, user_id: &str) -> Result<bool>
where
    S: WhitelistStore + ?Sized,
{
    store.contains(user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::policy::parse_id_list;
    use crate::core::whitelist::WhitelistStore;
    use crate::test_utils::setup_test_store;

    fn policy(admins: &str, guilds: Option<&str>) -> PolicyConfig {
        PolicyConfig {
            admin_ids: parse_id_list(admins),
            server_whitelist: guilds.map(parse_id_list),
            ..PolicyConfig::default()
        }
    }

    #[test]
    fn test_no_admins_configured_denies_everyone() {
        let policy = policy("", None);
        assert!(!is_admin(&policy, "1"));
        assert!(!is_admin(&policy, ""));
    }

    #[test]
    fn test_admin_membership() {
        let policy = policy("10,20", None);
        assert!(is_admin(&policy, "10"));
        assert!(is_admin(&policy, "20"));
        assert!(!is_admin(&policy, "30"));
        assert!(!is_admin(&policy, "1"));
    }

    #[test]
    fn test_unset_server_whitelist_allows_all_guilds() {
        let policy = policy("", None);
        assert!(is_guild_allowed(&policy, "123"));
        assert!(is_guild_allowed(&policy, "anything"));
    }

    #[test]
    fn test_server_whitelist_restricts_guilds() {
        let policy = policy("", Some("100,200"));
        assert!(is_guild_allowed(&policy, "100"));
        assert!(!is_guild_allowed(&policy, "300"));
    }

    #[tokio::test]
    async fn test_is_user_whitelisted_reads_store() -> Result<()> {
        let store = setup_test_store().await?;
        assert!(!is_user_whitelisted(&store, "42").await?);
        store.insert("42").await?;
        assert!(is_user_whitelisted(&store, "42").await?);
        Ok(())
    }
}
