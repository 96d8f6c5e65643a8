use serenity::model::id::RoleId;

use crate::models::config::Config;

/// The privileged things a member can be allowed to do. Commands gate
/// on one of these instead of checking role ids inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Use the AFK command.
    Afk,
    /// Staff-only toggles (leave status).
    Staff,
    /// Chat revival ping.
    Helper,
    /// Nickname moderation.
    Moderator,
    /// Manage the trading channel.
    Middleman,
}

impl Config {
    /// Roles that grant the given capability.
    fn capability_roles(&self, capability: Capability) -> Vec<RoleId> {
        let roles = &self.guild.roles;

        let ids = match capability {
            Capability::Afk => vec![roles.afk_access, roles.staff],
            Capability::Staff => vec![roles.staff],
            Capability::Helper => vec![roles.helper],
            Capability::Moderator => vec![roles.moderator],
            Capability::Middleman => vec![roles.middleman],
        };

        ids.into_iter().map(RoleId::new).collect()
    }

    /// Whether a member holding `member_roles` may exercise `capability`.
    pub fn has_capability(&self, member_roles: &[RoleId], capability: Capability) -> bool {
        let allowed = self.capability_roles(capability);
        member_roles.iter().any(|role| allowed.contains(role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        let json = r#"{
            "token": "t",
            "cmd_prefix": "!",
            "sql_server_ip": "127.0.0.1",
            "sql_server_port": 1433,
            "sql_server_username": "u",
            "sql_server_password": "p",
            "guild": {
                "id": 1,
                "roles": {
                    "staff": 10, "helper": 11, "moderator": 12,
                    "afk_access": 13, "blacklisted": 14, "trading": 15,
                    "middleman": 16, "middleman_trading": 17,
                    "staff_leave": 18, "welcomer": 19, "reviver": 20
                },
                "channels": {
                    "chat": 30, "giveaways": 31, "middleman": 32,
                    "scammer_banner": 33, "outside_heists": 34,
                    "trading_rules": 35, "readme": 36, "reaction_roles": 37
                },
                "webhooks": { "leave": "", "blacklist": "" },
                "donation_roles": { "100": 40 },
                "dank_channels": [50],
                "appeals_url": "https://example.invalid/appeals"
            },
            "xp": {
                "cooldown_seconds": 12,
                "channels": [30],
                "roles": { "5": 60 },
                "photo_min_level": 5
            },
            "unbelievaboat": { "token": "" },
            "users": { "dank_memer": 70, "contact": 71 }
        }"#;

        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn afk_is_granted_by_either_role() {
        let config = test_config();

        assert!(config.has_capability(&[RoleId::new(13)], Capability::Afk));
        assert!(config.has_capability(&[RoleId::new(10)], Capability::Afk));
        assert!(!config.has_capability(&[RoleId::new(11)], Capability::Afk));
    }

    #[test]
    fn staff_does_not_imply_moderator() {
        let config = test_config();

        assert!(!config.has_capability(&[RoleId::new(10)], Capability::Moderator));
        assert!(config.has_capability(&[RoleId::new(12)], Capability::Moderator));
    }

    #[test]
    fn no_roles_means_no_capabilities() {
        let config = test_config();

        assert!(!config.has_capability(&[], Capability::Afk));
        assert!(!config.has_capability(&[], Capability::Middleman));
    }

    #[test]
    fn cooldown_capacity_defaults_when_absent() {
        let config = test_config();

        assert_eq!(config.xp.cooldown_capacity, 100);
    }
}
