//! Level curve for the XP system. Levels are never stored; they are
//! recomputed from the XP counter on every read.

use std::collections::BTreeMap;

use serenity::model::id::RoleId;

/// Total XP needed to hold `level`.
pub fn xp_threshold(level: i64) -> i64 {
    level * level * level + level * 15
}

/// The largest level whose threshold `xp` meets. Total for all
/// non-negative inputs; searches upward so that arbitrarily large
/// administrative grants land on the right level.
pub fn level_for(xp: i64) -> i64 {
    let mut level = 0;

    while xp >= xp_threshold(level + 1) {
        level += 1;
    }

    level
}

/// XP still missing before the next level.
pub fn xp_to_next(xp: i64) -> i64 {
    xp_threshold(level_for(xp) + 1) - xp
}

/// Every reward whose tier threshold the total meets. Re-applying the
/// whole set is idempotent; already-held roles are no-ops at Discord.
/// Also used for donation reward tiers, which share the shape.
pub fn earned_rewards(total: i64, tiers: &BTreeMap<i64, u64>) -> Vec<RoleId> {
    tiers
        .range(..=total)
        .map(|(_, role)| RoleId::new(*role))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_match_the_curve() {
        assert_eq!(xp_threshold(0), 0);
        assert_eq!(xp_threshold(1), 16);
        assert_eq!(xp_threshold(2), 38);
        assert_eq!(xp_threshold(10), 1150);
    }

    #[test]
    fn level_zero_at_zero_xp() {
        assert_eq!(level_for(0), 0);
    }

    #[test]
    fn level_is_monotonic_in_xp() {
        let mut previous = 0;

        for xp in 0..5_000 {
            let level = level_for(xp);
            assert!(level >= previous, "level dropped at xp={xp}");
            assert!(xp_threshold(level) <= xp);
            previous = level;
        }
    }

    #[test]
    fn thresholds_round_trip() {
        for level in 1..50 {
            let threshold = xp_threshold(level);
            assert_eq!(level_for(threshold), level);
            assert_eq!(level_for(threshold - 1), level - 1);
        }
    }

    #[test]
    fn one_point_crosses_the_first_boundary() {
        assert_eq!(level_for(15), 0);
        assert_eq!(level_for(16), 1);
    }

    #[test]
    fn large_grants_cross_many_boundaries() {
        // 0 -> 1,000,000 XP in one administrative grant.
        let level = level_for(1_000_000);
        assert!(xp_threshold(level) <= 1_000_000);
        assert!(xp_threshold(level + 1) > 1_000_000);
        assert!(level > 90);
    }

    #[test]
    fn to_next_is_positive_and_consistent() {
        for xp in [0, 15, 16, 37, 38, 999] {
            let missing = xp_to_next(xp);
            assert!(missing > 0);
            assert_eq!(level_for(xp + missing), level_for(xp) + 1);
        }
    }

    #[test]
    fn rewards_accumulate_and_reapply() {
        let tiers = BTreeMap::from([(5, 100), (10, 200), (20, 300)]);

        assert!(earned_rewards(4, &tiers).is_empty());
        assert_eq!(earned_rewards(5, &tiers), vec![RoleId::new(100)]);
        assert_eq!(
            earned_rewards(12, &tiers),
            vec![RoleId::new(100), RoleId::new(200)]
        );
        // Idempotent: asking twice yields the same set.
        assert_eq!(earned_rewards(12, &tiers), earned_rewards(12, &tiers));
    }
}
