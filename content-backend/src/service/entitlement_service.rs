// content-backend/src/service/entitlement_service.rs

use crate::domain::tier::Tier;

/// 現在階層から閲覧可能・アップグレード可能な階層集合を導出する
///
/// 両関数は静的な階層順序のみに依存する純粋関数。コンテンツストアへの
/// フィルタ指定とフィードに出すアップグレード促進の唯一の供給元。
pub struct EntitlementResolver;

impl EntitlementResolver {
    /// 現在階層以下の全階層を昇順で返す（現在階層を含む）
    pub fn visible_tiers(current: Tier) -> Vec<Tier> {
        Tier::all()
            .into_iter()
            .filter(|tier| current.is_at_least(tier))
            .collect()
    }

    /// 現在階層より厳密に上の全階層を昇順で返す
    pub fn upgradable_tiers(current: Tier) -> Vec<Tier> {
        Tier::all()
            .into_iter()
            .filter(|tier| tier.level() > current.level())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_tiers_is_inclusive_prefix() {
        assert_eq!(EntitlementResolver::visible_tiers(Tier::Free), vec![Tier::Free]);
        assert_eq!(
            EntitlementResolver::visible_tiers(Tier::Silver),
            vec![Tier::Free, Tier::Silver]
        );
        assert_eq!(
            EntitlementResolver::visible_tiers(Tier::Gold),
            vec![Tier::Free, Tier::Silver, Tier::Gold]
        );
        assert_eq!(
            EntitlementResolver::visible_tiers(Tier::Platinum),
            Tier::all()
        );
    }

    #[test]
    fn test_upgradable_tiers_is_strict_suffix() {
        assert_eq!(
            EntitlementResolver::upgradable_tiers(Tier::Free),
            vec![Tier::Silver, Tier::Gold, Tier::Platinum]
        );
        assert_eq!(
            EntitlementResolver::upgradable_tiers(Tier::Silver),
            vec![Tier::Gold, Tier::Platinum]
        );
        assert_eq!(
            EntitlementResolver::upgradable_tiers(Tier::Gold),
            vec![Tier::Platinum]
        );
        assert_eq!(EntitlementResolver::upgradable_tiers(Tier::Platinum), vec![]);
    }

    #[test]
    fn test_sets_partition_the_ladder() {
        for current in Tier::all() {
            let mut combined = EntitlementResolver::visible_tiers(current);
            combined.extend(EntitlementResolver::upgradable_tiers(current));
            assert_eq!(combined, Tier::all());
        }
    }
}
