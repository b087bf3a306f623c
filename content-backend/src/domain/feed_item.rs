// content-backend/src/domain/feed_item.rs

use crate::domain::content_model::ContentItem;
use crate::domain::tier::Tier;
use serde::{Deserialize, Serialize};

/// フィードに並ぶ1要素
///
/// コンテンツとアップグレード促進カードを明示的なタグで区別する。
/// 構造の形からの推測でなく`kind`で判別すること。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedItem {
    Content(ContentItem),
    UpgradePrompt { id: String, tier: Tier },
}

impl FeedItem {
    /// 指定階層向けのアップグレード促進カードを作成
    pub fn upgrade_prompt(tier: Tier) -> Self {
        Self::UpgradePrompt {
            id: format!("upgrade-{}", tier),
            tier,
        }
    }

    pub fn is_upgrade_prompt(&self) -> bool {
        matches!(self, Self::UpgradePrompt { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upgrade_prompt_id() {
        let prompt = FeedItem::upgrade_prompt(Tier::Gold);
        assert!(prompt.is_upgrade_prompt());
        match prompt {
            FeedItem::UpgradePrompt { id, tier } => {
                assert_eq!(id, "upgrade-gold");
                assert_eq!(tier, Tier::Gold);
            }
            FeedItem::Content(_) => panic!("expected an upgrade prompt"),
        }
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let prompt = FeedItem::upgrade_prompt(Tier::Silver);
        let json = serde_json::to_value(&prompt).unwrap();
        assert_eq!(json["kind"], "upgrade_prompt");
        assert_eq!(json["tier"], "silver");
        assert_eq!(json["id"], "upgrade-silver");
    }
}
