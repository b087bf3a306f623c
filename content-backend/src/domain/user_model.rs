// content-backend/src/domain/user_model.rs

use crate::domain::tier::Tier;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// アイデンティティプロバイダが所有するユーザーのエンタイトルメント
///
/// このコアは読み取りと書き込み依頼のみを行い、自身では保持しない。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEntitlement {
    pub user_id: Uuid,
    pub tier: Tier,
    /// プロバイダ側のメタデータバッグ（内容は不透明）
    pub metadata: serde_json::Value,
}

impl UserEntitlement {
    pub fn new(user_id: Uuid, tier: Tier) -> Self {
        Self {
            user_id,
            tier,
            metadata: serde_json::json!({ "tier": tier.as_str() }),
        }
    }
}
