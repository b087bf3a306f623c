// content-backend/src/api/dto/tier_dto.rs

use crate::domain::tier::Tier;
use crate::domain::tier_ladder::TIER_LADDER;
use crate::domain::upgrade_model::UpgradeKind;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 階層変更リクエスト
///
/// 有料アップグレードの金額は常にサーバー側で階層設定から決まるため、
/// `amount`は参考値としてのみ受け取り適用には使わない。
#[derive(Debug, Deserialize, Validate)]
pub struct TierUpgradeRequest {
    pub user_id: Option<Uuid>,
    pub new_tier: Option<String>,
    #[serde(default)]
    pub upgrade_type: UpgradeKind,
    #[validate(range(min = 0.0, message = "Amount must not be negative"))]
    pub amount: Option<f64>,
}

/// 適用済み階層変更のレスポンス
#[derive(Debug, Serialize)]
pub struct TierUpgradeResponse {
    pub tier: Tier,
    pub user_id: Uuid,
    pub metadata: serde_json::Value,
}

/// 決済リダイレクトが必要な場合のレスポンス
#[derive(Debug, Serialize)]
pub struct PaymentRedirectResponse {
    pub payment_url: String,
}

/// 階層変更操作の2形のレスポンス
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TierUpgradeResult {
    Applied(TierUpgradeResponse),
    Redirect(PaymentRedirectResponse),
}

/// 階層設定の読み取り専用ビュー
#[derive(Debug, Serialize)]
pub struct TierInfo {
    pub tier: Tier,
    pub label: String,
    pub price: f64,
    pub description: String,
    pub benefits: Vec<String>,
}

impl TierInfo {
    pub fn from_ladder(tier: Tier) -> Self {
        Self {
            tier,
            label: TIER_LADDER.label(tier).to_string(),
            price: TIER_LADDER.price(tier),
            description: TIER_LADDER.description(tier).to_string(),
            benefits: TIER_LADDER.benefits(tier).to_vec(),
        }
    }
}
