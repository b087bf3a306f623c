// content-backend/src/domain/content_model.rs

use crate::domain::tier::Tier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 外部コンテンツストアから取得するコンテンツ
///
/// 取得後は不変。`tier`は閲覧に必要な最低階層。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: Uuid,
    pub title: String,
    pub tier: Tier,
    pub content_date: DateTime<Utc>,
    pub description: String,
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ContentItem {
    /// 指定した階層集合で閲覧可能かチェック
    pub fn is_visible_to(&self, tiers: &[Tier]) -> bool {
        tiers.contains(&self.tier)
    }
}
