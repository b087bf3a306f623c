// content-backend/src/api/dto/content_dto.rs

use crate::domain::content_model::ContentItem;
use crate::domain::feed_item::FeedItem;
use crate::domain::tier::Tier;
use serde::Serialize;

/// 閲覧可能コンテンツ一覧のレスポンス
#[derive(Debug, Serialize)]
pub struct ContentListResponse {
    pub contents: Vec<ContentItem>,
    pub user_tier: Tier,
}

/// 表示順に合成済みのフィードのレスポンス
#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub items: Vec<FeedItem>,
    pub user_tier: Tier,
}
