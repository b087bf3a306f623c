// content-backend/src/repository/content_repository.rs

use crate::domain::content_model::ContentItem;
use crate::domain::tier::Tier;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;

/// 外部コンテンツストアへの読み取りアクセス
///
/// ストアは階層集合でフィルタ済みのコンテンツを日付昇順で返す。
/// 永続化はストア側の責務であり、このコアは一切保持しない。
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn find_by_tiers(&self, tiers: &[Tier]) -> AppResult<Vec<ContentItem>>;
}

/// REST API経由のコンテンツストアクライアント
#[derive(Clone)]
pub struct HttpContentRepository {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpContentRepository {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl ContentRepository for HttpContentRepository {
    async fn find_by_tiers(&self, tiers: &[Tier]) -> AppResult<Vec<ContentItem>> {
        if tiers.is_empty() {
            return Ok(Vec::new());
        }

        let tier_filter = format!(
            "in.({})",
            tiers
                .iter()
                .map(Tier::as_str)
                .collect::<Vec<_>>()
                .join(",")
        );

        let response = self
            .client
            .get(format!("{}/contents", self.base_url))
            .header("apikey", &self.api_key)
            .query(&[
                ("select", "*"),
                ("tier", tier_filter.as_str()),
                ("order", "content_date.asc"),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Content store request failed: {}", e);
                AppError::StoreError(format!("Content store unreachable: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, "Content store returned an error: {}", body);
            return Err(AppError::StoreError("Database error".to_string()));
        }

        response.json::<Vec<ContentItem>>().await.map_err(|e| {
            tracing::error!("Failed to decode content store response: {}", e);
            AppError::StoreError(format!("Invalid content store response: {}", e))
        })
    }
}
