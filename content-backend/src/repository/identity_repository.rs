// content-backend/src/repository/identity_repository.rs

use crate::domain::tier::Tier;
use crate::domain::user_model::UserEntitlement;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

/// 外部アイデンティティプロバイダへのアクセス
///
/// `UserEntitlement.tier`の書き込みはプロバイダだけが行う。このコアは
/// 書き込みを依頼して後から読み直すのみで、直接変更しない。
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// セッショントークンを検証してエンタイトルメントを解決
    async fn verify_session(&self, token: &str) -> AppResult<UserEntitlement>;

    /// ユーザーのエンタイトルメントを取得
    async fn find_user(&self, user_id: Uuid) -> AppResult<UserEntitlement>;

    /// 階層の変更を依頼し、更新後のエンタイトルメントを返す
    async fn update_tier(&self, user_id: Uuid, tier: Tier) -> AppResult<UserEntitlement>;
}

/// プロバイダが返すユーザー表現
#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: Uuid,
    #[serde(default)]
    public_metadata: serde_json::Value,
}

impl ProviderUser {
    fn into_entitlement(self) -> UserEntitlement {
        // メタデータに階層がなければfree扱い
        let tier = self
            .public_metadata
            .get("tier")
            .and_then(|v| v.as_str())
            .and_then(Tier::from_str)
            .unwrap_or_default();

        UserEntitlement {
            user_id: self.id,
            tier,
            metadata: self.public_metadata,
        }
    }
}

/// REST API経由のアイデンティティプロバイダクライアント
#[derive(Clone)]
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl HttpIdentityProvider {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            secret_key: secret_key.into(),
        }
    }

    async fn decode_user(&self, response: reqwest::Response) -> AppResult<UserEntitlement> {
        let user = response.json::<ProviderUser>().await.map_err(|e| {
            tracing::error!("Failed to decode identity provider response: {}", e);
            AppError::CollaboratorError(format!("Invalid identity provider response: {}", e))
        })?;
        Ok(user.into_entitlement())
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify_session(&self, token: &str) -> AppResult<UserEntitlement> {
        let response = self
            .client
            .post(format!("{}/sessions/verify", self.base_url))
            .bearer_auth(&self.secret_key)
            .json(&json!({ "token": token }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Identity provider request failed: {}", e);
                AppError::CollaboratorError(format!("Identity provider unreachable: {}", e))
            })?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::NOT_FOUND
        {
            return Err(AppError::Unauthorized("Authentication required".to_string()));
        }
        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(status = %status, "Session verification failed");
            return Err(AppError::CollaboratorError(
                "Session verification failed".to_string(),
            ));
        }

        self.decode_user(response).await
    }

    async fn find_user(&self, user_id: Uuid) -> AppResult<UserEntitlement> {
        let response = self
            .client
            .get(format!("{}/users/{}", self.base_url, user_id))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Identity provider request failed: {}", e);
                AppError::CollaboratorError(format!("Identity provider unreachable: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, user_id = %user_id, "Failed to fetch user: {}", body);
            return Err(AppError::CollaboratorError(
                "Failed to fetch user entitlement".to_string(),
            ));
        }

        self.decode_user(response).await
    }

    async fn update_tier(&self, user_id: Uuid, tier: Tier) -> AppResult<UserEntitlement> {
        let response = self
            .client
            .patch(format!("{}/users/{}/metadata", self.base_url, user_id))
            .bearer_auth(&self.secret_key)
            .json(&json!({ "tier": tier.as_str() }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Identity provider request failed: {}", e);
                AppError::CollaboratorError(format!("Identity provider unreachable: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                user_id = %user_id,
                new_tier = %tier,
                "Failed to update user metadata: {}",
                body
            );
            return Err(AppError::CollaboratorError(
                "Failed to update user metadata".to_string(),
            ));
        }

        self.decode_user(response).await
    }
}
