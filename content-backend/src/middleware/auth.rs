// content-backend/src/middleware/auth.rs

use crate::api::AppState;
use crate::domain::tier::Tier;
use crate::domain::user_model::UserEntitlement;
use crate::error::AppError;
use crate::logging::RequestContext;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// 認証済みユーザー情報を格納するエクステンション
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub entitlement: UserEntitlement,
}

impl AuthenticatedUser {
    pub fn user_id(&self) -> Uuid {
        self.entitlement.user_id
    }

    pub fn tier(&self) -> Tier {
        self.entitlement.tier
    }
}

/// セッショントークン認証ミドルウェア
///
/// Bearerトークンをアイデンティティプロバイダで検証し、解決した
/// エンタイトルメントをリクエストエクステンションに載せる。
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?
        .to_string();

    let entitlement = app_state.identity_provider.verify_session(&token).await?;

    // リクエストコンテキストへユーザーIDを反映する
    if let Some(context) = req.extensions_mut().get_mut::<RequestContext>() {
        context.user_id = Some(entitlement.user_id);
    }
    req.extensions_mut().insert(AuthenticatedUser { entitlement });

    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}
