// content-backend/src/api/handlers/content_handler.rs

use crate::api::dto::common::ApiResponse;
use crate::api::dto::content_dto::{ContentListResponse, FeedResponse};
use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::service::entitlement_service::EntitlementResolver;
use crate::service::feed_service::FeedComposer;
use axum::{
    extract::{Json, State},
    middleware,
    routing::get,
    Router,
};
use tracing::info;

/// 閲覧可能コンテンツ一覧を取得
///
/// ストアから日付昇順で返る。並び替えはフィード合成側の責務。
pub async fn get_content_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<ApiResponse<ContentListResponse>>> {
    let tier = user.tier();

    info!(
        user_id = %user.user_id(),
        tier = %tier,
        "Fetching entitled content"
    );

    let visible_tiers = EntitlementResolver::visible_tiers(tier);
    let contents = app_state
        .content_repository
        .find_by_tiers(&visible_tiers)
        .await?;

    Ok(Json(ApiResponse::success(
        "Content retrieved successfully",
        ContentListResponse {
            contents,
            user_tier: tier,
        },
    )))
}

/// 表示用に合成済みのフィードを取得
///
/// シャッフルとアップグレード促進カードの挿入はリクエストごとに行う。
pub async fn get_content_feed_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<ApiResponse<FeedResponse>>> {
    let tier = user.tier();

    info!(
        user_id = %user.user_id(),
        tier = %tier,
        "Composing content feed"
    );

    let visible_tiers = EntitlementResolver::visible_tiers(tier);
    let upgradable_tiers = EntitlementResolver::upgradable_tiers(tier);
    let contents = app_state
        .content_repository
        .find_by_tiers(&visible_tiers)
        .await?;

    let items = FeedComposer::compose(contents, &upgradable_tiers, &mut rand::thread_rng());

    Ok(Json(ApiResponse::success(
        "Feed composed successfully",
        FeedResponse {
            items,
            user_tier: tier,
        },
    )))
}

/// コンテンツ関連のルーター（要認証）
pub fn content_router(app_state: AppState) -> Router {
    Router::new()
        .route("/content", get(get_content_handler))
        .route("/content/feed", get(get_content_feed_handler))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ))
        .with_state(app_state)
}
