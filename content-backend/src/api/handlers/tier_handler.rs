// content-backend/src/api/handlers/tier_handler.rs

use crate::api::dto::common::ApiResponse;
use crate::api::dto::tier_dto::{
    PaymentRedirectResponse, TierInfo, TierUpgradeRequest, TierUpgradeResponse, TierUpgradeResult,
};
use crate::api::AppState;
use crate::domain::tier::Tier;
use crate::domain::tier_ladder::TIER_LADDER;
use crate::domain::upgrade_model::{UpgradeKind, UpgradeTransaction};
use crate::error::{AppError, AppResult};
use crate::service::tier_upgrade_service::UpgradeOutcome;
use axum::{
    extract::{Json, State},
    routing::{get, post},
    Router,
};
use tracing::info;
use validator::Validate;

/// 階層変更を実行
pub async fn upgrade_tier_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<TierUpgradeRequest>,
) -> AppResult<Json<ApiResponse<TierUpgradeResult>>> {
    // バリデーション
    Validate::validate(&payload).map_err(|validation_errors| {
        let errors: Vec<String> = validation_errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    format!(
                        "{}: {}",
                        field,
                        error.message.as_ref().unwrap_or(&"Invalid value".into())
                    )
                })
            })
            .collect();
        AppError::ValidationErrors(errors)
    })?;

    let user_id = payload
        .user_id
        .ok_or_else(|| AppError::BadRequest("User ID is required".to_string()))?;
    let new_tier_raw = payload
        .new_tier
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("New tier is required".to_string()))?;
    let new_tier = Tier::from_str(new_tier_raw)
        .ok_or_else(|| AppError::BadRequest("Invalid tier specified".to_string()))?;

    info!(
        user_id = %user_id,
        new_tier = %new_tier,
        upgrade_type = %payload.upgrade_type,
        "Processing tier change request"
    );

    // 現在階層を読み取ってトランザクションを組み立てる
    let entitlement = app_state.identity_provider.find_user(user_id).await?;
    let transaction = UpgradeTransaction {
        user_id,
        current_tier: entitlement.tier,
        target_tier: new_tier,
        kind: payload.upgrade_type,
        amount: match payload.upgrade_type {
            UpgradeKind::Paid => Some(TIER_LADDER.price(new_tier)),
            UpgradeKind::Promo => None,
        },
    };

    match app_state.tier_upgrade_service.execute(&transaction).await? {
        UpgradeOutcome::Applied {
            tier,
            user_id,
            metadata,
        } => {
            info!(user_id = %user_id, tier = %tier, "Tier updated successfully");
            Ok(Json(ApiResponse::success(
                "Tier updated successfully",
                TierUpgradeResult::Applied(TierUpgradeResponse {
                    tier,
                    user_id,
                    metadata,
                }),
            )))
        }
        UpgradeOutcome::RedirectRequired { payment_url } => Ok(Json(ApiResponse::success(
            "Payment required to complete the upgrade",
            TierUpgradeResult::Redirect(PaymentRedirectResponse { payment_url }),
        ))),
    }
}

/// 利用可能な階層の設定を取得
pub async fn get_tiers_handler(
    State(_app_state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<TierInfo>>>> {
    let tier_infos: Vec<TierInfo> = Tier::all().into_iter().map(TierInfo::from_ladder).collect();

    Ok(Json(ApiResponse::success(
        "Available tiers retrieved successfully",
        tier_infos,
    )))
}

/// 階層関連のルーター
pub fn tier_router(app_state: AppState) -> Router {
    Router::new()
        .route("/tier/upgrade", post(upgrade_tier_handler))
        .route("/tiers", get(get_tiers_handler))
        .with_state(app_state)
}
