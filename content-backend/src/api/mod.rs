// content-backend/src/api/mod.rs

use crate::config::AppConfig;
use crate::repository::content_repository::ContentRepository;
use crate::repository::identity_repository::IdentityProvider;
use crate::service::tier_upgrade_service::TierUpgradeService;
use std::sync::Arc;

pub mod dto;
pub mod handlers;

/// 統一されたアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub content_repository: Arc<dyn ContentRepository>,
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub tier_upgrade_service: Arc<TierUpgradeService>,
}
