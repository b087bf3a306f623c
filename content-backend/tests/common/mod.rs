// tests/common/mod.rs

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use content_backend::api::AppState;
use content_backend::config::AppConfig;
use content_backend::domain::content_model::ContentItem;
use content_backend::domain::tier::Tier;
use content_backend::domain::user_model::UserEntitlement;
use content_backend::error::{AppError, AppResult};
use content_backend::repository::content_repository::ContentRepository;
use content_backend::repository::identity_repository::IdentityProvider;
use content_backend::service::payment_service::{PaymentFlow, PaymentProcessor};
use content_backend::service::tier_upgrade_service::TierUpgradeService;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use uuid::Uuid;

/// インメモリのアイデンティティプロバイダ
#[derive(Default)]
pub struct MockIdentityProvider {
    users: Mutex<HashMap<Uuid, UserEntitlement>>,
    sessions: Mutex<HashMap<String, Uuid>>,
    pub update_calls: AtomicUsize,
    /// Someなら update_tier をこのメッセージのコラボレータエラーにする
    pub fail_update_with: Mutex<Option<String>>,
}

impl MockIdentityProvider {
    pub fn with_user(tier: Tier) -> (Arc<Self>, Uuid) {
        let provider = Arc::new(Self::default());
        let user_id = provider.insert_user(tier);
        (provider, user_id)
    }

    pub fn insert_user(&self, tier: Tier) -> Uuid {
        let user_id = Uuid::new_v4();
        self.users
            .lock()
            .unwrap()
            .insert(user_id, UserEntitlement::new(user_id, tier));
        user_id
    }

    pub fn register_session(&self, token: &str, user_id: Uuid) {
        self.sessions
            .lock()
            .unwrap()
            .insert(token.to_string(), user_id);
    }

    pub fn tier_of(&self, user_id: Uuid) -> Tier {
        self.users.lock().unwrap()[&user_id].tier
    }

    pub fn set_update_failure(&self, message: Option<&str>) {
        *self.fail_update_with.lock().unwrap() = message.map(str::to_string);
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn verify_session(&self, token: &str) -> AppResult<UserEntitlement> {
        let user_id = self
            .sessions
            .lock()
            .unwrap()
            .get(token)
            .copied()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;
        self.find_user(user_id).await
    }

    async fn find_user(&self, user_id: Uuid) -> AppResult<UserEntitlement> {
        self.users
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or_else(|| AppError::CollaboratorError("User not found".to_string()))
    }

    async fn update_tier(&self, user_id: Uuid, tier: Tier) -> AppResult<UserEntitlement> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.fail_update_with.lock().unwrap().clone() {
            return Err(AppError::CollaboratorError(message));
        }

        let mut users = self.users.lock().unwrap();
        let entitlement = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::CollaboratorError("User not found".to_string()))?;
        *entitlement = UserEntitlement::new(user_id, tier);
        Ok(entitlement.clone())
    }
}

/// インメモリのコンテンツストア
#[derive(Default)]
pub struct MockContentRepository {
    items: Mutex<Vec<ContentItem>>,
}

impl MockContentRepository {
    pub fn with_items(items: Vec<ContentItem>) -> Arc<Self> {
        Arc::new(Self {
            items: Mutex::new(items),
        })
    }
}

#[async_trait]
impl ContentRepository for MockContentRepository {
    async fn find_by_tiers(&self, tiers: &[Tier]) -> AppResult<Vec<ContentItem>> {
        let mut matching: Vec<ContentItem> = self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|item| item.is_visible_to(tiers))
            .cloned()
            .collect();
        // ストアは日付昇順で返す契約
        matching.sort_by_key(|item| item.content_date);
        Ok(matching)
    }
}

/// 常に失敗するコンテンツストア
pub struct FailingContentRepository;

#[async_trait]
impl ContentRepository for FailingContentRepository {
    async fn find_by_tiers(&self, _tiers: &[Tier]) -> AppResult<Vec<ContentItem>> {
        Err(AppError::StoreError("Database error".to_string()))
    }
}

/// 設定可能な決済プロセッサ
pub struct MockPaymentProcessor {
    flow: PaymentFlow,
    pub recorded: Mutex<Vec<(Uuid, Tier, f64)>>,
}

impl MockPaymentProcessor {
    pub fn completing() -> Arc<Self> {
        Arc::new(Self {
            flow: PaymentFlow::Completed,
            recorded: Mutex::new(Vec::new()),
        })
    }

    pub fn redirecting(payment_url: &str) -> Arc<Self> {
        Arc::new(Self {
            flow: PaymentFlow::Redirect {
                payment_url: payment_url.to_string(),
            },
            recorded: Mutex::new(Vec::new()),
        })
    }

    pub fn checkout_count(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }
}

#[async_trait]
impl PaymentProcessor for MockPaymentProcessor {
    async fn begin_checkout(
        &self,
        user_id: Uuid,
        tier: Tier,
        amount: f64,
    ) -> AppResult<PaymentFlow> {
        self.recorded.lock().unwrap().push((user_id, tier, amount));
        Ok(self.flow.clone())
    }
}

/// 呼び出し側が解放するまでチェックアウトでブロックする決済プロセッサ
///
/// 処理中の二重提出ガードを検証するために使う。
pub struct BlockingPaymentProcessor {
    pub started: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl BlockingPaymentProcessor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            started: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        })
    }
}

#[async_trait]
impl PaymentProcessor for BlockingPaymentProcessor {
    async fn begin_checkout(
        &self,
        _user_id: Uuid,
        _tier: Tier,
        _amount: f64,
    ) -> AppResult<PaymentFlow> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(PaymentFlow::Completed)
    }
}

/// 日付をずらしたコンテンツを作成
pub fn content_item(tier: Tier, day_offset: i64) -> ContentItem {
    let base = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    ContentItem {
        id: Uuid::new_v4(),
        title: format!("{} item {}", tier, day_offset),
        tier,
        content_date: base + Duration::days(day_offset),
        description: "A scheduled community event".to_string(),
        image_url: None,
        category: Some("community".to_string()),
    }
}

/// モックコラボレータで組み立てたアプリケーション状態
pub fn test_app_state(
    identity: Arc<MockIdentityProvider>,
    contents: Arc<MockContentRepository>,
    payment: Arc<dyn PaymentProcessor>,
) -> AppState {
    let identity_provider: Arc<dyn IdentityProvider> = identity;
    AppState {
        config: Arc::new(AppConfig::for_testing()),
        content_repository: contents,
        identity_provider: identity_provider.clone(),
        tier_upgrade_service: Arc::new(TierUpgradeService::new(identity_provider, payment)),
    }
}
