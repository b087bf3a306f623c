// content-backend/src/service/upgrade_workflow.rs

use crate::domain::tier::Tier;
use crate::domain::tier_ladder::TIER_LADDER;
use crate::domain::upgrade_model::{SessionState, UpgradeKind, UpgradeTransaction};
use crate::error::AppError;
use crate::repository::identity_repository::IdentityProvider;
use crate::service::tier_upgrade_service::{TierUpgradeService, UpgradeOutcome};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// 通知メッセージの自動消去までの待ち時間
///
/// エラーは成功より長く表示する。非対称は意図したもの。
#[derive(Debug, Clone, Copy)]
pub struct DismissDelays {
    pub success: Duration,
    pub error: Duration,
}

impl Default for DismissDelays {
    fn default() -> Self {
        Self {
            success: Duration::from_secs(5),
            error: Duration::from_secs(10),
        }
    }
}

/// ワークフローが発するセッション副作用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// 有料アップグレード成功後にフィードへ遷移させる意図
    NavigateToFeed,
}

/// submitの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// ガードにより受理されなかった
    Ignored,
    /// 決済リダイレクトへハンドオフした。階層変更は帯域外で完了する
    Redirected(String),
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MessageKind {
    Success,
    Error,
}

#[derive(Default)]
struct DismissTimers {
    success: Option<JoinHandle<()>>,
    error: Option<JoinHandle<()>>,
}

/// セッション単位のアップグレードワークフロー
///
/// 状態機械: Idle → Processing → {Success, Error} → Idle。
/// 1セッションにつき同時に処理できるトランザクションは1つだけ。
/// 終端状態のメッセージは種別ごとのタイマーで自動消去される。
pub struct UpgradeWorkflow {
    user_id: Option<Uuid>,
    state: Arc<tokio::sync::Mutex<SessionState>>,
    upgrades: Arc<TierUpgradeService>,
    identity: Arc<dyn IdentityProvider>,
    delays: DismissDelays,
    timers: std::sync::Mutex<DismissTimers>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl UpgradeWorkflow {
    pub fn new(
        user_id: Option<Uuid>,
        initial_tier: Tier,
        upgrades: Arc<TierUpgradeService>,
        identity: Arc<dyn IdentityProvider>,
        delays: DismissDelays,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (
            Self {
                user_id,
                state: Arc::new(tokio::sync::Mutex::new(SessionState::new(initial_tier))),
                upgrades,
                identity,
                delays,
                timers: std::sync::Mutex::new(DismissTimers::default()),
                events,
            },
            receiver,
        )
    }

    /// 現在のセッション状態のスナップショットを取得
    pub async fn state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// プロモコードを正規化・解決して提出する
    ///
    /// 未知のコードはローカルなエラー表示で完結し、コラボレータは呼ばない。
    pub async fn apply_promo_code(&self, code: &str) -> SubmitOutcome {
        let normalized = code.trim().to_uppercase();
        if normalized.is_empty() {
            return SubmitOutcome::Ignored;
        }

        match TIER_LADDER.tier_for_promo(&normalized) {
            Some(tier) => self.submit(tier, UpgradeKind::Promo).await,
            None => {
                self.fail(
                    UpgradeKind::Promo,
                    &AppError::InvalidPromoCode(normalized),
                )
                .await
            }
        }
    }

    /// 指定階層への有料アップグレードを提出する
    pub async fn submit_paid_upgrade(&self, tier: Tier) -> SubmitOutcome {
        self.submit(tier, UpgradeKind::Paid).await
    }

    /// アップグレード要求を提出する
    ///
    /// ガード: 未認証、自階層への変更、処理中の二重提出はすべてno-op。
    pub async fn submit(&self, tier: Tier, kind: UpgradeKind) -> SubmitOutcome {
        let Some(user_id) = self.user_id else {
            return SubmitOutcome::Ignored;
        };

        // ガード判定と処理開始は同一クリティカルセクションで行う
        let current_tier = {
            let mut state = self.state.lock().await;
            if state.is_processing || tier == state.current_tier {
                return SubmitOutcome::Ignored;
            }
            let current = state.current_tier;
            *state = state.begin_processing();
            current
        };

        let transaction = UpgradeTransaction {
            user_id,
            current_tier,
            target_tier: tier,
            kind,
            amount: match kind {
                UpgradeKind::Paid => Some(TIER_LADDER.price(tier)),
                UpgradeKind::Promo => None,
            },
        };

        tracing::info!(
            user_id = %user_id,
            current_tier = %current_tier,
            target_tier = %tier,
            kind = %kind,
            "Submitting tier upgrade"
        );

        match self.upgrades.execute(&transaction).await {
            Ok(UpgradeOutcome::RedirectRequired { payment_url }) => {
                let mut state = self.state.lock().await;
                *state = state.handed_off();
                SubmitOutcome::Redirected(payment_url)
            }
            Ok(UpgradeOutcome::Applied { .. }) => {
                // 成功へ遷移する前にエンタイトルメントを読み直す
                match self.identity.find_user(user_id).await {
                    Ok(_refreshed) => {
                        let message = match kind {
                            UpgradeKind::Promo => format!(
                                "Promo code applied! You've been upgraded to {}!",
                                TIER_LADDER.label(tier)
                            ),
                            UpgradeKind::Paid => {
                                format!("Successfully upgraded to {}!", TIER_LADDER.label(tier))
                            }
                        };
                        {
                            let mut state = self.state.lock().await;
                            *state = SessionState::succeeded(tier, message);
                        }
                        self.schedule_dismiss(MessageKind::Success);
                        if kind == UpgradeKind::Paid {
                            let _ = self.events.send(SessionEvent::NavigateToFeed);
                        }
                        SubmitOutcome::Completed
                    }
                    Err(err) => self.fail(kind, &err).await,
                }
            }
            Err(err) => self.fail(kind, &err).await,
        }
    }

    async fn fail(&self, kind: UpgradeKind, err: &AppError) -> SubmitOutcome {
        let message = failure_message(err, kind);
        tracing::warn!(error = %err, kind = %kind, "Tier upgrade failed");
        {
            let mut state = self.state.lock().await;
            *state = state.failed(message);
        }
        self.schedule_dismiss(MessageKind::Error);
        SubmitOutcome::Failed
    }

    /// 指定種別のメッセージ消去タイマーを張り直す
    ///
    /// 新しい終端状態は両種別の保留中タイマーを取り消す。古いタイマーが
    /// 新しいメッセージを消してしまう競合を防ぐため。
    fn schedule_dismiss(&self, kind: MessageKind) {
        let mut timers = self.timers.lock().expect("dismiss timer lock poisoned");
        if let Some(handle) = timers.success.take() {
            handle.abort();
        }
        if let Some(handle) = timers.error.take() {
            handle.abort();
        }

        let state = Arc::clone(&self.state);
        let delay = match kind {
            MessageKind::Success => self.delays.success,
            MessageKind::Error => self.delays.error,
        };
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = state.lock().await;
            *state = match kind {
                MessageKind::Success => state.with_success_cleared(),
                MessageKind::Error => state.with_error_cleared(),
            };
        });

        match kind {
            MessageKind::Success => timers.success = Some(handle),
            MessageKind::Error => timers.error = Some(handle),
        }
    }
}

impl Drop for UpgradeWorkflow {
    fn drop(&mut self) {
        if let Ok(mut timers) = self.timers.lock() {
            if let Some(handle) = timers.success.take() {
                handle.abort();
            }
            if let Some(handle) = timers.error.take() {
                handle.abort();
            }
        }
    }
}

fn failure_message(err: &AppError, kind: UpgradeKind) -> String {
    match err {
        AppError::InvalidPromoCode(_) => "Invalid promo code".to_string(),
        AppError::CollaboratorError(message)
        | AppError::StoreError(message)
        | AppError::BadRequest(message)
            if !message.is_empty() =>
        {
            message.clone()
        }
        _ => match kind {
            UpgradeKind::Promo => "Failed to apply promo code".to_string(),
            UpgradeKind::Paid => "Failed to upgrade tier".to_string(),
        },
    }
}
