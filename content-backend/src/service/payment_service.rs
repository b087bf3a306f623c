// content-backend/src/service/payment_service.rs

use crate::config::payment::{PaymentConfig, STRIPE_CLIENT};
use crate::domain::tier::Tier;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use stripe::{
    CheckoutSession, CheckoutSessionMode, CreateCheckoutSession, CreateCheckoutSessionLineItems,
};
use uuid::Uuid;

/// 外部決済プロセッサの応答
///
/// リダイレクトが必要な場合は決済完了後に階層変更が帯域外で行われる。
/// 同期完了の場合のみ呼び出し側が階層変更を続行する。
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentFlow {
    Completed,
    Redirect { payment_url: String },
}

/// 外部決済プロセッサへのアクセス
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn begin_checkout(&self, user_id: Uuid, tier: Tier, amount: f64)
        -> AppResult<PaymentFlow>;
}

/// Stripeチェックアウトによる決済プロセッサ
#[derive(Clone)]
pub struct StripePaymentProcessor {
    config: PaymentConfig,
    frontend_url: String,
}

impl StripePaymentProcessor {
    pub fn new(config: PaymentConfig, frontend_url: impl Into<String>) -> Self {
        Self {
            config,
            frontend_url: frontend_url.into(),
        }
    }
}

#[async_trait]
impl PaymentProcessor for StripePaymentProcessor {
    async fn begin_checkout(
        &self,
        user_id: Uuid,
        tier: Tier,
        amount: f64,
    ) -> AppResult<PaymentFlow> {
        // 開発モードでは決済を同期完了として扱う
        if self.config.development_mode {
            tracing::info!(
                user_id = %user_id,
                tier = %tier,
                amount = %amount,
                "Development mode: completing payment synchronously"
            );
            return Ok(PaymentFlow::Completed);
        }

        // 価格IDを選択
        let price_id = self.config.get_price_id(tier).ok_or_else(|| {
            AppError::BadRequest(format!("No price configured for tier: {}", tier))
        })?;

        // チェックアウトセッションを作成
        let cancel_url = format!("{}/upgrade", self.frontend_url);
        let success_url = format!(
            "{}/upgrade/success?session_id={{CHECKOUT_SESSION_ID}}",
            self.frontend_url
        );

        let checkout_params = CreateCheckoutSession {
            cancel_url: Some(&cancel_url),
            success_url: Some(&success_url),
            line_items: Some(vec![CreateCheckoutSessionLineItems {
                price: Some(price_id.to_string()),
                quantity: Some(1),
                ..Default::default()
            }]),
            mode: Some(CheckoutSessionMode::Subscription),
            metadata: Some(
                [
                    ("user_id".to_string(), user_id.to_string()),
                    ("tier".to_string(), tier.as_str().to_string()),
                ]
                .into_iter()
                .collect(),
            ),
            ..Default::default()
        };

        let checkout_session = CheckoutSession::create(&STRIPE_CLIENT, checkout_params)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create checkout session: {}", e);
                AppError::CollaboratorError(format!("Payment processor error: {}", e))
            })?;

        let payment_url = checkout_session.url.ok_or_else(|| {
            AppError::InternalServerError("No checkout URL returned from payment processor".to_string())
        })?;

        Ok(PaymentFlow::Redirect { payment_url })
    }
}
