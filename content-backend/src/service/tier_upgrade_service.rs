// content-backend/src/service/tier_upgrade_service.rs

use crate::domain::tier::Tier;
use crate::domain::tier_ladder::TIER_LADDER;
use crate::domain::upgrade_model::{UpgradeKind, UpgradeTransaction};
use crate::error::AppResult;
use crate::repository::identity_repository::IdentityProvider;
use crate::service::payment_service::{PaymentFlow, PaymentProcessor};
use std::sync::Arc;
use uuid::Uuid;

/// 階層変更操作の結果
#[derive(Debug, Clone)]
pub enum UpgradeOutcome {
    /// 階層変更が適用された
    Applied {
        tier: Tier,
        user_id: Uuid,
        metadata: serde_json::Value,
    },
    /// 決済リダイレクトが必要。階層変更は決済完了後に帯域外で行われる
    RedirectRequired { payment_url: String },
}

/// 階層変更の実行
///
/// 有料の場合は決済プロセッサを先に通し、同期完了した場合と
/// プロモの場合のみアイデンティティプロバイダへ書き込みを依頼する。
#[derive(Clone)]
pub struct TierUpgradeService {
    identity: Arc<dyn IdentityProvider>,
    payment: Arc<dyn PaymentProcessor>,
}

impl TierUpgradeService {
    pub fn new(identity: Arc<dyn IdentityProvider>, payment: Arc<dyn PaymentProcessor>) -> Self {
        Self { identity, payment }
    }

    pub async fn execute(&self, transaction: &UpgradeTransaction) -> AppResult<UpgradeOutcome> {
        if transaction.kind == UpgradeKind::Paid {
            // 金額は常に階層設定から決める。呼び出し側の指定は受け付けない
            let amount = TIER_LADDER.price(transaction.target_tier);

            match self
                .payment
                .begin_checkout(transaction.user_id, transaction.target_tier, amount)
                .await?
            {
                PaymentFlow::Redirect { payment_url } => {
                    tracing::info!(
                        user_id = %transaction.user_id,
                        target_tier = %transaction.target_tier,
                        "Payment redirect required, deferring tier change"
                    );
                    return Ok(UpgradeOutcome::RedirectRequired { payment_url });
                }
                PaymentFlow::Completed => {}
            }
        }

        let entitlement = self
            .identity
            .update_tier(transaction.user_id, transaction.target_tier)
            .await?;

        tracing::info!(
            user_id = %transaction.user_id,
            previous_tier = %transaction.current_tier,
            new_tier = %entitlement.tier,
            kind = %transaction.kind,
            "Tier change applied"
        );

        Ok(UpgradeOutcome::Applied {
            tier: entitlement.tier,
            user_id: entitlement.user_id,
            metadata: entitlement.metadata,
        })
    }
}
