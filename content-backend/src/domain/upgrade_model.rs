// content-backend/src/domain/upgrade_model.rs

use crate::domain::tier::Tier;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// アップグレード要求の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeKind {
    Promo,
    Paid,
}

impl UpgradeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Promo => "promo",
            Self::Paid => "paid",
        }
    }
}

impl Default for UpgradeKind {
    fn default() -> Self {
        Self::Paid
    }
}

impl std::fmt::Display for UpgradeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 1回のアップグレード要求の間だけ存在するトランザクション
///
/// 提出時に生成され、成功・失敗にかかわらず完了時に破棄される。永続化しない。
#[derive(Debug, Clone)]
pub struct UpgradeTransaction {
    pub user_id: Uuid,
    pub current_tier: Tier,
    pub target_tier: Tier,
    pub kind: UpgradeKind,
    pub amount: Option<f64>,
}

/// セッションが保持するワークフロー状態
///
/// 遷移ごとに丸ごと置き換える。フィールド単位の書き換えはしない。
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub current_tier: Tier,
    pub is_processing: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl SessionState {
    pub fn new(current_tier: Tier) -> Self {
        Self {
            current_tier,
            is_processing: false,
            error: None,
            success: None,
        }
    }

    /// 受理されたリクエストの処理開始。直前のエラーは消す
    pub fn begin_processing(&self) -> Self {
        Self {
            current_tier: self.current_tier,
            is_processing: true,
            error: None,
            success: self.success.clone(),
        }
    }

    /// 決済リダイレクトへのハンドオフ。ローカルでは成功扱いにしない
    pub fn handed_off(&self) -> Self {
        Self {
            current_tier: self.current_tier,
            is_processing: false,
            error: self.error.clone(),
            success: self.success.clone(),
        }
    }

    pub fn succeeded(new_tier: Tier, message: String) -> Self {
        Self {
            current_tier: new_tier,
            is_processing: false,
            error: None,
            success: Some(message),
        }
    }

    pub fn failed(&self, message: String) -> Self {
        Self {
            current_tier: self.current_tier,
            is_processing: false,
            error: Some(message),
            success: self.success.clone(),
        }
    }

    pub fn with_success_cleared(&self) -> Self {
        Self {
            success: None,
            ..self.clone()
        }
    }

    pub fn with_error_cleared(&self) -> Self {
        Self {
            error: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_processing_clears_prior_error() {
        let state = SessionState::new(Tier::Free).failed("boom".to_string());
        let processing = state.begin_processing();
        assert!(processing.is_processing);
        assert_eq!(processing.error, None);
        assert_eq!(processing.current_tier, Tier::Free);
    }

    #[test]
    fn test_terminal_states_clear_processing() {
        let processing = SessionState::new(Tier::Silver).begin_processing();
        assert!(!processing.handed_off().is_processing);
        assert!(!SessionState::succeeded(Tier::Gold, "ok".to_string()).is_processing);
        assert!(!processing.failed("no".to_string()).is_processing);
    }

    #[test]
    fn test_succeeded_moves_tier() {
        let state = SessionState::succeeded(Tier::Gold, "ok".to_string());
        assert_eq!(state.current_tier, Tier::Gold);
        assert_eq!(state.success.as_deref(), Some("ok"));
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_failed_keeps_tier() {
        let state = SessionState::new(Tier::Silver).failed("denied".to_string());
        assert_eq!(state.current_tier, Tier::Silver);
        assert_eq!(state.error.as_deref(), Some("denied"));
    }

    #[test]
    fn test_message_clearing_is_kind_scoped() {
        let state = SessionState {
            current_tier: Tier::Free,
            is_processing: false,
            error: Some("err".to_string()),
            success: Some("ok".to_string()),
        };
        assert_eq!(state.with_success_cleared().error.as_deref(), Some("err"));
        assert_eq!(state.with_error_cleared().success.as_deref(), Some("ok"));
    }
}
