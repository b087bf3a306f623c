// content-backend/src/domain/tier.rs

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// コンテンツ閲覧階層
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Silver,
    Gold,
    Platinum,
}

impl Tier {
    /// 文字列からTierに変換
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "free" => Some(Self::Free),
            "silver" => Some(Self::Silver),
            "gold" => Some(Self::Gold),
            "platinum" => Some(Self::Platinum),
            _ => None,
        }
    }

    /// Tierを文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Platinum => "platinum",
        }
    }

    /// 階層レベルを数値で取得
    pub fn level(&self) -> u8 {
        match self {
            Self::Free => 1,
            Self::Silver => 2,
            Self::Gold => 3,
            Self::Platinum => 4,
        }
    }

    /// 指定した階層以上かチェック
    pub fn is_at_least(&self, other: &Self) -> bool {
        self.level() >= other.level()
    }

    /// 次の上位階層を取得（最上位は自分自身）
    pub fn next(&self) -> Self {
        match self {
            Self::Free => Self::Silver,
            Self::Silver => Self::Gold,
            Self::Gold => Self::Platinum,
            Self::Platinum => Self::Platinum,
        }
    }

    /// 最上位階層かチェック
    pub fn is_max(&self) -> bool {
        matches!(self, Self::Platinum)
    }

    /// 全ての有効な階層を昇順で取得
    pub fn all() -> Vec<Self> {
        vec![Self::Free, Self::Silver, Self::Gold, Self::Platinum]
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "silver" => Ok(Self::Silver),
            "gold" => Ok(Self::Gold),
            "platinum" => Ok(Self::Platinum),
            _ => Err(format!("Invalid tier: {}", s)),
        }
    }
}

impl Default for Tier {
    fn default() -> Self {
        Self::Free
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
