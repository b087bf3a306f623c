// content-backend/src/domain/tier_ladder.rs

use crate::domain::tier::Tier;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// プロセス全体で共有する階層設定
///
/// エンタイトルメント判定とアップグレードワークフローは必ず同じ
/// インスタンスを参照する。起動時に一度だけ構築され、以後は読み取り専用。
pub static TIER_LADDER: Lazy<TierLadder> = Lazy::new(|| {
    TierLadder::new(
        vec![
            TierEntry {
                tier: Tier::Free,
                price: 0.0,
                label: "Free".to_string(),
                description: "Perfect for getting started with our community".to_string(),
                benefits: vec![
                    "Access to basic events".to_string(),
                    "Community forum access".to_string(),
                    "Email notifications".to_string(),
                    "Mobile app access".to_string(),
                ],
            },
            TierEntry {
                tier: Tier::Silver,
                price: 29.99,
                label: "Silver".to_string(),
                description: "Great for active professionals seeking growth".to_string(),
                benefits: vec![
                    "Everything in Free".to_string(),
                    "Priority event registration".to_string(),
                    "Exclusive Silver events".to_string(),
                    "Advanced networking features".to_string(),
                    "Monthly virtual meetups".to_string(),
                    "Basic analytics dashboard".to_string(),
                ],
            },
            TierEntry {
                tier: Tier::Gold,
                price: 59.99,
                label: "Gold".to_string(),
                description: "Ideal for leaders wanting premium experiences".to_string(),
                benefits: vec![
                    "Everything in Silver".to_string(),
                    "VIP event seating".to_string(),
                    "Exclusive Gold workshops".to_string(),
                    "Direct speaker access".to_string(),
                    "Advanced analytics & insights".to_string(),
                    "Custom event recommendations".to_string(),
                    "Priority customer support".to_string(),
                ],
            },
            TierEntry {
                tier: Tier::Platinum,
                price: 99.99,
                label: "Platinum".to_string(),
                description: "Ultimate package for serious entrepreneurs".to_string(),
                benefits: vec![
                    "Everything in Gold".to_string(),
                    "Unlimited premium events".to_string(),
                    "Private Platinum community".to_string(),
                    "One-on-one mentorship sessions".to_string(),
                    "Early access to new features".to_string(),
                    "Custom integrations".to_string(),
                    "24/7 dedicated support".to_string(),
                    "Annual exclusive retreat".to_string(),
                ],
            },
        ],
        vec![
            ("SILVER2025".to_string(), Tier::Silver),
            ("GOLD2025".to_string(), Tier::Gold),
            ("PLATINUM2025".to_string(), Tier::Platinum),
        ],
    )
    .expect("default tier ladder must satisfy ladder invariants")
});

/// 1階層分の設定
#[derive(Debug, Clone, Serialize)]
pub struct TierEntry {
    pub tier: Tier,
    pub price: f64,
    pub label: String,
    pub description: String,
    pub benefits: Vec<String>,
}

/// 階層ごとの価格・表示名・特典とプロモコード対応表
#[derive(Debug, Clone)]
pub struct TierLadder {
    entries: Vec<TierEntry>,
    promo_codes: HashMap<String, Tier>,
}

impl TierLadder {
    /// 設定を検証して構築する
    ///
    /// 不変条件: 全階層が昇順で揃っていること、価格は非減少かつfreeは0、
    /// 特典リストは空でないこと、プロモコードは大文字正規化後に一意であること。
    pub fn new(
        entries: Vec<TierEntry>,
        promo_codes: Vec<(String, Tier)>,
    ) -> Result<Self, String> {
        let expected: Vec<Tier> = Tier::all();
        let actual: Vec<Tier> = entries.iter().map(|e| e.tier).collect();
        if actual != expected {
            return Err(format!(
                "Tier ladder must define every tier in ladder order, got: {:?}",
                actual
            ));
        }

        let mut previous_price = 0.0_f64;
        for entry in &entries {
            if entry.tier == Tier::Free && entry.price != 0.0 {
                return Err("Free tier price must be 0".to_string());
            }
            if entry.price < 0.0 {
                return Err(format!("Tier {} has a negative price", entry.tier));
            }
            if entry.price < previous_price {
                return Err(format!(
                    "Tier prices must be non-decreasing, {} is priced below its predecessor",
                    entry.tier
                ));
            }
            if entry.benefits.is_empty() {
                return Err(format!("Tier {} must list at least one benefit", entry.tier));
            }
            previous_price = entry.price;
        }

        let mut codes = HashMap::with_capacity(promo_codes.len());
        for (code, tier) in promo_codes {
            let normalized = code.trim().to_uppercase();
            if normalized.is_empty() {
                return Err("Promo codes must not be empty".to_string());
            }
            if codes.insert(normalized.clone(), tier).is_some() {
                return Err(format!("Duplicate promo code: {}", normalized));
            }
        }

        Ok(Self {
            entries,
            promo_codes: codes,
        })
    }

    fn entry(&self, tier: Tier) -> &TierEntry {
        // new()が全階層の存在を保証している
        self.entries
            .iter()
            .find(|e| e.tier == tier)
            .expect("ladder contains every tier")
    }

    pub fn price(&self, tier: Tier) -> f64 {
        self.entry(tier).price
    }

    pub fn label(&self, tier: Tier) -> &str {
        &self.entry(tier).label
    }

    pub fn description(&self, tier: Tier) -> &str {
        &self.entry(tier).description
    }

    pub fn benefits(&self, tier: Tier) -> &[String] {
        &self.entry(tier).benefits
    }

    /// 全エントリを昇順で取得
    pub fn entries(&self) -> &[TierEntry] {
        &self.entries
    }

    /// プロモコードから対象階層を解決（大文字小文字を区別しない）
    pub fn tier_for_promo(&self, code: &str) -> Option<Tier> {
        self.promo_codes.get(&code.trim().to_uppercase()).copied()
    }
}
