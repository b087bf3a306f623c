// content-backend/src/config/payment.rs

use crate::domain::tier::Tier;
use once_cell::sync::Lazy;
use std::env;
use stripe::Client;

pub static STRIPE_CLIENT: Lazy<Client> = Lazy::new(|| {
    let secret_key = env::var("STRIPE_SECRET_KEY").unwrap_or_else(|_| {
        tracing::warn!("STRIPE_SECRET_KEY not set, using empty key for development");
        String::new()
    });

    if secret_key.is_empty() {
        tracing::warn!("Stripe client initialized with empty key - payments will not work");
    }

    Client::new(secret_key)
});

#[derive(Clone, Debug)]
pub struct PaymentConfig {
    pub secret_key: String,
    pub silver_price_id: String,
    pub gold_price_id: String,
    pub platinum_price_id: String,
    pub development_mode: bool,
}

impl PaymentConfig {
    pub fn from_env() -> Self {
        let development_mode = env::var("PAYMENT_DEVELOPMENT_MODE")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);

        if development_mode {
            tracing::info!("Payment development mode enabled - paid upgrades complete synchronously");
            return Self {
                secret_key: String::new(),
                silver_price_id: String::new(),
                gold_price_id: String::new(),
                platinum_price_id: String::new(),
                development_mode: true,
            };
        }

        // 本番/テストモードの設定
        let secret_key = env::var("STRIPE_SECRET_KEY")
            .expect("STRIPE_SECRET_KEY must be set when not in development mode");

        let silver_price_id = env::var("STRIPE_SILVER_PRICE_ID")
            .expect("STRIPE_SILVER_PRICE_ID must be set when not in development mode");

        let gold_price_id = env::var("STRIPE_GOLD_PRICE_ID")
            .expect("STRIPE_GOLD_PRICE_ID must be set when not in development mode");

        let platinum_price_id = env::var("STRIPE_PLATINUM_PRICE_ID")
            .expect("STRIPE_PLATINUM_PRICE_ID must be set when not in development mode");

        // 価格IDの形式を検証
        for (name, price_id) in [
            ("STRIPE_SILVER_PRICE_ID", &silver_price_id),
            ("STRIPE_GOLD_PRICE_ID", &gold_price_id),
            ("STRIPE_PLATINUM_PRICE_ID", &platinum_price_id),
        ] {
            if price_id.starts_with("prod_") {
                tracing::error!(
                    "{} is a product ID ({}), but it should be a price ID (starting with 'price_')",
                    name,
                    price_id
                );
                panic!("Invalid {}: Use price ID instead of product ID", name);
            }
        }

        Self {
            secret_key,
            silver_price_id,
            gold_price_id,
            platinum_price_id,
            development_mode: false,
        }
    }

    #[allow(dead_code)]
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_") || self.development_mode
    }

    /// 有料階層に対応するStripe価格IDを取得（freeは対象外）
    pub fn get_price_id(&self, tier: Tier) -> Option<&str> {
        match tier {
            Tier::Silver => Some(&self.silver_price_id),
            Tier::Gold => Some(&self.gold_price_id),
            Tier::Platinum => Some(&self.platinum_price_id),
            Tier::Free => None,
        }
    }
}
