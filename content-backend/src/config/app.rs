// content-backend/src/config/app.rs

use std::env;

#[derive(Clone, Debug)]
pub struct CollaboratorConfig {
    /// コンテンツストアREST APIのベースURL
    pub content_store_url: String,
    pub content_store_api_key: String,
    /// アイデンティティプロバイダAPIのベースURL
    pub identity_provider_url: String,
    pub identity_secret_key: String,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub frontend_url: String,
    pub collaborators: CollaboratorConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        Ok(Self {
            environment,
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .map_err(|_| "Invalid PORT value")?,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            collaborators: CollaboratorConfig {
                content_store_url: env::var("CONTENT_STORE_URL")
                    .map_err(|_| "CONTENT_STORE_URL must be set")?,
                content_store_api_key: env::var("CONTENT_STORE_API_KEY")
                    .map_err(|_| "CONTENT_STORE_API_KEY must be set")?,
                identity_provider_url: env::var("IDENTITY_PROVIDER_URL")
                    .map_err(|_| "IDENTITY_PROVIDER_URL must be set")?,
                identity_secret_key: env::var("IDENTITY_SECRET_KEY")
                    .map_err(|_| "IDENTITY_SECRET_KEY must be set")?,
            },
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// テスト用の設定を作成
    #[allow(dead_code)]
    pub fn for_testing() -> Self {
        Self {
            environment: "test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 5000,
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
            frontend_url: "http://localhost:3000".to_string(),
            collaborators: CollaboratorConfig {
                content_store_url: "http://localhost:54321".to_string(),
                content_store_api_key: "test-store-key".to_string(),
                identity_provider_url: "http://localhost:54322".to_string(),
                identity_secret_key: "test-identity-key".to_string(),
            },
        }
    }

    #[allow(dead_code)]
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
