// content-backend/src/main.rs

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use content_backend::api::handlers::content_handler::content_router;
use content_backend::api::handlers::tier_handler::tier_router;
use content_backend::api::AppState;
use content_backend::config::{AppConfig, PaymentConfig};
use content_backend::logging::{inject_request_context, logging_middleware};
use content_backend::repository::content_repository::{ContentRepository, HttpContentRepository};
use content_backend::repository::identity_repository::{HttpIdentityProvider, IdentityProvider};
use content_backend::service::payment_service::{PaymentProcessor, StripePaymentProcessor};
use content_backend::service::tier_upgrade_service::TierUpgradeService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // トレーシングの設定
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "content_backend=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Starting Content Backend server...");

    // 設定を読み込む
    let app_config = Arc::new(AppConfig::from_env().expect("Failed to load configuration"));
    tracing::info!("Configuration loaded: {:?}", app_config);

    // コラボレータのクライアントを作成
    let http_client = reqwest::Client::new();
    let identity_provider: Arc<dyn IdentityProvider> = Arc::new(HttpIdentityProvider::new(
        http_client.clone(),
        app_config.collaborators.identity_provider_url.clone(),
        app_config.collaborators.identity_secret_key.clone(),
    ));
    let content_repository: Arc<dyn ContentRepository> = Arc::new(HttpContentRepository::new(
        http_client,
        app_config.collaborators.content_store_url.clone(),
        app_config.collaborators.content_store_api_key.clone(),
    ));
    let payment_processor: Arc<dyn PaymentProcessor> = Arc::new(StripePaymentProcessor::new(
        PaymentConfig::from_env(),
        app_config.frontend_url.clone(),
    ));
    let tier_upgrade_service = Arc::new(TierUpgradeService::new(
        identity_provider.clone(),
        payment_processor,
    ));

    let app_state = AppState {
        config: app_config.clone(),
        content_repository,
        identity_provider,
        tier_upgrade_service,
    };

    // CORSの設定
    let allowed_origins = app_config
        .cors_allowed_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    // ルーターの設定
    let app_router = Router::new()
        .merge(content_router(app_state.clone()))
        .merge(tier_router(app_state))
        .layer(cors)
        .layer(axum::middleware::from_fn(logging_middleware))
        .layer(axum::middleware::from_fn(inject_request_context));

    // サーバーの起動
    tracing::info!(
        "Router configured. Server listening on {}",
        app_config.server_addr()
    );

    let listener = TcpListener::bind(app_config.server_addr()).await?;
    axum::serve(listener, app_router.into_make_service()).await?;

    Ok(())
}
