// content-backend/src/logging/mod.rs

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use uuid::Uuid;

// リクエストコンテキスト
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub request_id: String,
    pub user_id: Option<Uuid>,
    pub path: String,
    pub method: String,
}

// RequestContextを生成するミドルウェア
pub async fn inject_request_context(mut req: Request<Body>, next: Next) -> Response {
    let context = RequestContext {
        request_id: Uuid::new_v4().to_string(),
        // 認証ミドルウェアが後から設定する
        user_id: None,
        path: req.uri().path().to_string(),
        method: req.method().to_string(),
    };

    req.extensions_mut().insert(context);
    next.run(req).await
}

// ロギングミドルウェア
pub async fn logging_middleware(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let context = req.extensions().get::<RequestContext>().cloned();

    if let Some(context) = &context {
        tracing::info!(
            request_id = %context.request_id,
            method = %context.method,
            path = %context.path,
            "Request started"
        );
    }

    let response = next.run(req).await;
    let duration_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    if let Some(context) = &context {
        if status >= 500 {
            tracing::error!(
                request_id = %context.request_id,
                method = %context.method,
                path = %context.path,
                status,
                duration_ms,
                "Request completed"
            );
        } else if status >= 400 {
            tracing::warn!(
                request_id = %context.request_id,
                method = %context.method,
                path = %context.path,
                status,
                duration_ms,
                "Request completed"
            );
        } else {
            tracing::info!(
                request_id = %context.request_id,
                method = %context.method,
                path = %context.path,
                status,
                duration_ms,
                "Request completed"
            );
        }
    }

    response
}
