//! Server mode
//!
//! Configures and starts the HTTP server with all API routes.

use actix_cors::Cors;
use actix_web::{
    App, Error, HttpServer,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::middleware::{RequestIdMiddleware, TimingMiddleware};
use crate::api::services::helpers::{json_config, path_config, query_config};
use crate::api::services::{self, AppStartTime};
use crate::config::CorsConfig;
use crate::runtime::lifetime;
use crate::runtime::lifetime::startup::StartupContext;

/// Validate CORS configuration at startup (runs once)
fn validate_cors_config(cors_config: &CorsConfig) {
    if cors_config.allowed_origins.is_empty() {
        warn!("CORS allowed_origins is empty. No cross-origin requests will be allowed.");
    }

    let is_any_origin = cors_config.allowed_origins.iter().any(|o| o == "*");
    if is_any_origin && cors_config.allow_credentials {
        warn!("CORS allowed_origins contains '*', credentials are disabled");
    }
}

/// Build CORS middleware from configuration
pub fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    let is_any_origin = cors_config.allowed_origins.iter().any(|o| o == "*");

    let mut cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(cors_config.max_age);

    if is_any_origin {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    // 通配来源时不允许携带凭据
    if cors_config.allow_credentials && !is_any_origin {
        cors = cors.supports_credentials();
    }

    cors
}

/// 注册共享状态与 `/api` 路由
///
/// 服务器与集成测试共用，保证两者看到相同的 app_data。
pub fn configure_app(
    context: StartupContext,
    app_start_time: AppStartTime,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(context.storage.clone()))
            .app_data(web::Data::new(context.worker_service.clone()))
            .app_data(web::Data::new(context.assignment_service.clone()))
            .app_data(web::Data::new(context.queue_service.clone()))
            .app_data(web::Data::new(context.suggestion_service.clone()))
            .app_data(web::Data::new(app_start_time))
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .configure(services::configure);
    }
}

/// 组装完整的 App（中间件 + 路由）
///
/// wrap 顺序：最后注册的最先执行。RequestId 位于最外层，CORS 直接应答的
/// 预检请求同样带上 `X-Request-ID`，timing 日志位于 request span 内。
pub fn build_app(
    context: StartupContext,
    app_start_time: AppStartTime,
    cors_config: CorsConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
        .wrap(Compress::default())
        .wrap(build_cors_middleware(&cors_config))
        .wrap(TimingMiddleware)
        .wrap(RequestIdMiddleware)
        .configure(configure_app(context, app_start_time))
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let app_start_time = AppStartTime::now();

    let startup = lifetime::startup::prepare_server_startup()
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {}", e))?;

    let config = crate::config::get_config();
    let cors_config = config.cors.clone();
    validate_cors_config(&cors_config);

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    // storage 被移入闭包前保留连接用于关闭
    let db_for_shutdown = startup.storage.get_db().clone();

    let server = HttpServer::new(move || {
        build_app(startup.clone(), app_start_time.clone(), cors_config.clone())
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    // Wait for server or shutdown signal
    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&db_for_shutdown) => {
            warn!("Graceful shutdown complete");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header;
    use actix_web::test::{self, TestRequest};
    use actix_web::HttpResponse;

    fn cors_config(origins: &[&str]) -> CorsConfig {
        CorsConfig {
            allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
            allow_credentials: true,
            max_age: 600,
        }
    }

    #[actix_web::test]
    async fn test_listed_origin_gets_credentials() {
        let cors = build_cors_middleware(&cors_config(&["http://localhost:5173"]));
        let app = test::init_service(
            App::new()
                .wrap(cors)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let req = TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "http://localhost:5173"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let headers = resp.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    #[actix_web::test]
    async fn test_wildcard_disables_credentials() {
        let cors = build_cors_middleware(&cors_config(&["*"]));
        let app = test::init_service(
            App::new()
                .wrap(cors)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let req = TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "http://example.org"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let headers = resp.headers();
        assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
        assert!(!headers.contains_key(header::ACCESS_CONTROL_ALLOW_CREDENTIALS));
    }
}
