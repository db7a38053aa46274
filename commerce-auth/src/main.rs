use commerce_auth::{
    build_router,
    config::AuthConfig,
    services::{AuthService, CapabilityService, DashboardService, JwtService, OtpEngine, SmtpNotifier},
    store::MongoStore,
    AppState,
};
use commerce_core::middleware::create_ip_rate_limiter;
use commerce_core::observability::logging::init_tracing;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), commerce_core::error::AppError> {
    // Load configuration - fail fast if invalid
    let config = AuthConfig::from_env()?;

    init_tracing(&config.service_name, &config.log_level);

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting authentication service"
    );

    let store = MongoStore::connect(&config.mongodb.uri, &config.mongodb.database).await?;
    store.initialize_indexes().await?;
    tracing::info!("Store initialized");

    let notifier = Arc::new(SmtpNotifier::new(&config.smtp)?);

    let jwt = JwtService::new(&config.jwt);
    let otp = OtpEngine::new(&config.otp);

    let accounts: Arc<dyn commerce_auth::store::AccountStore> = Arc::new(store.clone());
    let capabilities: Arc<dyn commerce_auth::store::CapabilityStore> = Arc::new(store);

    let auth = AuthService::new(accounts.clone(), notifier.clone(), jwt.clone(), otp);
    let capability_service = CapabilityService::new(capabilities.clone());
    let dashboard = DashboardService::new(accounts.clone(), notifier.clone());

    let login_rate_limiter = create_ip_rate_limiter(
        config.rate_limit.login_attempts,
        config.rate_limit.login_window_seconds,
    );
    let register_rate_limiter = create_ip_rate_limiter(
        config.rate_limit.register_attempts,
        config.rate_limit.register_window_seconds,
    );
    let otp_rate_limiter = create_ip_rate_limiter(
        config.rate_limit.otp_request_attempts,
        config.rate_limit.otp_request_window_seconds,
    );
    let ip_rate_limiter = create_ip_rate_limiter(
        config.rate_limit.global_ip_limit,
        config.rate_limit.global_ip_window_seconds,
    );
    tracing::info!("Rate limiters initialized: Login, Register, OTP, and Global IP");

    let state = AppState {
        config: config.clone(),
        accounts,
        capabilities,
        notifier,
        jwt,
        auth,
        capability_service,
        dashboard,
        login_rate_limiter,
        register_rate_limiter,
        otp_rate_limiter,
        ip_rate_limiter,
    };

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
