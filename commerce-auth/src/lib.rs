pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use commerce_core::error::AppError;
use commerce_core::middleware::{
    ip_rate_limit_middleware, request_id_middleware, security_headers_middleware, IpRateLimiter,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AuthConfig;
use crate::services::{AuthService, CapabilityService, DashboardService, JwtService, Notifier};
use crate::store::{AccountStore, CapabilityStore};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        handlers::auth::register,
        handlers::auth::verify_email,
        handlers::auth::resend_confirmation,
        handlers::auth::login,
        handlers::auth::request_confirmation,
        handlers::auth::reset_password,
        handlers::auth::refresh_access_token,
        handlers::capability::create_capability,
        handlers::capability::get_all_capabilities,
        handlers::capability::get_capability_by_id,
        handlers::capability::update_capability,
        handlers::capability::delete_capability,
        handlers::dashboard_user::add_dashboard_user,
        handlers::dashboard_user::update_dashboard_user,
    ),
    components(
        schemas(
            dtos::MessageResponse,
            dtos::auth::RegisterRequest,
            dtos::auth::VerifyEmailRequest,
            dtos::auth::EmailRequest,
            dtos::auth::LoginRequest,
            dtos::auth::ResetPasswordRequest,
            dtos::auth::TokenPairResponse,
            dtos::auth::VerifyEmailResponse,
            dtos::auth::AccessTokenResponse,
            dtos::capability::CreateCapabilityRequest,
            dtos::capability::UpdateCapabilityRequest,
            dtos::capability::CapabilityResponse,
            dtos::dashboard_user::AddDashboardUserRequest,
            dtos::dashboard_user::UpdateDashboardUserRequest,
            models::Role,
            models::AccountStatus,
            models::SanitizedAccount,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, OTP verification, and token management"),
        (name = "Capabilities", description = "Capability registry administration"),
        (name = "Dashboard Users", description = "Dashboard account administration"),
        (name = "Observability", description = "Service health"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: AuthConfig,
    pub accounts: Arc<dyn AccountStore>,
    pub capabilities: Arc<dyn CapabilityStore>,
    pub notifier: Arc<dyn Notifier>,
    pub jwt: JwtService,
    pub auth: AuthService,
    pub capability_service: CapabilityService,
    pub dashboard: DashboardService,
    pub login_rate_limiter: IpRateLimiter,
    pub register_rate_limiter: IpRateLimiter,
    pub otp_rate_limiter: IpRateLimiter,
    pub ip_rate_limiter: IpRateLimiter,
}

pub fn build_router(state: AppState) -> Router {
    // Superadmin administration surface
    let admin_routes = Router::new()
        .route(
            "/capabilities",
            post(handlers::capability::create_capability)
                .get(handlers::capability::get_all_capabilities),
        )
        .route(
            "/capabilities/:id",
            get(handlers::capability::get_capability_by_id)
                .patch(handlers::capability::update_capability)
                .delete(handlers::capability::delete_capability),
        )
        .route(
            "/dashboard-users",
            post(handlers::dashboard_user::add_dashboard_user),
        )
        .route(
            "/dashboard-users/:id",
            axum::routing::patch(handlers::dashboard_user::update_dashboard_user),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::require_superadmin,
        ));

    // Login and register get their own IP rate limits
    let login_route = Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .layer(from_fn_with_state(
            state.login_rate_limiter.clone(),
            ip_rate_limit_middleware,
        ));

    let register_route = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .layer(from_fn_with_state(
            state.register_rate_limiter.clone(),
            ip_rate_limit_middleware,
        ));

    // OTP (re)issuance is bounded per IP: 900k possible codes in a
    // 5-minute window is not a large space
    let otp_routes = Router::new()
        .route(
            "/auth/resend-confirmation",
            post(handlers::auth::resend_confirmation),
        )
        .route(
            "/auth/request-confirmation",
            post(handlers::auth::request_confirmation),
        )
        .layer(from_fn_with_state(
            state.otp_rate_limiter.clone(),
            ip_rate_limit_middleware,
        ));

    let refresh_route = Router::new()
        .route(
            "/auth/refresh-access-token",
            get(handlers::auth::refresh_access_token),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::require_refresh_auth,
        ));

    let mut app = Router::new().route("/health", get(health_check));

    let swagger_enabled = match state.config.environment {
        crate::config::Environment::Dev => true,
        crate::config::Environment::Prod => {
            state.config.swagger.enabled == crate::config::SwaggerMode::Public
        }
    };

    if swagger_enabled {
        app =
            app.merge(SwaggerUi::new("/docs").url("/.well-known/openapi.json", ApiDoc::openapi()));
    } else {
        app = app.route(
            "/.well-known/openapi.json",
            get(|| async { axum::Json(ApiDoc::openapi()) }),
        );
    }

    app.route("/auth/verify-email", post(handlers::auth::verify_email))
        .route("/auth/reset-password", post(handlers::auth::reset_password))
        .merge(login_route)
        .merge(register_route)
        .merge(otp_routes)
        .merge(refresh_route)
        .merge(admin_routes)
        .with_state(state.clone())
        // Global IP rate limiting
        .layer(from_fn_with_state(
            state.ip_rate_limiter.clone(),
            ip_rate_limit_middleware,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(
                    state
                        .config
                        .security
                        .allowed_origins
                        .iter()
                        .filter_map(|o| match o.parse::<axum::http::HeaderValue>() {
                            Ok(value) => Some(value),
                            Err(e) => {
                                tracing::error!("Invalid CORS origin '{}': {}", o, e);
                                None
                            }
                        })
                        .collect::<Vec<axum::http::HeaderValue>>(),
                )
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PATCH,
                    axum::http::Method::DELETE,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                ]),
        )
}

/// Service health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 500, description = "Service is unhealthy")
    ),
    tag = "Observability"
)]
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<axum::Json<serde_json::Value>, AppError> {
    state.accounts.health_check().await.map_err(|e| {
        tracing::error!(error = %e, "Store health check failed");
        AppError::InternalError(e)
    })?;

    Ok(axum::Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
    })))
}
