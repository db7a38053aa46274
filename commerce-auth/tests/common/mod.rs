#![allow(dead_code)]

use std::sync::Arc;

use commerce_auth::config::{
    AuthConfig, Environment, JwtConfig, MongoConfig, OtpConfig, RateLimitConfig, SecurityConfig,
    SmtpConfig, SwaggerConfig, SwaggerMode,
};
use commerce_auth::services::{
    AuthService, CapabilityService, DashboardService, JwtService, MockNotifier, OtpEngine,
};
use commerce_auth::store::{AccountStore, CapabilityStore, MemoryStore};
use commerce_auth::AppState;
use commerce_core::middleware::create_ip_rate_limiter;

/// Test fixture: the full application state wired against the in-memory
/// store and the recording notifier, with direct handles to both.
pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<MockNotifier>,
}

pub fn test_config() -> AuthConfig {
    AuthConfig {
        common: commerce_core::config::Config { port: 8080 },
        environment: Environment::Dev,
        service_name: "commerce-auth-test".to_string(),
        service_version: "0.0.0".to_string(),
        log_level: "error".to_string(),
        mongodb: MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "commerce_test".to_string(),
        },
        smtp: SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "test@example.com".to_string(),
            password: "test_password".to_string(),
            from_email: "no-reply@example.com".to_string(),
        },
        jwt: JwtConfig {
            access_secret: "test-access-secret".to_string(),
            refresh_secret: "test-refresh-secret".to_string(),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
        },
        otp: OtpConfig { ttl_minutes: 5 },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        swagger: SwaggerConfig {
            enabled: SwaggerMode::Disabled,
        },
        rate_limit: RateLimitConfig {
            login_attempts: 1000,
            login_window_seconds: 60,
            register_attempts: 1000,
            register_window_seconds: 60,
            otp_request_attempts: 1000,
            otp_request_window_seconds: 60,
            global_ip_limit: 10_000,
            global_ip_window_seconds: 60,
        },
    }
}

pub fn spawn_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(MockNotifier::new());

    let accounts: Arc<dyn AccountStore> = store.clone();
    let capabilities: Arc<dyn CapabilityStore> = store.clone();

    let jwt = JwtService::new(&config.jwt);
    let otp = OtpEngine::new(&config.otp);

    let auth = AuthService::new(accounts.clone(), notifier.clone(), jwt.clone(), otp);
    let capability_service = CapabilityService::new(capabilities.clone());
    let dashboard = DashboardService::new(accounts.clone(), notifier.clone());

    let state = AppState {
        config: config.clone(),
        accounts,
        capabilities,
        notifier: notifier.clone(),
        jwt,
        auth,
        capability_service,
        dashboard,
        login_rate_limiter: create_ip_rate_limiter(
            config.rate_limit.login_attempts,
            config.rate_limit.login_window_seconds,
        ),
        register_rate_limiter: create_ip_rate_limiter(
            config.rate_limit.register_attempts,
            config.rate_limit.register_window_seconds,
        ),
        otp_rate_limiter: create_ip_rate_limiter(
            config.rate_limit.otp_request_attempts,
            config.rate_limit.otp_request_window_seconds,
        ),
        ip_rate_limiter: create_ip_rate_limiter(
            config.rate_limit.global_ip_limit,
            config.rate_limit.global_ip_window_seconds,
        ),
    };

    TestApp {
        state,
        store,
        notifier,
    }
}

/// Pull the 6-digit OTP out of a rendered email body (the code is the only
/// six-consecutive-digit run in the templates).
pub fn extract_otp(html: &str) -> String {
    let bytes = html.as_bytes();
    let mut start = 0;
    while start < bytes.len() {
        if bytes[start].is_ascii_digit() {
            let mut end = start;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            if end - start == 6 {
                return html[start..end].to_string();
            }
            start = end;
        } else {
            start += 1;
        }
    }
    panic!("No 6-digit OTP found in email body");
}

/// The OTP from the most recent email sent to this address.
pub fn latest_otp_for(app: &TestApp, email: &str) -> String {
    let sent = app.notifier.sent_to(email);
    let last = sent.last().expect("no email sent to address");
    extract_otp(&last.html_body)
}
