use commerce_core::config as core_config;
use commerce_core::error::AppError;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub mongodb: MongoConfig,
    pub smtp: SmtpConfig,
    pub jwt: JwtConfig,
    pub otp: OtpConfig,
    pub security: SecurityConfig,
    pub swagger: SwaggerConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_token_expiry_minutes: i64,
    pub refresh_token_expiry_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtpConfig {
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SwaggerConfig {
    pub enabled: SwaggerMode,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SwaggerMode {
    Public,
    Disabled,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub login_attempts: u32,
    pub login_window_seconds: u64,
    pub register_attempts: u32,
    pub register_window_seconds: u64,
    pub otp_request_attempts: u32,
    pub otp_request_window_seconds: u64,
    pub global_ip_limit: u32,
    pub global_ip_window_seconds: u64,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let config = AuthConfig {
            common: common_config,
            environment,
            service_name: get_env("SERVICE_NAME", Some("commerce-auth"), is_prod)?,
            service_version: get_env("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", Some("mongodb://localhost:27017"), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("commerce"), is_prod)?,
            },
            smtp: SmtpConfig {
                host: get_env("SMTP_HOST", Some("smtp.gmail.com"), is_prod)?,
                port: parse_env("SMTP_PORT", get_env("SMTP_PORT", Some("587"), is_prod)?)?,
                username: get_env("SMTP_USERNAME", None, is_prod)?,
                password: get_env("SMTP_PASSWORD", None, is_prod)?,
                from_email: get_env("SMTP_FROM_EMAIL", None, is_prod)?,
            },
            jwt: JwtConfig {
                access_secret: get_env("JWT_SECRET", None, is_prod)?,
                refresh_secret: get_env("JWT_REFRESH_SECRET", None, is_prod)?,
                access_token_expiry_minutes: parse_env(
                    "JWT_ACCESS_TOKEN_EXPIRY_MINUTES",
                    get_env("JWT_ACCESS_TOKEN_EXPIRY_MINUTES", Some("15"), is_prod)?,
                )?,
                refresh_token_expiry_days: parse_env(
                    "JWT_REFRESH_TOKEN_EXPIRY_DAYS",
                    get_env("JWT_REFRESH_TOKEN_EXPIRY_DAYS", Some("7"), is_prod)?,
                )?,
            },
            otp: OtpConfig {
                ttl_minutes: parse_env(
                    "OTP_TTL_MINUTES",
                    get_env("OTP_TTL_MINUTES", Some("5"), is_prod)?,
                )?,
            },
            security: SecurityConfig {
                allowed_origins: get_env(
                    "ALLOWED_ORIGINS",
                    Some("http://localhost:3000"),
                    is_prod,
                )?
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            },
            swagger: SwaggerConfig {
                enabled: get_env("ENABLE_SWAGGER", Some("public"), is_prod)?
                    .parse()
                    .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
            },
            rate_limit: RateLimitConfig {
                login_attempts: parse_env(
                    "RATE_LIMIT_LOGIN_ATTEMPTS",
                    get_env("RATE_LIMIT_LOGIN_ATTEMPTS", Some("5"), is_prod)?,
                )?,
                login_window_seconds: parse_env(
                    "RATE_LIMIT_LOGIN_WINDOW_SECONDS",
                    get_env("RATE_LIMIT_LOGIN_WINDOW_SECONDS", Some("900"), is_prod)?,
                )?,
                register_attempts: parse_env(
                    "RATE_LIMIT_REGISTER_ATTEMPTS",
                    get_env("RATE_LIMIT_REGISTER_ATTEMPTS", Some("3"), is_prod)?,
                )?,
                register_window_seconds: parse_env(
                    "RATE_LIMIT_REGISTER_WINDOW_SECONDS",
                    get_env("RATE_LIMIT_REGISTER_WINDOW_SECONDS", Some("3600"), is_prod)?,
                )?,
                otp_request_attempts: parse_env(
                    "RATE_LIMIT_OTP_REQUEST_ATTEMPTS",
                    get_env("RATE_LIMIT_OTP_REQUEST_ATTEMPTS", Some("3"), is_prod)?,
                )?,
                otp_request_window_seconds: parse_env(
                    "RATE_LIMIT_OTP_REQUEST_WINDOW_SECONDS",
                    get_env("RATE_LIMIT_OTP_REQUEST_WINDOW_SECONDS", Some("900"), is_prod)?,
                )?,
                global_ip_limit: parse_env(
                    "RATE_LIMIT_GLOBAL_IP_LIMIT",
                    get_env("RATE_LIMIT_GLOBAL_IP_LIMIT", Some("100"), is_prod)?,
                )?,
                global_ip_window_seconds: parse_env(
                    "RATE_LIMIT_GLOBAL_IP_WINDOW_SECONDS",
                    get_env("RATE_LIMIT_GLOBAL_IP_WINDOW_SECONDS", Some("60"), is_prod)?,
                )?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.common.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PORT must be greater than 0"
            )));
        }

        if self.jwt.access_token_expiry_minutes <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_ACCESS_TOKEN_EXPIRY_MINUTES must be positive"
            )));
        }

        if self.jwt.refresh_token_expiry_days <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_REFRESH_TOKEN_EXPIRY_DAYS must be positive"
            )));
        }

        if self.otp.ttl_minutes <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "OTP_TTL_MINUTES must be positive"
            )));
        }

        if self.jwt.access_secret == self.jwt.refresh_secret {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_SECRET and JWT_REFRESH_SECRET must differ"
            )));
        }

        if self.environment == Environment::Prod
            && self.security.allowed_origins.iter().any(|o| o == "*")
        {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Wildcard CORS origin not allowed in production"
            )));
        }

        Ok(())
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: String) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| {
        AppError::ConfigError(anyhow::anyhow!("Invalid value for {}: {}", key, e))
    })
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

impl std::str::FromStr for SwaggerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(SwaggerMode::Public),
            "disabled" => Ok(SwaggerMode::Disabled),
            _ => Err(format!("Invalid swagger mode: {}", s)),
        }
    }
}
