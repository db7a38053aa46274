pub mod rate_limit;
pub mod security_headers;
pub mod tracing;

pub use self::rate_limit::{create_ip_rate_limiter, ip_rate_limit_middleware, IpRateLimiter};
pub use self::security_headers::security_headers_middleware;
pub use self::tracing::{request_id_middleware, REQUEST_ID_HEADER};
