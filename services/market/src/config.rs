use crate::domain::types::RateLimit;
use crate::infra::sms::TwilioConfig;

/// Marketplace service configuration loaded from environment variables.
#[derive(Debug)]
pub struct MarketConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing session tokens.
    pub jwt_secret: String,
    /// Cookie domain attribute (root domain, e.g. "example.com").
    pub cookie_domain: String,
    /// TCP port to listen on (default 3110). Env var: `MARKET_PORT`.
    pub market_port: u16,
    /// When set, rate limits are counted in Redis instead of in process.
    pub redis_url: Option<String>,
    /// When unset, SMS bodies are logged instead of sent.
    pub twilio: Option<TwilioConfig>,
    pub chat_rate_limit: RateLimit,
    pub otp_rate_limit: RateLimit,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl MarketConfig {
    pub fn from_env() -> Self {
        let twilio = match (
            env_opt("TWILIO_ACCOUNT_SID"),
            env_opt("TWILIO_AUTH_TOKEN"),
            env_opt("TWILIO_FROM_PHONE"),
        ) {
            (Some(account_sid), Some(auth_token), Some(from_phone)) => Some(TwilioConfig {
                account_sid,
                auth_token,
                from_phone,
            }),
            _ => None,
        };
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            cookie_domain: std::env::var("COOKIE_DOMAIN").expect("COOKIE_DOMAIN"),
            market_port: env_or("MARKET_PORT", 3110),
            redis_url: env_opt("REDIS_URL"),
            twilio,
            chat_rate_limit: RateLimit {
                max: env_or("CHAT_RATE_LIMIT_MAX", 10),
                window_secs: env_or("CHAT_RATE_LIMIT_WINDOW_SECS", 60),
            },
            otp_rate_limit: RateLimit {
                max: env_or("OTP_RATE_LIMIT_MAX", 5),
                window_secs: env_or("OTP_RATE_LIMIT_WINDOW_SECS", 600),
            },
        }
    }
}
