use deadpool_redis::{Config as RedisConfig, Runtime};
use sea_orm::Database;
use tracing::info;

use bazaar_core::tracing::init_tracing;
use bazaar_market::config::MarketConfig;
use bazaar_market::infra::rate_limit::{InMemoryRateLimiter, RateLimiterBackend, RedisRateLimiter};
use bazaar_market::infra::sms::SmsGateway;
use bazaar_market::router::build_router;
use bazaar_market::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing("bazaar_market=info,tower_http=info,sea_orm=warn");

    let config = MarketConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let rate_limiter = match &config.redis_url {
        Some(url) => {
            let pool = RedisConfig::from_url(url)
                .create_pool(Some(Runtime::Tokio1))
                .expect("failed to create redis pool");
            info!("rate limits counted in redis");
            RateLimiterBackend::Redis(RedisRateLimiter { pool })
        }
        None => RateLimiterBackend::InMemory(InMemoryRateLimiter::new()),
    };

    if config.twilio.is_none() {
        info!("TWILIO_* not set, SMS bodies will be logged");
    }

    let state = AppState {
        db,
        sms: SmsGateway::from_config(config.twilio),
        rate_limiter,
        jwt_secret: config.jwt_secret,
        cookie_domain: config.cookie_domain,
        otp_rate_limit: config.otp_rate_limit,
        chat_rate_limit: config.chat_rate_limit,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.market_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("market service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
