use std::time::Duration;

use tracing::info;
use url::Url;

use yk_core::tracing::init_tracing;
use yk_portal::config::PortalConfig;
use yk_portal::domain::routes::ROUTES;
use yk_portal::infra::supabase::SupabaseHttp;
use yk_portal::infra::throttle::{
    AnyDispatchThrottle, MemoryDispatchThrottle, RedisDispatchThrottle,
};
use yk_portal::router::build_router;
use yk_portal::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = PortalConfig::from_env();

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("failed to build HTTP client");

    let throttle = match config.redis_url.as_deref() {
        Some(redis_url) => {
            let redis = deadpool_redis::Config::from_url(redis_url)
                .create_pool(Some(deadpool_redis::Runtime::Tokio1))
                .expect("failed to create Redis pool");
            AnyDispatchThrottle::Redis(RedisDispatchThrottle {
                pool: redis,
                cooldown_secs: config.otp_dispatch_cooldown_secs,
            })
        }
        None => {
            info!("REDIS_URL not set, dispatch throttle is process-local");
            AnyDispatchThrottle::Memory(MemoryDispatchThrottle::new(Duration::from_secs(
                config.otp_dispatch_cooldown_secs,
            )))
        }
    };

    let state = AppState {
        supabase: SupabaseHttp::new(http, &config.supabase_url, config.supabase_anon_key),
        jwt_secret: config.supabase_jwt_secret,
        throttle,
        routes: ROUTES,
        otp_window: chrono::Duration::hours(config.otp_expiration_hours),
        cookie_domain: config.cookie_domain,
        site_url: Url::parse(&config.site_url).expect("invalid SITE_URL"),
    };

    let router = build_router(state, &config.static_dir);
    let addr = format!("0.0.0.0:{}", config.portal_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("portal listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
