use tracing_subscriber::{fmt, EnvFilter};
use vodflow_core::Config;

/// Initialize structured logging. Production (or `LOG_FORMAT=json`) gets JSON
/// lines; everything else gets the human-readable format. `RUST_LOG` overrides
/// the default filter.
pub fn init(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn"));

    let json = config.is_production()
        || std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

    if json {
        fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(false)
            .init();
    } else {
        fmt().with_env_filter(filter).init();
    }
}
