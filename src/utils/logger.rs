use crate::config::toml_config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("org_guard={}", config.level())))
}

/// 安裝 compact 格式的 subscriber；若已安裝則回傳 false
pub fn init_logger(config: &LoggingConfig) -> bool {
    if config.json() {
        return init_json_logger(config);
    }

    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .is_ok()
}

pub fn init_json_logger(config: &LoggingConfig) -> bool {
    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .try_init()
        .is_ok()
}
