use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::Config;

/// Initialize logging. Logs go to stderr so stdout carries only the output.
pub fn init(config: &Config) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "anim-compile starting");
    Ok(())
}

/// Log the effective configuration
pub fn log_config(config: &Config) {
    tracing::debug!(
        log_level = %config.log_level,
        debug_comments = config.compilation.debug_comments,
        check_types = config.compilation.check_types,
        function_name = %config.compilation.function_name,
        indent_width = config.compilation.indent_width,
        "configuration loaded"
    );
}
