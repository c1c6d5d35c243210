use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format of the global subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable, with file and line.
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// `PUREBRED_LOG_FORMAT` (`json` or `pretty`) if set, otherwise JSON when
    /// `PUREBRED_ENV=production`.
    pub fn from_env() -> Self {
        Self::resolve(
            std::env::var("PUREBRED_LOG_FORMAT").ok().as_deref(),
            std::env::var("PUREBRED_ENV").ok().as_deref(),
        )
    }

    fn resolve(format: Option<&str>, env: Option<&str>) -> Self {
        match format.map(str::to_ascii_lowercase).as_deref() {
            Some("json") => Self::Json,
            Some("pretty") => Self::Pretty,
            _ if env == Some("production") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Default directive: `info` overall, `debug` for the service crate and
/// tower-http request spans. `RUST_LOG` replaces it when set.
fn default_filter(service_name: &str) -> EnvFilter {
    let crate_target = service_name.replace('-', "_");
    EnvFilter::new(format!("info,{crate_target}=debug,tower_http=debug"))
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_tracing(service_name: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(service_name));
    let format = LogFormat::from_env();

    match format {
        LogFormat::Json => {
            let json_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(json_layer)
                .init();
        }
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .init();
        }
    }

    tracing::info!(service = service_name, ?format, "tracing initialized");
}
