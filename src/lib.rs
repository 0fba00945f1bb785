pub mod classifier;
pub mod commands;
pub mod config;
pub mod error;
pub mod palette;
pub mod studio;

pub use classifier::{classify, ClassifiedError, ErrorKind, RawFailure};
pub use config::StudioConfig;
pub use error::StudioError;

/// Install the global tracing subscriber. Filter from `RUST_LOG`, default `info`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
