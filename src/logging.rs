//! # Logging
//! src/logging.rs
//!
//! Inicializa `tracing-subscriber`. El nivel se controla con `RUST_LOG`
//! (por defecto `info`); el formato, con `--log-format`.
//!
//! ```bash
//! RUST_LOG=routed_http=debug ./routed_http --log-format json
//! ```

use clap::ValueEnum;
use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

/// Formato de salida de los logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Texto legible, para desarrollo
    #[default]
    Pretty,
    /// Una línea JSON por evento
    Json,
}

/// Instala el subscriber global
///
/// Falla si ya había uno instalado (por ejemplo, en tests).
pub fn init(format: LogFormat) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_thread_names(true))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_thread_names(true))
            .try_init(),
    }
}
