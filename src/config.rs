//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor con soporte para argumentos CLI y variables de
//! entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./routed_http --port 9999 \
//!   --valid-paths /,/hello,/classic.html \
//!   --workers 64 \
//!   --queue-capacity 256
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 VALID_PATHS=/,/hello ./routed_http
//! ```

use crate::error::ConfigError;
use crate::http::ParseLimits;
use crate::logging::LogFormat;
use crate::server::AllowList;
use clap::Parser;
use serde::Serialize;
use std::time::Duration;

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser, Serialize)]
#[command(name = "routed_http")]
#[command(about = "Servidor HTTP/1.1 con tabla de rutas y pool de workers")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "9999", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Paths válidos (allow-list), separados por coma
    #[arg(
        long = "valid-paths",
        value_delimiter = ',',
        default_value = "/,/hello,/classic.html",
        env = "VALID_PATHS"
    )]
    pub valid_paths: Vec<String>,

    // === Workers ===

    /// Número de workers que atienden conexiones
    #[arg(long, default_value = "64", env = "HTTP_WORKERS")]
    pub workers: usize,

    /// Conexiones que pueden esperar worker; al llenarse se responde 503
    #[arg(long = "queue-capacity", default_value = "256", env = "HTTP_QUEUE")]
    pub queue_capacity: usize,

    // === Timeouts ===

    /// Timeout de lectura del socket en milisegundos (0 = sin timeout)
    #[arg(long = "read-timeout-ms", default_value = "30000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    /// Timeout de escritura del socket en milisegundos (0 = sin timeout)
    #[arg(long = "write-timeout-ms", default_value = "30000", env = "WRITE_TIMEOUT_MS")]
    pub write_timeout_ms: u64,

    // === Límites del request ===

    /// Largo máximo de la request line en bytes
    #[arg(long = "max-request-line", default_value = "8192", env = "MAX_REQUEST_LINE")]
    pub max_request_line: usize,

    /// Tamaño máximo del bloque de headers en bytes
    #[arg(long = "max-header-bytes", default_value = "16384", env = "MAX_HEADER_BYTES")]
    pub max_header_bytes: usize,

    /// Tamaño máximo del body en bytes
    #[arg(long = "max-body-bytes", default_value = "1048576", env = "MAX_BODY_BYTES")]
    pub max_body_bytes: usize,

    // === Archivos y logs ===

    /// Directorio servido por el handler de archivos
    #[arg(long = "public-dir", default_value = "./public", env = "PUBLIC_DIR")]
    pub public_dir: String,

    /// Formato de los logs
    #[arg(long = "log-format", value_enum, default_value = "pretty", env = "LOG_FORMAT")]
    pub log_format: LogFormat,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use routed_http::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:9999");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), ConfigError> {
        let minimums = [
            ("workers", self.workers),
            ("queue capacity", self.queue_capacity),
            ("max request line", self.max_request_line),
            ("max header bytes", self.max_header_bytes),
        ];
        for (name, value) in minimums {
            if value == 0 {
                return Err(ConfigError::Zero(name));
            }
        }

        if self.valid_paths.is_empty() {
            return Err(ConfigError::EmptyAllowList);
        }
        if let Some(path) = self.valid_paths.iter().find(|p| !p.starts_with('/')) {
            return Err(ConfigError::InvalidPath(path.clone()));
        }

        Ok(())
    }

    /// Allow-list construido desde `valid_paths`
    pub fn allow_list(&self) -> AllowList {
        self.valid_paths.iter().cloned().collect()
    }

    /// Límites de lectura de requests
    pub fn limits(&self) -> ParseLimits {
        ParseLimits {
            max_request_line: self.max_request_line,
            max_header_bytes: self.max_header_bytes,
            max_body_bytes: self.max_body_bytes,
        }
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }

    /// Resumen de la configuración como un documento JSON
    pub fn summary_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

impl Default for Config {
    /// Configuración por defecto (mismos valores que el CLI)
    fn default() -> Self {
        Self {
            port: 9999,
            host: "0.0.0.0".to_string(),
            valid_paths: vec!["/".to_string(), "/hello".to_string(), "/classic.html".to_string()],
            workers: 64,
            queue_capacity: 256,
            read_timeout_ms: 30_000,
            write_timeout_ms: 30_000,
            max_request_line: 8 * 1024,
            max_header_bytes: 16 * 1024,
            max_body_bytes: 1024 * 1024,
            public_dir: "./public".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
