//! # Errores del Servidor
//! src/error.rs
//!
//! Taxonomía de errores por capa:
//!
//! - `ConfigError`: configuración inválida, fatal al arrancar
//! - `ServerError`: bind/listen o arranque del pool, fatal para el proceso
//! - `ConnectionError`: cualquier falla dentro de una conexión; se registra
//!   y se cierra esa conexión, nunca llega al accept loop
//!
//! Los errores de parsing (`ParseError`) y de handlers (`HandlerError`)
//! viven junto a su módulo y se envuelven aquí.

use crate::http::ParseError;
use crate::router::HandlerError;
use std::io;
use thiserror::Error;

/// Configuración inválida
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be >= 1")]
    Zero(&'static str),

    #[error("allow-list of valid paths is empty")]
    EmptyAllowList,

    #[error("allow-list entry {0:?} must start with '/'")]
    InvalidPath(String),
}

/// Errores fatales del servidor
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("cannot start worker pool: {0}")]
    Pool(#[source] io::Error),
}

/// Fallas de una conexión individual
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("handler for {method} {path} failed: {source}")]
    Handler {
        method: String,
        path: String,
        #[source]
        source: HandlerError,
    },

    #[error("handler for {method} {path} panicked")]
    HandlerPanicked { method: String, path: String },
}
