//! # Handlers de la Aplicación
//! src/handlers/mod.rs
//!
//! Handlers concretos que registra el entry point. El motor no los conoce:
//! se registran en la tabla de rutas como cualquier otro `Handler`.

pub mod files;
pub mod hello;
pub mod mime;

pub use files::FileHandler;
pub use hello::HelloHandler;
