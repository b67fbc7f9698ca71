//! # Contrato de Handlers
//! src/router/handler.rs
//!
//! Un handler recibe el `Request` y el sink de salida de la conexión, y es
//! responsable de escribir una respuesta completa (status line, headers,
//! línea vacía y body). El motor no le impone forma a la respuesta.
//!
//! Si el handler retorna un error, el motor lo registra y cierra la conexión.

use crate::http::Request;
use std::io::{self, Write};
use thiserror::Error;

/// Error de un handler
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Falló la escritura en el sink (o una lectura de disco)
    #[error("i/o error in handler: {0}")]
    Io(#[from] io::Error),

    /// Cualquier otra falla del handler
    #[error("{0}")]
    Failed(String),
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        HandlerError::Failed(message.into())
    }
}

pub type HandlerResult = Result<(), HandlerError>;

/// Capacidad de atender un request
///
/// Se comparte entre todos los workers, por eso exige `Send + Sync`.
pub trait Handler: Send + Sync {
    fn handle(&self, request: &Request, out: &mut dyn Write) -> HandlerResult;
}

/// Cualquier closure con la firma correcta es un handler
impl<F> Handler for F
where
    F: Fn(&Request, &mut dyn Write) -> HandlerResult + Send + Sync,
{
    fn handle(&self, request: &Request, out: &mut dyn Write) -> HandlerResult {
        self(request, out)
    }
}

/// Fija la firma de una closure para que el compilador la infiera como handler
///
/// # Ejemplo
/// ```
/// use routed_http::http::{Response, StatusCode};
/// use routed_http::router::{handler_fn, RouteTable};
///
/// let mut routes = RouteTable::new();
/// routes.register("GET", "/ping", handler_fn(|_req, out| {
///     Response::text(StatusCode::Ok, "pong").write_to(out)?;
///     Ok(())
/// }));
/// assert!(routes.lookup("GET", "/ping").is_some());
/// ```
pub fn handler_fn<F>(f: F) -> F
where
    F: Fn(&Request, &mut dyn Write) -> HandlerResult + Send + Sync,
{
    f
}
