//! # Tabla de Rutas
//! src/router/mod.rs
//!
//! Mapea `(método, path)` a un handler.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → RouteTable::lookup(method, path) → Handler → sink
//! ```
//!
//! - El match es exacto en ambos campos: sin comodines, sin prefijos y sin
//!   normalizar la barra final.
//! - Registrar dos veces el mismo par reemplaza el handler anterior.
//!
//! ## Orden de uso
//!
//! La tabla se llena antes de arrancar el servidor (`Server::add_handler`)
//! y queda inmutable mientras se sirve: `Server::start` la mueve a un `Arc`
//! compartido por los workers, que solo leen. Por eso no necesita lock.

pub mod handler;

pub use handler::{handler_fn, Handler, HandlerError, HandlerResult};

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Tabla `(método, path) → handler`
#[derive(Default)]
pub struct RouteTable {
    /// método → path → handler
    routes: HashMap<String, HashMap<String, Arc<dyn Handler>>>,
}

impl RouteTable {
    /// Crea una tabla vacía
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un handler, reemplazando el anterior del mismo par
    pub fn register<H>(&mut self, method: &str, path: &str, handler: H)
    where
        H: Handler + 'static,
    {
        let previous = self
            .routes
            .entry(method.to_string())
            .or_default()
            .insert(path.to_string(), Arc::new(handler));

        if previous.is_some() {
            debug!(method, path, "handler reemplazado");
        }
    }

    /// Busca el handler del par exacto `(method, path)`
    pub fn lookup(&self, method: &str, path: &str) -> Option<Arc<dyn Handler>> {
        self.routes.get(method)?.get(path).cloned()
    }

    /// Cantidad de pares registrados
    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pares registrados, ordenados por path y luego por método
    pub fn routes(&self) -> Vec<(&str, &str)> {
        let mut routes: Vec<(&str, &str)> = self
            .routes
            .iter()
            .flat_map(|(method, paths)| {
                paths.keys().map(move |path| (method.as_str(), path.as_str()))
            })
            .collect();
        routes.sort_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(b.0)));
        routes
    }
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.routes())
            .finish()
    }
}
