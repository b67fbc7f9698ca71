//! # routed_http
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo sobre sockets bloqueantes: un request por
//! conexión, allow-list de paths y tabla de rutas `(método, path) → handler`.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: modelo del request, query parameters, status codes y escritura de respuestas
//! - `router`: contrato de handlers y tabla de rutas
//! - `server`: accept loop, pool de workers, allow-list y ciclo de vida de la conexión
//! - `handlers`: handlers de la aplicación (saludo y archivos estáticos)
//! - `config`: configuración por CLI y variables de entorno
//! - `error`: errores del servidor, la configuración y las conexiones
//! - `logging`: inicialización de `tracing`
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use routed_http::config::Config;
//! use routed_http::handlers::HelloHandler;
//! use routed_http::server::Server;
//!
//! let mut server = Server::new(Config::default());
//! server.add_handler("GET", "/hello", HelloHandler);
//! server.start().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod logging;
pub mod router;
pub mod server;
