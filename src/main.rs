//! # routed_http - Entry Point
//! src/main.rs
//!
//! Lee la configuración, inicializa los logs, registra los handlers y
//! arranca el servidor. Sale con código 1 si la configuración es inválida o
//! si no se puede hacer bind.

use routed_http::config::Config;
use routed_http::handlers::{FileHandler, HelloHandler};
use routed_http::logging;
use routed_http::server::Server;
use std::process;
use tracing::{error, info};

fn main() {
    let config = Config::new();

    if let Err(e) = logging::init(config.log_format) {
        eprintln!("No se pudo inicializar el logging: {}", e);
    }

    if let Err(e) = config.validate() {
        error!(error = %e, "configuración inválida");
        process::exit(1);
    }

    match config.summary_json() {
        Ok(summary) => info!(config = %summary, "configuración cargada"),
        Err(e) => error!(error = %e, "no se pudo serializar la configuración"),
    }

    let files = FileHandler::new(&config.public_dir);
    let mut server = Server::new(config.clone());
    server.add_handler("GET", "/hello", HelloHandler);

    // El resto del allow-list se sirve desde el directorio público
    for path in &config.valid_paths {
        if server.routes().lookup("GET", path).is_none() {
            server.add_handler("GET", path, files.clone());
        }
    }

    info!(routes = ?server.routes().routes(), "rutas registradas");

    if let Err(e) = server.start() {
        error!(error = %e, "error fatal");
        process::exit(1);
    }
}
