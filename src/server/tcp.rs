//! # Servidor TCP con Pool de Workers
//! src/server/tcp.rs
//!
//! El accept loop corre en el thread que llama a `start`/`serve` y solo
//! acepta, configura timeouts y entrega la conexión al pool. Cada worker
//! atiende una conexión completa (ver `connection.rs`).
//!
//! ## Orden de uso
//!
//! ```ignore
//! let mut server = Server::new(config);
//! server.add_handler("GET", "/hello", HelloHandler);   // antes de arrancar
//! server.start()?;                                      // bloquea para siempre
//! ```
//!
//! `start` consume el servidor: la tabla de rutas pasa a un `Arc` de solo
//! lectura y ya no se puede registrar nada mientras se sirve.

use super::connection::{Connection, Dispatch, Outcome};
use super::pool::{Rejected, WorkerPool};
use crate::config::Config;
use crate::error::{ConnectionError, ServerError};
use crate::http::{write_response, ParseError, StatusCode};
use crate::router::{Handler, RouteTable};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, info_span, warn};

/// Conexión aceptada, en camino a un worker
type Accepted = (u64, TcpStream);

/// Espera entre fallas consecutivas de `accept()` (por ejemplo EMFILE)
#[derive(Debug)]
struct AcceptBackoff {
    delay: Duration,
}

impl AcceptBackoff {
    const INITIAL: Duration = Duration::from_millis(10);
    const MAX: Duration = Duration::from_secs(1);

    fn new() -> Self {
        Self { delay: Duration::ZERO }
    }

    /// Próxima espera; se duplica hasta `MAX`
    fn next_delay(&mut self) -> Duration {
        self.delay = if self.delay.is_zero() {
            Self::INITIAL
        } else {
            (self.delay * 2).min(Self::MAX)
        };
        self.delay
    }

    fn reset(&mut self) {
        self.delay = Duration::ZERO;
    }
}

/// Servidor HTTP/1.1 con tabla de rutas
pub struct Server {
    config: Config,
    routes: RouteTable,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            routes: RouteTable::new(),
        }
    }

    /// Registra un handler; el último registro del mismo par gana
    pub fn add_handler<H>(&mut self, method: &str, path: &str, handler: H) -> &mut Self
    where
        H: Handler + 'static,
    {
        self.routes.register(method, path, handler);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Valida la configuración, hace bind y atiende conexiones para siempre
    pub fn start(self) -> Result<(), ServerError> {
        self.config.validate()?;

        let address = self.config.address();
        let listener = TcpListener::bind(&address).map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;

        self.serve(listener)
    }

    /// Accept loop sobre un listener ya abierto
    ///
    /// Solo retorna si no se puede lanzar el pool de workers.
    pub fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let Server { config, routes } = self;

        let dispatch = Arc::new(Dispatch {
            allow_list: config.allow_list(),
            routes,
            limits: config.limits(),
        });
        warn_unreachable_routes(&dispatch);

        let pool = {
            let dispatch = Arc::clone(&dispatch);
            WorkerPool::new(config.workers, config.queue_capacity, move |(id, stream): Accepted| {
                handle_connection(id, stream, &dispatch)
            })
            .map_err(ServerError::Pool)?
        };

        let local = listener
            .local_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| config.address());
        info!(
            address = %local,
            workers = pool.size(),
            queue = config.queue_capacity,
            routes = dispatch.routes.len(),
            "servidor escuchando"
        );

        let mut next_id: u64 = 0;
        let mut backoff = AcceptBackoff::new();
        for stream in listener.incoming() {
            let stream = match stream {
                Ok(stream) => {
                    backoff.reset();
                    stream
                }
                Err(e) => {
                    let delay = backoff.next_delay();
                    warn!(error = %e, retry_ms = delay.as_millis() as u64, "error al aceptar conexión");
                    thread::sleep(delay);
                    continue;
                }
            };

            next_id += 1;
            if let Err(e) = stream
                .set_read_timeout(config.read_timeout())
                .and_then(|()| stream.set_write_timeout(config.write_timeout()))
            {
                warn!(connection = next_id, error = %e, "no se pudieron fijar los timeouts");
                continue;
            }

            if let Err(Rejected((id, stream))) = pool.submit((next_id, stream)) {
                reject_saturated(id, stream);
            }
        }

        Ok(())
    }
}

/// Trabajo de un worker: una conexión completa, con su span
fn handle_connection(id: u64, stream: TcpStream, dispatch: &Dispatch) {
    let peer = stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    let span = info_span!("connection", id, peer = %peer);
    let _guard = span.enter();
    let start = Instant::now();

    let result = Connection::new(id, stream).serve(dispatch);
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

    match result {
        Ok(Outcome::Handled { method, path }) => {
            info!(%method, %path, latency_ms, "request atendido");
        }
        Ok(Outcome::Rejected { status, reason }) => {
            info!(status = status.as_u16(), %reason, latency_ms, "request rechazado");
        }
        Err(ConnectionError::Parse(ParseError::EmptyRequest)) => {
            debug!("el peer cerró sin enviar request");
        }
        Err(e @ (ConnectionError::Handler { .. } | ConnectionError::HandlerPanicked { .. })) => {
            error!(error = %e, latency_ms, "falló el handler");
        }
        Err(e) => {
            warn!(error = %e, latency_ms, "error de I/O en la conexión");
        }
    }
}

/// Pool saturado: 503 sin body y cierre, desde el accept loop
fn reject_saturated(id: u64, mut stream: TcpStream) {
    warn!(connection = id, "pool saturado, respondiendo 503");
    if let Err(e) = write_response(&mut stream, StatusCode::ServiceUnavailable, None, b"") {
        debug!(connection = id, error = %e, "no se pudo enviar el 503");
    }
}

/// Rutas registradas fuera del allow-list nunca se alcanzan
fn warn_unreachable_routes(dispatch: &Dispatch) {
    for (method, path) in dispatch.routes.routes() {
        if !dispatch.allow_list.contains(path) {
            warn!(method, path, "ruta registrada fuera del allow-list, nunca se despachará");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::HelloHandler;
    use std::io::{Read, Write};
    use std::net::Shutdown;

    fn test_config() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            workers: 2,
            queue_capacity: 8,
            read_timeout_ms: 5_000,
            write_timeout_ms: 5_000,
            ..Config::default()
        }
    }

    fn spawn(server: Server) -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || server.serve(listener));
        addr
    }

    fn send(addr: std::net::SocketAddr, raw: &[u8]) -> String {
        let mut client = TcpStream::connect(addr).unwrap();
        client.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        client.write_all(raw).unwrap();
        client.shutdown(Shutdown::Write).unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn test_add_handler_is_chainable() {
        let mut server = Server::new(test_config());
        server
            .add_handler("GET", "/hello", HelloHandler)
            .add_handler("POST", "/hello", HelloHandler);

        assert_eq!(server.routes().len(), 2);
        assert_eq!(server.config().workers, 2);
    }

    #[test]
    fn test_serve_hello() {
        let mut server = Server::new(test_config());
        server.add_handler("GET", "/hello", HelloHandler);
        let addr = spawn(server);

        let text = send(addr, b"GET /hello?last=5 HTTP/1.1\r\n\r\n");

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.ends_with("Параметр last равен: 5"));
    }

    #[test]
    fn test_peer_closed_immediately_keeps_serving() {
        let mut server = Server::new(test_config());
        server.add_handler("GET", "/hello", HelloHandler);
        let addr = spawn(server);

        // Cliente que conecta y cierra sin mandar datos
        drop(TcpStream::connect(addr).unwrap());

        let text = send(addr, b"GET /hello HTTP/1.1\r\n\r\n");
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
    }

    #[test]
    fn test_accept_backoff_grows_and_resets() {
        let mut backoff = AcceptBackoff::new();

        assert_eq!(backoff.next_delay(), Duration::from_millis(10));
        assert_eq!(backoff.next_delay(), Duration::from_millis(20));
        assert_eq!(backoff.next_delay(), Duration::from_millis(40));
        for _ in 0..10 {
            backoff.next_delay();
        }
        assert_eq!(backoff.next_delay(), AcceptBackoff::MAX);

        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_millis(10));
    }

    #[test]
    fn test_start_rejects_invalid_config() {
        let mut config = test_config();
        config.workers = 0;

        let result = Server::new(config).start();
        assert!(matches!(result, Err(ServerError::Config(_))));
    }

    #[test]
    fn test_start_reports_bind_failure() {
        let taken = TcpListener::bind("127.0.0.1:0").unwrap();
        let mut config = test_config();
        config.port = taken.local_addr().unwrap().port();

        let result = Server::new(config).start();
        assert!(matches!(result, Err(ServerError::Bind { .. })));
    }
}
