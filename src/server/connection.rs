//! # Ciclo de Vida de una Conexión
//! src/server/connection.rs
//!
//! Procesa exactamente un request por conexión:
//!
//! ```text
//! Accepted → LineRead → Routed → Handled → Closed
//!     │          │         │         │
//!     └──────────┴─────────┴─────────┴──▶ Closed   (400/404/500 best-effort o sin respuesta)
//! ```
//!
//! 1. Lee la request line (vacía → error, sin respuesta)
//! 2. Exige 3 tokens separados por espacio simple (si no → 400)
//! 3. Separa path y query en el primer `?`
//! 4. Allow-list: path desconocido → 404, antes de leer headers
//! 5. Lee headers y body (`Content-Length`) y arma el `Request`
//! 6. Busca el handler de `(método, path)` (si no hay → 404)
//! 7. Invoca el handler con el sink de la conexión y hace flush
//!
//! El stream es dueño exclusivo de la `Connection`; `serve` la consume, así
//! que el socket se libera una sola vez en cualquier salida.

use super::AllowList;
use crate::error::ConnectionError;
use crate::http::request::{read_body, read_headers, read_request_line};
use crate::http::{write_response, ParseError, ParseLimits, Request, RequestLine, StatusCode};
use crate::router::{Handler, RouteTable};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::panic::{self, AssertUnwindSafe};
use tracing::trace;

/// Todo lo que un worker necesita para despachar, compartido e inmutable
#[derive(Debug, Default)]
pub struct Dispatch {
    pub allow_list: AllowList,
    pub routes: RouteTable,
    pub limits: ParseLimits,
}

/// Estado de la conexión
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Accepted,
    LineRead,
    Routed,
    Handled,
    Closed,
}

/// Resultado de una conexión que no falló
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// El motor respondió un error sin invocar handler
    Rejected { status: StatusCode, reason: String },
    /// El handler terminó sin error
    Handled { method: String, path: String },
}

/// Cómo termina la lectura del request cuando no se llega al handler
enum Abort {
    Reject(StatusCode, String),
    Fail(ConnectionError),
}

impl From<ParseError> for Abort {
    fn from(err: ParseError) -> Self {
        if err.is_client_error() {
            Abort::Reject(StatusCode::BadRequest, err.to_string())
        } else {
            Abort::Fail(err.into())
        }
    }
}

/// Una conexión aceptada y su estado
pub struct Connection<S: Read + Write> {
    id: u64,
    stream: S,
    state: ConnectionState,
}

impl<S: Read + Write> Connection<S> {
    pub fn new(id: u64, stream: S) -> Self {
        Self {
            id,
            stream,
            state: ConnectionState::Accepted,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Atiende el único request de la conexión y la cierra
    pub fn serve(mut self, dispatch: &Dispatch) -> Result<Outcome, ConnectionError> {
        let request = match self.read_request(dispatch) {
            Ok(request) => request,
            Err(Abort::Reject(status, reason)) => return self.reject(status, reason),
            Err(Abort::Fail(err)) => return Err(err),
        };

        let Some(handler) = dispatch.routes.lookup(request.method(), request.path()) else {
            let reason = format!("no handler for {} {}", request.method(), request.path());
            return self.reject(StatusCode::NotFound, reason);
        };
        self.enter(ConnectionState::Routed);

        self.invoke(&*handler, &request)?;
        self.enter(ConnectionState::Handled);

        Ok(Outcome::Handled {
            method: request.method().to_string(),
            path: request.path().to_string(),
        })
    }

    /// Pasos 1 a 5: request line, allow-list, headers y body
    fn read_request(&mut self, dispatch: &Dispatch) -> Result<Request, Abort> {
        let limits = dispatch.limits;
        let mut reader = BufReader::new(&mut self.stream);

        let line = read_request_line(&mut reader, limits.max_request_line)?;
        let line = RequestLine::parse(&line)?;
        self.state = ConnectionState::LineRead;
        trace!(connection = self.id, state = ?self.state, "request line leída");

        if !dispatch.allow_list.contains(line.path()) {
            let reason = format!("path {} is not in the allow-list", line.path());
            return Err(Abort::Reject(StatusCode::NotFound, reason));
        }

        let headers = read_headers(&mut reader, limits.max_header_bytes)?;
        let body = read_body(&mut reader, &headers, limits.max_body_bytes)?;

        Ok(Request::new(line.method, &line.target, headers, body))
    }

    /// Responde un error con body vacío
    fn reject(mut self, status: StatusCode, reason: String) -> Result<Outcome, ConnectionError> {
        write_response(&mut self.stream, status, None, b"")?;
        Ok(Outcome::Rejected { status, reason })
    }

    /// Paso 7: el handler escribe la respuesta completa en el sink
    ///
    /// Si falla (error o panic) sin haber escrito nada, se intenta un 500.
    fn invoke(&mut self, handler: &dyn Handler, request: &Request) -> Result<(), ConnectionError> {
        let mut sink = CountingWriter::new(BufWriter::new(&mut self.stream));

        let failure = match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(request, &mut sink))) {
            Ok(Ok(())) => {
                sink.flush()?;
                return Ok(());
            }
            Ok(Err(source)) => ConnectionError::Handler {
                method: request.method().to_string(),
                path: request.path().to_string(),
                source,
            },
            Err(_) => ConnectionError::HandlerPanicked {
                method: request.method().to_string(),
                path: request.path().to_string(),
            },
        };

        if sink.written() == 0 {
            let _ = write_response(&mut sink, StatusCode::InternalServerError, None, b"");
        }
        Err(failure)
    }

    fn enter(&mut self, state: ConnectionState) {
        self.state = state;
        trace!(connection = self.id, state = ?state, "transición");
    }
}

impl<S: Read + Write> Drop for Connection<S> {
    fn drop(&mut self) {
        self.state = ConnectionState::Closed;
        trace!(connection = self.id, "conexión cerrada");
    }
}

/// Writer que cuenta los bytes que el handler entregó
struct CountingWriter<W> {
    inner: W,
    written: usize,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    fn written(&self) -> usize {
        self.written
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
