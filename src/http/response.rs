//! # Escritura de Respuestas HTTP/1.1
//! src/http/response.rs
//!
//! Serializa status line, headers y body sobre el sink de la conexión.
//!
//! ## Formato
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain; charset=UTF-8\r\n     (opcional)
//! Content-Length: 35\r\n
//! Connection: close\r\n
//! \r\n
//! <body>
//! ```
//!
//! `Content-Length` siempre es el largo exacto del body en bytes y
//! `Connection: close` siempre está presente: el servidor nunca ofrece
//! keep-alive. La respuesta se arma completa en memoria y se escribe con un
//! único `write_all` seguido de `flush`.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use routed_http::http::{Response, StatusCode};
//!
//! let mut out = Vec::new();
//! Response::new(StatusCode::Ok)
//!     .with_content_type("text/plain")
//!     .with_body("Hola")
//!     .write_to(&mut out)
//!     .unwrap();
//!
//! assert!(out.ends_with(b"Content-Length: 4\r\nConnection: close\r\n\r\nHola"));
//! ```

use super::StatusCode;
use std::io::{self, Write};

/// Headers que el writer controla y que no se pueden fijar a mano
const FRAMING_HEADERS: [&str; 2] = ["Content-Length", "Connection"];

/// Respuesta HTTP/1.1 completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado (200, 404, etc.)
    status: StatusCode,

    /// Content-Type, se escribe primero si existe
    content_type: Option<String>,

    /// Headers adicionales, en orden de inserción
    headers: Vec<(String, String)>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,
}

impl Response {
    /// Crea una respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: None,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Respuesta de error: sin Content-Type y con body vacío
    ///
    /// # Ejemplo
    /// ```
    /// use routed_http::http::{Response, StatusCode};
    ///
    /// let bytes = Response::empty(StatusCode::BadRequest).to_bytes();
    /// assert_eq!(
    ///     bytes,
    ///     b"HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
    /// );
    /// ```
    pub fn empty(status: StatusCode) -> Self {
        Self::new(status)
    }

    /// Respuesta de texto plano UTF-8
    pub fn text(status: StatusCode, body: &str) -> Self {
        Self::new(status)
            .with_content_type("text/plain; charset=UTF-8")
            .with_body(body)
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    /// Agrega un header adicional
    ///
    /// `Content-Type` reemplaza al content type actual. `Content-Length` y
    /// `Connection` se ignoran: los calcula el writer.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Versión mutable de [`Response::with_header`]
    pub fn add_header(&mut self, name: &str, value: &str) {
        if name.eq_ignore_ascii_case("Content-Type") {
            self.content_type = Some(value.to_string());
            return;
        }
        if FRAMING_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name)) {
            return;
        }
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// Fija el body (texto o bytes)
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Serializa la respuesta completa
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {}\r\n", self.status);

        if let Some(content_type) = &self.content_type {
            head.push_str(&format!("Content-Type: {}\r\n", content_type));
        }
        for (name, value) in &self.headers {
            head.push_str(&format!("{}: {}\r\n", name, value));
        }
        head.push_str(&format!("Content-Length: {}\r\n", self.body.len()));
        head.push_str("Connection: close\r\n\r\n");

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(&self.body);
        bytes
    }

    /// Escribe la respuesta en el sink y hace flush
    pub fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> io::Result<()> {
        sink.write_all(&self.to_bytes())?;
        sink.flush()
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Escribe una respuesta completa en el sink
///
/// Forma directa del writer, usada por el motor para los errores y
/// disponible para los handlers.
///
/// # Ejemplo
/// ```
/// use routed_http::http::{write_response, StatusCode};
///
/// let mut out = Vec::new();
/// write_response(&mut out, StatusCode::NotFound, None, b"").unwrap();
/// assert!(out.starts_with(b"HTTP/1.1 404 Not Found\r\n"));
/// ```
pub fn write_response<W: Write + ?Sized>(
    sink: &mut W,
    status: StatusCode,
    content_type: Option<&str>,
    body: &[u8],
) -> io::Result<()> {
    let mut response = Response::new(status).with_body(body);
    if let Some(content_type) = content_type {
        response = response.with_content_type(content_type);
    }
    response.write_to(sink)
}
