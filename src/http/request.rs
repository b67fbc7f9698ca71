//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Este módulo lee un request HTTP/1.1 desde un stream, por partes, para que
//! el motor de conexiones pueda decidir entre una parte y otra (por ejemplo,
//! rechazar un path fuera del allow-list antes de leer los headers).
//!
//! ## Formato de un Request
//!
//! ```text
//! GET /hello?last=5 HTTP/1.1\r\n
//! Host: localhost:9999\r\n
//! Content-Length: 0\r\n
//! \r\n
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD SP TARGET SP VERSION`, exactamente 3 tokens
//!    separados por un espacio simple. La versión se acepta y se ignora.
//! 2. **Headers**: Pares `Name: Value` hasta la primera línea vacía.
//! 3. **Body**: Solo si hay `Content-Length`; sin chunked encoding.

use super::QueryParams;
use std::collections::HashMap;
use std::io::{BufRead, Read};
use thiserror::Error;

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Error)]
pub enum ParseError {
    /// El peer cerró la conexión sin enviar nada
    #[error("empty request: peer closed before sending a request line")]
    EmptyRequest,

    /// La request line supera el límite configurado
    #[error("request line exceeds {max} bytes")]
    RequestLineTooLong { max: usize },

    /// La request line no es UTF-8 válido
    #[error("request line is not valid UTF-8")]
    InvalidEncoding,

    /// La request line no tiene exactamente 3 tokens
    #[error("invalid request line: expected 3 tokens, found {tokens}")]
    InvalidRequestLine { tokens: usize },

    /// Header sin ':' o no UTF-8
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// El bloque de headers supera el límite configurado
    #[error("header block exceeds {max} bytes")]
    HeadersTooLarge { max: usize },

    /// Content-Length no numérico
    #[error("invalid Content-Length: {0}")]
    InvalidContentLength(String),

    /// Body mayor que el límite configurado
    #[error("body of {len} bytes exceeds limit of {max} bytes")]
    BodyTooLarge { len: usize, max: usize },

    /// Error de I/O del socket
    #[error("i/o error while reading request: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Indica si el cliente merece un `400 Bad Request`.
    ///
    /// Los errores de I/O y el request vacío no tienen a quién responder.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ParseError::EmptyRequest | ParseError::Io(_))
    }
}

/// Límites de lectura aplicados a cada request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    pub max_request_line: usize,
    pub max_header_bytes: usize,
    pub max_body_bytes: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_request_line: 8 * 1024,
            max_header_bytes: 16 * 1024,
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Request line ya separada en sus 3 tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    /// Target crudo, puede incluir la query string
    pub target: String,
    pub version: String,
}

impl RequestLine {
    /// Separa la request line en espacios simples
    ///
    /// Dos espacios seguidos producen un token vacío, y por lo tanto un
    /// conteo distinto de 3. Los espacios al final de la línea se descartan.
    ///
    /// # Ejemplo
    /// ```
    /// use routed_http::http::RequestLine;
    ///
    /// let line = RequestLine::parse("GET /hello?last=5 HTTP/1.1").unwrap();
    /// assert_eq!(line.method, "GET");
    /// assert_eq!(line.path(), "/hello");
    /// assert!(RequestLine::parse("GET /hello").is_err());
    /// ```
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let parts: Vec<&str> = line.trim_end_matches(' ').split(' ').collect();
        match parts.as_slice() {
            [method, target, version] => Ok(Self {
                method: (*method).to_string(),
                target: (*target).to_string(),
                version: (*version).to_string(),
            }),
            _ => Err(ParseError::InvalidRequestLine { tokens: parts.len() }),
        }
    }

    /// Path sin query string
    pub fn path(&self) -> &str {
        split_target(&self.target).0
    }
}

/// Separa el target en path y query string, en el primer `?`
///
/// # Ejemplo
/// ```
/// use routed_http::http::request::split_target;
///
/// assert_eq!(split_target("/p?a=1?b"), ("/p", Some("a=1?b")));
/// assert_eq!(split_target("/p"), ("/p", None));
/// ```
pub fn split_target(target: &str) -> (&str, Option<&str>) {
    match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    }
}

/// Lee la request line (sin el `\r\n` final)
pub fn read_request_line<R: BufRead>(reader: &mut R, max: usize) -> Result<String, ParseError> {
    let mut buf = Vec::new();
    // `max` bytes de contenido más un posible `\r\n`
    let read = reader.by_ref().take(max as u64 + 2).read_until(b'\n', &mut buf)?;

    if read == 0 {
        return Err(ParseError::EmptyRequest);
    }

    trim_line_end(&mut buf);
    if buf.len() > max {
        return Err(ParseError::RequestLineTooLong { max });
    }

    String::from_utf8(buf).map_err(|_| ParseError::InvalidEncoding)
}

/// Lee el bloque de headers hasta la primera línea vacía
///
/// Si el peer cierra a mitad del bloque, se devuelve lo leído hasta ahí.
pub fn read_headers<R: BufRead>(
    reader: &mut R,
    max_bytes: usize,
) -> Result<HashMap<String, String>, ParseError> {
    let mut headers = HashMap::new();
    let mut consumed = 0usize;

    loop {
        let remaining = max_bytes.saturating_sub(consumed);
        let mut buf = Vec::new();
        let read = reader.by_ref().take(remaining as u64 + 1).read_until(b'\n', &mut buf)?;

        if read == 0 {
            break;
        }
        consumed += read;
        if consumed > max_bytes {
            return Err(ParseError::HeadersTooLarge { max: max_bytes });
        }

        trim_line_end(&mut buf);
        if buf.is_empty() {
            break;
        }

        let line = String::from_utf8(buf)
            .map_err(|e| ParseError::InvalidHeader(String::from_utf8_lossy(e.as_bytes()).into_owned()))?;
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| ParseError::InvalidHeader(line.clone()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ParseError::InvalidHeader(line.clone()));
        }
        headers.insert(name.to_string(), value.trim().to_string());
    }

    Ok(headers)
}

/// Lee el body según `Content-Length`; sin ese header el body es vacío
pub fn read_body<R: Read>(
    reader: &mut R,
    headers: &HashMap<String, String>,
    max_bytes: usize,
) -> Result<Vec<u8>, ParseError> {
    let mut values = headers
        .iter()
        .filter(|(key, _)| key.eq_ignore_ascii_case("Content-Length"))
        .map(|(_, value)| value.trim());
    let Some(raw) = values.next() else {
        return Ok(Vec::new());
    };
    // `Content-Length` y `content-length` con valores distintos
    if let Some(other) = values.find(|other| *other != raw) {
        return Err(ParseError::InvalidContentLength(format!("{}, {}", raw, other)));
    }

    let len: usize = raw
        .parse()
        .map_err(|_| ParseError::InvalidContentLength(raw.to_string()))?;
    if len > max_bytes {
        return Err(ParseError::BodyTooLarge { len, max: max_bytes });
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;
    Ok(body)
}

fn trim_line_end(buf: &mut Vec<u8>) {
    if buf.ends_with(b"\n") {
        buf.pop();
        if buf.ends_with(b"\r") {
            buf.pop();
        }
    }
}

fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Request HTTP inmutable
///
/// Se construye una vez por conexión y pertenece a la invocación del
/// handler de esa conexión.
#[derive(Debug, Clone)]
pub struct Request {
    /// Método tal como llegó (GET, POST, ...)
    method: String,

    /// Path sin query string, nunca contiene `?`
    path: String,

    /// Headers con los nombres tal como llegaron
    headers: HashMap<String, String>,

    /// Body (vacío si no hubo Content-Length)
    body: Vec<u8>,

    /// Parámetros de la query string
    query_params: QueryParams,
}

impl Request {
    /// Construye un request separando path y query del target crudo
    ///
    /// # Ejemplo
    /// ```
    /// use routed_http::http::Request;
    /// use std::collections::HashMap;
    ///
    /// let request = Request::new("GET", "/p?a=1&a=2&b=x", HashMap::new(), Vec::new());
    ///
    /// assert_eq!(request.path(), "/p");
    /// assert_eq!(request.query_param_all("a"), ["1", "2"]);
    /// assert_eq!(request.query_param("b"), Some("x"));
    /// ```
    pub fn new(
        method: impl Into<String>,
        raw_target: &str,
        headers: HashMap<String, String>,
        body: Vec<u8>,
    ) -> Self {
        let (path, query) = split_target(raw_target);
        let query_params = query.map(QueryParams::parse).unwrap_or_default();

        Self {
            method: method.into(),
            path: path.to_string(),
            headers,
            body,
            query_params,
        }
    }

    /// Parsea un request completo desde bytes, con límites por defecto
    ///
    /// Útil para tests y para handlers que se prueban sin socket.
    ///
    /// # Ejemplo
    /// ```
    /// use routed_http::http::Request;
    ///
    /// let raw = b"GET /hello?last=5 HTTP/1.1\r\nHost: localhost\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.method(), "GET");
    /// assert_eq!(request.query_param("last"), Some("5"));
    /// assert_eq!(request.header("Host"), Some("localhost"));
    /// ```
    pub fn parse(raw: &[u8]) -> Result<Self, ParseError> {
        let limits = ParseLimits::default();
        let mut reader = raw;

        let line = read_request_line(&mut reader, limits.max_request_line)?;
        let line = RequestLine::parse(&line)?;
        let headers = read_headers(&mut reader, limits.max_header_bytes)?;
        let body = read_body(&mut reader, &headers, limits.max_body_bytes)?;

        Ok(Self::new(line.method, &line.target, headers, body))
    }

    // === Accesores ===

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Header por nombre exacto
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Header ignorando mayúsculas/minúsculas del nombre
    pub fn header_ignore_case(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn query_params(&self) -> &QueryParams {
        &self.query_params
    }

    /// Primer valor de un query parameter
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name)
    }

    /// Todos los valores de un query parameter
    pub fn query_param_all(&self, name: &str) -> &[String] {
        self.query_params.get_all(name)
    }
}
