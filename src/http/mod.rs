//! # Módulo HTTP
//! src/http/mod.rs
//!
//! Implementa la parte del protocolo HTTP/1.1 que usa el servidor, sin
//! librerías de alto nivel:
//!
//! - Lectura de la request line, headers y body (`Content-Length`)
//! - Query parameters multi-valor
//! - Escritura de respuestas con framing exacto
//! - Códigos de estado
//!
//! ## Alcance
//!
//! - Una sola request por conexión: siempre `Connection: close`
//! - Sin chunked transfer encoding
//! - Sin HTTP/2 ni TLS
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path?query=value HTTP/1.1\r\n
//! Header-Name: Header-Value\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: application/json\r\n
//! Content-Length: 12\r\n
//! Connection: close\r\n
//! \r\n
//! {"ok": true}
//! ```

pub mod query;     // Query parameters multi-valor
pub mod request;   // Parsing de HTTP requests
pub mod response;  // Escritura de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use query::QueryParams;
pub use request::{ParseError, ParseLimits, Request, RequestLine};
pub use response::{write_response, Response};
pub use status::StatusCode;
