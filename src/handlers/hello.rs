//! # Handler de Saludo
//! src/handlers/hello.rs
//!
//! `GET /hello?last=N` responde con el valor del parámetro `last`.

use crate::http::{write_response, Request, StatusCode};
use crate::router::{Handler, HandlerResult};
use std::io::Write;

/// Responde `Параметр last равен: <last>` en texto plano UTF-8
#[derive(Debug, Clone, Copy, Default)]
pub struct HelloHandler;

impl HelloHandler {
    /// Body de la respuesta para un request
    pub fn body(request: &Request) -> String {
        let last = request.query_param("last").unwrap_or("null");
        format!("Параметр last равен: {}", last)
    }
}

impl Handler for HelloHandler {
    fn handle(&self, request: &Request, out: &mut dyn Write) -> HandlerResult {
        let body = Self::body(request);
        write_response(
            out,
            StatusCode::Ok,
            Some("text/plain; charset=UTF-8"),
            body.as_bytes(),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn get(target: &str) -> Request {
        Request::new("GET", target, HashMap::new(), Vec::new())
    }

    #[test]
    fn test_hello_with_last() {
        let mut out = Vec::new();
        HelloHandler.handle(&get("/hello?last=5"), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Type: text/plain; charset=UTF-8\r\n"));
        assert!(text.contains("Content-Length: 35\r\n"));
        assert!(text.ends_with("\r\n\r\nПараметр last равен: 5"));
    }

    #[test]
    fn test_hello_uses_first_value() {
        assert_eq!(
            HelloHandler::body(&get("/hello?last=1&last=2")),
            "Параметр last равен: 1"
        );
    }

    #[test]
    fn test_hello_without_last() {
        assert_eq!(HelloHandler::body(&get("/hello")), "Параметр last равен: null");
    }

    #[test]
    fn test_hello_name_without_value() {
        assert_eq!(HelloHandler::body(&get("/hello?last")), "Параметр last равен: null");
        assert_eq!(HelloHandler::body(&get("/hello?last=")), "Параметр last равен: ");
    }

    #[test]
    fn test_hello_decodes_value() {
        assert_eq!(
            HelloHandler::body(&get("/hello?last=a+b%21")),
            "Параметр last равен: a b!"
        );
    }
}
