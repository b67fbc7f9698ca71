//! # Códigos de Estado HTTP
//! src/http/status.rs
//!
//! Códigos de estado que el servidor y los handlers pueden emitir. Cada
//! variante conoce su reason phrase, así la status line completa
//! (`HTTP/1.1 404 Not Found`) sale siempre del mismo lugar.
//!
//! - **2xx**: Éxito (200, 201, 204)
//! - **3xx**: Redirección (301, 302, 304)
//! - **4xx**: Error del cliente (400, 403, 404, 405, 409, 429)
//! - **5xx**: Error del servidor (500, 503)
//!
//! Cualquier otro código se expresa con `StatusCode::Custom`.

/// Códigos de estado HTTP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// 200 OK - La petición fue exitosa
    Ok,

    /// 201 Created
    Created,

    /// 204 No Content
    NoContent,

    /// 301 Moved Permanently
    MovedPermanently,

    /// 302 Found
    Found,

    /// 304 Not Modified
    NotModified,

    /// 400 Bad Request - Request line o headers malformados
    BadRequest,

    /// 403 Forbidden - Recurso fuera del directorio servido
    Forbidden,

    /// 404 Not Found - Path fuera del allow-list o sin handler
    NotFound,

    /// 405 Method Not Allowed
    MethodNotAllowed,

    /// 409 Conflict
    Conflict,

    /// 429 Too Many Requests
    TooManyRequests,

    /// 500 Internal Server Error
    InternalServerError,

    /// 503 Service Unavailable - Pool de workers saturado
    ServiceUnavailable,

    /// Código y reason phrase arbitrarios
    Custom(u16, &'static str),
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use routed_http::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::Custom(418, "I'm a teapot").as_u16(), 418);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::NoContent => 204,
            StatusCode::MovedPermanently => 301,
            StatusCode::Found => 302,
            StatusCode::NotModified => 304,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::Conflict => 409,
            StatusCode::TooManyRequests => 429,
            StatusCode::InternalServerError => 500,
            StatusCode::ServiceUnavailable => 503,
            StatusCode::Custom(code, _) => *code,
        }
    }

    /// Retorna el reason phrase asociado al código (RFC 9110)
    ///
    /// # Ejemplo
    /// ```
    /// use routed_http::http::StatusCode;
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::NoContent => "No Content",
            StatusCode::MovedPermanently => "Moved Permanently",
            StatusCode::Found => "Found",
            StatusCode::NotModified => "Not Modified",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::Conflict => "Conflict",
            StatusCode::TooManyRequests => "Too Many Requests",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::ServiceUnavailable => "Service Unavailable",
            StatusCode::Custom(_, reason) => reason,
        }
    }

    /// Variante conocida para un código, o `Custom` con el reason dado
    ///
    /// # Ejemplo
    /// ```
    /// use routed_http::http::StatusCode;
    /// assert_eq!(StatusCode::from_parts(201, "Creado"), StatusCode::Created);
    /// assert_eq!(StatusCode::from_parts(418, "Teapot").to_string(), "418 Teapot");
    /// ```
    pub fn from_parts(code: u16, reason: &'static str) -> Self {
        const KNOWN: [StatusCode; 14] = [
            StatusCode::Ok,
            StatusCode::Created,
            StatusCode::NoContent,
            StatusCode::MovedPermanently,
            StatusCode::Found,
            StatusCode::NotModified,
            StatusCode::BadRequest,
            StatusCode::Forbidden,
            StatusCode::NotFound,
            StatusCode::MethodNotAllowed,
            StatusCode::Conflict,
            StatusCode::TooManyRequests,
            StatusCode::InternalServerError,
            StatusCode::ServiceUnavailable,
        ];
        KNOWN
            .into_iter()
            .find(|status| status.as_u16() == code)
            .unwrap_or(StatusCode::Custom(code, reason))
    }

    /// Verifica si el código indica éxito (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.as_u16())
    }

    /// Verifica si el código indica error del cliente (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.as_u16())
    }

    /// Verifica si el código indica error del servidor (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.as_u16())
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
