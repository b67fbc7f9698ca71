//! # Tipos MIME
//! src/handlers/mime.rs
//!
//! Content-Type a partir de la extensión del archivo.

/// Content-Type según la extensión (sin el punto)
///
/// # Ejemplo
/// ```
/// use routed_http::handlers::mime::content_type;
///
/// assert_eq!(content_type(Some("html")), "text/html; charset=UTF-8");
/// assert_eq!(content_type(None), "application/octet-stream");
/// ```
pub fn content_type(extension: Option<&str>) -> &'static str {
    let Some(extension) = extension else {
        return "application/octet-stream";
    };

    match extension.to_ascii_lowercase().as_str() {
        // Texto
        "html" | "htm" => "text/html; charset=UTF-8",
        "css" => "text/css",
        "txt" | "md" => "text/plain; charset=UTF-8",
        "xml" => "application/xml",

        // Scripts
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",

        // Imágenes
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",

        // Fuentes
        "woff" => "font/woff",
        "woff2" => "font/woff2",

        "pdf" => "application/pdf",

        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(content_type(Some("html")), "text/html; charset=UTF-8");
        assert_eq!(content_type(Some("css")), "text/css");
        assert_eq!(content_type(Some("js")), "application/javascript");
        assert_eq!(content_type(Some("png")), "image/png");
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(content_type(Some("HTML")), "text/html; charset=UTF-8");
        assert_eq!(content_type(Some("Jpg")), "image/jpeg");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(content_type(Some("xyz")), "application/octet-stream");
        assert_eq!(content_type(None), "application/octet-stream");
    }
}
