//! # Handler de Archivos Estáticos
//! src/handlers/files.rs
//!
//! Sirve `root/<path>` con el Content-Type de su extensión.
//!
//! - `/` (o cualquier path terminado en `/`) sirve `index.html`
//! - Un path con `..` u otro componente no normal → 403
//! - Archivo inexistente o que no es archivo regular → 404
//! - En los templates (por defecto `classic.html`) se reemplaza `{time}`
//!   por la hora local actual

use super::mime;
use crate::http::{write_response, Request, StatusCode};
use crate::router::{Handler, HandlerResult};
use chrono::Local;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

const INDEX_FILE: &str = "index.html";
const TIME_TOKEN: &str = "{time}";

/// Handler de archivos bajo un directorio raíz
#[derive(Debug, Clone)]
pub struct FileHandler {
    root: PathBuf,
    /// Nombres de archivo donde se sustituye `{time}`
    templates: Vec<String>,
}

impl FileHandler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            templates: vec!["classic.html".to_string()],
        }
    }

    /// Marca otro archivo como template
    pub fn with_template(mut self, file_name: impl Into<String>) -> Self {
        self.templates.push(file_name.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ruta en disco para un path de request, o `None` si intenta salir de `root`
    pub fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let relative = request_path.trim_start_matches('/');
        let mut resolved = self.root.clone();

        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                _ => return None,
            }
        }

        if relative.is_empty() || relative.ends_with('/') {
            resolved.push(INDEX_FILE);
        }
        Some(resolved)
    }

    fn is_template(&self, file: &Path) -> bool {
        file.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.templates.iter().any(|t| t == name))
    }
}

impl Handler for FileHandler {
    fn handle(&self, request: &Request, out: &mut dyn Write) -> HandlerResult {
        let Some(file) = self.resolve(request.path()) else {
            debug!(path = request.path(), "path fuera del directorio público");
            write_response(out, StatusCode::Forbidden, None, b"")?;
            return Ok(());
        };

        let mut content = match fs::metadata(&file) {
            Ok(meta) if meta.is_file() => fs::read(&file)?,
            Ok(_) => {
                write_response(out, StatusCode::NotFound, None, b"")?;
                return Ok(());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                write_response(out, StatusCode::NotFound, None, b"")?;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        if self.is_template(&file) {
            let now = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f").to_string();
            content = String::from_utf8_lossy(&content)
                .replace(TIME_TOKEN, &now)
                .into_bytes();
        }

        let extension = file.extension().and_then(|ext| ext.to_str());
        write_response(out, StatusCode::Ok, Some(mime::content_type(extension)), &content)?;
        Ok(())
    }
}
