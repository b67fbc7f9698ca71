//! # Allow-list de Paths
//! src/server/allow_list.rs
//!
//! Conjunto ordenado de paths que el servidor considera válidos. El motor lo
//! consulta antes de leer headers y antes de buscar en la tabla de rutas:
//! un path fuera de la lista recibe 404 aunque tenga handler registrado.

/// Paths válidos, en el orden configurado, con match exacto
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    paths: Vec<String>,
}

impl AllowList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agrega un path; los duplicados se ignoran
    pub fn insert(&mut self, path: impl Into<String>) {
        let path = path.into();
        if !self.contains(&path) {
            self.paths.push(path);
        }
    }

    /// Match exacto, sin normalizar la barra final
    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<P: Into<String>> FromIterator<P> for AllowList {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut allow_list = Self::new();
        for path in iter {
            allow_list.insert(path);
        }
        allow_list
    }
}
