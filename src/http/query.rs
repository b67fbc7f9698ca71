//! # Query Parameters
//! src/http/query.rs
//!
//! Mapa multi-valor para los parámetros de la query string.
//!
//! - Un mismo nombre puede aparecer varias veces (`?a=1&a=2`) y se guardan
//!   todos los valores, en el orden en que llegaron.
//! - Los nombres se iteran en el orden de su primera aparición.
//! - La decodificación es `application/x-www-form-urlencoded` estándar
//!   (`+` → espacio, `%XX` → byte UTF-8).
//! - Un nombre sin `=` (`?debug`) queda registrado pero sin valor: `get`
//!   devuelve `None`, igual que si faltara. `?debug=` sí tiene valor `""`.

use url::form_urlencoded;

/// Parámetros de la query string, ordenados por primera aparición
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, Vec<String>)>,
}

impl QueryParams {
    /// Crea un mapa vacío
    pub fn new() -> Self {
        Self::default()
    }

    /// Parsea una query string (sin el `?` inicial)
    ///
    /// # Ejemplo
    /// ```
    /// use routed_http::http::QueryParams;
    ///
    /// let params = QueryParams::parse("a=1&a=2&b=hola+mundo");
    /// assert_eq!(params.get_all("a"), ["1", "2"]);
    /// assert_eq!(params.get("b"), Some("hola mundo"));
    /// ```
    pub fn parse(query: &str) -> Self {
        let mut params = Self::new();
        for pair in query.split('&') {
            let has_value = pair.contains('=');
            for (name, value) in form_urlencoded::parse(pair.as_bytes()) {
                if has_value {
                    params.append(name.into_owned(), value.into_owned());
                } else {
                    params.register(name.into_owned());
                }
            }
        }
        params
    }

    /// Agrega un valor al final de la lista de `name`
    pub fn append(&mut self, name: String, value: String) {
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((name, vec![value])),
        }
    }

    /// Registra un nombre que llegó sin valor
    fn register(&mut self, name: String) {
        if !self.contains(&name) {
            self.entries.push((name, Vec::new()));
        }
    }

    /// Primer valor del parámetro, si existe
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    /// Todos los valores del parámetro (vacío si no existe)
    pub fn get_all(&self, name: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    /// Nombres distintos
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Itera `(nombre, valores)` en orden de primera aparición
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_names_keep_all_values() {
        let params = QueryParams::parse("a=1&a=2&b=x");

        assert_eq!(params.get_all("a"), ["1", "2"]);
        assert_eq!(params.get_all("b"), ["x"]);
        assert_eq!(params.get("a"), Some("1"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_first_occurrence_order() {
        let params = QueryParams::parse("z=1&a=2&z=3&m=4");
        let names: Vec<&str> = params.iter().map(|(name, _)| name).collect();

        assert_eq!(names, ["z", "a", "m"]);
    }

    #[test]
    fn test_percent_and_plus_decoding() {
        let params = QueryParams::parse("text=hello%20world&q=a+b&ru=%D0%BF%D1%80%D0%B8%D0%B2%D0%B5%D1%82");

        assert_eq!(params.get("text"), Some("hello world"));
        assert_eq!(params.get("q"), Some("a b"));
        assert_eq!(params.get("ru"), Some("привет"));
    }

    #[test]
    fn test_flag_without_value() {
        let params = QueryParams::parse("debug&x=");

        assert!(params.contains("debug"));
        assert_eq!(params.get("debug"), None);
        assert!(params.get_all("debug").is_empty());
        assert_eq!(params.get("x"), Some(""));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_missing_param() {
        let params = QueryParams::parse("a=1");

        assert_eq!(params.get("b"), None);
        assert!(params.get_all("b").is_empty());
    }

    #[test]
    fn test_empty_query() {
        let params = QueryParams::parse("");
        assert!(params.is_empty());
    }
}
