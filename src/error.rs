use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Network failure: {message}")]
    Network { status: Option<u16>, message: String },

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed response: {0}")]
    Parse(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CatalogError {
    /// Request did not complete or came back with a non-success status.
    pub fn is_network(&self) -> bool {
        matches!(self, CatalogError::Http(_) | CatalogError::Network { .. })
    }

    /// Response body was not well-formed.
    pub fn is_parse(&self) -> bool {
        matches!(self, CatalogError::Json(_) | CatalogError::Parse(_))
    }

    /// Key-value store read or write error.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            CatalogError::Io(_) | CatalogError::Sqlite(_) | CatalogError::Persistence(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_classification() {
        let net = CatalogError::Network { status: Some(500), message: "boom".into() };
        assert!(net.is_network());
        assert!(!net.is_parse());

        let parse = CatalogError::Parse("missing results".into());
        assert!(parse.is_parse());

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(CatalogError::from(json_err).is_parse());

        let io = CatalogError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert!(io.is_persistence());
        assert!(!io.is_network());
    }

    #[test]
    fn test_network_error_message() {
        let err = CatalogError::Network { status: Some(404), message: "status 404".into() };
        assert_eq!(err.to_string(), "Network failure: status 404");
    }
}
