//! Error types for the PDF viewer server

use std::fmt;

#[derive(Debug)]
pub enum ServerError {
    Cache(pdf_cache::FetchError),
    Io(Box<std::io::Error>),
    Config(String),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Cache(err) => write!(f, "Cache error: {}", err),
            ServerError::Io(err) => write!(f, "IO error: {}", err),
            ServerError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Cache(err) => Some(err),
            ServerError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<pdf_cache::FetchError> for ServerError {
    fn from(err: pdf_cache::FetchError) -> Self {
        ServerError::Cache(err)
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Io(Box::new(err))
    }
}

impl From<tracing_subscriber::filter::ParseError> for ServerError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        ServerError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_error_display() {
        let err = ServerError::Cache(pdf_cache::FetchError::Storage("disk full".to_string()));
        assert_eq!(format!("{}", err), "Cache error: Storage error: disk full");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let err = ServerError::from(io);
        assert!(matches!(err, ServerError::Io(_)));
        assert_eq!(format!("{}", err), "IO error: address in use");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_config_error_display() {
        let err = ServerError::Config("invalid PORT".to_string());
        assert_eq!(format!("{}", err), "Configuration error: invalid PORT");
    }

    #[test]
    fn test_error_is_debug() {
        let err = ServerError::Config("test".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Config"));
    }
}
