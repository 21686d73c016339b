use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Decode("bad jpeg".to_string());
        assert!(err.to_string().contains("Decode error"));
        assert!(err.to_string().contains("bad jpeg"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        match err {
            Error::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_all_error_variants() {
        let _ = Error::Decode("decode".to_string());
        let _ = Error::InvalidFrame("frame".to_string());
        let _ = Error::Model("model".to_string());
        let _ = Error::Configuration("config".to_string());
    }
}
