//! Error types for Campus

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CampusError>;

#[derive(Error, Debug)]
pub enum CampusError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CampusError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CampusError::Validation(_) => 3,
            CampusError::NotAuthenticated => 2,
            CampusError::Storage(_) => 1,
            CampusError::Config(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize stored record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_validation() {
        let error = CampusError::Validation("Student id cannot be empty".to_string());
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_not_authenticated() {
        assert_eq!(CampusError::NotAuthenticated.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_storage_and_config() {
        let storage = CampusError::Storage(StorageError::InvalidKey("../auth".to_string()));
        assert_eq!(storage.exit_code(), 1);

        let config = CampusError::Config(ConfigError::MissingField("storage.path".to_string()));
        assert_eq!(config.exit_code(), 1);
    }

    #[test]
    fn test_error_message_formatting() {
        let error = CampusError::Validation("Email cannot be empty".to_string());
        assert_eq!(error.to_string(), "Validation failed: Email cannot be empty");

        assert_eq!(CampusError::NotAuthenticated.to_string(), "Not signed in");

        let config = CampusError::Config(ConfigError::InvalidValue {
            field: "limits.pinned_capacity".to_string(),
            reason: "must be greater than zero".to_string(),
        });
        assert_eq!(
            config.to_string(),
            "Configuration error: Invalid value for limits.pinned_capacity: must be greater than zero"
        );
    }

    #[test]
    fn test_error_conversion_from_storage_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error: CampusError = StorageError::Io(io).into();

        match error {
            CampusError::Storage(StorageError::Io(_)) => {}
            other => panic!("Expected CampusError::Storage, got {:?}", other),
        }
    }
}
