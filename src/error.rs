//! Error handling for hashcrack


use thiserror::Error;

/// Main error type for hashcrack
#[derive(Error, Debug, Clone)]
pub enum CrackError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Target hash file error ({path}): {message}")]
    TargetFile { path: String, message: String },

    #[error("Invalid target hash on line {line}: {message}")]
    InvalidTarget { line: usize, message: String },

    #[error("Dictionary error ({path}): {message}")]
    Dictionary { path: String, message: String },

    #[error("Symbol index {index} out of range for alphabet of size {size}")]
    Enumeration { index: usize, size: usize },

    #[error("Digest {digest} was never loaded as a target")]
    UnknownDigest { digest: String },

    #[error("Hash error ({algorithm}): {message}")]
    Hash {
        algorithm: crate::types::HashAlgorithm,
        message: String,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CrackError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a target hash file error
    pub fn target_file(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TargetFile {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an error for a malformed target line (1-based)
    pub fn invalid_target(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidTarget {
            line,
            message: message.into(),
        }
    }

    /// Create a dictionary error
    pub fn dictionary(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Dictionary {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an enumeration error
    pub fn enumeration(index: usize, size: usize) -> Self {
        Self::Enumeration { index, size }
    }

    /// Create an unknown digest error
    pub fn unknown_digest(digest: impl std::fmt::Display) -> Self {
        Self::UnknownDigest {
            digest: digest.to_string(),
        }
    }

    /// Create a hash error
    pub fn hash(algorithm: crate::types::HashAlgorithm, message: impl Into<String>) -> Self {
        Self::Hash {
            algorithm,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            content,
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Process exit status for this error.
    ///
    /// Configuration problems are detected before any work starts and exit
    /// with 1. A bad target list exits with 2 and a bad dictionary with 3.
    /// Everything else is an internal or runtime failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } | Self::Validation { .. } => 1,
            Self::TargetFile { .. } | Self::InvalidTarget { .. } => 2,
            Self::Dictionary { .. } => 3,
            Self::Enumeration { .. }
            | Self::UnknownDigest { .. }
            | Self::Hash { .. }
            | Self::Parse { .. }
            | Self::Io { .. }
            | Self::Internal { .. } => 4,
        }
    }

    /// Whether the error was raised while reading an input file
    pub fn is_resource_error(&self) -> bool {
        matches!(
            self,
            Self::TargetFile { .. } | Self::InvalidTarget { .. } | Self::Dictionary { .. }
        )
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your arguments or .env file", message)
            }
            Self::Validation { message } => {
                format!("❌ Validation error: {}\n💡 Check your input format", message)
            }
            Self::TargetFile { path, message } => {
                format!(
                    "❌ Could not read hash list '{}': {}\n💡 Pass an existing file with --hashfile",
                    path, message
                )
            }
            Self::InvalidTarget { line, message } => {
                format!(
                    "❌ Hash list line {}: {}\n💡 Expected one hex digest per line",
                    line, message
                )
            }
            Self::Dictionary { path, message } => {
                format!(
                    "❌ Could not read dictionary '{}': {}\n💡 Check the --dict path",
                    path, message
                )
            }
            Self::Enumeration { index, size } => {
                format!(
                    "❌ Internal enumeration error: index {} outside alphabet of {} symbols\n\
                     💡 This is a bug, please report it",
                    index, size
                )
            }
            Self::UnknownDigest { digest } => {
                format!(
                    "❌ Internal error: unknown digest {}\n💡 This is a bug, please report it",
                    digest
                )
            }
            Self::Hash { algorithm, message } => {
                format!("❌ Hash function ({}) failed: {}", algorithm, message)
            }
            Self::Parse { message, .. } => {
                format!(
                    "❌ Parse error: {}\n💡 The state file may be corrupt, delete it to start over",
                    message
                )
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!(
                    "❌ File error{}: {}\n💡 Check file permissions and paths",
                    path_info, message
                )
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
        }
    }
}

impl From<serde_json::Error> for CrackError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string(), None)
    }
}

impl From<std::io::Error> for CrackError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string(), None)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, CrackError>;



/// Helper macros for common error patterns
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::CrackError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::CrackError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr) => {
        $crate::error::CrackError::validation($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::CrackError::validation(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::error::CrackError::internal($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::CrackError::internal(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_distinguish_inputs() {
        assert_eq!(CrackError::config("bad length").exit_code(), 1);
        assert_eq!(CrackError::target_file("h.txt", "missing").exit_code(), 2);
        assert_eq!(CrackError::invalid_target(3, "not hex").exit_code(), 2);
        assert_eq!(CrackError::dictionary("d.txt", "missing").exit_code(), 3);
        assert_eq!(CrackError::enumeration(40, 36).exit_code(), 4);
    }

    #[test]
    fn test_macros() {
        let err = config_error!("length must be at least {}", 1);
        assert!(err.to_string().contains("length must be at least 1"));
        assert!(matches!(validation_error!("x"), CrackError::Validation { .. }));
        assert!(matches!(internal_error!("x"), CrackError::Internal { .. }));
    }

    #[test]
    fn test_resource_errors() {
        assert!(CrackError::dictionary("d", "gone").is_resource_error());
        assert!(!CrackError::config("x").is_resource_error());
    }
}
