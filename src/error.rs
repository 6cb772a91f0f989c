/*!
 * Error types for space-builder
 *
 * Every variant of `BuildError` renders as the fixed message shown to the
 * user. The underlying remote or filesystem error is logged where it happens
 * and never leaks into the message.
 */

use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, BuildError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_FATAL: i32 = 2;

/// Naming grammar enforced by the Hub for new repositories
pub const NAMING_GRAMMAR: &str = "Only regular characters and '-', '_', '.' accepted. '--' and '..' are forbidden. '-' and '.' cannot start or end the name.";

#[derive(Debug)]
pub enum BuildError {
    /// One of the form fields is empty or whitespace-only
    MissingInput,

    /// The access token could not be resolved to an owner
    InvalidToken,

    /// A space with the fully-qualified name already exists
    NameTaken { repo_id: String },

    /// The Hub could not be reached at all
    HubUnreachable { endpoint: String },

    /// At least one input identifier could not be loaded as an interface
    Unloadable,

    /// Input component kinds differ between interfaces
    InputTypesDiffer,

    /// Output component kinds differ between interfaces
    OutputTypesDiffer,

    /// The Hub refused to create a repository with the target name
    InvalidTargetName,

    /// The artifact could not be written to a temporary file
    TempFile(io::Error),

    /// Uploading the artifact to the new space failed
    UploadFailed,

    /// Configuration or environment error
    Config(String),
}

impl BuildError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildError::MissingInput | BuildError::InvalidToken | BuildError::Config(_) => {
                EXIT_FATAL
            }
            _ => EXIT_FAILURE,
        }
    }

    /// Whether this failure happened before anything was created remotely
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BuildError::MissingInput
                | BuildError::InvalidToken
                | BuildError::NameTaken { .. }
                | BuildError::HubUnreachable { .. }
                | BuildError::Unloadable
                | BuildError::InputTypesDiffer
                | BuildError::OutputTypesDiffer
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            BuildError::MissingInput => ErrorCategory::Validation,
            BuildError::InvalidToken => ErrorCategory::Security,
            BuildError::NameTaken { .. } | BuildError::InvalidTargetName => ErrorCategory::Naming,
            BuildError::HubUnreachable { .. } => ErrorCategory::Network,
            BuildError::Unloadable
            | BuildError::InputTypesDiffer
            | BuildError::OutputTypesDiffer => ErrorCategory::Interface,
            BuildError::TempFile(_) => ErrorCategory::IoError,
            BuildError::UploadFailed => ErrorCategory::Upload,
            BuildError::Config(_) => ErrorCategory::Configuration,
        }
    }
}

/// Error category for classification and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Form validation errors
    Validation,
    /// Token errors
    Security,
    /// Target name errors
    Naming,
    /// Hub connectivity
    Network,
    /// Loading or comparing interfaces
    Interface,
    /// Local file errors
    IoError,
    /// Artifact upload
    Upload,
    /// Configuration errors
    Configuration,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::Security => write!(f, "security"),
            ErrorCategory::Naming => write!(f, "naming"),
            ErrorCategory::Network => write!(f, "network"),
            ErrorCategory::Interface => write!(f, "interface"),
            ErrorCategory::IoError => write!(f, "io"),
            ErrorCategory::Upload => write!(f, "upload"),
            ErrorCategory::Configuration => write!(f, "configuration"),
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::MissingInput => write!(f, "Please fill all the inputs"),
            BuildError::InvalidToken => {
                write!(f, "You have given an incorrect HuggingFace token")
            }
            BuildError::NameTaken { repo_id } => write!(f, "The {} is already used.", repo_id),
            BuildError::HubUnreachable { endpoint } => {
                write!(f, "Can not send a request to {}", endpoint)
            }
            BuildError::Unloadable => write!(
                f,
                "One of the given space cannot be loaded to gradio, sorry for the inconvenience. \nPlease use different input space names!"
            ),
            BuildError::InputTypesDiffer => write!(f, "Provided space input types are different"),
            BuildError::OutputTypesDiffer => {
                write!(f, "Provided space output types are different")
            }
            BuildError::InvalidTargetName => write!(
                f,
                "Please provide a correct space name as {}",
                NAMING_GRAMMAR
            ),
            BuildError::TempFile(_) => {
                write!(f, "An exception occurred during temporary file writing")
            }
            BuildError::UploadFailed => write!(
                f,
                "An exception occurred during writing app.py to the target space"
            ),
            BuildError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::TempFile(err) => Some(err),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for BuildError {
    fn from(err: toml::de::Error) -> Self {
        BuildError::Config(format!("TOML parse error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(BuildError::MissingInput.to_string(), "Please fill all the inputs");
        assert_eq!(
            BuildError::NameTaken {
                repo_id: "alice/mixer".to_string()
            }
            .to_string(),
            "The alice/mixer is already used."
        );
        assert_eq!(
            BuildError::HubUnreachable {
                endpoint: "https://huggingface.co".to_string()
            }
            .to_string(),
            "Can not send a request to https://huggingface.co"
        );
        assert!(BuildError::InvalidTargetName
            .to_string()
            .ends_with("'-' and '.' cannot start or end the name."));
    }

    #[test]
    fn test_temp_file_hides_io_detail() {
        let err = BuildError::TempFile(io::Error::other("disk on fire"));
        assert!(!err.to_string().contains("disk on fire"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(BuildError::MissingInput.exit_code(), EXIT_FATAL);
        assert_eq!(BuildError::InvalidToken.exit_code(), EXIT_FATAL);
        assert_eq!(BuildError::UploadFailed.exit_code(), EXIT_FAILURE);
        assert_eq!(BuildError::OutputTypesDiffer.exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn test_validation_errors() {
        assert!(BuildError::Unloadable.is_validation());
        assert!(BuildError::NameTaken {
            repo_id: "a/b".to_string()
        }
        .is_validation());
        assert!(!BuildError::InvalidTargetName.is_validation());
        assert!(!BuildError::UploadFailed.is_validation());
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(BuildError::InvalidToken.category(), ErrorCategory::Security);
        assert_eq!(BuildError::InputTypesDiffer.category(), ErrorCategory::Interface);
        assert_eq!(BuildError::UploadFailed.category(), ErrorCategory::Upload);
        assert_eq!(ErrorCategory::Network.to_string(), "network");
    }
}
