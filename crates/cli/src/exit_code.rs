//! Exit code definitions for the sk CLI

/// Exit codes for the sk CLI application.
///
/// These codes follow a consistent convention to allow scripts and automation
/// to handle different error scenarios appropriately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Operation completed successfully
    Success = 0,

    /// General/unspecified error
    GeneralError = 1,

    /// User input error: invalid arguments, malformed path, bad labels, etc.
    UsageError = 2,

    /// Remote provider failure
    ProviderError = 3,

    /// Authentication or permission failure
    AuthError = 4,

    /// Resource not found: bucket, blob, or local folder does not exist
    NotFound = 5,

    /// Conflict or precondition failure: bucket already exists, etc.
    Conflict = 6,
}

impl ExitCode {
    /// Convert exit code to i32 for use with std::process::exit
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Map a core error to its exit code
    pub const fn from_error(error: &sk_core::Error) -> Self {
        match error.exit_code() {
            2 => Self::UsageError,
            3 => Self::ProviderError,
            5 => Self::NotFound,
            _ => Self::GeneralError,
        }
    }

    /// Get a human-readable description of the exit code
    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "Operation completed successfully",
            Self::GeneralError => "General error",
            Self::UsageError => "Invalid arguments or path format",
            Self::ProviderError => "Remote provider failure",
            Self::AuthError => "Authentication or permission failure",
            Self::NotFound => "Resource not found",
            Self::Conflict => "Conflict or precondition failure",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}
