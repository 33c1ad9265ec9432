use serde::Serialize;

/// Error category. Each category owns a code prefix letter and a fixed process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Validation,
    Environment,
    Filesystem,
    Command,
    Internal,
}

impl ErrorCategory {
    pub fn prefix(&self) -> char {
        match self {
            ErrorCategory::Validation => 'V',
            ErrorCategory::Environment => 'E',
            ErrorCategory::Filesystem => 'F',
            ErrorCategory::Command => 'C',
            ErrorCategory::Internal => 'I',
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorCategory::Validation => 1,
            ErrorCategory::Environment => 2,
            ErrorCategory::Filesystem => 3,
            ErrorCategory::Command => 4,
            ErrorCategory::Internal => 99,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationNameRequired,
    ValidationInvalidName,
    ValidationNameTooLong,
    ValidationUnknownFramework,
    ValidationUnknownStack,
    ValidationInvalidPackageManager,

    EnvironmentMissingTools,
    EnvironmentToolTooOld,

    FilesystemAlreadyExists,
    FilesystemPermissionDenied,
    FilesystemNotWritable,
    FilesystemPathTraversal,

    CommandNotAllowed,
    CommandFailed,
    CommandTimeout,
    CommandFailedToStart,

    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationNameRequired => "ORBIT-V001",
            ErrorCode::ValidationInvalidName => "ORBIT-V002",
            ErrorCode::ValidationNameTooLong => "ORBIT-V003",
            ErrorCode::ValidationUnknownFramework => "ORBIT-V004",
            ErrorCode::ValidationUnknownStack => "ORBIT-V005",
            ErrorCode::ValidationInvalidPackageManager => "ORBIT-V006",

            ErrorCode::EnvironmentMissingTools => "ORBIT-E001",
            ErrorCode::EnvironmentToolTooOld => "ORBIT-E002",

            ErrorCode::FilesystemAlreadyExists => "ORBIT-F001",
            ErrorCode::FilesystemPermissionDenied => "ORBIT-F002",
            ErrorCode::FilesystemNotWritable => "ORBIT-F003",
            ErrorCode::FilesystemPathTraversal => "ORBIT-F004",

            ErrorCode::CommandNotAllowed => "ORBIT-C001",
            ErrorCode::CommandFailed => "ORBIT-C002",
            ErrorCode::CommandTimeout => "ORBIT-C003",
            ErrorCode::CommandFailedToStart => "ORBIT-C004",

            ErrorCode::InternalUnexpected => "ORBIT-I001",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorCode::ValidationNameRequired
            | ErrorCode::ValidationInvalidName
            | ErrorCode::ValidationNameTooLong
            | ErrorCode::ValidationUnknownFramework
            | ErrorCode::ValidationUnknownStack
            | ErrorCode::ValidationInvalidPackageManager => ErrorCategory::Validation,

            ErrorCode::EnvironmentMissingTools | ErrorCode::EnvironmentToolTooOld => {
                ErrorCategory::Environment
            }

            ErrorCode::FilesystemAlreadyExists
            | ErrorCode::FilesystemPermissionDenied
            | ErrorCode::FilesystemNotWritable
            | ErrorCode::FilesystemPathTraversal => ErrorCategory::Filesystem,

            ErrorCode::CommandNotAllowed
            | ErrorCode::CommandFailed
            | ErrorCode::CommandTimeout
            | ErrorCode::CommandFailedToStart => ErrorCategory::Command,

            ErrorCode::InternalUnexpected => ErrorCategory::Internal,
        }
    }
}

pub fn all_codes() -> &'static [ErrorCode] {
    &[
        ErrorCode::ValidationNameRequired,
        ErrorCode::ValidationInvalidName,
        ErrorCode::ValidationNameTooLong,
        ErrorCode::ValidationUnknownFramework,
        ErrorCode::ValidationUnknownStack,
        ErrorCode::ValidationInvalidPackageManager,
        ErrorCode::EnvironmentMissingTools,
        ErrorCode::EnvironmentToolTooOld,
        ErrorCode::FilesystemAlreadyExists,
        ErrorCode::FilesystemPermissionDenied,
        ErrorCode::FilesystemNotWritable,
        ErrorCode::FilesystemPathTraversal,
        ErrorCode::CommandNotAllowed,
        ErrorCode::CommandFailed,
        ErrorCode::CommandTimeout,
        ErrorCode::CommandFailedToStart,
        ErrorCode::InternalUnexpected,
    ]
}

pub fn parse_code(code: &str) -> Option<ErrorCode> {
    all_codes()
        .iter()
        .copied()
        .find(|candidate| candidate.as_str() == code)
}
