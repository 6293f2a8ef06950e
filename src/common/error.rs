use std::fmt;
use tracing::error;

pub type ServiceResult<T> = Result<T, AppError>;

#[track_caller]
pub fn unexpected<T, E: Into<anyhow::Error>>(e: E) -> ServiceResult<T> {
    let caller = std::panic::Location::caller();
    error!("An unexpected error has occurred at {caller}: {}", e.into());
    Err(AppError::Unexpected)
}

#[derive(Debug)]
pub enum AppError {
    Unexpected,

    StorageInvalidType,
    StorageInvalidPath,
    StorageNotSetUp,

    /// Backend failure, passed through as the driver reported it.
    Database(sqlx::Error),

    ReportsNotFound,
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e)
    }
}

impl AppError {
    pub const fn as_str(&self) -> &str {
        self.code()
    }

    pub const fn code(&self) -> &'static str {
        match self {
            AppError::Unexpected => "unexpected",

            AppError::StorageInvalidType => "storage.invalid_type",
            AppError::StorageInvalidPath => "storage.invalid_path",
            AppError::StorageNotSetUp => "storage.not_set_up",
            AppError::Database(_) => "storage.database",

            AppError::ReportsNotFound => "reports.not_found",
        }
    }

    pub const fn message(&self) -> &'static str {
        match self {
            AppError::Unexpected => "An unexpected error has occurred.",

            AppError::StorageInvalidType => "Invalid storage type.",
            AppError::StorageInvalidPath => "Invalid storage path.",
            AppError::StorageNotSetUp => "MySQL not setup correctly.",
            AppError::Database(_) => "The database backend returned an error.",

            AppError::ReportsNotFound => "This report does not exist.",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database(e) => write!(f, "{}: {e}", self.message()),
            _ => f.write_str(self.message()),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Database(e) => Some(e),
            _ => None,
        }
    }
}
