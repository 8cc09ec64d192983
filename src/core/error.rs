use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// MySQL error numbers that indicate lock contention rather than a broken query
const ER_LOCK_DEADLOCK: u16 = 1213;
const ER_LOCK_WAIT_TIMEOUT: u16 = 1205;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Malformed or out-of-range argument, rejected before any write
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Referenced entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Attempted double settlement of a tax obligation
    #[error("Tax obligation '{0}' is already paid")]
    AlreadyPaid(String),

    /// Payment event references an account we do not know
    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    /// Payment event references a plan missing from storage and catalog
    #[error("Unknown plan: {0}")]
    UnknownPlan(String),

    /// Concurrent write contention; the whole operation may be retried
    #[error("Storage conflict: {0}")]
    StorageConflict(String),

    /// Webhook signature missing or invalid
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let is_duplicate = db_err.is_unique_violation();
            let is_lock_failure = db_err
                .try_downcast_ref::<sqlx::mysql::MySqlDatabaseError>()
                .map(|e| matches!(e.number(), ER_LOCK_DEADLOCK | ER_LOCK_WAIT_TIMEOUT))
                .unwrap_or(false);

            if is_duplicate || is_lock_failure {
                return AppError::StorageConflict(db_err.message().to_string());
            }
        }
        AppError::Database(err)
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        HttpResponse::build(status_code).json(serde_json::json!({
            "error": {
                "message": error_message,
                "code": status_code.as_u16(),
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyPaid(_) => StatusCode::CONFLICT,
            AppError::UnknownAccount(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::UnknownPlan(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::StorageConflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Whether the caller should retry the whole operation
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::StorageConflict(_))
    }
}
