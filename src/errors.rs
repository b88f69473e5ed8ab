use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Shopify API error: {0}")]
    Remote(String),

    #[error("Failed to create metafield definition {namespace}.{key}")]
    DefinitionCreationFailed { namespace: String, key: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP-equivalent status for the host layer: validation maps to
    /// 400, not-found to 404, everything else to 500.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Validation(_) => 400,
            AppError::NotFound(_) => 404,
            _ => 500,
        }
    }
}

impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Remote("Request to Shopify timed out".to_string())
        } else {
            AppError::Remote(err.to_string())
        }
    }
}
