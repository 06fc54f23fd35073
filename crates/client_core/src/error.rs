use shared::error::{RemoteError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("remote table unreachable: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for TableError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Remote(RemoteError),
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl From<TableError> for FormError {
    fn from(value: TableError) -> Self {
        match value {
            TableError::Remote(err) => Self::Remote(err),
            TableError::Transport(message) => Self::Unexpected(message),
        }
    }
}

impl FormError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid supabase url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("supabase url is not configured")]
    MissingUrl,
    #[error("supabase anon key is not configured")]
    MissingAnonKey,
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
