//! Error type shared by the stores and backends

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FamilyError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FamilyError {
    /// Failure reported by the remote store or auth service. The message is
    /// passed through as-is.
    #[error("{0}")]
    Remote(String),
}

impl FamilyError {
    pub fn remote(message: impl Into<String>) -> Self {
        FamilyError::Remote(message.into())
    }
}

impl From<supabase_client::SupabaseError> for FamilyError {
    fn from(err: supabase_client::SupabaseError) -> Self {
        FamilyError::Remote(err.message())
    }
}
