use thiserror::Error;

pub type Result<T> = std::result::Result<T, SupabaseError>;

/// Errors surfaced by the Supabase REST and auth APIs.
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no active session")]
    NotAuthenticated,
}

impl SupabaseError {
    /// Human-readable message without the status prefix.
    pub fn message(&self) -> String {
        match self {
            SupabaseError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Build an API error from a non-success response body.
    ///
    /// PostgREST reports `message`, GoTrue uses `error_description` or `msg`
    /// depending on the endpoint, and some gateways only send `error`.
    pub(crate) fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                ["message", "error_description", "msg", "error"]
                    .iter()
                    .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(String::from))
            })
            .unwrap_or_else(|| body.to_string());

        SupabaseError::Api { status, message }
    }
}
