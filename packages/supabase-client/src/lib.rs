//! Pure Supabase REST client.
//!
//! A minimal client for a hosted Supabase project. Covers the row API
//! (select/insert/update/delete with filters and ordering) and the auth API
//! (password sign-in, sign-out, token refresh and session-change listeners).
//!
//! # Example
//!
//! ```rust,ignore
//! use supabase_client::SupabaseClient;
//!
//! let client = SupabaseClient::new("https://xyz.supabase.co", "anon-key");
//!
//! client.auth().sign_in_with_password("me@example.com", "secret").await?;
//!
//! let rows: Vec<serde_json::Value> = client
//!     .from("members")
//!     .await?
//!     .select("*")
//!     .order("generation", true)
//!     .execute()
//!     .await?;
//! ```

pub mod auth;
pub mod error;
pub mod postgrest;
pub mod types;

pub use auth::{AuthClient, AuthListener, Subscription};
pub use error::{Result, SupabaseError};
pub use postgrest::TableQuery;
pub use types::{AuthChangeEvent, Session, User};

#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
    auth: AuthClient,
}

impl SupabaseClient {
    /// Create a client for the project at `url` using its anon (public) key.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let url = url.into().trim_end_matches('/').to_string();
        let api_key = api_key.into();
        let http = reqwest::Client::new();
        let auth = AuthClient::new(http.clone(), format!("{}/auth/v1", url), api_key.clone());

        Self {
            http,
            url,
            api_key,
            auth,
        }
    }

    /// Project base URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    /// Start a request against `table`.
    ///
    /// Requests run as the signed-in user when a session exists, otherwise
    /// as the anonymous role. An expired access token is refreshed first,
    /// which notifies listeners with `TokenRefreshed`.
    pub async fn from(&self, table: &str) -> Result<TableQuery> {
        let bearer = self
            .auth
            .get_session()
            .await?
            .map(|s| s.access_token)
            .unwrap_or_else(|| self.api_key.clone());

        Ok(TableQuery::new(
            self.http.clone(),
            format!("{}/rest/v1", self.url),
            table,
            self.api_key.clone(),
            bearer,
        ))
    }
}
