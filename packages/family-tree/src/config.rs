use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Backend connection settings.
#[derive(Clone)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("supabase_url", &self.supabase_url)
            .field("supabase_anon_key", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Runtime variables win; browser builds have no process environment,
    /// so values present at compile time are used as the fallback.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            supabase_url: lookup("SUPABASE_URL", option_env!("SUPABASE_URL"))
                .context("SUPABASE_URL must be set")?,
            supabase_anon_key: lookup("SUPABASE_ANON_KEY", option_env!("SUPABASE_ANON_KEY"))
                .context("SUPABASE_ANON_KEY must be set")?,
        })
    }
}

fn lookup(name: &str, compiled: Option<&'static str>) -> Option<String> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| {
            compiled
                .filter(|v| !v.trim().is_empty())
                .map(String::from)
        })
}
