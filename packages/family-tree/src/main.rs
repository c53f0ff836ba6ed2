//! Family Tree - Dioxus web application
//!
//! Single-page app for browsing and editing a family tree stored in a
//! hosted Supabase project.
//!
//! ## Running
//!
//! Development (with hot reload):
//! ```bash
//! SUPABASE_URL=... SUPABASE_ANON_KEY=... dx serve --features web
//! ```
//!
//! Production build:
//! ```bash
//! dx build --release --features web
//! ```

use family_tree::app::App;
use family_tree::config::Config;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return;
        }
    };
    tracing::info!(url = %config.supabase_url, "Starting family tree");

    dioxus::LaunchBuilder::new().with_context(config).launch(App);
}
