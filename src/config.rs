use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Veridoc";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset
pub fn default_log_filter() -> String {
    "info,veridoc=debug".to_string()
}

/// Get the application data directory
/// ~/Veridoc/ on all platforms (user-visible)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Veridoc")
}

/// Location of the local override store
pub fn override_db_path() -> PathBuf {
    app_data_dir().join("overrides.db")
}

/// Document catalog backend endpoint settings.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Scheme + host of the catalog backend; API paths are appended.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
        }
    }
}

/// OIDC provider settings for reviewer login.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Realm endpoint up to `/protocol/openid-connect`.
    pub base_url: String,
    pub client_id: String,
    /// Role a reviewer account must carry to log in.
    pub required_role: String,
    pub timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: "https://auth.example.com/realms/doc-validation/protocol/openid-connect"
                .to_string(),
            client_id: "veridoc-front".to_string(),
            required_role: "validator".to_string(),
            timeout_secs: 10,
        }
    }
}
