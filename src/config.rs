/// Client configuration loaded from environment variables.
///
/// Call `dotenvy::dotenv().ok()` first to pick up a local `.env` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Root URL of the REST API; resource paths such as `api/cords` are
    /// appended to it.
    pub api_url: String,
    /// Bearer token sent as `Authorization` on every request.
    pub token: Option<String>,
}

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

impl ClientConfig {
    /// | Env Var              | Default                 |
    /// |----------------------|-------------------------|
    /// | `TENNISLY_API_URL`   | `http://localhost:8080` |
    /// | `TENNISLY_API_TOKEN` | unset                   |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = lookup("TENNISLY_API_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.into());

        let token = lookup("TENNISLY_API_TOKEN")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self { api_url, token }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            token: None,
        }
    }
}
