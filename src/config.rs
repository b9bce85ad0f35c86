use url::Url;

/// Environment variable holding the GitHub access token. Required.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Environment variable overriding the GitHub API base URL. Optional; used to
/// point the client at a GitHub Enterprise host or a local test server.
pub const API_BASE_ENV: &str = "GITHUB_API_URL";

/// Runtime configuration, resolved once in `main` and passed explicitly into
/// the client constructor instead of being read ad hoc from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub api_base: Option<Url>,
}

impl Config {
    /// Read the configuration from the process environment. A missing or
    /// empty token is a fatal configuration error, raised before any network
    /// call is made.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_values(
            std::env::var(TOKEN_ENV).ok(),
            std::env::var(API_BASE_ENV).ok(),
        )
    }

    /// Build a configuration from raw values. Split out of `from_env` so the
    /// resolution rules can be tested without touching process state.
    pub fn from_values(
        token: Option<String>,
        api_base: Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let token = token
            .filter(|token| !token.is_empty())
            .ok_or("GITHUB_TOKEN environment variable is not set")?;

        let api_base = match api_base {
            Some(raw) => Some(Url::parse(&raw)?),
            None => None,
        };

        Ok(Self { token, api_base })
    }
}
