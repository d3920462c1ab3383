//! Static request credentials

use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};

/// Credentials attached to every request.
///
/// ```yaml
/// auth:
///   type: header
///   name: X-Gateway-Key
///   value: secret
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Credentials {
    /// No credentials
    #[default]
    Anonymous,

    /// Arbitrary header, e.g. an API key
    Header { name: String, value: String },

    /// Query parameter
    Query { param: String, value: String },

    /// `Authorization: Bearer <token>`
    Bearer { token: String },

    /// HTTP Basic
    Basic {
        username: String,
        #[serde(default)]
        password: Option<String>,
    },
}

impl Credentials {
    /// Whether no credentials are configured
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Credentials::Anonymous)
    }

    /// Attach the credentials to a request
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match self {
            Credentials::Anonymous => req,
            Credentials::Header { name, value } => req.header(name.as_str(), value.as_str()),
            Credentials::Query { param, value } => req.query(&[(param, value)]),
            Credentials::Bearer { token } => req.bearer_auth(token),
            Credentials::Basic { username, password } => {
                req.basic_auth(username, password.as_ref())
            }
        }
    }
}

// Secrets never reach logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Anonymous => f.write_str("Anonymous"),
            Credentials::Header { name, .. } => f
                .debug_struct("Header")
                .field("name", name)
                .field("value", &"<redacted>")
                .finish(),
            Credentials::Query { param, .. } => f
                .debug_struct("Query")
                .field("param", param)
                .field("value", &"<redacted>")
                .finish(),
            Credentials::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"<redacted>")
                .finish(),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}
