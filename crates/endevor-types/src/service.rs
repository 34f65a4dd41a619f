//! # Service Locations and Credentials
//!
//! Where an Endevor web-services deployment lives and how to authenticate
//! against it. A location exists in two representations — a composed URL
//! string and decomposed fields — and converts between them losslessly.
//!
//! Stored base paths come in three historical flavors: the legacy REST
//! path, the v1 API path, and the current v2 API path. Normalization maps
//! the first two onto the canonical v2 path and leaves everything else
//! untouched.

use serde::{Deserialize, Serialize};
use url::Url;
use zeroize::Zeroizing;

/// Marker substring of the legacy (pre-API) REST base path.
const LEGACY_REST_BASE_PATH: &str = "EndevorService/rest";

/// Marker substring of the v1 API base path.
const V1_API_BASE_PATH: &str = "EndevorService/api/v1";

/// The canonical v2 API base path every request is issued against.
pub const V2_API_BASE_PATH: &str = "/EndevorService/api/v2/";

/// Rewrite a stored base path onto the canonical v2 API base path.
///
/// A path containing the legacy REST marker or the v1 API marker (as a
/// substring, anywhere) becomes [`V2_API_BASE_PATH`]; any other input is
/// returned unchanged. Pure and total — no I/O, no failure.
pub fn normalize_base_path(base_path: &str) -> String {
    if base_path.contains(LEGACY_REST_BASE_PATH) || base_path.contains(V1_API_BASE_PATH) {
        V2_API_BASE_PATH.to_string()
    } else {
        base_path.to_string()
    }
}

/// Transport protocol of a service location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Plain HTTP.
    Http,
    /// HTTP over TLS.
    Https,
}

impl Protocol {
    /// Parse a protocol from a scheme string, with or without the trailing
    /// colon a URL parser leaves on it. Unrecognized schemes yield `None` —
    /// callers substitute their own default explicitly.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "http" | "http:" => Some(Self::Http),
            "https" | "https:" => Some(Self::Https),
            _ => None,
        }
    }

    /// The scheme string, without a trailing colon.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    /// The well-known port for the protocol.
    pub fn default_port(self) -> u16 {
        match self {
            Self::Http => 80,
            Self::Https => 443,
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decomposed Endevor web-services location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceLocation {
    /// Transport protocol.
    pub protocol: Protocol,
    /// Hostname of the deployment.
    pub hostname: String,
    /// TCP port.
    pub port: u16,
    /// Base path as stored; normalized at request-assembly time.
    pub base_path: String,
}

/// Failure to decompose a base URL into a [`ServiceLocation`].
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    /// The input is not a parseable URL.
    #[error("invalid service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL has no hostname component.
    #[error("service URL has no hostname")]
    MissingHostname,
}

impl ServiceLocation {
    /// Compose the location into a base URL string.
    ///
    /// Inverse of [`ServiceLocation::from_base_url`]: decomposing the
    /// composed string yields the original fields.
    pub fn to_base_url(&self) -> String {
        format!(
            "{}://{}:{}{}",
            self.protocol, self.hostname, self.port, self.base_path
        )
    }

    /// Decompose a base URL string into location fields.
    ///
    /// An unrecognized scheme falls back to HTTP; an elided port resolves
    /// to the protocol's well-known port so the round-trip through
    /// [`ServiceLocation::to_base_url`] stays lossless.
    pub fn from_base_url(base_url: &str) -> Result<Self, LocationError> {
        let url = Url::parse(base_url)?;
        let protocol = Protocol::parse(url.scheme()).unwrap_or(Protocol::Http);
        let hostname = url
            .host_str()
            .ok_or(LocationError::MissingHostname)?
            .to_string();
        Ok(Self {
            protocol,
            hostname,
            port: url.port().unwrap_or_else(|| protocol.default_port()),
            base_path: url.path().to_string(),
        })
    }
}

/// An authentication credential for the service.
///
/// Exactly one variant is active; transport code matches exhaustively so a
/// newly added credential kind cannot silently produce unauthenticated
/// requests.
#[derive(Clone)]
pub enum Credential {
    /// Username/password pair for basic authentication.
    Basic {
        /// Username.
        user: String,
        /// Password; zeroized on drop.
        password: Zeroizing<String>,
    },
    /// Named session token, e.g. an LTPA or API ML token.
    Token {
        /// Token name as the service expects it.
        token_type: String,
        /// Token value; zeroized on drop.
        token_value: Zeroizing<String>,
    },
}

impl Credential {
    /// Build a basic-authentication credential.
    pub fn basic(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            user: user.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    /// Build a token credential.
    pub fn token(token_type: impl Into<String>, token_value: impl Into<String>) -> Self {
        Self::Token {
            token_type: token_type.into(),
            token_value: Zeroizing::new(token_value.into()),
        }
    }
}

// Secrets never reach log output; only the shape of the credential does.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic { user, .. } => f
                .debug_struct("Basic")
                .field("user", user)
                .field("password", &"*****")
                .finish(),
            Self::Token { token_type, .. } => f
                .debug_struct("Token")
                .field("token_type", token_type)
                .field("token_value", &"*****")
                .finish(),
        }
    }
}

/// A fully specified connection target: location, configuration (instance)
/// name, and credential. Passed immutably to every client call.
#[derive(Debug, Clone)]
pub struct Service {
    /// Where the deployment lives.
    pub location: ServiceLocation,
    /// The named configuration (instance) to address.
    pub configuration: String,
    /// How to authenticate.
    pub credential: Credential,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn legacy_rest_paths_normalize_to_v2() {
        for input in [
            "EndevorService/rest",
            "/EndevorService/rest",
            "EndevorService/rest/",
            "/EndevorService/rest/",
            "gibberish/EndevorService/rest/gibberish",
        ] {
            assert_eq!(normalize_base_path(input), V2_API_BASE_PATH);
        }
    }

    #[test]
    fn v1_api_paths_normalize_to_v2() {
        for input in [
            "EndevorService/api/v1",
            "/EndevorService/api/v1",
            "EndevorService/api/v1/",
            "/EndevorService/api/v1/",
            "gibberish/EndevorService/api/v1/gibberish",
        ] {
            assert_eq!(normalize_base_path(input), V2_API_BASE_PATH);
        }
    }

    #[test]
    fn v2_api_path_passes_through() {
        assert_eq!(normalize_base_path(V2_API_BASE_PATH), V2_API_BASE_PATH);
    }

    proptest! {
        /// Paths without either marker pass through unchanged.
        #[test]
        fn unmarked_paths_are_identity(path in ".*".prop_filter(
            "must not contain a legacy or v1 marker",
            |s| !s.contains(LEGACY_REST_BASE_PATH) && !s.contains(V1_API_BASE_PATH),
        )) {
            prop_assert_eq!(normalize_base_path(&path), path);
        }
    }

    #[test]
    fn protocol_parses_with_and_without_colon() {
        assert_eq!(Protocol::parse("http"), Some(Protocol::Http));
        assert_eq!(Protocol::parse("http:"), Some(Protocol::Http));
        assert_eq!(Protocol::parse("https"), Some(Protocol::Https));
        assert_eq!(Protocol::parse("https:"), Some(Protocol::Https));
        assert_eq!(Protocol::parse("ftp"), None);
        assert_eq!(Protocol::parse(""), None);
    }

    #[test]
    fn location_round_trips_through_url() {
        let location = ServiceLocation {
            protocol: Protocol::Https,
            hostname: "mainframe.example.com".into(),
            port: 8443,
            base_path: "/EndevorService/api/v2/".into(),
        };
        let url = location.to_base_url();
        assert_eq!(
            url,
            "https://mainframe.example.com:8443/EndevorService/api/v2/"
        );
        assert_eq!(ServiceLocation::from_base_url(&url).unwrap(), location);
    }

    #[test]
    fn elided_port_resolves_to_protocol_default() {
        let location = ServiceLocation::from_base_url("http://host.example.com/path").unwrap();
        assert_eq!(location.port, 80);
        let location = ServiceLocation::from_base_url("https://host.example.com/path").unwrap();
        assert_eq!(location.port, 443);
        // Round-trip with the resolved default stays stable.
        let url = location.to_base_url();
        assert_eq!(ServiceLocation::from_base_url(&url).unwrap(), location);
    }

    #[test]
    fn from_base_url_rejects_garbage() {
        assert!(ServiceLocation::from_base_url("not a url").is_err());
    }

    #[test]
    fn credential_debug_redacts_secrets() {
        let basic = format!("{:?}", Credential::basic("user", "hunter2"));
        assert!(basic.contains("user"));
        assert!(!basic.contains("hunter2"));

        let token = format!("{:?}", Credential::token("LtpaToken2", "sekrit"));
        assert!(token.contains("LtpaToken2"));
        assert!(!token.contains("sekrit"));
    }
}
