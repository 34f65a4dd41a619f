//! Request assembly shared by every operation: base-URL and element-path
//! construction, credential binding, and diagnostic formatting.

use reqwest::header::COOKIE;
use reqwest::RequestBuilder;

use endevor_types::{normalize_base_path, Credential, ElementAddress, ServiceLocation};

use crate::schema::RestResponseBody;

/// Compose the API root for a location: protocol, host, port, and the
/// normalized base path without its trailing slash.
pub(crate) fn api_base_url(location: &ServiceLocation) -> String {
    let base_path = normalize_base_path(&location.base_path);
    format!(
        "{}://{}:{}{}",
        location.protocol,
        location.hostname,
        location.port,
        base_path.trim_end_matches('/')
    )
}

/// Compose the canonical element path under a configuration. Diagnostic
/// endpoint strings reuse this so they cannot drift from the request URL.
pub(crate) fn element_path(configuration: &str, address: &ElementAddress) -> String {
    format!(
        "/{configuration}/env/{}/stgnum/{}/sys/{}/subsys/{}/type/{}/ele/{}",
        address.environment,
        address.stage_number,
        address.system,
        address.subsystem,
        address.element_type,
        address.element
    )
}

/// Compose the full element URL under an API base.
pub(crate) fn element_url(base: &str, configuration: &str, address: &ElementAddress) -> String {
    format!("{base}{}", element_path(configuration, address))
}

/// Attach authentication to an outbound request.
///
/// The match is deliberately exhaustive with no default arm: a new
/// credential variant must fail compilation here rather than silently
/// produce an unauthenticated request.
pub(crate) fn bind_credential(request: RequestBuilder, credential: &Credential) -> RequestBuilder {
    match credential {
        Credential::Basic { user, password } => {
            tracing::trace!("using basic authentication");
            request.basic_auth(user, Some(password.as_str()))
        }
        Credential::Token {
            token_type,
            token_value,
        } => {
            tracing::trace!("using token authentication");
            request.header(COOKIE, format!("{token_type}={}", token_value.as_str()))
        }
    }
}

/// Best-effort read of the response envelope from a response body.
///
/// Error bodies are best-effort JSON; anything unreadable degrades to an
/// all-default envelope so the failure is still loggable.
pub(crate) async fn read_envelope(resp: reqwest::Response) -> RestResponseBody {
    let raw = resp
        .json::<serde_json::Value>()
        .await
        .unwrap_or(serde_json::Value::Null);
    crate::schema::decode("response body", raw).unwrap_or_default()
}

/// Format request parameters and the full response envelope for the
/// diagnostic side channel and for `Api` error details.
pub(crate) fn dump(request_parms: &serde_json::Value, body: &RestResponseBody) -> String {
    let response = serde_json::to_value(body).unwrap_or_default();
    format!(
        "Request parms:\n{}\nResponse:\n{}",
        pretty(request_parms),
        pretty(&response)
    )
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use endevor_types::{Protocol, StageNumber};

    fn location(base_path: &str) -> ServiceLocation {
        ServiceLocation {
            protocol: Protocol::Http,
            hostname: "host".into(),
            port: 8080,
            base_path: base_path.into(),
        }
    }

    #[test]
    fn api_base_normalizes_legacy_paths() {
        assert_eq!(
            api_base_url(&location("/EndevorService/rest")),
            "http://host:8080/EndevorService/api/v2"
        );
        assert_eq!(
            api_base_url(&location("/EndevorService/api/v1/")),
            "http://host:8080/EndevorService/api/v2"
        );
    }

    #[test]
    fn api_base_keeps_other_paths() {
        assert_eq!(
            api_base_url(&location("/custom/path/")),
            "http://host:8080/custom/path"
        );
    }

    #[test]
    fn element_url_follows_the_canonical_layout() {
        let address = ElementAddress {
            environment: "DEV".into(),
            stage_number: StageNumber::One,
            system: "SYS".into(),
            subsystem: "SUB".into(),
            element_type: "ASMMAC".into(),
            element: "MACRO".into(),
        };
        assert_eq!(
            element_url("http://host:8080/EndevorService/api/v2", "STC", &address),
            "http://host:8080/EndevorService/api/v2/STC/env/DEV/stgnum/1/sys/SYS/subsys/SUB/type/ASMMAC/ele/MACRO"
        );
        // Endpoint diagnostics use the path; it must be the URL minus its base.
        assert_eq!(
            element_url("http://host:8080/EndevorService/api/v2", "STC", &address),
            format!(
                "http://host:8080/EndevorService/api/v2{}",
                element_path("STC", &address)
            )
        );
    }

    #[test]
    fn dump_carries_both_sides() {
        let parms = serde_json::json!({ "environment": "DEV" });
        let body = RestResponseBody {
            return_code: 12,
            reason_code: 34,
            messages: vec!["API0034S".into()],
            data: vec![],
        };
        let text = dump(&parms, &body);
        assert!(text.contains("\"environment\": \"DEV\""));
        assert!(text.contains("\"returnCode\": 12"));
        assert!(text.contains("API0034S"));
    }
}
