//! Credential probing.
//!
//! There is no dedicated authentication endpoint; the probe lists
//! environments with a wildcard and inspects how the service reacts.

use reqwest::header::ACCEPT;

use endevor_types::Service;

use crate::schema::{self, RestResponseBody};
use crate::{rest, EndevorClient};

/// Diagnostic token the service embeds in its messages when a userid or
/// password is rejected.
const INVALID_CREDENTIAL_DIAGNOSTIC: &str = "API0034S";

impl EndevorClient {
    /// Probe the service to confirm a credential is usable.
    ///
    /// Calls `GET {base}/{configuration}/env/*` and reduces the outcome:
    /// - non-zero return code with [`INVALID_CREDENTIAL_DIAGNOSTIC`] in
    ///   the messages → `false`
    /// - any connection-level failure → `false`
    /// - everything else → `true`
    pub async fn validate_credential(&self, service: &Service) -> bool {
        let base = rest::api_base_url(&service.location);
        let url = format!("{base}/{}/env/*", service.configuration);
        let request_parms = serde_json::json!({ "environment": "*" });
        let hostname = service.location.hostname.as_str();
        let port = service.location.port;

        let resp = match self.retry.send(|| {
            rest::bind_credential(
                self.http.get(&url).header(ACCEPT, "application/json"),
                &service.credential,
            )
            .send()
        })
        .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!(hostname, port, "unable to authorize: {e}");
                return false;
            }
        };

        let raw: serde_json::Value = match resp.json().await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(hostname, port, "unable to read authorization response: {e}");
                return false;
            }
        };
        let envelope: RestResponseBody = match schema::decode("response body", raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(hostname, port, "unable to read authorization response: {e}");
                return false;
            }
        };

        if envelope.return_code != 0
            && envelope
                .messages
                .concat()
                .contains(INVALID_CREDENTIAL_DIAGNOSTIC)
        {
            tracing::error!(
                hostname,
                port,
                return_code = envelope.return_code,
                "invalid credential detected\n{}",
                rest::dump(&request_parms, &envelope)
            );
            return false;
        }

        // Kept for compatibility, odd as it is: a non-zero return code
        // without the diagnostic token (e.g. the wildcard probe itself
        // being rejected) still reports the credential as usable.
        true
    }
}
