//! Instance (configuration) discovery.

use reqwest::header::ACCEPT;

use endevor_types::ServiceLocation;

use crate::schema::{self, RepositoryRecord, RestResponseBody};
use crate::{rest, EndevorClient};

impl EndevorClient {
    /// List the configuration (instance) names a deployment hosts.
    ///
    /// Calls `GET {base}/` without credentials — the listing endpoint is
    /// unauthenticated. This call never fails to its caller: a connection
    /// failure, a non-zero return code, or a malformed body yields an
    /// empty list after logging the cause.
    pub async fn list_instances(&self, location: &ServiceLocation) -> Vec<String> {
        let base = rest::api_base_url(location);
        let url = format!("{base}/");

        let resp = match self.retry.send(|| {
            self.http
                .get(&url)
                .header(ACCEPT, "application/json")
                .send()
        })
        .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!(%url, "unable to list instances: {e}");
                return Vec::new();
            }
        };

        let status = resp.status().as_u16();
        let raw: serde_json::Value = match resp.json().await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(%url, status, "unable to read instance listing: {e}");
                return Vec::new();
            }
        };

        // A JSON object here is a failure envelope instead of the listing.
        if raw.is_object() {
            let envelope: RestResponseBody =
                schema::decode("response body", raw).unwrap_or_default();
            tracing::error!(
                %url,
                status,
                return_code = envelope.return_code,
                reason_code = envelope.reason_code,
                "unable to list instances"
            );
            return Vec::new();
        }

        match schema::decode::<Vec<RepositoryRecord>>("repository list", raw.clone()) {
            Ok(repositories) => repositories.into_iter().map(|r| r.name).collect(),
            Err(e) => {
                tracing::error!(actual = %raw, "unable to list instances: {e}");
                Vec::new()
            }
        }
    }
}
