//! Element operations: listing, retrieval, printing, and update.

use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};

use endevor_types::{
    Element, ElementAddress, ElementSearchLocation, RetrievedElement, Service, StageNumber,
    UpdateParams,
};

use crate::error::EndevorApiError;
use crate::schema::{self, ElementRecord, RestResponseBody};
use crate::{rest, EndevorClient};

/// Wildcard for unspecified address components.
const ANY: &str = "*";

/// Listing flags: minimal element data, search up the Endevor map, and
/// only the first occurrence of each element in the map.
const LIST_FLAGS: [(&str, &str); 3] = [("data", "BAS"), ("search", "yes"), ("return", "FIR")];

/// Response header carrying the element version token.
const FINGERPRINT_HEADER: &str = "fingerprint";

fn element_request_parms(address: &ElementAddress) -> serde_json::Value {
    serde_json::json!({
        "environment": address.environment,
        "stage-number": address.stage_number,
        "system": address.system,
        "subsystem": address.subsystem,
        "type": address.element_type,
        "element": address.element,
    })
}

impl EndevorClient {
    /// List elements within a search scope, applying the `*` wildcard to
    /// any unspecified component and defaulting the stage number to 1.
    ///
    /// Unlike the retrieval paths, a non-zero return code here surfaces as
    /// an [`EndevorApiError::Api`] carrying the request parameters and the
    /// full response — callers of the listing flow handle errors.
    pub async fn search_for_elements(
        &self,
        service: &Service,
        search: &ElementSearchLocation,
    ) -> Result<Vec<Element>, EndevorApiError> {
        let environment = search.environment.as_deref().unwrap_or(ANY);
        let stage_number = search.stage_number.map_or("1", StageNumber::as_str);
        let system = search.system.as_deref().unwrap_or(ANY);
        let subsystem = search.subsystem.as_deref().unwrap_or(ANY);
        let element_type = search.element_type.as_deref().unwrap_or(ANY);

        let base = rest::api_base_url(&service.location);
        let path = format!(
            "{}/env/{environment}/stgnum/{stage_number}/sys/{system}/subsys/{subsystem}/type/{element_type}/ele/{ANY}",
            service.configuration
        );
        let url = format!("{base}/{path}");
        let endpoint = format!("GET /{path}");

        let request_parms = serde_json::json!({
            "environment": environment,
            "stage-number": stage_number,
            "system": system,
            "subsystem": subsystem,
            "type": element_type,
            "element": ANY,
            "data": "BAS",
            "search": "yes",
            "return": "FIR",
        });

        let resp = self.retry.send(|| {
            rest::bind_credential(
                self.http
                    .get(&url)
                    .query(&LIST_FLAGS)
                    .header(ACCEPT, "application/json"),
                &service.credential,
            )
            .send()
        })
        .await
        .map_err(|e| EndevorApiError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        let raw: serde_json::Value =
            resp.json().await.map_err(|e| EndevorApiError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;
        let envelope: RestResponseBody = schema::decode("response body", raw)?;

        if envelope.return_code != 0 {
            tracing::error!("{}", envelope.messages.join("\n").trim());
            return Err(EndevorApiError::Api {
                endpoint,
                return_code: envelope.return_code,
                reason_code: envelope.reason_code,
                detail: rest::dump(&request_parms, &envelope),
            });
        }

        let records: Vec<ElementRecord> =
            schema::decode("element list", serde_json::Value::Array(envelope.data))?;
        Ok(records.into_iter().map(Element::from).collect())
    }

    /// Retrieve one element with its fingerprint.
    ///
    /// Success requires all three of: a zero return code, a non-empty
    /// body, and a `fingerprint` response header. Missing any one yields
    /// `None` after logging — a [`RetrievedElement`] is never constructed
    /// partially.
    pub async fn retrieve_element_with_fingerprint(
        &self,
        service: &Service,
        address: &ElementAddress,
    ) -> Option<RetrievedElement> {
        let base = rest::api_base_url(&service.location);
        let url = rest::element_url(&base, &service.configuration, address);
        let mut request_parms = element_request_parms(address);
        request_parms["signout"] = serde_json::json!("no");

        let resp = match self.retry.send(|| {
            rest::bind_credential(
                self.http
                    .get(&url)
                    .query(&[("signout", "no")])
                    .header(ACCEPT, "application/octet-stream"),
                &service.credential,
            )
            .send()
        })
        .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!("unable to retrieve element {address}: {e}");
                return None;
            }
        };

        if !resp.status().is_success() {
            let envelope = rest::read_envelope(resp).await;
            tracing::error!(
                "unable to retrieve element {address}: retrieve got RC={}\n{}",
                envelope.return_code,
                rest::dump(&request_parms, &envelope)
            );
            return None;
        }

        // Read the header before the body consumes the response.
        let fingerprint = resp
            .headers()
            .get(FINGERPRINT_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let content = match resp.text().await {
            Ok(content) => content,
            Err(e) => {
                tracing::error!("unable to read element {address} content: {e}");
                return None;
            }
        };
        if content.is_empty() {
            tracing::error!("unable to retrieve element {address}: empty content returned");
            return None;
        }
        let Some(fingerprint) = fingerprint else {
            tracing::error!("unable to retrieve element {address}: no fingerprint returned");
            return None;
        };

        Some(RetrievedElement {
            content,
            fingerprint,
        })
    }

    /// Retrieve one element's content, discarding the fingerprint.
    pub async fn retrieve_element(
        &self,
        service: &Service,
        address: &ElementAddress,
    ) -> Option<String> {
        self.retrieve_element_with_fingerprint(service, address)
            .await
            .map(|retrieved| retrieved.content)
    }

    /// Print (browse) one element's text without requiring a fingerprint.
    ///
    /// A non-zero return code or an empty body yields `None` after
    /// logging.
    pub async fn print_element(
        &self,
        service: &Service,
        address: &ElementAddress,
    ) -> Option<String> {
        let base = rest::api_base_url(&service.location);
        let url = rest::element_url(&base, &service.configuration, address);
        let request_parms = element_request_parms(address);

        let resp = match self.retry.send(|| {
            rest::bind_credential(
                self.http.get(&url).header(ACCEPT, "application/octet-stream"),
                &service.credential,
            )
            .send()
        })
        .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!("unable to print element {address}: {e}");
                return None;
            }
        };

        if !resp.status().is_success() {
            let envelope = rest::read_envelope(resp).await;
            tracing::error!(
                "unable to print element {address}: print got RC={}\n{}",
                envelope.return_code,
                rest::dump(&request_parms, &envelope)
            );
            return None;
        }

        match resp.text().await {
            Ok(content) if !content.is_empty() => Some(content),
            Ok(_) => {
                tracing::error!("unable to print element {address}: empty content returned");
                None
            }
            Err(e) => {
                tracing::error!("unable to read element {address} content: {e}");
                None
            }
        }
    }

    /// Update an element with new content under change control.
    ///
    /// Requires the fingerprint from the retrieval that produced the
    /// content being replaced. A non-zero return code surfaces as
    /// [`EndevorApiError::Api`]; a connection-level failure is logged in
    /// detail and surfaces as the generic [`EndevorApiError::Upload`].
    pub async fn update_element(
        &self,
        service: &Service,
        address: &ElementAddress,
        params: &UpdateParams,
    ) -> Result<(), EndevorApiError> {
        let base = rest::api_base_url(&service.location);
        let url = rest::element_url(&base, &service.configuration, address);
        let endpoint = format!(
            "PUT {}",
            rest::element_path(&service.configuration, address)
        );

        let form = Form::new()
            .text("ccid", params.ccid.clone())
            .text("comment", params.comment.clone())
            .text("fingerprint", params.fingerprint.clone())
            .part(
                "fromFile",
                Part::bytes(params.content.clone().into_bytes())
                    .file_name(address.element.clone()),
            );

        // No retry here: the multipart form is consumed by the request.
        let resp = match rest::bind_credential(self.http.put(&url), &service.credential)
            .multipart(form)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::trace!("element {address} cannot be uploaded because of: {e}");
                return Err(EndevorApiError::Upload {
                    element: address.to_string(),
                });
            }
        };

        let envelope = rest::read_envelope(resp).await;
        if envelope.return_code != 0 {
            tracing::trace!("{}", envelope.messages.join("\n").trim());
            let mut request_parms = element_request_parms(address);
            request_parms["ccid"] = serde_json::json!(params.ccid);
            request_parms["comment"] = serde_json::json!(params.comment);
            request_parms["fingerprint"] = serde_json::json!(params.fingerprint);
            return Err(EndevorApiError::Api {
                endpoint,
                return_code: envelope.return_code,
                reason_code: envelope.reason_code,
                detail: rest::dump(&request_parms, &envelope),
            });
        }
        Ok(())
    }
}
