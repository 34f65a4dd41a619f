//! ACM dependency resolution.
//!
//! An element's first-level component graph is fetched in one ACM query,
//! then every component's content is retrieved concurrently. Failures are
//! isolated per branch: one unresolvable dependency leaves its slot
//! marked absent without disturbing the others.

use reqwest::header::ACCEPT;

use endevor_types::{
    DependentElementAddress, ElementAddress, ElementWithDependencies, Service,
};

use crate::schema::{self, ComponentRecord, ComponentsRecord, RestResponseBody};
use crate::{rest, EndevorClient};

/// ACM exclusion flags, sent as the upstream client always sent them.
/// The service is known to ignore these in practice; the request shape is
/// kept for compatibility rather than corrected.
const ACM_FLAGS: [(&str, &str); 3] = [
    ("excCirculars", "yes"),
    ("excIndirect", "no"),
    ("excRelated", "no"),
];

impl EndevorClient {
    /// Retrieve an element together with its first-level dependencies.
    ///
    /// The base element is fetched first; if it is absent the whole
    /// operation is absent and no dependency work starts. Dependency
    /// failures never propagate: an unavailable dependency list degrades
    /// to an empty sequence, and each listed dependency resolves to its
    /// content or an explicit `None`, in listing order.
    ///
    /// Dependencies of dependencies are not fetched.
    pub async fn retrieve_element_with_dependencies(
        &self,
        service: &Service,
        address: &ElementAddress,
    ) -> Option<ElementWithDependencies> {
        let content = self.retrieve_element(service, address).await?;
        let dependencies = self.retrieve_dependencies(service, address).await;
        Some(ElementWithDependencies {
            content,
            dependencies,
        })
    }

    /// Resolve content for every validated dependency of an element.
    async fn retrieve_dependencies(
        &self,
        service: &Service,
        address: &ElementAddress,
    ) -> Vec<(DependentElementAddress, Option<String>)> {
        let dependent = self.retrieve_dependent_addresses(service, address).await;
        // Endevor pads component lists with blank element names; those are
        // filler entries, not dependencies.
        let dependent: Vec<DependentElementAddress> = dependent
            .into_iter()
            .filter(|dependency| !dependency.element.trim().is_empty())
            .collect();

        // Concurrent fan-out; join_all keeps listing order regardless of
        // completion order, and a failed branch resolves to None.
        let retrievals = dependent.iter().map(|dependency| {
            let dependency_address = ElementAddress::from(dependency);
            async move { self.retrieve_element(service, &dependency_address).await }
        });
        let contents = futures::future::join_all(retrievals).await;

        dependent.into_iter().zip(contents).collect()
    }

    /// Query the ACM component list for an element.
    ///
    /// Any failure (connection, non-zero return code, empty data, or a
    /// malformed component list) degrades to an empty list; individual
    /// component entries that fail validation are dropped silently.
    async fn retrieve_dependent_addresses(
        &self,
        service: &Service,
        address: &ElementAddress,
    ) -> Vec<DependentElementAddress> {
        let base = rest::api_base_url(&service.location);
        let url = format!(
            "{}/acm",
            rest::element_url(&base, &service.configuration, address)
        );
        let mut request_parms = serde_json::json!({
            "environment": address.environment,
            "stage-number": address.stage_number,
            "system": address.system,
            "subsystem": address.subsystem,
            "type": address.element_type,
            "element": address.element,
        });
        for (flag, value) in ACM_FLAGS {
            request_parms[flag] = serde_json::json!(value);
        }

        let resp = match self.retry.send(|| {
            rest::bind_credential(
                self.http
                    .get(&url)
                    .query(&ACM_FLAGS)
                    .header(ACCEPT, "application/json"),
                &service.credential,
            )
            .send()
        })
        .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!("unable to retrieve element {address} dependencies: {e}");
                return Vec::new();
            }
        };

        let envelope: RestResponseBody = rest::read_envelope(resp).await;
        if envelope.return_code != 0 || envelope.data.is_empty() {
            // Partial dependency data is tolerable; warn and move on.
            tracing::warn!(
                "unable to retrieve element {address} dependencies: query got RC={}\n{}",
                envelope.return_code,
                rest::dump(&request_parms, &envelope)
            );
            return Vec::new();
        }

        let components = match schema::decode::<ComponentsRecord>(
            "element components",
            envelope.data[0].clone(),
        ) {
            Ok(record) => record.components,
            Err(e) => {
                tracing::warn!("unable to retrieve element {address} dependencies: {e}");
                return Vec::new();
            }
        };

        components
            .into_iter()
            .filter_map(|raw| {
                schema::decode::<ComponentRecord>("dependent element", raw).ok()
            })
            .map(DependentElementAddress::from)
            .collect()
    }
}
