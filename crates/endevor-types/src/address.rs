//! # Element Addressing
//!
//! Endevor stores versioned artifacts ("elements") addressed by
//! environment / stage / system / subsystem / type / name within a named
//! configuration (instance). These types carry that addressing plus the
//! results the retrieval engine assembles from it.

use serde::{Deserialize, Serialize};

/// One of the two ordered promotion levels within an environment.
///
/// The wire format is the string `"1"` or `"2"`; anything else is rejected
/// at deserialization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageNumber {
    /// Stage `"1"`, the entry stage of an environment.
    #[serde(rename = "1")]
    One,
    /// Stage `"2"`, the promoted stage of an environment.
    #[serde(rename = "2")]
    Two,
}

impl StageNumber {
    /// Parse a stage number from its wire representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "1" => Some(Self::One),
            "2" => Some(Self::Two),
            _ => None,
        }
    }

    /// The wire representation of the stage number.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::One => "1",
            Self::Two => "2",
        }
    }
}

impl std::fmt::Display for StageNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full address of one element within a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementAddress {
    /// Environment name, e.g. `DEV`.
    pub environment: String,
    /// Stage number within the environment.
    pub stage_number: StageNumber,
    /// System name.
    pub system: String,
    /// Subsystem name.
    pub subsystem: String,
    /// Element type name, e.g. `COBOL` or `ASMMAC`.
    pub element_type: String,
    /// Element name.
    pub element: String,
}

impl std::fmt::Display for ElementAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.system, self.subsystem, self.element_type, self.element
        )
    }
}

/// The address of a dependency-graph node returned by an ACM query.
///
/// Shaped like [`ElementAddress`] without file-extension metadata. Endevor
/// is known to return component entries whose element name is blank or
/// whitespace-only; those entries are filler, not real dependencies, and
/// are filtered out before any retrieval is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependentElementAddress {
    /// Environment name.
    pub environment: String,
    /// Stage number within the environment.
    pub stage_number: StageNumber,
    /// System name.
    pub system: String,
    /// Subsystem name.
    pub subsystem: String,
    /// Element type name.
    pub element_type: String,
    /// Element name; may be blank in raw ACM output.
    pub element: String,
}

impl From<&DependentElementAddress> for ElementAddress {
    fn from(dependency: &DependentElementAddress) -> Self {
        Self {
            environment: dependency.environment.clone(),
            stage_number: dependency.stage_number,
            system: dependency.system.clone(),
            subsystem: dependency.subsystem.clone(),
            element_type: dependency.element_type.clone(),
            element: dependency.element.clone(),
        }
    }
}

/// One element record from a listing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Where the element lives.
    pub address: ElementAddress,
    /// File extension Endevor associates with the element type.
    pub file_ext: String,
}

/// A search scope for element listing. Unset components default to the
/// `*` wildcard; an unset stage number defaults to stage 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSearchLocation {
    /// Environment name, or any environment when `None`.
    pub environment: Option<String>,
    /// Stage number, or stage 1 when `None`.
    pub stage_number: Option<StageNumber>,
    /// System name, or any system when `None`.
    pub system: Option<String>,
    /// Subsystem name, or any subsystem when `None`.
    pub subsystem: Option<String>,
    /// Element type name, or any type when `None`.
    pub element_type: Option<String>,
}

/// A successfully retrieved element.
///
/// Only ever constructed when both the content and the fingerprint are
/// present; a retrieval response missing either is reported as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedElement {
    /// The element body.
    pub content: String,
    /// Opaque version token required to authorize a subsequent update.
    pub fingerprint: String,
}

/// An element together with its resolved first-level dependencies.
///
/// The dependency sequence preserves the order of the upstream ACM listing.
/// Each entry carries the dependency's content, or `None` when that one
/// retrieval failed — a failed dependency never removes the entry or aborts
/// the assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementWithDependencies {
    /// The base element itself, as the body text a retrieval delivers;
    /// named to mirror [`RetrievedElement::content`].
    pub content: String,
    /// Dependency addresses paired with their content, in listing order.
    pub dependencies: Vec<(DependentElementAddress, Option<String>)>,
}

/// Everything required to authorize and perform an element update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateParams {
    /// Version token from the retrieval that produced `content`.
    pub fingerprint: String,
    /// The new element body.
    pub content: String,
    /// Change-control identifier.
    pub ccid: String,
    /// Change-control comment.
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_number_parses_wire_values() {
        assert_eq!(StageNumber::parse("1"), Some(StageNumber::One));
        assert_eq!(StageNumber::parse("2"), Some(StageNumber::Two));
        assert_eq!(StageNumber::parse("3"), None);
        assert_eq!(StageNumber::parse(""), None);
    }

    #[test]
    fn stage_number_serializes_as_string() {
        assert_eq!(serde_json::to_string(&StageNumber::One).unwrap(), "\"1\"");
        assert_eq!(serde_json::to_string(&StageNumber::Two).unwrap(), "\"2\"");
    }

    #[test]
    fn stage_number_rejects_out_of_range() {
        assert!(serde_json::from_str::<StageNumber>("\"3\"").is_err());
        assert!(serde_json::from_str::<StageNumber>("\"\"").is_err());
        assert!(serde_json::from_str::<StageNumber>("1").is_err());
    }

    #[test]
    fn dependency_converts_to_element_address() {
        let dependency = DependentElementAddress {
            environment: "SMPLPROD".into(),
            stage_number: StageNumber::One,
            system: "FINANCE".into(),
            subsystem: "ACCTREC".into(),
            element_type: "COPY".into(),
            element: "TESTCOP1".into(),
        };
        let address = ElementAddress::from(&dependency);
        assert_eq!(address.environment, "SMPLPROD");
        assert_eq!(address.element, "TESTCOP1");
        assert_eq!(address.stage_number, StageNumber::One);
    }

    #[test]
    fn element_address_display_names_the_element() {
        let address = ElementAddress {
            environment: "DEV".into(),
            stage_number: StageNumber::One,
            system: "SYS".into(),
            subsystem: "SUB".into(),
            element_type: "ASMMAC".into(),
            element: "MACRO".into(),
        };
        assert_eq!(address.to_string(), "SYS/SUB/ASMMAC/MACRO");
    }
}
