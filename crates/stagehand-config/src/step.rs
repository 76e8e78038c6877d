use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::TestStepError;

/// A fully resolved test step.
///
/// Only `as` matters to resolution; it names the step and must be unique
/// within a resolved phase. The remaining fields describe what the step runs
/// and are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralTestStep {
  /// Step name, e.g. "ipi-install"
  #[serde(rename = "as")]
  pub as_name: String,

  /// Image the step runs in.
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub from: String,

  /// Shell script executed by the step.
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub commands: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub artifact_dir: Option<String>,

  #[serde(default, skip_serializing_if = "ResourceRequirements::is_empty")]
  pub resources: ResourceRequirements,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub credentials: Vec<CredentialReference>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub env: Vec<StepParameter>,
}

impl LiteralTestStep {
  /// Create a step with only its name set.
  pub fn named(as_name: impl Into<String>) -> Self {
    Self {
      as_name: as_name.into(),
      ..Default::default()
    }
  }
}

/// Resource requests and limits, keyed by resource name (e.g. "cpu").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequirements {
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub requests: BTreeMap<String, String>,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub limits: BTreeMap<String, String>,
}

impl ResourceRequirements {
  pub fn is_empty(&self) -> bool {
    self.requests.is_empty() && self.limits.is_empty()
  }
}

/// A secret mounted into the step's container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialReference {
  pub namespace: String,
  pub name: String,
  pub mount_path: String,
}

/// An environment variable the step exposes as a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepParameter {
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub default: Option<String>,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub documentation: String,
}

/// A step as written by users: a registry reference, a chain reference, or an
/// inline literal step.
///
/// On the wire this is `{"ref": "name"}`, `{"chain": "name"}` or the fields of
/// a [`LiteralTestStep`] directly. Exactly one form must be present.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawTestStep")]
pub enum TestStep {
  /// Name of a step in the registry.
  Reference(String),
  /// Name of a chain in the registry.
  Chain(String),
  /// A step given inline.
  Literal(LiteralTestStep),
}

impl TestStep {
  pub fn reference(name: impl Into<String>) -> Self {
    Self::Reference(name.into())
  }

  pub fn chain(name: impl Into<String>) -> Self {
    Self::Chain(name.into())
  }

  pub fn literal(step: LiteralTestStep) -> Self {
    Self::Literal(step)
  }
}

impl Serialize for TestStep {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      TestStep::Reference(name) => {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("ref", name)?;
        map.end()
      }
      TestStep::Chain(name) => {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("chain", name)?;
        map.end()
      }
      TestStep::Literal(step) => step.serialize(serializer),
    }
  }
}

/// Wire form of a step. Every key other than `ref` and `chain` belongs to
/// the inline literal step.
#[derive(Deserialize)]
struct RawTestStep {
  #[serde(rename = "ref", default)]
  reference: Option<String>,
  #[serde(default)]
  chain: Option<String>,
  #[serde(flatten)]
  literal: Map<String, Value>,
}

impl TryFrom<RawTestStep> for TestStep {
  type Error = TestStepError;

  fn try_from(raw: RawTestStep) -> Result<Self, Self::Error> {
    let has_literal = !raw.literal.is_empty();
    match (raw.reference, raw.chain, has_literal) {
      (Some(name), None, false) => Ok(TestStep::Reference(name)),
      (None, Some(name), false) => Ok(TestStep::Chain(name)),
      (None, None, true) => serde_json::from_value(Value::Object(raw.literal))
        .map(TestStep::Literal)
        .map_err(|err| TestStepError::InvalidLiteral {
          message: err.to_string(),
        }),
      (None, None, false) => Err(TestStepError::Empty),
      (reference, chain, _) => {
        let mut fields = Vec::new();
        if reference.is_some() {
          fields.push("ref");
        }
        if chain.is_some() {
          fields.push("chain");
        }
        if has_literal {
          fields.push("literal");
        }
        Err(TestStepError::Ambiguous { fields })
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_reference() {
    let step: TestStep = serde_json::from_str(r#"{"ref": "ipi-install"}"#).unwrap();
    assert_eq!(step, TestStep::reference("ipi-install"));
  }

  #[test]
  fn test_parse_chain() {
    let step: TestStep = serde_json::from_str(r#"{"chain": "ipi-setup"}"#).unwrap();
    assert_eq!(step, TestStep::chain("ipi-setup"));
  }

  #[test]
  fn test_parse_literal() {
    let step: TestStep = serde_json::from_str(
      r#"{"as": "e2e", "from": "tests", "commands": "make e2e", "resources": {"requests": {"cpu": "100m"}}}"#,
    )
    .unwrap();

    match step {
      TestStep::Literal(literal) => {
        assert_eq!(literal.as_name, "e2e");
        assert_eq!(literal.from, "tests");
        assert_eq!(literal.commands, "make e2e");
        assert_eq!(literal.resources.requests["cpu"], "100m");
      }
      other => panic!("expected literal step, got {:?}", other),
    }
  }

  #[test]
  fn test_parse_empty_step_fails() {
    let result: Result<TestStep, _> = serde_json::from_str("{}");
    let err = result.unwrap_err();
    assert!(err.to_string().contains("all absent"));
  }

  #[test]
  fn test_parse_ambiguous_step_fails() {
    let result: Result<TestStep, _> = serde_json::from_str(r#"{"ref": "a", "chain": "b"}"#);
    let err = result.unwrap_err();
    assert!(err.to_string().contains("ref, chain"));
  }

  #[test]
  fn test_reference_with_inline_literal_is_ambiguous() {
    let result: Result<TestStep, _> = serde_json::from_str(r#"{"ref": "a", "as": "b"}"#);
    assert!(result.is_err());
  }

  #[test]
  fn test_reference_with_unnamed_inline_fields_is_ambiguous() {
    let result: Result<TestStep, _> =
      serde_json::from_str(r#"{"ref": "a", "from": "img", "commands": "make"}"#);
    let err = result.unwrap_err();
    assert!(err.to_string().contains("found: ref, literal"));
  }

  #[test]
  fn test_chain_with_inline_fields_is_ambiguous() {
    let raw: RawTestStep = serde_json::from_str(r#"{"chain": "setup", "commands": "make"}"#).unwrap();
    assert_eq!(
      TestStep::try_from(raw),
      Err(TestStepError::Ambiguous {
        fields: vec!["chain", "literal"]
      })
    );
  }

  #[test]
  fn test_parse_literal_reports_field_error() {
    let result: Result<TestStep, _> = serde_json::from_str(r#"{"as": "x", "commands": 5}"#);
    let err = result.unwrap_err().to_string();
    assert!(err.contains("invalid literal test step"));
    assert!(err.contains("invalid type"));
    assert!(!err.contains("all absent"));
  }

  #[test]
  fn test_parse_literal_without_name_fails() {
    let result: Result<TestStep, _> = serde_json::from_str(r#"{"from": "img"}"#);
    let err = result.unwrap_err().to_string();
    assert!(err.contains("missing field `as`"));
  }

  #[test]
  fn test_serialize_chain() {
    let value = serde_json::to_value(TestStep::chain("ipi-setup")).unwrap();
    assert_eq!(value, serde_json::json!({"chain": "ipi-setup"}));
  }

  #[test]
  fn test_serialize_reference() {
    let value = serde_json::to_value(TestStep::reference("ipi-install")).unwrap();
    assert_eq!(value, serde_json::json!({"ref": "ipi-install"}));
  }

  #[test]
  fn test_serialize_literal_skips_empty_fields() {
    let value = serde_json::to_value(TestStep::literal(LiteralTestStep::named("lint"))).unwrap();
    assert_eq!(value, serde_json::json!({"as": "lint"}));
  }
}
