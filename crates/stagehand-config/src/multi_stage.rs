use serde::{Deserialize, Serialize};

use crate::step::{LiteralTestStep, TestStep};

/// A multi-stage test as authored, possibly referring to registry content.
///
/// Each phase is either absent (`None`) or present, possibly empty. An absent
/// phase is filled from the named workflow during resolution; a present one
/// never is. The same type describes workflows stored in the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiStageTestConfiguration {
  /// Cluster profile to provision. Empty means unset.
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub cluster_profile: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pre: Option<Vec<TestStep>>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub test: Option<Vec<TestStep>>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub post: Option<Vec<TestStep>>,

  /// Name of a registry workflow supplying defaults.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub workflow: Option<String>,
}

/// A fully resolved multi-stage test. No phase contains references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiStageTestConfigurationLiteral {
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub cluster_profile: String,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub pre: Vec<LiteralTestStep>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub test: Vec<LiteralTestStep>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub post: Vec<LiteralTestStep>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_absent_and_empty_phases_are_distinct() {
    let config: MultiStageTestConfiguration =
      serde_json::from_str(r#"{"workflow": "ipi", "pre": [], "test": [{"ref": "e2e"}]}"#).unwrap();

    assert_eq!(config.workflow.as_deref(), Some("ipi"));
    assert_eq!(config.pre, Some(vec![]));
    assert_eq!(config.test, Some(vec![TestStep::reference("e2e")]));
    assert_eq!(config.post, None);
  }

  #[test]
  fn test_empty_phase_survives_serialization() {
    let config = MultiStageTestConfiguration {
      pre: Some(vec![]),
      ..Default::default()
    };

    let value = serde_json::to_value(&config).unwrap();
    assert_eq!(value, serde_json::json!({"pre": []}));
  }
}
