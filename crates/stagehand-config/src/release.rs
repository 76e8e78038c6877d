use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::multi_stage::{MultiStageTestConfiguration, MultiStageTestConfigurationLiteral};

/// A build configuration. Only the test list is interpreted; every other
/// top-level field is preserved as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReleaseBuildConfiguration {
  #[serde(default)]
  pub tests: Vec<TestStepConfiguration>,

  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// One test entry of a build configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestStepConfiguration {
  /// Test name, e.g. "e2e-aws"
  #[serde(rename = "as")]
  pub as_name: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub commands: Option<String>,

  /// Multi-stage test as authored.
  #[serde(rename = "steps", default, skip_serializing_if = "Option::is_none")]
  pub multi_stage: Option<MultiStageTestConfiguration>,

  /// Multi-stage test after resolution.
  #[serde(rename = "literal_steps", default, skip_serializing_if = "Option::is_none")]
  pub multi_stage_literal: Option<MultiStageTestConfigurationLiteral>,

  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_unknown_fields_round_trip() {
    let input = serde_json::json!({
      "build_root": {"image_stream_tag": {"name": "release"}},
      "tests": [
        {"as": "unit", "commands": "make test", "container": {"from": "src"}},
        {"as": "e2e", "steps": {"workflow": "ipi"}}
      ]
    });

    let config: ReleaseBuildConfiguration = serde_json::from_value(input.clone()).unwrap();
    assert_eq!(config.tests.len(), 2);
    assert!(config.tests[0].multi_stage.is_none());
    assert!(config.tests[1].multi_stage.is_some());
    assert_eq!(config.tests[0].extra["container"]["from"], "src");

    assert_eq!(serde_json::to_value(&config).unwrap(), input);
  }
}
