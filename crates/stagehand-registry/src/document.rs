use std::fmt;

use serde::{Deserialize, Serialize};
use stagehand_config::{LiteralTestStep, MultiStageTestConfiguration, TestStep};

/// The content of a single registry file.
///
/// ```json
/// {"ref": {"as": "ipi-install", "from": "installer", "commands": "..."}}
/// {"chain": {"as": "ipi-setup", "steps": [{"ref": "ipi-install"}]}}
/// {"workflow": {"as": "ipi", "steps": {"pre": [{"chain": "ipi-setup"}]}}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryDocument {
  Ref(LiteralTestStep),
  Chain(ChainDefinition),
  Workflow(WorkflowDefinition),
}

impl RegistryDocument {
  pub fn kind(&self) -> DocumentKind {
    match self {
      RegistryDocument::Ref(_) => DocumentKind::Reference,
      RegistryDocument::Chain(_) => DocumentKind::Chain,
      RegistryDocument::Workflow(_) => DocumentKind::Workflow,
    }
  }

  /// The name this document registers under.
  pub fn name(&self) -> &str {
    match self {
      RegistryDocument::Ref(step) => &step.as_name,
      RegistryDocument::Chain(chain) => &chain.as_name,
      RegistryDocument::Workflow(workflow) => &workflow.as_name,
    }
  }
}

/// A named, ordered list of steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainDefinition {
  #[serde(rename = "as")]
  pub as_name: String,
  pub steps: Vec<TestStep>,
}

/// A named multi-stage template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
  #[serde(rename = "as")]
  pub as_name: String,
  pub steps: MultiStageTestConfiguration,
}

/// Which table a registry document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
  Reference,
  Chain,
  Workflow,
}

impl DocumentKind {
  const ALL: [DocumentKind; 3] = [
    DocumentKind::Reference,
    DocumentKind::Chain,
    DocumentKind::Workflow,
  ];

  /// File name suffix for documents of this kind.
  pub fn suffix(self) -> &'static str {
    match self {
      DocumentKind::Reference => "-ref.json",
      DocumentKind::Chain => "-chain.json",
      DocumentKind::Workflow => "-workflow.json",
    }
  }

  /// Split a file name like "ipi-install-ref.json" into its kind and name.
  pub fn from_file_name(file_name: &str) -> Option<(DocumentKind, &str)> {
    Self::ALL.into_iter().find_map(|kind| {
      file_name
        .strip_suffix(kind.suffix())
        .filter(|name| !name.is_empty())
        .map(|name| (kind, name))
    })
  }
}

impl fmt::Display for DocumentKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DocumentKind::Reference => write!(f, "step reference"),
      DocumentKind::Chain => write!(f, "chain"),
      DocumentKind::Workflow => write!(f, "workflow"),
    }
  }
}
