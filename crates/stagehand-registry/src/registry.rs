use std::collections::HashMap;

use async_trait::async_trait;
use stagehand_config::{LiteralTestStep, MultiStageTestConfiguration, TestStep};

use crate::document::{DocumentKind, RegistryDocument};
use crate::error::RegistryError;

/// Literal steps by name.
pub type ReferenceByName = HashMap<String, LiteralTestStep>;

/// Chains by name. A chain's steps may themselves be chain references.
pub type ChainByName = HashMap<String, Vec<TestStep>>;

/// Workflows by name.
pub type WorkflowByName = HashMap<String, MultiStageTestConfiguration>;

/// The three registry tables.
///
/// Names are matched exactly and case-sensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
  steps: ReferenceByName,
  chains: ChainByName,
  workflows: WorkflowByName,
}

impl Registry {
  pub fn new(steps: ReferenceByName, chains: ChainByName, workflows: WorkflowByName) -> Self {
    Self {
      steps,
      chains,
      workflows,
    }
  }

  pub fn steps(&self) -> &ReferenceByName {
    &self.steps
  }

  pub fn chains(&self) -> &ChainByName {
    &self.chains
  }

  pub fn workflows(&self) -> &WorkflowByName {
    &self.workflows
  }

  /// Take the tables apart.
  pub fn into_parts(self) -> (ReferenceByName, ChainByName, WorkflowByName) {
    (self.steps, self.chains, self.workflows)
  }

  /// Add a document to the matching table, rejecting names already taken.
  pub fn insert(&mut self, document: RegistryDocument) -> Result<(), RegistryError> {
    let kind = document.kind();
    let name = document.name().to_string();
    let taken = match kind {
      DocumentKind::Reference => self.steps.contains_key(&name),
      DocumentKind::Chain => self.chains.contains_key(&name),
      DocumentKind::Workflow => self.workflows.contains_key(&name),
    };
    if taken {
      return Err(RegistryError::DuplicateName { kind, name });
    }

    match document {
      RegistryDocument::Ref(step) => {
        self.steps.insert(name, step);
      }
      RegistryDocument::Chain(chain) => {
        self.chains.insert(name, chain.steps);
      }
      RegistryDocument::Workflow(workflow) => {
        self.workflows.insert(name, workflow.steps);
      }
    }
    Ok(())
  }
}

/// Source of registry tables (filesystem, embedded fixtures, ...).
#[async_trait]
pub trait RegistrySource: Send + Sync {
  /// Build a fresh registry from this source.
  async fn load(&self) -> Result<Registry, RegistryError>;
}
