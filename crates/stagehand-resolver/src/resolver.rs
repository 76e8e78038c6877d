use std::collections::HashSet;

use stagehand_config::{
  LiteralTestStep, MultiStageTestConfiguration, MultiStageTestConfigurationLiteral, TestStep,
};
use stagehand_registry::{ChainByName, ReferenceByName, Registry, WorkflowByName};
use tracing::{debug, instrument};

use crate::error::{AggregateError, ResolveError};

/// Resolver turns a multi-stage test into its literal form.
pub trait Resolver: Send + Sync {
  /// Resolve a multi-stage test configuration.
  ///
  /// This process:
  /// 1. Fills absent fields from the named workflow, if any
  /// 2. Unrolls chains and dereferences steps in every phase
  /// 3. Checks that step names are unique within each phase
  ///
  /// Problems found in the phases are reported together as one
  /// [`ResolveError::Aggregate`]; a missing workflow fails immediately.
  fn resolve(
    &self,
    config: MultiStageTestConfiguration,
  ) -> Result<MultiStageTestConfigurationLiteral, ResolveError>;
}

/// Resolver backed by in-memory registry tables.
///
/// The tables are owned and never modified, so one resolver can serve
/// concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct RegistryResolver {
  steps: ReferenceByName,
  chains: ChainByName,
  workflows: WorkflowByName,
}

/// A step left after chain unrolling.
#[derive(Debug, Clone, Copy)]
enum FlatStep<'a> {
  Reference(&'a str),
  Literal(&'a LiteralTestStep),
}

/// Outcome of unrolling one list of steps.
///
/// A chain missing at the current level aborts that level outright, dropping
/// the steps gathered so far. Failures in nested levels are only recorded.
enum Unrolled<'a> {
  Expanded {
    steps: Vec<FlatStep<'a>>,
    errors: Vec<ResolveError>,
  },
  Aborted(ResolveError),
}

impl RegistryResolver {
  /// Create a new resolver over the given tables.
  pub fn new(steps: ReferenceByName, chains: ChainByName, workflows: WorkflowByName) -> Self {
    Self {
      steps,
      chains,
      workflows,
    }
  }

  /// Turn one phase into literal steps, collecting every error found.
  fn process(&self, steps: &[TestStep]) -> (Vec<LiteralTestStep>, Vec<ResolveError>) {
    let (unrolled, mut errors) = match self.unroll_chains(steps, &mut Vec::new()) {
      Unrolled::Expanded { steps, errors } => (steps, errors),
      Unrolled::Aborted(err) => (Vec::new(), vec![err]),
    };

    let mut literal_steps = Vec::with_capacity(unrolled.len());
    for step in unrolled {
      match step {
        FlatStep::Literal(literal) => literal_steps.push(literal.clone()),
        FlatStep::Reference(name) => match self.dereference(name) {
          Ok(literal) => literal_steps.push(literal),
          Err(err) => errors.push(err),
        },
      }
    }

    errors.extend(check_for_duplicates(&literal_steps));
    (literal_steps, errors)
  }

  /// Expand chain references depth-first, keeping declaration order.
  ///
  /// `stack` holds the chains currently being expanded.
  fn unroll_chains<'a>(&'a self, input: &'a [TestStep], stack: &mut Vec<&'a str>) -> Unrolled<'a> {
    let mut steps = Vec::new();
    let mut errors = Vec::new();

    for step in input {
      let name = match step {
        TestStep::Chain(name) => name.as_str(),
        TestStep::Reference(name) => {
          steps.push(FlatStep::Reference(name));
          continue;
        }
        TestStep::Literal(literal) => {
          steps.push(FlatStep::Literal(literal));
          continue;
        }
      };

      if let Some(start) = stack.iter().position(|entry| *entry == name) {
        let mut path: Vec<String> = stack[start..].iter().map(|s| s.to_string()).collect();
        path.push(name.to_string());
        return Unrolled::Aborted(ResolveError::ChainCycle {
          name: name.to_string(),
          path,
        });
      }

      let Some(chain) = self.chains.get(name) else {
        return Unrolled::Aborted(ResolveError::UnknownChain {
          name: name.to_string(),
        });
      };

      stack.push(name);
      let nested = self.unroll_chains(chain, stack);
      stack.pop();

      match nested {
        Unrolled::Expanded {
          steps: nested_steps,
          errors: nested_errors,
        } => {
          steps.extend(nested_steps);
          errors.extend(nested_errors);
        }
        Unrolled::Aborted(err) => errors.push(err),
      }
    }

    Unrolled::Expanded { steps, errors }
  }

  /// Look up a referenced step.
  fn dereference(&self, name: &str) -> Result<LiteralTestStep, ResolveError> {
    self
      .steps
      .get(name)
      .cloned()
      .ok_or_else(|| ResolveError::InvalidReference {
        name: name.to_string(),
      })
  }
}

impl From<Registry> for RegistryResolver {
  fn from(registry: Registry) -> Self {
    let (steps, chains, workflows) = registry.into_parts();
    Self::new(steps, chains, workflows)
  }
}

impl Resolver for RegistryResolver {
  #[instrument(level = "debug", skip_all, fields(workflow = config.workflow.as_deref()))]
  fn resolve(
    &self,
    mut config: MultiStageTestConfiguration,
  ) -> Result<MultiStageTestConfigurationLiteral, ResolveError> {
    let workflow = match config.workflow.as_deref() {
      Some(name) => Some(self.workflows.get(name).ok_or_else(|| {
        ResolveError::NoSuchWorkflow {
          name: name.to_string(),
        }
      })?),
      None => None,
    };
    if let Some(workflow) = workflow {
      apply_workflow_defaults(&mut config, workflow);
    }

    let mut errors = Vec::new();
    let mut phase = |steps: Option<Vec<TestStep>>| {
      let (literal, phase_errors) = self.process(steps.as_deref().unwrap_or_default());
      errors.extend(phase_errors);
      literal
    };
    let pre = phase(config.pre);
    let test = phase(config.test);
    let post = phase(config.post);

    let errors = AggregateError::new(errors);
    if !errors.is_empty() {
      debug!(errors = errors.len(), "multi-stage test failed to resolve");
      return Err(errors.into());
    }

    debug!(
      pre = pre.len(),
      test = test.len(),
      post = post.len(),
      "resolved multi-stage test"
    );

    Ok(MultiStageTestConfigurationLiteral {
      cluster_profile: config.cluster_profile,
      pre,
      test,
      post,
    })
  }
}

/// Replace every unset field of `config` with the workflow's value.
///
/// A phase that is present, even if empty, is kept as is.
fn apply_workflow_defaults(
  config: &mut MultiStageTestConfiguration,
  workflow: &MultiStageTestConfiguration,
) {
  if config.cluster_profile.is_empty() {
    config.cluster_profile = workflow.cluster_profile.clone();
  }
  if config.pre.is_none() {
    config.pre = workflow.pre.clone();
  }
  if config.test.is_none() {
    config.test = workflow.test.clone();
  }
  if config.post.is_none() {
    config.post = workflow.post.clone();
  }
}

/// Report every step whose name was already used earlier in the list.
fn check_for_duplicates(steps: &[LiteralTestStep]) -> Vec<ResolveError> {
  let mut seen = HashSet::new();
  steps
    .iter()
    .filter(|step| !seen.insert(step.as_name.as_str()))
    .map(|step| ResolveError::DuplicateName {
      name: step.as_name.clone(),
    })
    .collect()
}
