use std::fmt;

use thiserror::Error;

/// Errors that can occur while resolving a multi-stage test.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
  /// The configuration names a workflow the registry doesn't have.
  #[error("no workflow named {name}")]
  NoSuchWorkflow { name: String },

  /// A chain reference names a chain the registry doesn't have.
  #[error("unknown step chain: {name}")]
  UnknownChain { name: String },

  /// A chain contains itself, directly or through other chains.
  #[error("step chain {name} contains itself: {}", path.join(" -> "))]
  ChainCycle { name: String, path: Vec<String> },

  /// A step reference names a step the registry doesn't have.
  #[error("invalid step reference: {name}")]
  InvalidReference { name: String },

  /// Two steps in the same resolved phase share a name.
  #[error("duplicate name: {name}")]
  DuplicateName { name: String },

  /// Every problem found while processing the phases of one configuration.
  #[error("{0}")]
  Aggregate(#[source] AggregateError),

  /// Resolution of one test entry of a build configuration failed.
  #[error(transparent)]
  TestConfiguration(TestConfigurationError),
}

impl ResolveError {
  /// The aggregate held by this error, looking through test wrappers.
  pub fn as_aggregate(&self) -> Option<&AggregateError> {
    match self {
      ResolveError::Aggregate(aggregate) => Some(aggregate),
      ResolveError::TestConfiguration(err) => err.source.as_aggregate(),
      _ => None,
    }
  }
}

impl From<AggregateError> for ResolveError {
  fn from(err: AggregateError) -> Self {
    ResolveError::Aggregate(err)
  }
}

/// A resolve failure tagged with the test entry it came from.
///
/// The wrapped error is the `source()` of this one, so walking the chain
/// from a build-configuration failure reaches the resolver's own error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestConfigurationError {
  pub test: String,
  pub source: Box<ResolveError>,
}

impl fmt::Display for TestConfigurationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "failed to resolve multi-stage test configuration for {}",
      self.test
    )
  }
}

impl std::error::Error for TestConfigurationError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    Some(&*self.source)
  }
}

/// A list of independent resolution failures reported together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateError {
  errors: Vec<ResolveError>,
}

impl AggregateError {
  pub(crate) fn new(errors: Vec<ResolveError>) -> Self {
    Self { errors }
  }

  pub fn iter(&self) -> std::slice::Iter<'_, ResolveError> {
    self.errors.iter()
  }

  pub fn len(&self) -> usize {
    self.errors.len()
  }

  pub fn is_empty(&self) -> bool {
    self.errors.is_empty()
  }
}

impl fmt::Display for AggregateError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if let [only] = self.errors.as_slice() {
      return write!(f, "{}", only);
    }

    write!(f, "[")?;
    for (i, err) in self.errors.iter().enumerate() {
      if i > 0 {
        write!(f, ", ")?;
      }
      write!(f, "{}", err)?;
    }
    write!(f, "]")
  }
}

impl std::error::Error for AggregateError {}

impl<'a> IntoIterator for &'a AggregateError {
  type Item = &'a ResolveError;
  type IntoIter = std::slice::Iter<'a, ResolveError>;

  fn into_iter(self) -> Self::IntoIter {
    self.errors.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::error::Error as _;

  #[test]
  fn test_single_error_message() {
    let err = AggregateError::new(vec![ResolveError::DuplicateName {
      name: "build".to_string(),
    }]);
    assert_eq!(err.to_string(), "duplicate name: build");
  }

  #[test]
  fn test_multiple_error_message() {
    let err = ResolveError::from(AggregateError::new(vec![
      ResolveError::InvalidReference {
        name: "lint".to_string(),
      },
      ResolveError::UnknownChain {
        name: "setup".to_string(),
      },
    ]));
    assert_eq!(
      err.to_string(),
      "[invalid step reference: lint, unknown step chain: setup]"
    );
  }

  #[test]
  fn test_aggregate_is_source() {
    let err = ResolveError::from(AggregateError::new(vec![
      ResolveError::InvalidReference {
        name: "lint".to_string(),
      },
    ]));

    let source = err.source().unwrap();
    let aggregate = source.downcast_ref::<AggregateError>().unwrap();
    assert_eq!(aggregate.len(), 1);
    assert!(aggregate.source().is_none());
  }

  #[test]
  fn test_test_configuration_wraps_source() {
    let inner = ResolveError::NoSuchWorkflow {
      name: "ci-unknown".to_string(),
    };
    let err = ResolveError::TestConfiguration(TestConfigurationError {
      test: "e2e".to_string(),
      source: Box::new(inner.clone()),
    });

    assert_eq!(
      err.to_string(),
      "failed to resolve multi-stage test configuration for e2e"
    );
    let source = err.source().unwrap();
    assert_eq!(source.downcast_ref::<ResolveError>(), Some(&inner));
  }

  #[test]
  fn test_cycle_message() {
    let err = ResolveError::ChainCycle {
      name: "a".to_string(),
      path: vec!["a".to_string(), "b".to_string(), "a".to_string()],
    };
    assert_eq!(err.to_string(), "step chain a contains itself: a -> b -> a");
  }
}
