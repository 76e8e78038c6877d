use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::reason::Reason;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// An error carrying a [`Reason`], a message, and optionally the error it wraps.
///
/// `Display` shows only the message; the wrapped error is reachable through
/// [`StdError::source`].
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ReasonedError {
  reason: Reason,
  message: String,
  #[source]
  source: Option<BoxError>,
}

impl ReasonedError {
  pub fn reason(&self) -> &Reason {
    &self.reason
  }

  /// Reasons of this error and every reasoned error below it, joined by colons,
  /// e.g. "resolving_config:loading_registry".
  pub fn full_reason(&self) -> String {
    let wrapped = self
      .source
      .as_deref()
      .and_then(|source| find_reasoned(source as &(dyn StdError + 'static)));

    match wrapped {
      Some(inner) => format!("{}:{}", self.reason, inner.full_reason()),
      None => self.reason.to_string(),
    }
  }
}

/// Start building a [`ReasonedError`]. An empty reason becomes [`Reason::UNKNOWN`].
pub fn for_reason(reason: impl Into<Reason>) -> ReasonBuilder {
  let reason = reason.into();
  let reason = if reason.is_empty() {
    Reason::UNKNOWN
  } else {
    reason
  };
  ReasonBuilder { reason }
}

/// Builder holding a reason.
#[derive(Debug)]
pub struct ReasonBuilder {
  reason: Reason,
}

impl ReasonBuilder {
  /// Wrap a child error; finish with [`ReasonErrorBuilder::message`].
  pub fn with_error(self, err: impl Into<BoxError>) -> ReasonErrorBuilder {
    ReasonErrorBuilder {
      reason: self.reason,
      source: err.into(),
    }
  }

  /// Tag an error without wrapping it, reusing its message.
  pub fn for_error(self, err: impl fmt::Display) -> ReasonedError {
    ReasonedError {
      reason: self.reason,
      message: err.to_string(),
      source: None,
    }
  }

  /// Tag a plain message.
  pub fn message(self, message: impl Into<String>) -> ReasonedError {
    ReasonedError {
      reason: self.reason,
      message: message.into(),
      source: None,
    }
  }
}

/// Builder holding a reason and a child error.
#[derive(Debug)]
pub struct ReasonErrorBuilder {
  reason: Reason,
  source: BoxError,
}

impl ReasonErrorBuilder {
  pub fn message(self, message: impl Into<String>) -> ReasonedError {
    ReasonedError {
      reason: self.reason,
      message: message.into(),
      source: Some(self.source),
    }
  }
}

/// Full reason of the first reasoned error in `err`'s chain, or "unknown".
pub fn full_reason(err: &(dyn StdError + 'static)) -> String {
  match find_reasoned(err) {
    Some(reasoned) => reasoned.full_reason(),
    None => Reason::UNKNOWN.to_string(),
  }
}

/// Make sure an error carries a reason somewhere in its chain.
pub fn default_reason(err: BoxError) -> BoxError {
  if find_reasoned(&*err).is_some() {
    return err;
  }
  Box::new(for_reason(Reason::UNKNOWN).for_error(err))
}

fn find_reasoned<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a ReasonedError> {
  let mut current = Some(err);
  while let Some(err) = current {
    if let Some(reasoned) = err.downcast_ref::<ReasonedError>() {
      return Some(reasoned);
    }
    current = err.source();
  }
  None
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, Error)]
  #[error("plain failure")]
  struct Plain;

  #[derive(Debug, Error)]
  #[error("wrapper")]
  struct Wrapper(#[source] ReasonedError);

  #[test]
  fn test_message_and_source() {
    let err = for_reason(Reason::LOADING_CONFIG)
      .with_error(Plain)
      .message("could not load config");

    assert_eq!(err.to_string(), "could not load config");
    assert_eq!(err.reason(), &Reason::LOADING_CONFIG);
    assert_eq!(err.source().unwrap().to_string(), "plain failure");
  }

  #[test]
  fn test_empty_reason_defaults_to_unknown() {
    let err = for_reason("").message("oops");
    assert_eq!(err.reason(), &Reason::UNKNOWN);
  }

  #[test]
  fn test_full_reason_joins_nested_reasons() {
    let inner = for_reason(Reason::LOADING_REGISTRY)
      .with_error(Plain)
      .message("inner");
    let middle = Wrapper(inner);
    let outer = for_reason(Reason::RESOLVING_CONFIG)
      .with_error(middle)
      .message("outer");

    assert_eq!(outer.full_reason(), "resolving_config:loading_registry");
    assert_eq!(full_reason(&outer), "resolving_config:loading_registry");
  }

  #[test]
  fn test_full_reason_of_untagged_error_is_unknown() {
    assert_eq!(full_reason(&Plain), "unknown");
  }

  #[test]
  fn test_full_reason_finds_wrapped_reason() {
    let err = Wrapper(for_reason(Reason::WRITING_OUTPUT).message("disk full"));
    assert_eq!(full_reason(&err), "writing_output");
  }

  #[test]
  fn test_for_error_copies_message() {
    let err = for_reason(Reason::LOADING_ARGS).for_error(Plain);
    assert_eq!(err.to_string(), "plain failure");
    assert!(err.source().is_none());
  }

  #[test]
  fn test_default_reason() {
    let tagged = default_reason(Box::new(Plain));
    assert_eq!(tagged.to_string(), "plain failure");
    assert_eq!(full_reason(&*tagged), "unknown");

    let reasoned: BoxError = Box::new(for_reason(Reason::LOADING_ARGS).message("bad flag"));
    let kept = default_reason(reasoned);
    assert_eq!(full_reason(&*kept), "loading_args");
  }
}
