use thiserror::Error;

/// Errors raised while reading a [`TestStep`](crate::TestStep) from its wire form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TestStepError {
  /// None of `ref`, `chain` or an inline literal step was given.
  #[error("encountered test step where `ref`, `chain` and the literal step are all absent")]
  Empty,

  /// More than one of `ref`, `chain` or an inline literal step was given.
  #[error("test step must set exactly one of `ref`, `chain` or a literal step, found: {}", fields.join(", "))]
  Ambiguous { fields: Vec<&'static str> },

  /// The inline literal step is malformed.
  #[error("invalid literal test step: {message}")]
  InvalidLiteral { message: String },
}
