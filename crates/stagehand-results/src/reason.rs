use std::borrow::Cow;
use std::fmt;

/// A categorical label attached to an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reason(Cow<'static, str>);

impl Reason {
  pub const UNKNOWN: Reason = Reason(Cow::Borrowed("unknown"));
  pub const LOADING_ARGS: Reason = Reason(Cow::Borrowed("loading_args"));
  pub const LOADING_CONFIG: Reason = Reason(Cow::Borrowed("loading_config"));
  pub const LOADING_REGISTRY: Reason = Reason(Cow::Borrowed("loading_registry"));
  pub const RESOLVING_CONFIG: Reason = Reason(Cow::Borrowed("resolving_config"));
  pub const WRITING_OUTPUT: Reason = Reason(Cow::Borrowed("writing_output"));

  pub fn new(reason: impl Into<Cow<'static, str>>) -> Self {
    Self(reason.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl fmt::Display for Reason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&'static str> for Reason {
  fn from(reason: &'static str) -> Self {
    Self::new(reason)
  }
}
