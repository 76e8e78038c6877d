use std::path::PathBuf;

use thiserror::Error;

use crate::document::DocumentKind;

/// Errors that can occur when loading the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
  /// IO error when reading registry files.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// A registry file is not valid JSON or does not match the document schema.
  #[error("invalid registry document {}: {source}", path.display())]
  InvalidDocument {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  /// The file name suffix announces a different kind than the file holds.
  #[error("{} should contain a {expected} but contains a {found}", path.display())]
  KindMismatch {
    path: PathBuf,
    expected: DocumentKind,
    found: DocumentKind,
  },

  /// The registered name differs from the name encoded in the file name.
  #[error("{} defines {kind} '{found}', expected '{expected}'", path.display())]
  NameMismatch {
    path: PathBuf,
    kind: DocumentKind,
    expected: String,
    found: String,
  },

  /// Two files register the same name.
  #[error("duplicate {kind} name: {name}")]
  DuplicateName { kind: DocumentKind, name: String },
}
