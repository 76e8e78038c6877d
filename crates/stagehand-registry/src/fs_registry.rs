use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use crate::document::{DocumentKind, RegistryDocument};
use crate::error::RegistryError;
use crate::registry::{Registry, RegistrySource};

/// Filesystem-based registry.
///
/// Documents live anywhere below the root, one per file, and the file name
/// announces both kind and name:
/// ```text
/// {root}/
/// ├── ipi/
/// │   ├── ipi-workflow.json
/// │   ├── setup/ipi-setup-chain.json
/// │   └── install/ipi-install-ref.json
/// └── e2e/e2e-test-ref.json
/// ```
pub struct FsRegistry {
  root: PathBuf,
}

impl FsRegistry {
  /// Create a new filesystem registry at the given root path.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Get the root directory of the registry.
  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Read one registry file and check it against its file name.
  async fn read_document(
    path: &Path,
    expected_kind: DocumentKind,
    expected_name: &str,
  ) -> Result<RegistryDocument, RegistryError> {
    let content = fs::read_to_string(path).await?;
    let document: RegistryDocument =
      serde_json::from_str(&content).map_err(|source| RegistryError::InvalidDocument {
        path: path.to_path_buf(),
        source,
      })?;

    if document.kind() != expected_kind {
      return Err(RegistryError::KindMismatch {
        path: path.to_path_buf(),
        expected: expected_kind,
        found: document.kind(),
      });
    }
    if document.name() != expected_name {
      return Err(RegistryError::NameMismatch {
        path: path.to_path_buf(),
        kind: expected_kind,
        expected: expected_name.to_string(),
        found: document.name().to_string(),
      });
    }

    Ok(document)
  }
}

#[async_trait]
impl RegistrySource for FsRegistry {
  async fn load(&self) -> Result<Registry, RegistryError> {
    let mut files = Vec::new();
    collect_json_files(&self.root, &mut files).await?;
    // Directory order is platform dependent; keep error reporting stable.
    files.sort();

    let mut registry = Registry::default();
    for path in files {
      let file_name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => continue,
      };

      let Some((kind, name)) = DocumentKind::from_file_name(file_name) else {
        warn!(path = %path.display(), "ignoring file without a registry suffix");
        continue;
      };

      let document = Self::read_document(&path, kind, name).await?;
      debug!(path = %path.display(), %kind, name, "loaded registry document");
      registry.insert(document)?;
    }

    debug!(
      root = %self.root.display(),
      steps = registry.steps().len(),
      chains = registry.chains().len(),
      workflows = registry.workflows().len(),
      "registry loaded"
    );

    Ok(registry)
  }
}

/// Recursively collect `*.json` files below `dir`.
async fn collect_json_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), RegistryError> {
  let mut entries = fs::read_dir(dir).await?;
  while let Some(entry) = entries.next_entry().await? {
    let path = entry.path();

    if entry.file_type().await?.is_dir() {
      Box::pin(collect_json_files(&path, files)).await?;
    } else if path.extension().is_some_and(|ext| ext == "json") {
      files.push(path);
    }
  }

  Ok(())
}
