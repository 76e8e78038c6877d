//! Stagehand Registry
//!
//! Name tables for reusable test content: literal steps, chains of steps, and
//! workflows. A [`Registry`] is built once by a [`RegistrySource`] and then
//! handed to a resolver, which only ever reads it.

mod document;
mod error;
mod fs_registry;
mod registry;

pub use document::{ChainDefinition, DocumentKind, RegistryDocument, WorkflowDefinition};
pub use error::RegistryError;
pub use fs_registry::FsRegistry;
pub use registry::{ChainByName, ReferenceByName, Registry, RegistrySource, WorkflowByName};
