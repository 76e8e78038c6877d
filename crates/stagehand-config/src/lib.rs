//! Stagehand Config
//!
//! This crate contains the serializable test configuration types for Stagehand.
//! These types represent multi-stage test definitions before and after they are
//! resolved against a step registry.
//!
//! Two shapes exist for every multi-stage test:
//! - [`MultiStageTestConfiguration`]: the user-authored form, which may name a
//!   workflow and may point at registry steps and chains.
//! - [`MultiStageTestConfigurationLiteral`]: the resolved form, where every
//!   phase is a flat list of [`LiteralTestStep`]s.
//!
//! Build configurations ([`ReleaseBuildConfiguration`]) carry a list of test
//! entries, some of which use the multi-stage form. Fields this crate does not
//! model are kept verbatim so a configuration round-trips through resolution.

mod error;
mod multi_stage;
mod release;
mod step;

pub use error::TestStepError;
pub use multi_stage::{MultiStageTestConfiguration, MultiStageTestConfigurationLiteral};
pub use release::{ReleaseBuildConfiguration, TestStepConfiguration};
pub use step::{
  CredentialReference, LiteralTestStep, ResourceRequirements, StepParameter, TestStep,
};
