//! Stagehand Results
//!
//! Errors tagged with a categorical [`Reason`], so failures can be counted and
//! reported by category while keeping a human-readable message.
//!
//! The common use is wrapping an error at a call site:
//!
//! ```
//! use stagehand_results::{Reason, for_reason};
//!
//! fn load(path: &str) -> Result<String, stagehand_results::ReasonedError> {
//!   std::fs::read_to_string(path).map_err(|err| {
//!     for_reason(Reason::LOADING_CONFIG)
//!       .with_error(err)
//!       .message(format!("could not read {}", path))
//!   })
//! }
//! ```

mod error;
mod reason;

pub use error::{
  BoxError, ReasonBuilder, ReasonErrorBuilder, ReasonedError, default_reason, for_reason,
  full_reason,
};
pub use reason::Reason;
