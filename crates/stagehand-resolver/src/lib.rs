mod driver;
mod error;
mod resolver;

pub use driver::resolve_config;
pub use error::{AggregateError, ResolveError, TestConfigurationError};
pub use resolver::{RegistryResolver, Resolver};
