use stagehand_config::ReleaseBuildConfiguration;
use tracing::debug;

use crate::error::{ResolveError, TestConfigurationError};
use crate::resolver::Resolver;

/// Resolve every multi-stage test of a build configuration.
///
/// Tests that are not multi-stage are passed through untouched. For the rest,
/// the literal form replaces the authored one. The first test that fails to
/// resolve aborts the whole configuration; later tests are not attempted.
pub fn resolve_config<R: Resolver + ?Sized>(
  resolver: &R,
  mut config: ReleaseBuildConfiguration,
) -> Result<ReleaseBuildConfiguration, ResolveError> {
  let mut resolved_tests = Vec::with_capacity(config.tests.len());

  for mut test in std::mem::take(&mut config.tests) {
    let Some(multi_stage) = test.multi_stage.take() else {
      resolved_tests.push(test);
      continue;
    };

    let literal = resolver.resolve(multi_stage).map_err(|source| {
      ResolveError::TestConfiguration(TestConfigurationError {
        test: test.as_name.clone(),
        source: Box::new(source),
      })
    })?;

    debug!(test = %test.as_name, "resolved multi-stage test entry");
    test.multi_stage_literal = Some(literal);
    resolved_tests.push(test);
  }

  config.tests = resolved_tests;
  Ok(config)
}
