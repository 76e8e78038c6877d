use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use stagehand_config::ReleaseBuildConfiguration;
use stagehand_registry::{FsRegistry, RegistrySource};
use stagehand_resolver::{AggregateError, RegistryResolver, resolve_config};
use stagehand_results::{Reason, for_reason, full_reason};

/// Stagehand - expands multi-stage tests against a step registry
#[derive(Parser)]
#[command(name = "stagehand")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.stagehand)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  /// Path to the step registry (default: <data-dir>/registry)
  #[arg(long, global = true)]
  registry: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve every multi-stage test in a build configuration
  Resolve {
    /// Path to the build configuration (JSON)
    config_file: PathBuf,

    /// Write the resolved configuration here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let data_dir = match cli.data_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".stagehand"),
  };
  let registry_dir = cli.registry.unwrap_or_else(|| data_dir.join("registry"));

  match cli.command {
    Some(Commands::Resolve {
      config_file,
      output,
    }) => {
      if let Err(err) = run_resolve(&config_file, &registry_dir, output.as_deref()) {
        let problems = err
          .chain()
          .find_map(|cause| cause.downcast_ref::<AggregateError>())
          .map(AggregateError::len);
        error!(reason = %full_reason(&*err), problems, "resolve failed");
        return Err(err);
      }
    }
    None => {
      println!("stagehand - use --help to see available commands");
    }
  }

  Ok(())
}

fn run_resolve(config_file: &Path, registry_dir: &Path, output: Option<&Path>) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run_resolve_async(config_file, registry_dir, output).await })
}

async fn run_resolve_async(
  config_file: &Path,
  registry_dir: &Path,
  output: Option<&Path>,
) -> Result<()> {
  // Read build configuration
  let content = tokio::fs::read_to_string(config_file)
    .await
    .map_err(|err| {
      for_reason(Reason::LOADING_CONFIG)
        .with_error(err)
        .message(format!("failed to read config file: {}", config_file.display()))
    })?;

  let config: ReleaseBuildConfiguration = serde_json::from_str(&content).map_err(|err| {
    for_reason(Reason::LOADING_CONFIG)
      .with_error(err)
      .message(format!("failed to parse config file: {}", config_file.display()))
  })?;

  info!(tests = config.tests.len(), "loaded build configuration");

  // Load registry
  let registry = FsRegistry::new(registry_dir).load().await.map_err(|err| {
    for_reason(Reason::LOADING_REGISTRY)
      .with_error(err)
      .message(format!("failed to load registry: {}", registry_dir.display()))
  })?;

  // Resolve
  let resolver = RegistryResolver::from(registry);
  let resolved = resolve_config(&resolver, config).map_err(|err| {
    for_reason(Reason::RESOLVING_CONFIG)
      .with_error(err)
      .message("failed to resolve build configuration")
  })?;

  // Print results as JSON
  let rendered = serde_json::to_string_pretty(&resolved)?;
  match output {
    Some(path) => {
      tokio::fs::write(path, format!("{}\n", rendered))
        .await
        .map_err(|err| {
          for_reason(Reason::WRITING_OUTPUT)
            .with_error(err)
            .message(format!("failed to write output: {}", path.display()))
        })?;
      info!(path = %path.display(), "wrote resolved configuration");
    }
    None => println!("{}", rendered),
  }

  Ok(())
}
