//! Descriptor validation command.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use stemfx_config::{ConfigError, load_descriptor};

#[derive(Args)]
pub struct ValidateArgs {
    /// Descriptor JSON file
    #[arg(value_name = "DESCRIPTOR")]
    descriptor: PathBuf,
}

pub fn run(args: ValidateArgs) -> anyhow::Result<()> {
    match load_descriptor(&args.descriptor) {
        Ok(descriptor) => {
            println!(
                "{}: valid ({} effects: {})",
                args.descriptor.display(),
                descriptor.len(),
                descriptor.types().join(", ")
            );
            Ok(())
        }
        Err(ConfigError::Validation(err)) => {
            let problems = err.into_vec();
            for problem in &problems {
                eprintln!("  - {problem}");
            }
            anyhow::bail!(
                "{}: {} problem(s) found",
                args.descriptor.display(),
                problems.len()
            )
        }
        Err(err) => Err(err)
            .with_context(|| format!("failed to read descriptor {}", args.descriptor.display())),
    }
}
