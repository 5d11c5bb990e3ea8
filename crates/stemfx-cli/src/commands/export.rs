//! Session export command.

use anyhow::Context;
use clap::Args;
use std::path::{Path, PathBuf};
use stemfx_config::{
    EngineConfig, Session, find_session, list_sessions, user_sessions_dir, validate_descriptor,
};
use stemfx_engine::{AudioEngine, HeadlessRuntime, TimeStretchState};

#[derive(Args)]
pub struct ExportArgs {
    /// Session file or saved session name
    #[arg(value_name = "SESSION")]
    session: String,

    /// Engine configuration file (defaults to the user config file)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the descriptor to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Emit compact JSON regardless of the configured style
    #[arg(long)]
    compact: bool,

    /// Region start in seconds
    #[arg(long, value_name = "SECONDS")]
    start: Option<f64>,

    /// Region end in seconds
    #[arg(long, value_name = "SECONDS")]
    end: Option<f64>,
}

/// Headless runtime with the stretch module available when it exists on disk.
fn runtime_for(config: &EngineConfig) -> HeadlessRuntime {
    let options = &config.time_stretch;
    if Path::new(&options.module_path).is_file() {
        HeadlessRuntime::new().with_module(&options.module_path, &options.processor_name)
    } else {
        HeadlessRuntime::new()
    }
}

/// Not-found message listing the saved sessions, if any.
fn not_found(name: &str) -> String {
    let saved = list_sessions(&user_sessions_dir());
    if saved.is_empty() {
        format!("session not found: {name}")
    } else {
        format!("session not found: {name} (saved sessions: {})", saved.join(", "))
    }
}

pub async fn run(args: ExportArgs) -> anyhow::Result<()> {
    let config = EngineConfig::load_or_default(args.config.as_deref())
        .context("failed to load engine config")?;

    let session_path = find_session(&args.session).with_context(|| not_found(&args.session))?;
    let session = Session::load(&session_path)
        .with_context(|| format!("failed to load session {}", session_path.display()))?;

    let mut engine = AudioEngine::new(runtime_for(&config), config.engine_options())?;
    if config.time_stretch.enabled {
        let state = engine.init_time_stretch().await;
        if state == TimeStretchState::Ready {
            tracing::info!("time-stretch ready");
        }
    }

    session.apply(&mut engine)?;

    let descriptor = engine.export_region(args.start, args.end);
    if let Err(err) = validate_descriptor(&descriptor) {
        for problem in err.into_vec() {
            eprintln!("  - {problem}");
        }
        anyhow::bail!("exported descriptor is invalid; nothing written");
    }
    let json = if config.export.pretty && !args.compact {
        descriptor.to_json_pretty()?
    } else {
        descriptor.to_json()?
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), entries = descriptor.len(), "descriptor written");
        }
        None => println!("{json}"),
    }

    for approx in engine.applied_approximations() {
        eprintln!("note: {}: {}", approx.stage, approx.description);
    }

    Ok(())
}
