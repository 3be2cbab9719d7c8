//! Interactive spring sandbox.
//!
//! Left click drags a body, right clicking two bodies links them with a spring.

use std::path::PathBuf;

use clap::Parser;
use ftlog::{
    appender::{FileAppender, Period},
    LevelFilter, LoggerGuard,
};
use springbox::{config::SandboxConfig, renderer::Renderer, sandbox::Sandbox};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Width of the window and the boundary.
    #[arg(long, default_value_t = springbox::config::WIDTH)]
    width: f32,

    /// Height of the window and the boundary.
    #[arg(long, default_value_t = springbox::config::HEIGHT)]
    height: f32,

    /// The random seed used for spawn positions.
    #[arg(short('s'), long)]
    seed: Option<u64>,

    /// Name of a log file under `logs/`. Logs go to stderr when omitted.
    #[arg(short('l'), long)]
    log_name: Option<String>,

    /// Maximum log level: off, error, warn, info, debug or trace.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), String> {
    let args = Args::parse();

    let level = args
        .log_level
        .parse::<LevelFilter>()
        .map_err(|e| format!("invalid log level {:?}: {e}", args.log_level))?;
    let (_guard, log_path) = configure_logger(args.log_name.as_deref(), level)?;
    if let Some(log_path) = log_path {
        ftlog::info!("Log file: {log_path:?}");
    }

    let mut config = SandboxConfig::new().size(args.width, args.height);
    config.seed = args.seed;

    let sandbox = Sandbox::new(config).map_err(|e| e.to_string())?;
    Renderer::new(sandbox).create_window();
    Ok(())
}

/// Configures the logger.
///
/// # Errors
///
/// - If a logs directory could not be located/created.
/// - If the logger could not be initialized.
fn configure_logger(
    file_name: Option<&str>,
    level: LevelFilter,
) -> Result<(LoggerGuard, Option<PathBuf>), String> {
    let Some(file_name) = file_name else {
        // Without a root appender ftlog writes to stderr.
        let guard = ftlog::Builder::new()
            .max_log_level(level)
            .try_init()
            .map_err(|e| e.to_string())?;
        return Ok((guard, None));
    };

    let root_dir = PathBuf::from(".").canonicalize().map_err(|e| e.to_string())?;
    let logs_dir = root_dir.join("logs");
    if !logs_dir.exists() {
        std::fs::create_dir(&logs_dir).map_err(|e| e.to_string())?;
    }
    let log_path = logs_dir.join(file_name);

    let writer = FileAppender::builder()
        .path(&log_path)
        .rotate(Period::Day)
        .build();

    let guard = ftlog::Builder::new()
        .max_log_level(level)
        .root(writer)
        .try_init()
        .map_err(|e| e.to_string())?;

    Ok((guard, Some(log_path)))
}
