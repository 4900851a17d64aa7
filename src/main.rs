//! Replay recorded head motion through the engine.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use headmouse::{
    app::{AppConfig, ReplayApp, Trace},
    config::{Config, EXAMPLE_CONFIG},
    engine::OperationMode,
};
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Pointer with dwell clicking
    Mouse,
    /// Absolute gamepad (virtual joystick)
    GamepadAbs,
    /// Relative gamepad (head shakes)
    GamepadRel,
}

impl From<Mode> for OperationMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Mouse => Self::Mouse,
            Mode::GamepadAbs => Self::GamepadAbsolute,
            Mode::GamepadRel => Self::GamepadRelative,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Trace file to replay (YAML list of samples)
    #[arg(short, long, required_unless_present = "print_example_config")]
    trace: Option<String>,

    /// Output mode
    #[arg(short, long, value_enum, default_value = "mouse")]
    mode: Mode,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Face detection timeout in seconds (0 disables the auto-pause)
    #[arg(long)]
    timeout_secs: Option<u32>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_example_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_example_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {path}");
            match Config::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Failed to load config file: {e}. Using defaults.");
                    Config::default()
                }
            }
        }
        None => Config::default(),
    };
    if let Some(timeout) = args.timeout_secs {
        config.face_detection.timeout_secs = timeout;
    }
    config.validate().context("Invalid configuration")?;

    let trace_path = args.trace.context("No trace file given")?;
    let trace = Trace::from_file(&trace_path).with_context(|| format!("Failed to load trace {trace_path}"))?;

    let app = ReplayApp::new(AppConfig {
        config,
        mode: args.mode.into(),
    })?;
    let summary = app.run(&trace)?;
    println!("{summary}");

    Ok(())
}
