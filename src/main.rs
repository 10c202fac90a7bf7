//! switch-configgen
//!
//! Writes the emulator config for one Switch launch and prints the command
//! the launcher shell should run, as JSON on stdout.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use switch_configgen::cli;
use switch_configgen::config::{DefaultsLocator, LaunchConfig};
use switch_configgen::generators::{GeneratorContext, GeneratorRegistry};
use switch_configgen::input::enumerate::default_enumerator;
use switch_configgen::input::{ApiVersion, EnumerationConfig, SysfsScanner};
use switch_configgen::paths::SwitchPaths;

/// Switch emulator config generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Launch description (system, emulator, rom, options, controllers)
    #[arg(long, required_unless_present = "list_pads")]
    launch: Option<PathBuf>,

    /// Filesystem root holding `userdata/` and `sys/`
    #[arg(long, env = "CONFIGGEN_ROOT", default_value = "/")]
    root: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Also log to a daily-rotated file in this directory
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Build everything but write no config file
    #[arg(long)]
    dry_run: bool,

    /// Print detected pads and exit
    #[arg(long)]
    list_pads: bool,

    /// Force the enumeration API version (2 or 3)
    #[arg(long, value_parser = clap::value_parser!(u8).range(2..=3))]
    sdl_version: Option<u8>,
}

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let _guard = init_logging(&args.log_level, args.log_file.as_deref())?;

    let paths = SwitchPaths::new(&args.root);
    let scanner = SysfsScanner::new(paths.root());
    let enumerator = default_enumerator();
    let api_version = args.sdl_version.and_then(ApiVersion::from_number);

    if args.list_pads {
        let config = EnumerationConfig::new(api_version.unwrap_or_default());
        cli::list_pads(&scanner, enumerator.as_ref(), &config);
        return Ok(());
    }

    let launch_file = args
        .launch
        .context("--launch is required unless --list-pads is given")?;
    info!("Launch file: {}", launch_file.display());

    let launch = LaunchConfig::load(&launch_file)?;
    let defaults = DefaultsLocator::new(&paths).load(&launch.system)?;
    let launch = launch.resolve(defaults)?;
    info!("Emulator: {} / rom: {}", launch.emulator, launch.rom);

    let registry = GeneratorRegistry::new();
    let generator = registry.get(&launch.emulator)?;

    let ctx = GeneratorContext {
        launch: &launch,
        paths: &paths,
        scanner: &scanner,
        enumerator: enumerator.as_ref(),
        api_version,
        lang: std::env::var("LANG").ok(),
        dry_run: args.dry_run,
    };
    let command = generator.generate(&ctx)?;
    info!("Generated config with '{}'", generator.name());

    println!(
        "{}",
        serde_json::to_string(&command).context("Failed to serialize command")?
    );
    Ok(())
}

fn init_logging(level: &str, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "switch-configgen.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    // stdout carries the command; logs go to stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}
