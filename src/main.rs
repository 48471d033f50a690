//! Stories strip demo - Entry Point

use clap::Parser;
use std::path::PathBuf;
use storystrip::model::AppError;
use tracing::info;

/// Stories strip demo - a compact avatar row that expands into a scrollable panel
#[derive(Parser, Debug)]
#[command(name = "storystrip")]
#[command(version)]
#[command(about = "Terminal demo of the stories strip: pull, click, drag and scroll the stories")]
pub struct Args {
    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of stories shown at startup
    #[arg(short = 'n', long, default_value = "12", value_parser = clap::value_parser!(u16).range(0..=64))]
    pub items: u16,

    /// Mirror wheel and drag directions for right-to-left layouts
    #[arg(long)]
    pub rtl: bool,

    /// Clicks past the last story select the last visible one
    #[arg(long)]
    pub full_clickable: bool,
}

/// Flag overrides only apply when the flag was given.
fn flag_override(set: bool) -> Option<bool> {
    set.then_some(true)
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = storystrip::config::load_config_with_precedence(args.config.clone())?;
        let merged = storystrip::config::merge_config(config_file);
        let with_env = storystrip::config::apply_env_overrides(merged);
        storystrip::config::apply_cli_overrides(
            with_env,
            flag_override(args.rtl),
            flag_override(args.full_clickable),
        )
    };
    config.validate()?;

    // Held until exit so buffered log lines are flushed
    let _log_guard = storystrip::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        items = args.items,
        "Configuration loaded and resolved"
    );

    storystrip::view::run_demo(&config, usize::from(args.items))?;

    Ok(())
}
