//! Tessera CLI - play the tessera synthesizer from a computer keyboard.

mod commands;
mod keyboard;
mod mirror;
mod settings;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tessera")]
#[command(author, version, about = "Tessera polyphonic synthesizer", long_about = None)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the synthesizer from the keyboard
    Play(commands::play::PlayArgs),

    /// List audio output devices
    Devices(commands::devices::DevicesArgs),

    /// List factory presets
    Presets(commands::presets::PresetsArgs),

    /// Print the effective settings as TOML
    Settings(commands::settings::SettingsArgs),
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Play(args) => commands::play::run(args),
        Commands::Devices(args) => commands::devices::run(args),
        Commands::Presets(args) => commands::presets::run(args),
        Commands::Settings(args) => commands::settings::run(args),
    }
}
