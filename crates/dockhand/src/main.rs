mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dockhand",
    version,
    about = "Dock bar coordinator and live window registry for Windows desktop shells"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default configuration file
    Init,
    /// Run the dock bars, window registry and full-screen monitor until Ctrl+C
    Run,
    /// Debugging and inspection tools
    Debug {
        #[command(subcommand)]
        command: DebugCommands,
    },
}

#[derive(Subcommand)]
enum DebugCommands {
    /// List the windows the registry would track
    Windows {
        /// Print the registry snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Watch shell notifications in real time
    Events,
    /// List connected monitors
    Monitors {
        /// Print the monitor list as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Run => commands::run::execute(),
        Commands::Debug { command } => match command {
            DebugCommands::Windows { json } => commands::debug::windows::execute(json),
            DebugCommands::Events => commands::debug::events::execute(),
            DebugCommands::Monitors { json } => commands::debug::monitors::execute(json),
        },
    }
}
