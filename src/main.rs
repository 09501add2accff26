use clap::Parser;
use miette::Result;

use gearguard::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Install miette's fancy error handler for readable diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => gearguard::cli::commands::init::run(args),
        Commands::Equipment { cmd } => gearguard::cli::commands::equipment::run(cmd),
        Commands::Team { cmd } => gearguard::cli::commands::team::run(cmd),
        Commands::Category { cmd } => gearguard::cli::commands::category::run(cmd),
        Commands::Request { cmd } => gearguard::cli::commands::request::run(cmd),
        Commands::Board(args) => gearguard::cli::commands::board::run(args),
        Commands::Dashboard(args) => gearguard::cli::commands::dashboard::run(args),
        Commands::Calendar(args) => gearguard::cli::commands::calendar::run(args),
        Commands::Completions(args) => gearguard::cli::commands::completions::run(args),
    }
}
