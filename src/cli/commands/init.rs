//! `ggd init` command - create a project

use chrono::Utc;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::core::project::Project;
use crate::store::{seed, Store};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Seed the project with sample data
    #[arg(long)]
    pub sample: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let cwd = std::env::current_dir().into_diagnostic()?;
    let already_initialized = cwd.join(crate::core::project::DATA_DIR).is_dir();

    let project = Project::init(&cwd).map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);

    if args.sample {
        seed::seed_sample_data(&store, Utc::now()).map_err(|e| miette::miette!("{}", e))?;
    }

    if already_initialized {
        println!(
            "{} GearGuard project already initialized in {}",
            style("✓").green(),
            style(project.root().display()).dim()
        );
    } else {
        println!(
            "{} Initialized GearGuard project in {}",
            style("✓").green(),
            style(project.root().display()).dim()
        );
    }

    if args.sample {
        println!(
            "  Seeded sample data. Try {} or {}",
            style("ggd dashboard").yellow(),
            style("ggd board").yellow()
        );
    }

    Ok(())
}
