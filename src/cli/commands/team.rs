//! `ggd team` command - maintenance teams

use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};
use tabled::{settings::Style, Table, Tabled};

use crate::cli::helpers::{self, find_team};
use crate::core::analytics::Analytics;
use crate::core::config::Config;
use crate::core::project::Project;
use crate::entities::{Team, TeamPatch};
use crate::store::Store;

#[derive(Subcommand, Debug)]
pub enum TeamCommands {
    /// List teams
    List,

    /// Create a new team
    New(NewArgs),

    /// Show a team's roster
    Show(ShowArgs),

    /// Edit a team
    Edit(EditArgs),

    /// Delete a team
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Team name
    #[arg(long)]
    pub name: String,

    /// Member names (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub members: Vec<String>,

    #[arg(long)]
    pub company: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Team id or name
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Team id or name
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    /// Replacement member list (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub members: Option<Vec<String>>,

    #[arg(long)]
    pub company: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Team id or name
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Tabled)]
struct TeamRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "MEMBERS")]
    members: usize,
    #[tabled(rename = "REQUESTS")]
    requests: usize,
}

pub fn run(cmd: TeamCommands) -> Result<()> {
    match cmd {
        TeamCommands::List => run_list(),
        TeamCommands::New(args) => run_new(args),
        TeamCommands::Show(args) => run_show(args),
        TeamCommands::Edit(args) => run_edit(args),
        TeamCommands::Delete(args) => run_delete(args),
    }
}

fn run_list() -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);
    let analytics = Analytics::new(&store);

    let teams = store.teams().map_err(|e| miette::miette!("{}", e))?;
    if teams.is_empty() {
        println!("No teams found.");
        println!();
        println!("Create one with: {}", style("ggd team new").yellow());
        return Ok(());
    }

    let by_team = analytics
        .requests_by_team()
        .map_err(|e| miette::miette!("{}", e))?;

    let rows: Vec<TeamRow> = teams
        .iter()
        .zip(by_team.iter())
        .map(|(team, row)| TeamRow {
            id: helpers::format_short_id(&team.id),
            name: team.name.clone(),
            members: team.members.len(),
            requests: row.count,
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::sharp()));
    println!();
    println!("{} team(s)", style(teams.len()).cyan());
    Ok(())
}

fn run_new(args: NewArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);
    let config = Config::load(&project);

    let mut team = Team::new(args.name).with_members(
        args.members
            .into_iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect(),
    );
    team.company = args.company.unwrap_or_else(|| config.company());

    let team = store.add_team(team).map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Created team {}",
        style("✓").green(),
        style(&team.id).cyan()
    );
    Ok(())
}

fn run_show(args: ShowArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);
    let analytics = Analytics::new(&store);

    let team = find_team(&store, &args.id)?;

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(&team.id).cyan());
    println!("{}: {}", style("Name").bold(), style(&team.name).yellow());
    if !team.company.is_empty() {
        println!("{}: {}", style("Company").bold(), team.company);
    }
    println!("{}:", style("Members").bold());
    if team.members.is_empty() {
        println!("  (none)");
    }
    for member in &team.members {
        println!("  • {}", member);
    }

    let count = analytics
        .requests_by_team()
        .map_err(|e| miette::miette!("{}", e))?
        .into_iter()
        .find(|row| row.name == team.name)
        .map(|row| row.count)
        .unwrap_or(0);
    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("Requests").bold(), count);

    Ok(())
}

fn run_edit(args: EditArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);

    let team = find_team(&store, &args.id)?;

    let patch = TeamPatch {
        name: args.name,
        members: args.members,
        company: args.company,
    };
    if patch.is_empty() {
        return Err(miette::miette!(
            "Nothing to update. Pass at least one field flag."
        ));
    }

    let updated = store
        .update_team(&team.id, patch)
        .map_err(|e| miette::miette!("{}", e))?
        .ok_or_else(|| miette::miette!("No team found with id '{}'", team.id))?;

    println!(
        "{} Updated team {}",
        style("✓").green(),
        style(&updated.id).cyan()
    );
    Ok(())
}

fn run_delete(args: DeleteArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);

    let team = find_team(&store, &args.id)?;

    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete team \"{}\"?", team.name))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    store
        .delete_team(&team.id)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Deleted team {}",
        style("✓").green(),
        style(&team.id).cyan()
    );
    Ok(())
}
