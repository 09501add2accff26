//! `ggd request` command - maintenance request lifecycle
//!
//! `move` is the stage-transition operation. Moving into scrap asks for
//! confirmation (the engine itself transitions unconditionally once called;
//! the prompt is this layer's policy), then the engine marks the referenced
//! equipment as scrapped.

use chrono::Utc;
use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};
use tabled::{settings::Style, Table, Tabled};

use crate::cli::helpers::{self, find_equipment, find_request, find_team};
use crate::core::config::Config;
use crate::core::identity::RecordId;
use crate::core::lifecycle::{is_overdue, Lifecycle, RequestDraft, RequestPatch};
use crate::core::project::Project;
use crate::entities::{Priority, RequestType, Stage};
use crate::store::Store;

#[derive(Subcommand, Debug)]
pub enum RequestCommands {
    /// List requests with filtering
    List(ListArgs),

    /// Create a new request
    New(NewArgs),

    /// Show a request's details
    Show(ShowArgs),

    /// Edit fields on a request
    Edit(EditArgs),

    /// Move a request to another stage
    Move(MoveArgs),

    /// Delete a request
    Delete(DeleteArgs),

    /// Worksheet comments
    #[command(subcommand)]
    Comment(CommentCommands),
}

#[derive(Subcommand, Debug)]
pub enum CommentCommands {
    /// Append a worksheet comment
    Add(CommentAddArgs),

    /// List worksheet comments, newest first
    List(CommentListArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by stage
    #[arg(long, short = 's')]
    pub stage: Option<Stage>,

    /// Filter by type
    #[arg(long = "type", short = 't')]
    pub request_type: Option<RequestType>,

    /// Filter by team (id or name)
    #[arg(long)]
    pub team: Option<String>,

    /// Show only overdue requests
    #[arg(long)]
    pub overdue: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Subject line
    #[arg(long)]
    pub subject: String,

    /// Equipment (id or name)
    #[arg(long, short = 'e')]
    pub equipment: String,

    /// Request type (corrective/preventive)
    #[arg(long = "type", short = 't')]
    pub request_type: Option<RequestType>,

    /// Initial stage (defaults to new)
    #[arg(long, short = 's')]
    pub stage: Option<Stage>,

    /// Scheduled date (YYYY-MM-DD)
    #[arg(long)]
    pub scheduled: Option<String>,

    /// Estimated duration in hours
    #[arg(long)]
    pub duration: Option<f64>,

    /// Priority (1-3 or low/medium/high)
    #[arg(long, short = 'p')]
    pub priority: Option<Priority>,

    /// Team (id or name; defaults to the equipment's team)
    #[arg(long)]
    pub team: Option<String>,

    /// Technician name (defaults to the equipment's technician)
    #[arg(long)]
    pub technician: Option<String>,

    #[arg(long)]
    pub company: Option<String>,

    /// Internal notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Work instructions for the technician
    #[arg(long)]
    pub instructions: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Request id or subject
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Request id or subject
    pub id: String,

    #[arg(long)]
    pub subject: Option<String>,

    /// Equipment (id or name)
    #[arg(long, short = 'e')]
    pub equipment: Option<String>,

    /// Request type (corrective/preventive)
    #[arg(long = "type", short = 't')]
    pub request_type: Option<RequestType>,

    /// Scheduled date (YYYY-MM-DD)
    #[arg(long)]
    pub scheduled: Option<String>,

    /// Estimated duration in hours
    #[arg(long)]
    pub duration: Option<f64>,

    /// Priority (1-3 or low/medium/high)
    #[arg(long, short = 'p')]
    pub priority: Option<Priority>,

    /// Team (id or name)
    #[arg(long)]
    pub team: Option<String>,

    #[arg(long)]
    pub technician: Option<String>,

    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    #[arg(long)]
    pub instructions: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct MoveArgs {
    /// Request id or subject
    pub id: String,

    /// Target stage
    pub stage: Stage,

    /// Skip the scrap confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Request id or subject
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct CommentAddArgs {
    /// Request id or subject
    pub id: String,

    /// Comment text
    pub text: String,

    /// Author name (defaults to the configured user)
    #[arg(long)]
    pub author: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct CommentListArgs {
    /// Request id or subject
    pub id: String,
}

#[derive(Tabled)]
struct RequestRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "SUBJECT")]
    subject: String,
    #[tabled(rename = "EQUIPMENT")]
    equipment: String,
    #[tabled(rename = "TYPE")]
    request_type: String,
    #[tabled(rename = "STAGE")]
    stage: String,
    #[tabled(rename = "PRI")]
    priority: String,
    #[tabled(rename = "SCHEDULED")]
    scheduled: String,
}

pub fn run(cmd: RequestCommands) -> Result<()> {
    match cmd {
        RequestCommands::List(args) => run_list(args),
        RequestCommands::New(args) => run_new(args),
        RequestCommands::Show(args) => run_show(args),
        RequestCommands::Edit(args) => run_edit(args),
        RequestCommands::Move(args) => run_move(args),
        RequestCommands::Delete(args) => run_delete(args),
        RequestCommands::Comment(CommentCommands::Add(args)) => run_comment_add(args),
        RequestCommands::Comment(CommentCommands::List(args)) => run_comment_list(args),
    }
}

fn run_list(args: ListArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);
    let now = Utc::now();

    let mut requests = store.requests().map_err(|e| miette::miette!("{}", e))?;

    if let Some(stage) = args.stage {
        requests.retain(|r| r.stage == stage);
    }
    if let Some(request_type) = args.request_type {
        requests.retain(|r| r.request_type == request_type);
    }
    if let Some(team) = &args.team {
        let team = find_team(&store, team)?;
        requests.retain(|r| r.team_id.as_ref() == Some(&team.id));
    }
    if args.overdue {
        requests.retain(|r| is_overdue(r, now));
    }

    if requests.is_empty() {
        println!("No requests found.");
        println!();
        println!("Create one with: {}", style("ggd request new").yellow());
        return Ok(());
    }

    let overdue_count = requests.iter().filter(|r| is_overdue(r, now)).count();

    let rows: Vec<RequestRow> = requests
        .iter()
        .map(|request| RequestRow {
            id: helpers::format_short_id(&request.id),
            subject: helpers::truncate_str(&request.subject, 32),
            equipment: helpers::truncate_str(
                &helpers::equipment_name(&store, &request.equipment_id),
                24,
            ),
            request_type: request.request_type.to_string(),
            stage: request.stage.to_string(),
            priority: request.priority.stars(),
            scheduled: request
                .scheduled_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::sharp()));
    println!();
    println!(
        "{} request(s), {} overdue",
        style(requests.len()).cyan(),
        style(overdue_count).red()
    );
    Ok(())
}

fn run_new(args: NewArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);
    let config = Config::load(&project);

    let equipment = find_equipment(&store, &args.equipment)?;

    let mut draft = RequestDraft::new(args.subject, equipment.id.clone());
    draft.request_type = args.request_type;
    draft.stage = args.stage;
    draft.scheduled_date = args.scheduled.as_deref().map(helpers::parse_date).transpose()?;
    draft.duration = args.duration;
    draft.priority = args.priority;
    draft.company = args.company.or_else(|| {
        let company = config.company();
        (!company.is_empty()).then_some(company)
    });
    draft.notes = args.notes;
    draft.instructions = args.instructions;

    // Default-populate team and technician from the chosen equipment, the
    // way the form auto-fill did. A convenience, not a data rule.
    draft.team_id = match args.team {
        Some(query) => Some(resolve_team_reference(&store, &query)?),
        None => equipment.team_id.clone(),
    };
    draft.technician = args
        .technician
        .or_else(|| (!equipment.technician.is_empty()).then(|| equipment.technician.clone()));

    let lifecycle = Lifecycle::new(&store);
    let request = lifecycle
        .create(draft)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Created request {}",
        style("✓").green(),
        style(&request.id).cyan()
    );
    println!(
        "   {} · {} · stage {}",
        equipment.name,
        request.request_type,
        style(request.stage).yellow()
    );
    Ok(())
}

fn run_show(args: ShowArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);
    let now = Utc::now();

    let request = find_request(&store, &args.id)?;

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(&request.id).cyan());
    println!(
        "{}: {}",
        style("Subject").bold(),
        style(&request.subject).yellow()
    );
    println!(
        "{}: {}",
        style("Equipment").bold(),
        helpers::equipment_name(&store, &request.equipment_id)
    );
    println!("{}: {}", style("Type").bold(), request.request_type);
    let overdue = is_overdue(&request, now);
    if overdue {
        println!(
            "{}: {} {}",
            style("Stage").bold(),
            request.stage,
            style("(overdue)").red()
        );
    } else {
        println!("{}: {}", style("Stage").bold(), request.stage);
    }
    println!(
        "{}: {}",
        style("Priority").bold(),
        request.priority.stars()
    );
    if let Some(scheduled) = request.scheduled_date {
        println!("{}: {}", style("Scheduled").bold(), scheduled);
    }
    if request.duration > 0.0 {
        println!("{}: {}h", style("Duration").bold(), request.duration);
    }
    println!(
        "{}: {}",
        style("Team").bold(),
        helpers::team_name(&store, request.team_id.as_ref())
    );
    if !request.technician.is_empty() {
        println!("{}: {}", style("Technician").bold(), request.technician);
    }
    if !request.notes.is_empty() {
        println!();
        println!("{}", style("Notes:").bold());
        println!("{}", request.notes);
    }
    if !request.instructions.is_empty() {
        println!();
        println!("{}", style("Instructions:").bold());
        println!("{}", request.instructions);
    }
    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {} | {}: {} | {}: {}",
        style("Created").dim(),
        request.created_at.format("%Y-%m-%d %H:%M"),
        style("Updated").dim(),
        request.updated_at.format("%Y-%m-%d %H:%M"),
        style("Comments").dim(),
        request.comments.len()
    );
    Ok(())
}

fn run_edit(args: EditArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);

    let request = find_request(&store, &args.id)?;

    let equipment_id = match args.equipment {
        Some(query) => Some(find_equipment(&store, &query)?.id),
        None => None,
    };
    let team_id = match args.team {
        Some(query) => Some(resolve_team_reference(&store, &query)?),
        None => None,
    };

    let patch = RequestPatch {
        subject: args.subject,
        equipment_id,
        request_type: args.request_type,
        scheduled_date: args.scheduled.as_deref().map(helpers::parse_date).transpose()?,
        duration: args.duration,
        priority: args.priority,
        technician: args.technician,
        team_id,
        company: args.company,
        notes: args.notes,
        instructions: args.instructions,
    };
    if patch.is_empty() {
        return Err(miette::miette!(
            "Nothing to update. Pass at least one field flag. Use 'ggd request move' to change stage."
        ));
    }

    let lifecycle = Lifecycle::new(&store);
    let updated = lifecycle
        .update(&request.id, patch)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Updated request {}",
        style("✓").green(),
        style(&updated.id).cyan()
    );
    Ok(())
}

fn run_move(args: MoveArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);

    let request = find_request(&store, &args.id)?;

    if args.stage == Stage::Scrap && !args.yes {
        let equipment_name = store
            .find_equipment(&request.equipment_id)
            .ok()
            .flatten()
            .map(|e| e.name)
            .unwrap_or_else(|| "this equipment".to_string());

        println!(
            "{} Moving to scrap permanently marks \"{}\" as scrapped and removes it from active equipment lists.",
            style("⚠").yellow(),
            equipment_name
        );
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Are you sure you want to continue?")
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let lifecycle = Lifecycle::new(&store);
    let moved = lifecycle
        .transition(&request.id, args.stage)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Moved request {} to {}",
        style("✓").green(),
        style(&moved.id).cyan(),
        style(moved.stage).yellow()
    );

    if args.stage == Stage::Scrap {
        match store
            .find_equipment(&moved.equipment_id)
            .map_err(|e| miette::miette!("{}", e))?
        {
            Some(equipment) => println!(
                "  {} Equipment \"{}\" marked as scrapped",
                style("⚠").yellow(),
                equipment.name
            ),
            None => println!(
                "  Equipment reference did not resolve; only the request was updated"
            ),
        }
    }
    Ok(())
}

fn run_delete(args: DeleteArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);

    let request = find_request(&store, &args.id)?;

    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete request \"{}\"?", request.subject))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let lifecycle = Lifecycle::new(&store);
    lifecycle
        .delete(&request.id)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Deleted request {}",
        style("✓").green(),
        style(&request.id).cyan()
    );
    Ok(())
}

fn run_comment_add(args: CommentAddArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);
    let config = Config::load(&project);

    let request = find_request(&store, &args.id)?;
    let author = args.author.unwrap_or_else(|| config.user());

    let lifecycle = Lifecycle::new(&store);
    lifecycle
        .add_comment(&request.id, &author, &args.text)
        .map_err(|e| miette::miette!("{}", e))?;

    let total = store
        .find_request(&request.id)
        .map_err(|e| miette::miette!("{}", e))?
        .map(|r| r.comments.len())
        .unwrap_or(0);

    println!(
        "{} Added comment to {} ({} total)",
        style("✓").green(),
        style(&request.id).cyan(),
        total
    );
    Ok(())
}

fn run_comment_list(args: CommentListArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);

    let request = find_request(&store, &args.id)?;

    println!(
        "{} ({})",
        style("Comment history").bold(),
        request.comments.len()
    );
    if request.comments.is_empty() {
        println!("No comments yet. Add the first one!");
        return Ok(());
    }

    // stored oldest first; shown newest first
    for comment in request.comments.iter().rev() {
        println!();
        println!(
            "{} {}",
            style(&comment.author).cyan(),
            style(comment.timestamp.format("%Y-%m-%d %H:%M")).dim()
        );
        println!("  {}", comment.text);
    }
    Ok(())
}

/// Resolve a `--team` flag to a team id, keeping unmatched values verbatim -
/// team references are weak by design.
fn resolve_team_reference(store: &Store, query: &str) -> Result<RecordId> {
    match find_team(store, query) {
        Ok(team) => Ok(team.id),
        Err(_) => Ok(RecordId::from(query)),
    }
}
