//! `ggd equipment` command - equipment records

use chrono::Utc;
use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};
use tabled::{settings::Style, Table, Tabled};

use crate::cli::helpers::{self, find_equipment, find_team};
use crate::core::analytics::Analytics;
use crate::core::config::Config;
use crate::core::identity::RecordId;
use crate::core::project::Project;
use crate::entities::{Equipment, EquipmentPatch};
use crate::store::Store;

#[derive(Subcommand, Debug)]
pub enum EquipmentCommands {
    /// List equipment
    List(ListArgs),

    /// Register new equipment
    New(NewArgs),

    /// Show one equipment record
    Show(ShowArgs),

    /// Edit fields on an equipment record
    Edit(EditArgs),

    /// Delete an equipment record
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by department (exact match)
    #[arg(long, short = 'd')]
    pub department: Option<String>,

    /// Filter by category name (exact match)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Search in name and serial number (case-insensitive substring)
    #[arg(long)]
    pub search: Option<String>,

    /// Show only scrapped equipment
    #[arg(long)]
    pub scrapped: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Equipment name
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub serial_number: Option<String>,

    /// Purchase date (YYYY-MM-DD)
    #[arg(long)]
    pub purchase_date: Option<String>,

    /// Warranty expiry date (YYYY-MM-DD)
    #[arg(long)]
    pub warranty: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub department: Option<String>,

    /// Employee the equipment is assigned to
    #[arg(long)]
    pub employee: Option<String>,

    /// Maintenance team (id or name)
    #[arg(long)]
    pub team: Option<String>,

    /// Default technician name
    #[arg(long)]
    pub technician: Option<String>,

    /// Category name
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Assignment date (YYYY-MM-DD)
    #[arg(long)]
    pub assigned_date: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Equipment id or name
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Equipment id or name
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub serial_number: Option<String>,

    /// Purchase date (YYYY-MM-DD)
    #[arg(long)]
    pub purchase_date: Option<String>,

    /// Warranty expiry date (YYYY-MM-DD)
    #[arg(long)]
    pub warranty: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub department: Option<String>,

    #[arg(long)]
    pub employee: Option<String>,

    /// Maintenance team (id or name)
    #[arg(long)]
    pub team: Option<String>,

    #[arg(long)]
    pub technician: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Assignment date (YYYY-MM-DD)
    #[arg(long)]
    pub assigned_date: Option<String>,

    /// Mark the equipment as scrapped (scrap date is stamped today)
    #[arg(long, conflicts_with = "restore")]
    pub scrap: bool,

    /// Clear the scrapped flag
    #[arg(long)]
    pub restore: bool,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Equipment id or name
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Tabled)]
struct EquipmentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "SERIAL")]
    serial: String,
    #[tabled(rename = "CATEGORY")]
    category: String,
    #[tabled(rename = "LOCATION")]
    location: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "OPEN")]
    open: usize,
}

pub fn run(cmd: EquipmentCommands) -> Result<()> {
    match cmd {
        EquipmentCommands::List(args) => run_list(args),
        EquipmentCommands::New(args) => run_new(args),
        EquipmentCommands::Show(args) => run_show(args),
        EquipmentCommands::Edit(args) => run_edit(args),
        EquipmentCommands::Delete(args) => run_delete(args),
    }
}

fn run_list(args: ListArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);
    let analytics = Analytics::new(&store);

    let mut items = store.equipment().map_err(|e| miette::miette!("{}", e))?;

    if let Some(department) = &args.department {
        items.retain(|e| &e.department == department);
    }
    if let Some(category) = &args.category {
        items.retain(|e| &e.category == category);
    }
    if let Some(search) = &args.search {
        let term = search.to_lowercase();
        items.retain(|e| {
            e.name.to_lowercase().contains(&term) || e.serial_number.to_lowercase().contains(&term)
        });
    }
    if args.scrapped {
        items.retain(|e| e.is_scrap);
    }

    if items.is_empty() {
        println!("No equipment found.");
        println!();
        println!("Register some with: {}", style("ggd equipment new").yellow());
        return Ok(());
    }

    let rows: Vec<EquipmentRow> = items
        .iter()
        .map(|item| {
            let open = analytics
                .open_requests_for_equipment(&item.id)
                .map(|r| r.len())
                .unwrap_or(0);
            EquipmentRow {
                id: helpers::format_short_id(&item.id),
                name: helpers::truncate_str(&item.name, 28),
                serial: item.serial_number.clone(),
                category: item.category.clone(),
                location: helpers::truncate_str(&item.location, 20),
                status: if item.is_scrap { "Scrapped" } else { "Active" }.to_string(),
                open,
            }
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::sharp()));
    println!();
    println!("{} equipment record(s)", style(items.len()).cyan());

    Ok(())
}

fn run_new(args: NewArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);
    let config = Config::load(&project);

    let mut item = Equipment::new(args.name);
    item.serial_number = args.serial_number.unwrap_or_default();
    item.purchase_date = args.purchase_date.as_deref().map(helpers::parse_date).transpose()?;
    item.warranty = args.warranty.as_deref().map(helpers::parse_date).transpose()?;
    item.location = args.location.unwrap_or_default();
    item.department = args.department.unwrap_or_default();
    item.employee = args.employee.unwrap_or_default();
    item.team_id = resolve_team_reference(&store, args.team.as_deref())?;
    item.technician = args.technician.unwrap_or_default();
    item.category = args.category.unwrap_or_default();
    item.company = args.company.unwrap_or_else(|| config.company());
    item.description = args.description.unwrap_or_default();
    item.assigned_date = args.assigned_date.as_deref().map(helpers::parse_date).transpose()?;

    let item = store.add_equipment(item).map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Created equipment {}",
        style("✓").green(),
        style(&item.id).cyan()
    );
    Ok(())
}

fn run_show(args: ShowArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);
    let analytics = Analytics::new(&store);

    let item = find_equipment(&store, &args.id)?;

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(&item.id).cyan());
    println!("{}: {}", style("Name").bold(), style(&item.name).yellow());
    if !item.serial_number.is_empty() {
        println!("{}: {}", style("Serial").bold(), item.serial_number);
    }
    if !item.category.is_empty() {
        println!("{}: {}", style("Category").bold(), item.category);
    }
    if !item.location.is_empty() {
        println!("{}: {}", style("Location").bold(), item.location);
    }
    if !item.department.is_empty() {
        println!("{}: {}", style("Department").bold(), item.department);
    }
    if !item.employee.is_empty() {
        println!("{}: {}", style("Employee").bold(), item.employee);
    }
    println!(
        "{}: {}",
        style("Team").bold(),
        helpers::team_name(&store, item.team_id.as_ref())
    );
    if !item.technician.is_empty() {
        println!("{}: {}", style("Technician").bold(), item.technician);
    }
    if let Some(purchase_date) = item.purchase_date {
        println!("{}: {}", style("Purchased").bold(), purchase_date);
    }
    if let Some(warranty) = item.warranty {
        println!("{}: {}", style("Warranty until").bold(), warranty);
    }
    if item.is_scrap {
        let date = item
            .scrap_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "unknown date".to_string());
        println!("{}: {}", style("Status").bold(), style(format!("Scrapped on {}", date)).red());
    } else {
        println!("{}: {}", style("Status").bold(), style("Active").green());
    }
    if !item.description.is_empty() {
        println!();
        println!("{}", item.description);
    }

    let open = analytics
        .open_requests_for_equipment(&item.id)
        .map_err(|e| miette::miette!("{}", e))?;
    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("Open requests").bold(), open.len());
    for request in &open {
        println!(
            "  {} {} [{}]",
            helpers::format_short_id(&request.id),
            helpers::truncate_str(&request.subject, 40),
            request.stage
        );
    }

    Ok(())
}

fn run_edit(args: EditArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);

    let item = find_equipment(&store, &args.id)?;

    let patch = EquipmentPatch {
        name: args.name,
        serial_number: args.serial_number,
        purchase_date: args.purchase_date.as_deref().map(helpers::parse_date).transpose()?,
        warranty: args.warranty.as_deref().map(helpers::parse_date).transpose()?,
        location: args.location,
        department: args.department,
        employee: args.employee,
        team_id: resolve_team_reference(&store, args.team.as_deref())?,
        technician: args.technician,
        category: args.category,
        company: args.company,
        description: args.description,
        assigned_date: args.assigned_date.as_deref().map(helpers::parse_date).transpose()?,
        is_scrap: if args.scrap {
            Some(true)
        } else if args.restore {
            Some(false)
        } else {
            None
        },
    };

    if patch.is_empty() {
        return Err(miette::miette!(
            "Nothing to update. Pass at least one field flag."
        ));
    }

    let today = Utc::now().date_naive();
    let updated = store
        .update_equipment(&item.id, patch, today)
        .map_err(|e| miette::miette!("{}", e))?
        .ok_or_else(|| miette::miette!("No equipment found with id '{}'", item.id))?;

    println!(
        "{} Updated equipment {}",
        style("✓").green(),
        style(&updated.id).cyan()
    );
    if updated.is_scrap && args.scrap {
        println!(
            "  Marked as scrapped on {}",
            updated
                .scrap_date
                .map(|d| d.to_string())
                .unwrap_or_default()
        );
    }
    Ok(())
}

fn run_delete(args: DeleteArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);

    let item = find_equipment(&store, &args.id)?;

    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Delete equipment \"{}\"? Requests referencing it will keep a dangling link.",
                item.name
            ))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    store
        .delete_equipment(&item.id)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Deleted equipment {}",
        style("✓").green(),
        style(&item.id).cyan()
    );
    Ok(())
}

/// Resolve a `--team` flag to a team id. A value that matches no team is
/// kept verbatim - team references are weak by design.
fn resolve_team_reference(store: &Store, team: Option<&str>) -> Result<Option<RecordId>> {
    let Some(query) = team else {
        return Ok(None);
    };
    match find_team(store, query) {
        Ok(team) => Ok(Some(team.id)),
        Err(_) => Ok(Some(RecordId::from(query))),
    }
}
