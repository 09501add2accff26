//! `ggd category` command - equipment categories
//!
//! Equipment carries its category as a name, so renaming a category leaves
//! existing equipment on the old name. The commands here do not try to
//! repair that; the looseness is part of the data model.

use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};
use tabled::{settings::Style, Table, Tabled};

use crate::cli::helpers::{self, find_category};
use crate::core::config::Config;
use crate::core::project::Project;
use crate::entities::{Category, CategoryPatch};
use crate::store::Store;

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// List categories
    List,

    /// Create a new category
    New(NewArgs),

    /// Edit a category
    Edit(EditArgs),

    /// Delete a category
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Category name
    #[arg(long)]
    pub name: String,

    /// Responsible person
    #[arg(long)]
    pub responsible: Option<String>,

    #[arg(long)]
    pub company: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Category id or name
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub responsible: Option<String>,

    #[arg(long)]
    pub company: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Category id or name
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "RESPONSIBLE")]
    responsible: String,
    #[tabled(rename = "EQUIPMENT")]
    equipment: usize,
}

pub fn run(cmd: CategoryCommands) -> Result<()> {
    match cmd {
        CategoryCommands::List => run_list(),
        CategoryCommands::New(args) => run_new(args),
        CategoryCommands::Edit(args) => run_edit(args),
        CategoryCommands::Delete(args) => run_delete(args),
    }
}

fn run_list() -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);

    let categories = store.categories().map_err(|e| miette::miette!("{}", e))?;
    if categories.is_empty() {
        println!("No categories found.");
        println!();
        println!("Create one with: {}", style("ggd category new").yellow());
        return Ok(());
    }

    let equipment = store.equipment().map_err(|e| miette::miette!("{}", e))?;

    let rows: Vec<CategoryRow> = categories
        .iter()
        .map(|category| CategoryRow {
            id: helpers::format_short_id(&category.id),
            name: category.name.clone(),
            responsible: category.responsible.clone(),
            equipment: equipment.iter().filter(|e| e.category == category.name).count(),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::sharp()));
    println!();
    println!("{} category(ies)", style(categories.len()).cyan());
    Ok(())
}

fn run_new(args: NewArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);
    let config = Config::load(&project);

    let mut category = Category::new(args.name);
    category.responsible = args.responsible.unwrap_or_default();
    category.company = args.company.unwrap_or_else(|| config.company());

    let category = store
        .add_category(category)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Created category {}",
        style("✓").green(),
        style(&category.id).cyan()
    );
    Ok(())
}

fn run_edit(args: EditArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);

    let category = find_category(&store, &args.id)?;

    let patch = CategoryPatch {
        name: args.name,
        responsible: args.responsible,
        company: args.company,
    };
    if patch.is_empty() {
        return Err(miette::miette!(
            "Nothing to update. Pass at least one field flag."
        ));
    }

    let renaming = patch.name.is_some();
    let updated = store
        .update_category(&category.id, patch)
        .map_err(|e| miette::miette!("{}", e))?
        .ok_or_else(|| miette::miette!("No category found with id '{}'", category.id))?;

    println!(
        "{} Updated category {}",
        style("✓").green(),
        style(&updated.id).cyan()
    );
    if renaming {
        println!(
            "  {} Equipment keeps its old category name; update records as needed.",
            style("!").yellow()
        );
    }
    Ok(())
}

fn run_delete(args: DeleteArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);

    let category = find_category(&store, &args.id)?;

    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete category \"{}\"?", category.name))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    store
        .delete_category(&category.id)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Deleted category {}",
        style("✓").green(),
        style(&category.id).cyan()
    );
    Ok(())
}
