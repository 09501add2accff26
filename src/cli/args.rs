//! Top-level argument definitions

use clap::{Parser, Subcommand};

use crate::cli::commands;

#[derive(Parser, Debug)]
#[command(
    name = "ggd",
    version,
    about = "GearGuard - plain-text maintenance management",
    long_about = "Track equipment, maintenance teams, categories, and maintenance \
                  requests as YAML records, with terminal dashboard, kanban board, \
                  and calendar views."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a GearGuard project in the current directory
    Init(commands::init::InitArgs),

    /// Manage equipment records
    #[command(alias = "eq")]
    Equipment {
        #[command(subcommand)]
        cmd: commands::equipment::EquipmentCommands,
    },

    /// Manage maintenance teams
    Team {
        #[command(subcommand)]
        cmd: commands::team::TeamCommands,
    },

    /// Manage equipment categories
    #[command(alias = "cat")]
    Category {
        #[command(subcommand)]
        cmd: commands::category::CategoryCommands,
    },

    /// Manage maintenance requests
    #[command(alias = "req")]
    Request {
        #[command(subcommand)]
        cmd: commands::request::RequestCommands,
    },

    /// Show the kanban board
    Board(commands::board::BoardArgs),

    /// Show dashboard metrics
    Dashboard(commands::dashboard::DashboardArgs),

    /// Show the preventive maintenance calendar
    Calendar(commands::calendar::CalendarArgs),

    /// Generate shell completions
    Completions(commands::completions::CompletionsArgs),
}
