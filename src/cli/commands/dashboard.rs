//! `ggd dashboard` command - metrics, breakdowns, recent activity

use chrono::Utc;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::{helpers, viz};
use crate::core::analytics::Analytics;
use crate::core::project::Project;
use crate::store::Store;

/// Width of the breakdown bars
const BAR_WIDTH: usize = 24;

#[derive(clap::Args, Debug)]
pub struct DashboardArgs {
    /// Emit the metrics as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: DashboardArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);
    let analytics = Analytics::new(&store);
    let now = Utc::now();

    let technician_load = analytics.technician_load().map_err(|e| miette::miette!("{}", e))?;
    let open = analytics
        .open_requests_count()
        .map_err(|e| miette::miette!("{}", e))?;
    let overdue = analytics
        .overdue_requests_count(now)
        .map_err(|e| miette::miette!("{}", e))?;
    let critical = analytics
        .critical_equipment_count()
        .map_err(|e| miette::miette!("{}", e))?;
    let by_team = analytics
        .requests_by_team()
        .map_err(|e| miette::miette!("{}", e))?;
    let by_category = analytics
        .requests_by_category()
        .map_err(|e| miette::miette!("{}", e))?;

    if args.json {
        let summary = serde_json::json!({
            "technician_load": technician_load,
            "open_requests": open,
            "overdue_requests": overdue,
            "critical_equipment": critical,
            "by_team": by_team,
            "by_category": by_category,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).into_diagnostic()?
        );
        return Ok(());
    }

    println!("{}", style("Maintenance Dashboard").bold());
    println!("{}", style("─".repeat(48)).dim());
    println!(
        "  {:<20} {}%",
        "Technician load",
        style(technician_load).cyan()
    );
    println!(
        "  {:<20} {} ({} overdue)",
        "Open requests",
        style(open).cyan(),
        style(overdue).red()
    );
    println!(
        "  {:<20} {}",
        "Critical equipment",
        style(critical).red()
    );

    println!();
    println!("{}", style("Requests by team").bold());
    println!("{}", viz::render_bar_chart(&by_team, BAR_WIDTH));

    println!();
    println!("{}", style("Requests by category").bold());
    println!("{}", viz::render_bar_chart(&by_category, BAR_WIDTH));

    println!();
    println!("{}", style("Recent activity").bold());
    let recent = analytics
        .recent_activity(5)
        .map_err(|e| miette::miette!("{}", e))?;
    if recent.is_empty() {
        println!("  No recent activity");
    }
    for request in recent {
        println!(
            "  {} — {} · {} · {}",
            helpers::truncate_str(&request.subject, 36),
            helpers::truncate_str(
                &helpers::equipment_name(&store, &request.equipment_id),
                24
            ),
            request.stage.label().to_uppercase(),
            style(helpers::relative_time(request.updated_at, now)).dim()
        );
    }

    Ok(())
}
