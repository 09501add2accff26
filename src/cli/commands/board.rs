//! `ggd board` command - kanban view of the request pipeline

use chrono::Utc;
use console::style;
use miette::Result;

use crate::cli::helpers;
use crate::core::analytics::Analytics;
use crate::core::lifecycle::is_overdue;
use crate::core::project::Project;
use crate::entities::Stage;
use crate::store::Store;

#[derive(clap::Args, Debug)]
pub struct BoardArgs {}

pub fn run(_args: BoardArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);
    let analytics = Analytics::new(&store);
    let now = Utc::now();

    let requests = store.requests().map_err(|e| miette::miette!("{}", e))?;
    let counts = analytics
        .requests_by_stage()
        .map_err(|e| miette::miette!("{}", e))?;

    for stage in Stage::ALL {
        println!(
            "{} {}",
            style(format!("{} ({})", stage.label().to_uppercase(), counts.get(stage))).bold(),
            style("─".repeat(40)).dim()
        );

        let column: Vec<_> = requests.iter().filter(|r| r.stage == stage).collect();
        if column.is_empty() {
            println!("  No requests");
        }
        for request in column {
            let overdue = if is_overdue(request, now) {
                format!(" {}", style("(overdue)").red())
            } else {
                String::new()
            };
            println!(
                "  • {} {} — {} [{}] {}{}",
                helpers::format_short_id(&request.id),
                helpers::truncate_str(&request.subject, 36),
                helpers::truncate_str(
                    &helpers::equipment_name(&store, &request.equipment_id),
                    24
                ),
                request.request_type,
                request.priority.stars(),
                overdue
            );
        }
        println!();
    }

    Ok(())
}
