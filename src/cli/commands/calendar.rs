//! `ggd calendar` command - preventive maintenance by month

use chrono::{Datelike, NaiveDate, Utc};
use console::style;
use miette::Result;

use crate::cli::{helpers, viz};
use crate::core::analytics::Analytics;
use crate::core::project::Project;
use crate::entities::RequestType;
use crate::store::Store;

#[derive(clap::Args, Debug)]
pub struct CalendarArgs {
    /// Month to show (YYYY-MM, defaults to the current month)
    #[arg(long, short = 'm')]
    pub month: Option<String>,
}

pub fn run(args: CalendarArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = Store::open(&project);
    let analytics = Analytics::new(&store);

    let today = Utc::now().date_naive();
    let (year, month) = match &args.month {
        Some(value) => parse_month(value)?,
        None => (today.year(), today.month()),
    };

    let grid = viz::month_grid(year, month)
        .ok_or_else(|| miette::miette!("Invalid month '{}-{:02}'", year, month))?;

    // one lookup per day; every cell reflects the live store
    let mut scheduled: Vec<(NaiveDate, Vec<String>)> = Vec::new();
    let mut marked: Vec<u32> = Vec::new();
    for day in 1..=grid.days_in_month {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            continue;
        };
        let requests = analytics
            .requests_for_date(date, RequestType::Preventive)
            .map_err(|e| miette::miette!("{}", e))?;
        if !requests.is_empty() {
            marked.push(day);
            scheduled.push((
                date,
                requests
                    .iter()
                    .map(|r| {
                        format!(
                            "{} ({})",
                            r.subject,
                            helpers::equipment_name(&store, &r.equipment_id)
                        )
                    })
                    .collect(),
            ));
        }
    }

    let header = NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_default();
    println!("{:^37}", style(header).bold());

    let today_in_month = (today.year() == year && today.month() == month).then(|| today.day());
    println!("{}", viz::render_month_grid(&grid, &marked, today_in_month));

    println!();
    if scheduled.is_empty() {
        println!("No preventive requests scheduled this month.");
        return Ok(());
    }

    println!("{}", style("Scheduled preventive work").bold());
    for (date, subjects) in scheduled {
        for subject in subjects {
            println!("  {}  {}", style(date.format("%b %d")).cyan(), subject);
        }
    }
    Ok(())
}

/// Parse a YYYY-MM month argument
fn parse_month(value: &str) -> Result<(i32, u32)> {
    let error = || miette::miette!("Invalid month '{}'. Use YYYY-MM", value);

    let (year, month) = value.split_once('-').ok_or_else(error)?;
    let year: i32 = year.parse().map_err(|_| error())?;
    let month: u32 = month.parse().map_err(|_| error())?;
    if !(1..=12).contains(&month) {
        return Err(error());
    }
    Ok((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2026-08").unwrap(), (2026, 8));
        assert_eq!(parse_month("2021-1").unwrap(), (2021, 1));
        assert!(parse_month("2026").is_err());
        assert!(parse_month("2026-13").is_err());
        assert!(parse_month("aug 2026").is_err());
    }
}
