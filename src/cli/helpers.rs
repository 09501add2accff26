//! Shared helper functions for CLI commands

use chrono::{DateTime, NaiveDate, Utc};
use console::style;
use miette::Result;

use crate::core::identity::RecordId;
use crate::entities::{Category, Equipment, MaintenanceRequest, Team};
use crate::store::Store;

/// Format a record id for table display, truncating if too long
pub fn format_short_id(id: &RecordId) -> String {
    let s = id.to_string();
    if s.len() > 16 {
        format!("{}...", &s[..13])
    } else {
        s
    }
}

/// Truncate a string to max_len, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

/// Parse a YYYY-MM-DD date argument
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    s.parse()
        .map_err(|_| miette::miette!("Invalid date '{}'. Use YYYY-MM-DD", s))
}

/// Coarse relative timestamp for activity feeds
pub fn relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now - timestamp).num_days();
    match days {
        i64::MIN..=0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{} days ago", days),
        7..=29 => format!("{} weeks ago", days / 7),
        _ => timestamp.format("%b %-d, %Y").to_string(),
    }
}

/// Resolve a user-supplied reference against a record list: exact id first,
/// then id prefix, then case-insensitive label substring. Ambiguity is an
/// error listing the candidates.
fn resolve<T: Clone>(
    items: &[T],
    query: &str,
    kind: &str,
    id_of: impl Fn(&T) -> &RecordId,
    label_of: impl Fn(&T) -> &str,
) -> Result<T> {
    if let Some(exact) = items.iter().find(|item| id_of(item).as_str() == query) {
        return Ok(exact.clone());
    }

    let lowered = query.to_lowercase();
    let matches: Vec<&T> = items
        .iter()
        .filter(|item| {
            id_of(item).as_str().starts_with(query)
                || label_of(item).to_lowercase().contains(&lowered)
        })
        .collect();

    match matches.len() {
        0 => Err(miette::miette!("No {} found matching '{}'", kind, query)),
        1 => Ok(matches[0].clone()),
        _ => {
            println!("{} Multiple matches found:", style("!").yellow());
            for item in &matches {
                println!("  {} - {}", format_short_id(id_of(item)), label_of(item));
            }
            Err(miette::miette!(
                "Ambiguous query '{}'. Please be more specific.",
                query
            ))
        }
    }
}

pub fn find_request(store: &Store, query: &str) -> Result<MaintenanceRequest> {
    let items = store.requests().map_err(|e| miette::miette!("{}", e))?;
    resolve(&items, query, "request", |r| &r.id, |r| &r.subject)
}

pub fn find_equipment(store: &Store, query: &str) -> Result<Equipment> {
    let items = store.equipment().map_err(|e| miette::miette!("{}", e))?;
    resolve(&items, query, "equipment", |e| &e.id, |e| &e.name)
}

pub fn find_team(store: &Store, query: &str) -> Result<Team> {
    let items = store.teams().map_err(|e| miette::miette!("{}", e))?;
    resolve(&items, query, "team", |t| &t.id, |t| &t.name)
}

pub fn find_category(store: &Store, query: &str) -> Result<Category> {
    let items = store.categories().map_err(|e| miette::miette!("{}", e))?;
    resolve(&items, query, "category", |c| &c.id, |c| &c.name)
}

/// Team display name for a weak reference; a dangling or absent reference
/// reads as unassigned
pub fn team_name(store: &Store, team_id: Option<&RecordId>) -> String {
    team_id
        .and_then(|id| store.find_team(id).ok().flatten())
        .map(|t| t.name)
        .unwrap_or_else(|| "Unassigned".to_string())
}

/// Equipment display name for a weak reference
pub fn equipment_name(store: &Store, equipment_id: &RecordId) -> String {
    store
        .find_equipment(equipment_id)
        .ok()
        .flatten()
        .map(|e| e.name)
        .unwrap_or_else(|| "Unknown equipment".to_string())
}
