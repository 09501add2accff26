//! Read-side analytics over the record store
//!
//! Every projection reads the current snapshot when called; nothing is
//! cached. Collections are small and in memory, so recomputation is cheap
//! and the numbers can never go stale.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::core::identity::RecordId;
use crate::core::lifecycle::is_overdue;
use crate::entities::{MaintenanceRequest, RequestType, Stage};
use crate::store::{Store, StoreError};

/// Requests per board column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageCounts {
    pub new: usize,
    pub in_progress: usize,
    pub repaired: usize,
    pub scrap: usize,
}

impl StageCounts {
    pub fn get(&self, stage: Stage) -> usize {
        match stage {
            Stage::New => self.new,
            Stage::InProgress => self.in_progress,
            Stage::Repaired => self.repaired,
            Stage::Scrap => self.scrap,
        }
    }
}

/// A (label, count) aggregation row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountRow {
    pub name: String,
    pub count: usize,
}

/// Label used when a request's equipment is missing or uncategorized
pub const UNCATEGORIZED: &str = "Uncategorized";

/// The analytics engine: pure projections for the dashboard and calendar
pub struct Analytics<'a> {
    store: &'a Store,
}

impl<'a> Analytics<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Share of open work actively in progress, as a rounded percentage.
    /// Zero when there is no open work at all.
    pub fn technician_load(&self) -> Result<u32, StoreError> {
        let requests = self.store.requests()?;
        let active = requests
            .iter()
            .filter(|r| r.stage == Stage::InProgress)
            .count();
        let open = requests.iter().filter(|r| !r.stage.is_terminal()).count();
        if open == 0 {
            return Ok(0);
        }
        Ok((active as f64 / open as f64 * 100.0).round() as u32)
    }

    /// Requests not yet repaired or scrapped
    pub fn open_requests_count(&self) -> Result<usize, StoreError> {
        let requests = self.store.requests()?;
        Ok(requests.iter().filter(|r| !r.stage.is_terminal()).count())
    }

    pub fn overdue_requests_count(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let requests = self.store.requests()?;
        Ok(requests.iter().filter(|r| is_overdue(r, now)).count())
    }

    /// Equipment that is scrapped or carries three or more open requests
    pub fn critical_equipment_count(&self) -> Result<usize, StoreError> {
        let equipment = self.store.equipment()?;
        let requests = self.store.requests()?;

        Ok(equipment
            .iter()
            .filter(|item| {
                if item.is_scrap {
                    return true;
                }
                let open = requests
                    .iter()
                    .filter(|r| r.equipment_id == item.id && !r.stage.is_terminal())
                    .count();
                open >= 3
            })
            .count())
    }

    pub fn requests_by_stage(&self) -> Result<StageCounts, StoreError> {
        let requests = self.store.requests()?;
        let count = |stage: Stage| requests.iter().filter(|r| r.stage == stage).count();
        Ok(StageCounts {
            new: count(Stage::New),
            in_progress: count(Stage::InProgress),
            repaired: count(Stage::Repaired),
            scrap: count(Stage::Scrap),
        })
    }

    /// One row per team, in store order; teams without requests count zero
    pub fn requests_by_team(&self) -> Result<Vec<CountRow>, StoreError> {
        let teams = self.store.teams()?;
        let requests = self.store.requests()?;

        Ok(teams
            .iter()
            .map(|team| CountRow {
                name: team.name.clone(),
                count: requests
                    .iter()
                    .filter(|r| r.team_id.as_ref() == Some(&team.id))
                    .count(),
            })
            .collect())
    }

    /// Requests grouped by the resolved equipment's category, in first-seen
    /// order. Missing equipment and blank categories land in
    /// [`UNCATEGORIZED`].
    pub fn requests_by_category(&self) -> Result<Vec<CountRow>, StoreError> {
        let equipment = self.store.equipment()?;
        let requests = self.store.requests()?;

        let mut rows: Vec<CountRow> = Vec::new();
        for request in &requests {
            let category = equipment
                .iter()
                .find(|e| e.id == request.equipment_id)
                .map(|e| e.category.as_str())
                .filter(|c| !c.is_empty())
                .unwrap_or(UNCATEGORIZED);

            match rows.iter_mut().find(|row| row.name == category) {
                Some(row) => row.count += 1,
                None => rows.push(CountRow {
                    name: category.to_string(),
                    count: 1,
                }),
            }
        }
        Ok(rows)
    }

    /// Requests scheduled on a calendar date, filtered by type. The
    /// calendar passes `Preventive`.
    pub fn requests_for_date(
        &self,
        date: NaiveDate,
        type_filter: RequestType,
    ) -> Result<Vec<MaintenanceRequest>, StoreError> {
        let requests = self.store.requests()?;
        Ok(requests
            .into_iter()
            .filter(|r| r.scheduled_date == Some(date) && r.request_type == type_filter)
            .collect())
    }

    pub fn requests_for_equipment(
        &self,
        equipment_id: &RecordId,
    ) -> Result<Vec<MaintenanceRequest>, StoreError> {
        let requests = self.store.requests()?;
        Ok(requests
            .into_iter()
            .filter(|r| &r.equipment_id == equipment_id)
            .collect())
    }

    pub fn open_requests_for_equipment(
        &self,
        equipment_id: &RecordId,
    ) -> Result<Vec<MaintenanceRequest>, StoreError> {
        Ok(self
            .requests_for_equipment(equipment_id)?
            .into_iter()
            .filter(|r| !r.stage.is_terminal())
            .collect())
    }

    /// Most recently touched requests, newest first
    pub fn recent_activity(&self, limit: usize) -> Result<Vec<MaintenanceRequest>, StoreError> {
        let mut requests = self.store.requests()?;
        requests.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        requests.truncate(limit);
        Ok(requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::RecordPrefix;
    use crate::core::project::Project;
    use crate::entities::{Equipment, Priority, Team};
    use chrono::Duration;
    use tempfile::{tempdir, TempDir};

    fn test_store(tmp: &TempDir) -> Store {
        let project = Project::init(tmp.path()).unwrap();
        Store::open(&project)
    }

    fn request(
        equipment_id: &str,
        team_id: Option<&RecordId>,
        stage: Stage,
        request_type: RequestType,
        scheduled_date: Option<NaiveDate>,
    ) -> MaintenanceRequest {
        let now = Utc::now();
        MaintenanceRequest {
            id: RecordId::new(RecordPrefix::Request),
            subject: format!("Work on {}", equipment_id),
            equipment_id: RecordId::from(equipment_id),
            request_type,
            stage,
            scheduled_date,
            duration: 0.0,
            priority: Priority::Low,
            technician: String::new(),
            team_id: team_id.cloned(),
            company: String::new(),
            notes: String::new(),
            instructions: String::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_technician_load_zero_without_open_work() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let analytics = Analytics::new(&store);

        // empty store
        assert_eq!(analytics.technician_load().unwrap(), 0);

        // only terminal requests: denominator is still zero
        store
            .set_requests(&[
                request("eq1", None, Stage::Repaired, RequestType::Corrective, None),
                request("eq1", None, Stage::Scrap, RequestType::Corrective, None),
            ])
            .unwrap();
        assert_eq!(analytics.technician_load().unwrap(), 0);
    }

    #[test]
    fn test_technician_load_rounds() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let analytics = Analytics::new(&store);

        // 1 in progress of 3 open = 33%
        store
            .set_requests(&[
                request("eq1", None, Stage::InProgress, RequestType::Corrective, None),
                request("eq2", None, Stage::New, RequestType::Corrective, None),
                request("eq3", None, Stage::New, RequestType::Corrective, None),
                request("eq4", None, Stage::Repaired, RequestType::Corrective, None),
            ])
            .unwrap();
        assert_eq!(analytics.technician_load().unwrap(), 33);
    }

    #[test]
    fn test_open_and_overdue_counts() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let analytics = Analytics::new(&store);
        let now = Utc::now();

        let yesterday = (now - Duration::days(1)).date_naive();
        store
            .set_requests(&[
                request("eq1", None, Stage::New, RequestType::Corrective, Some(yesterday)),
                request("eq2", None, Stage::InProgress, RequestType::Corrective, None),
                request("eq3", None, Stage::Repaired, RequestType::Corrective, Some(yesterday)),
            ])
            .unwrap();

        assert_eq!(analytics.open_requests_count().unwrap(), 2);
        // only the open request with yesterday's schedule is overdue
        assert_eq!(analytics.overdue_requests_count(now).unwrap(), 1);
    }

    #[test]
    fn test_critical_equipment_scrap_or_three_open() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let analytics = Analytics::new(&store);

        let mut scrapped = Equipment::new("Generator Backup");
        scrapped.mark_scrapped(Utc::now().date_naive());
        let busy = Equipment::new("CNC Machine #1");
        let quiet = Equipment::new("Laptop Dell XPS");
        let busy_id = busy.id.clone();
        let quiet_id = quiet.id.clone();
        store.set_equipment(&[scrapped, busy, quiet]).unwrap();

        store
            .set_requests(&[
                request(busy_id.as_str(), None, Stage::New, RequestType::Corrective, None),
                request(busy_id.as_str(), None, Stage::New, RequestType::Corrective, None),
                request(busy_id.as_str(), None, Stage::InProgress, RequestType::Corrective, None),
                // terminal requests do not count toward critical
                request(busy_id.as_str(), None, Stage::Repaired, RequestType::Corrective, None),
                request(quiet_id.as_str(), None, Stage::New, RequestType::Corrective, None),
            ])
            .unwrap();

        // scrapped + busy (3 open), quiet has only 1
        assert_eq!(analytics.critical_equipment_count().unwrap(), 2);
    }

    #[test]
    fn test_requests_by_team_includes_zero_counts() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let analytics = Analytics::new(&store);

        let mechanics = Team::new("Mechanics");
        let electricians = Team::new("Electricians");
        let mechanics_id = mechanics.id.clone();
        store.set_teams(&[mechanics, electricians]).unwrap();

        store
            .set_requests(&[
                request("eq1", Some(&mechanics_id), Stage::New, RequestType::Corrective, None),
                request("eq2", Some(&mechanics_id), Stage::New, RequestType::Corrective, None),
                request("eq3", None, Stage::New, RequestType::Corrective, None),
            ])
            .unwrap();

        let rows = analytics.requests_by_team().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], CountRow { name: "Mechanics".to_string(), count: 2 });
        assert_eq!(rows[1], CountRow { name: "Electricians".to_string(), count: 0 });
    }

    #[test]
    fn test_requests_by_category_first_seen_order() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let analytics = Analytics::new(&store);

        let mut power = Equipment::new("Generator Backup");
        power.category = "Power".to_string();
        let mut vehicle = Equipment::new("Forklift #3");
        vehicle.category = "Vehicle".to_string();
        let power_id = power.id.clone();
        let vehicle_id = vehicle.id.clone();
        store.set_equipment(&[power, vehicle]).unwrap();

        store
            .set_requests(&[
                request(vehicle_id.as_str(), None, Stage::New, RequestType::Corrective, None),
                request(power_id.as_str(), None, Stage::New, RequestType::Corrective, None),
                request(vehicle_id.as_str(), None, Stage::New, RequestType::Corrective, None),
                // dangling equipment reference lands in Uncategorized
                request("gone", None, Stage::New, RequestType::Corrective, None),
            ])
            .unwrap();

        let rows = analytics.requests_by_category().unwrap();
        assert_eq!(
            rows,
            vec![
                CountRow { name: "Vehicle".to_string(), count: 2 },
                CountRow { name: "Power".to_string(), count: 1 },
                CountRow { name: UNCATEGORIZED.to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_blank_category_is_uncategorized() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let analytics = Analytics::new(&store);

        let blank = Equipment::new("Mystery Box");
        let blank_id = blank.id.clone();
        store.set_equipment(&[blank]).unwrap();
        store
            .set_requests(&[request(blank_id.as_str(), None, Stage::New, RequestType::Corrective, None)])
            .unwrap();

        let rows = analytics.requests_by_category().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, UNCATEGORIZED);
    }

    #[test]
    fn test_requests_for_date_filters_by_type_and_day() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let analytics = Analytics::new(&store);

        let day: NaiveDate = "2026-08-10".parse().unwrap();
        let other: NaiveDate = "2026-08-11".parse().unwrap();
        store
            .set_requests(&[
                request("eq1", None, Stage::New, RequestType::Preventive, Some(day)),
                request("eq2", None, Stage::New, RequestType::Preventive, Some(other)),
                request("eq3", None, Stage::New, RequestType::Corrective, Some(day)),
                request("eq4", None, Stage::New, RequestType::Preventive, None),
            ])
            .unwrap();

        let hits = analytics.requests_for_date(day, RequestType::Preventive).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].equipment_id, RecordId::from("eq1"));
    }

    #[test]
    fn test_recent_activity_sorts_newest_first() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let analytics = Analytics::new(&store);
        let now = Utc::now();

        let mut old = request("eq1", None, Stage::New, RequestType::Corrective, None);
        old.updated_at = now - Duration::days(3);
        let mut fresh = request("eq2", None, Stage::New, RequestType::Corrective, None);
        fresh.updated_at = now;
        let mut middle = request("eq3", None, Stage::New, RequestType::Corrective, None);
        middle.updated_at = now - Duration::days(1);
        store.set_requests(&[old, fresh, middle]).unwrap();

        let recent = analytics.recent_activity(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].equipment_id, RecordId::from("eq2"));
        assert_eq!(recent[1].equipment_id, RecordId::from("eq3"));
    }
}
