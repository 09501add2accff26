//! Maintenance request lifecycle engine
//!
//! Create, update, and transition requests, enforcing the one load-bearing
//! side effect of the system: a request entering the scrap stage marks the
//! referenced equipment as scrapped. Every stage is reachable from every
//! other; the board is a free graph, not a pipeline.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use thiserror::Error;

use crate::core::identity::{RecordId, RecordPrefix};
use crate::entities::{Comment, MaintenanceRequest, Priority, RequestType, Stage};
use crate::store::{Store, StoreError};

#[derive(Debug, Error)]
pub enum LifecycleError {
    /// A required field is missing or malformed
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// The operation targets an id absent from the store
    #[error("No maintenance request found with id '{id}'")]
    NotFound { id: RecordId },

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn validation(message: impl Into<String>) -> LifecycleError {
    LifecycleError::Validation {
        message: message.into(),
    }
}

/// Input for [`Lifecycle::create`]. Subject and equipment are required;
/// everything else falls back to the documented defaults.
#[derive(Debug, Clone)]
pub struct RequestDraft {
    pub subject: String,
    pub equipment_id: RecordId,
    pub request_type: Option<RequestType>,
    pub stage: Option<Stage>,
    pub scheduled_date: Option<NaiveDate>,
    pub duration: Option<f64>,
    pub priority: Option<Priority>,
    pub technician: Option<String>,
    pub team_id: Option<RecordId>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub instructions: Option<String>,
}

impl RequestDraft {
    pub fn new(subject: impl Into<String>, equipment_id: impl Into<RecordId>) -> Self {
        Self {
            subject: subject.into(),
            equipment_id: equipment_id.into(),
            request_type: None,
            stage: None,
            scheduled_date: None,
            duration: None,
            priority: None,
            technician: None,
            team_id: None,
            company: None,
            notes: None,
            instructions: None,
        }
    }
}

/// Field-level merge for [`Lifecycle::update`]. Deliberately cannot express
/// id, created_at, comments, or stage: stage changes go through
/// [`Lifecycle::transition`] so the scrap side effect cannot be bypassed,
/// and comments only grow through [`Lifecycle::add_comment`].
#[derive(Debug, Clone, Default)]
pub struct RequestPatch {
    pub subject: Option<String>,
    pub equipment_id: Option<RecordId>,
    pub request_type: Option<RequestType>,
    pub scheduled_date: Option<NaiveDate>,
    pub duration: Option<f64>,
    pub priority: Option<Priority>,
    pub technician: Option<String>,
    pub team_id: Option<RecordId>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub instructions: Option<String>,
}

impl RequestPatch {
    pub fn is_empty(&self) -> bool {
        self.subject.is_none()
            && self.equipment_id.is_none()
            && self.request_type.is_none()
            && self.scheduled_date.is_none()
            && self.duration.is_none()
            && self.priority.is_none()
            && self.technician.is_none()
            && self.team_id.is_none()
            && self.company.is_none()
            && self.notes.is_none()
            && self.instructions.is_none()
    }
}

/// Whether a request is past its implied deadline.
///
/// Repaired and scrapped requests are never overdue. Without a scheduled
/// date, a request goes overdue three days after creation. With one, the
/// comparison is by calendar date only, so a request scheduled today is not
/// yet overdue.
pub fn is_overdue(request: &MaintenanceRequest, now: DateTime<Utc>) -> bool {
    if request.stage.is_terminal() {
        return false;
    }
    match request.scheduled_date {
        None => now - request.created_at > Duration::days(3),
        Some(scheduled) => scheduled < now.date_naive(),
    }
}

/// The lifecycle engine. Reads and writes whole collections through the
/// store; every operation completes within one synchronous call.
pub struct Lifecycle<'a> {
    store: &'a Store,
}

impl<'a> Lifecycle<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Create a request from a validated draft
    pub fn create(&self, draft: RequestDraft) -> Result<MaintenanceRequest, LifecycleError> {
        if draft.subject.trim().is_empty() {
            return Err(validation("subject is required"));
        }
        if draft.equipment_id.as_str().trim().is_empty() {
            return Err(validation("equipment is required"));
        }
        if let Some(duration) = draft.duration {
            if duration < 0.0 {
                return Err(validation("duration must be zero or more hours"));
            }
        }

        let now = Utc::now();
        let request = MaintenanceRequest {
            id: RecordId::new(RecordPrefix::Request),
            subject: draft.subject.trim().to_string(),
            equipment_id: draft.equipment_id,
            request_type: draft.request_type.unwrap_or_default(),
            stage: draft.stage.unwrap_or_default(),
            scheduled_date: draft.scheduled_date,
            duration: draft.duration.unwrap_or(0.0),
            priority: draft.priority.unwrap_or_default(),
            technician: draft.technician.unwrap_or_default(),
            team_id: draft.team_id,
            company: draft.company.unwrap_or_default(),
            notes: draft.notes.unwrap_or_default(),
            instructions: draft.instructions.unwrap_or_default(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let mut requests = self.store.requests()?;
        requests.push(request.clone());
        self.store.set_requests(&requests)?;
        Ok(request)
    }

    /// Merge a patch into an existing request, refreshing `updated_at`
    pub fn update(
        &self,
        id: &RecordId,
        patch: RequestPatch,
    ) -> Result<MaintenanceRequest, LifecycleError> {
        if let Some(subject) = &patch.subject {
            if subject.trim().is_empty() {
                return Err(validation("subject is required"));
            }
        }
        if let Some(duration) = patch.duration {
            if duration < 0.0 {
                return Err(validation("duration must be zero or more hours"));
            }
        }

        let mut requests = self.store.requests()?;
        let request = requests
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| LifecycleError::NotFound { id: id.clone() })?;

        if let Some(subject) = patch.subject {
            request.subject = subject.trim().to_string();
        }
        if let Some(equipment_id) = patch.equipment_id {
            request.equipment_id = equipment_id;
        }
        if let Some(request_type) = patch.request_type {
            request.request_type = request_type;
        }
        if let Some(scheduled_date) = patch.scheduled_date {
            request.scheduled_date = Some(scheduled_date);
        }
        if let Some(duration) = patch.duration {
            request.duration = duration;
        }
        if let Some(priority) = patch.priority {
            request.priority = priority;
        }
        if let Some(technician) = patch.technician {
            request.technician = technician;
        }
        if let Some(team_id) = patch.team_id {
            request.team_id = Some(team_id);
        }
        if let Some(company) = patch.company {
            request.company = company;
        }
        if let Some(notes) = patch.notes {
            request.notes = notes;
        }
        if let Some(instructions) = patch.instructions {
            request.instructions = instructions;
        }
        request.updated_at = Utc::now();

        let updated = request.clone();
        self.store.set_requests(&requests)?;
        Ok(updated)
    }

    /// Move a request to a new stage. All stage pairs are permitted.
    ///
    /// Entering `scrap` also marks the referenced equipment as scrapped,
    /// dated today. That update is best effort: a dangling reference leaves
    /// the stage change in place. The request record is written before the
    /// equipment record, and there is no rollback between the two writes.
    pub fn transition(
        &self,
        id: &RecordId,
        new_stage: Stage,
    ) -> Result<MaintenanceRequest, LifecycleError> {
        let mut requests = self.store.requests()?;
        let request = requests
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| LifecycleError::NotFound { id: id.clone() })?;

        request.stage = new_stage;
        request.updated_at = Utc::now();
        let updated = request.clone();
        self.store.set_requests(&requests)?;

        if new_stage == Stage::Scrap {
            self.scrap_equipment(&updated.equipment_id)?;
        }
        Ok(updated)
    }

    /// Post-transition hook: mark the referenced equipment scrapped.
    /// Returns whether the reference resolved.
    fn scrap_equipment(&self, equipment_id: &RecordId) -> Result<bool, StoreError> {
        let mut equipment = self.store.equipment()?;
        match equipment.iter_mut().find(|e| &e.id == equipment_id) {
            Some(item) => {
                item.mark_scrapped(Utc::now().date_naive());
                self.store.set_equipment(&equipment)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Append a worksheet comment. Text is stored trimmed; empty text after
    /// trimming is rejected. Comments are immutable once appended.
    pub fn add_comment(
        &self,
        request_id: &RecordId,
        author: &str,
        text: &str,
    ) -> Result<Comment, LifecycleError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(validation("comment text is required"));
        }

        let mut requests = self.store.requests()?;
        let request = requests
            .iter_mut()
            .find(|r| &r.id == request_id)
            .ok_or_else(|| LifecycleError::NotFound {
                id: request_id.clone(),
            })?;

        let comment = Comment {
            id: RecordId::new(RecordPrefix::Comment),
            author: author.to_string(),
            text: text.to_string(),
            timestamp: Utc::now(),
        };
        request.comments.push(comment.clone());
        request.updated_at = Utc::now();

        self.store.set_requests(&requests)?;
        Ok(comment)
    }

    /// Remove a request. No cascade onto equipment.
    pub fn delete(&self, id: &RecordId) -> Result<(), LifecycleError> {
        let mut requests = self.store.requests()?;
        let before = requests.len();
        requests.retain(|r| &r.id != id);
        if requests.len() == before {
            return Err(LifecycleError::NotFound { id: id.clone() });
        }
        self.store.set_requests(&requests)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::project::Project;
    use crate::entities::{Equipment, Priority, RequestType};
    use tempfile::{tempdir, TempDir};

    fn test_store(tmp: &TempDir) -> Store {
        let project = Project::init(tmp.path()).unwrap();
        Store::open(&project)
    }

    fn request_with_dates(
        stage: Stage,
        created_days_ago: i64,
        scheduled_in_days: Option<i64>,
    ) -> MaintenanceRequest {
        let now = Utc::now();
        let created = now - Duration::days(created_days_ago);
        MaintenanceRequest {
            id: RecordId::new(RecordPrefix::Request),
            subject: "Test".to_string(),
            equipment_id: RecordId::from("eq1"),
            request_type: RequestType::Corrective,
            stage,
            scheduled_date: scheduled_in_days.map(|d| (now + Duration::days(d)).date_naive()),
            duration: 0.0,
            priority: Priority::Low,
            technician: String::new(),
            team_id: None,
            company: String::new(),
            notes: String::new(),
            instructions: String::new(),
            comments: Vec::new(),
            created_at: created,
            updated_at: created,
        }
    }

    // ========== create ==========

    #[test]
    fn test_create_applies_defaults() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let lifecycle = Lifecycle::new(&store);

        let request = lifecycle
            .create(RequestDraft::new("Oil Leak Detected", "eq1"))
            .unwrap();

        assert_eq!(request.stage, Stage::New);
        assert_eq!(request.request_type, RequestType::Corrective);
        assert_eq!(request.priority, Priority::Low);
        assert_eq!(request.duration, 0.0);
        assert!(request.comments.is_empty());
        assert_eq!(request.created_at, request.updated_at);

        // round-trip through the store keeps the defaults
        let stored = store.find_request(&request.id).unwrap().unwrap();
        assert_eq!(stored.stage, Stage::New);
        assert_eq!(stored.priority, Priority::Low);
        assert_eq!(stored.duration, 0.0);
    }

    #[test]
    fn test_create_requires_subject_and_equipment() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let lifecycle = Lifecycle::new(&store);

        let missing_subject = lifecycle.create(RequestDraft::new("   ", "eq1"));
        assert!(matches!(
            missing_subject,
            Err(LifecycleError::Validation { .. })
        ));

        let missing_equipment = lifecycle.create(RequestDraft::new("Subject", ""));
        assert!(matches!(
            missing_equipment,
            Err(LifecycleError::Validation { .. })
        ));
    }

    #[test]
    fn test_create_rejects_negative_duration() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let lifecycle = Lifecycle::new(&store);

        let mut draft = RequestDraft::new("Subject", "eq1");
        draft.duration = Some(-1.0);
        assert!(matches!(
            lifecycle.create(draft),
            Err(LifecycleError::Validation { .. })
        ));
    }

    #[test]
    fn test_create_does_not_require_equipment_to_resolve() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let lifecycle = Lifecycle::new(&store);

        // weak reference: the id need not exist
        let request = lifecycle
            .create(RequestDraft::new("Ghost equipment", "never-existed"))
            .unwrap();
        assert_eq!(request.equipment_id, RecordId::from("never-existed"));
    }

    // ========== update ==========

    #[test]
    fn test_update_merges_and_refreshes_updated_at() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let lifecycle = Lifecycle::new(&store);

        let request = lifecycle
            .create(RequestDraft::new("Screen Flickering Issue", "eq2"))
            .unwrap();

        let patch = RequestPatch {
            priority: Some(Priority::Medium),
            duration: Some(2.0),
            ..Default::default()
        };
        let updated = lifecycle.update(&request.id, patch).unwrap();

        assert_eq!(updated.priority, Priority::Medium);
        assert_eq!(updated.duration, 2.0);
        assert_eq!(updated.subject, "Screen Flickering Issue");
        assert_eq!(updated.created_at, request.created_at);
        assert!(updated.updated_at >= request.updated_at);
    }

    #[test]
    fn test_updated_at_never_decreases() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let lifecycle = Lifecycle::new(&store);

        let request = lifecycle.create(RequestDraft::new("Subject", "eq1")).unwrap();

        let first = lifecycle
            .update(&request.id, RequestPatch {
                notes: Some("first".to_string()),
                ..Default::default()
            })
            .unwrap();
        let second = lifecycle
            .transition(&request.id, Stage::InProgress)
            .unwrap();

        assert!(first.updated_at >= request.updated_at);
        assert!(second.updated_at >= first.updated_at);
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let lifecycle = Lifecycle::new(&store);

        let result = lifecycle.update(&RecordId::from("gone"), RequestPatch::default());
        assert!(matches!(result, Err(LifecycleError::NotFound { .. })));
    }

    // ========== transition ==========

    #[test]
    fn test_any_stage_is_reachable_from_any_other() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let lifecycle = Lifecycle::new(&store);

        let request = lifecycle.create(RequestDraft::new("Subject", "eq1")).unwrap();

        for stage in [
            Stage::Repaired,
            Stage::New,
            Stage::InProgress,
            Stage::New,
            Stage::Repaired,
            Stage::InProgress,
        ] {
            let moved = lifecycle.transition(&request.id, stage).unwrap();
            assert_eq!(moved.stage, stage);
        }
    }

    #[test]
    fn test_scrap_transition_marks_equipment() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let lifecycle = Lifecycle::new(&store);

        let equipment = store.add_equipment(Equipment::new("CNC Machine #1")).unwrap();
        let request = lifecycle
            .create(RequestDraft::new("Oil Leak Detected", equipment.id.as_str()))
            .unwrap();

        let moved = lifecycle.transition(&request.id, Stage::Scrap).unwrap();
        assert_eq!(moved.stage, Stage::Scrap);

        let scrapped = store.find_equipment(&equipment.id).unwrap().unwrap();
        assert!(scrapped.is_scrap);
        assert_eq!(scrapped.scrap_date, Some(Utc::now().date_naive()));
    }

    #[test]
    fn test_scrap_transition_is_idempotent_on_equipment() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let lifecycle = Lifecycle::new(&store);

        let mut equipment = Equipment::new("Generator Backup");
        equipment.mark_scrapped("2026-01-01".parse().unwrap());
        let equipment = store.add_equipment(equipment).unwrap();

        let request = lifecycle
            .create(RequestDraft::new("Final teardown", equipment.id.as_str()))
            .unwrap();
        lifecycle.transition(&request.id, Stage::Scrap).unwrap();

        let scrapped = store.find_equipment(&equipment.id).unwrap().unwrap();
        assert!(scrapped.is_scrap);
        assert_eq!(scrapped.scrap_date, Some(Utc::now().date_naive()));
    }

    #[test]
    fn test_scrap_transition_survives_dangling_equipment() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let lifecycle = Lifecycle::new(&store);

        let request = lifecycle
            .create(RequestDraft::new("Orphaned request", "deleted-eq"))
            .unwrap();

        let moved = lifecycle.transition(&request.id, Stage::Scrap).unwrap();
        assert_eq!(moved.stage, Stage::Scrap);
        assert!(store.equipment().unwrap().is_empty());
    }

    #[test]
    fn test_transition_unknown_id_is_not_found() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let lifecycle = Lifecycle::new(&store);

        let result = lifecycle.transition(&RecordId::from("gone"), Stage::Repaired);
        assert!(matches!(result, Err(LifecycleError::NotFound { .. })));
    }

    // ========== comments ==========

    #[test]
    fn test_add_comment_appends_trimmed() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let lifecycle = Lifecycle::new(&store);

        let request = lifecycle.create(RequestDraft::new("Subject", "eq1")).unwrap();

        lifecycle
            .add_comment(&request.id, "Jane Smith", "  Replaced the seal.  ")
            .unwrap();
        lifecycle
            .add_comment(&request.id, "John Doe", "Pressure tested, holding.")
            .unwrap();

        let stored = store.find_request(&request.id).unwrap().unwrap();
        assert_eq!(stored.comments.len(), 2);
        // oldest first; trimmed text
        assert_eq!(stored.comments[0].text, "Replaced the seal.");
        assert_eq!(stored.comments[0].author, "Jane Smith");
        assert_eq!(stored.comments[1].author, "John Doe");
        assert!(stored.comments[0].timestamp <= stored.comments[1].timestamp);
    }

    #[test]
    fn test_add_comment_rejects_blank_text() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let lifecycle = Lifecycle::new(&store);

        let request = lifecycle.create(RequestDraft::new("Subject", "eq1")).unwrap();

        let result = lifecycle.add_comment(&request.id, "Jane Smith", "   ");
        assert!(matches!(result, Err(LifecycleError::Validation { .. })));

        let stored = store.find_request(&request.id).unwrap().unwrap();
        assert!(stored.comments.is_empty());
    }

    #[test]
    fn test_add_comment_unknown_request_is_not_found() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let lifecycle = Lifecycle::new(&store);

        let result = lifecycle.add_comment(&RecordId::from("gone"), "Jane", "text");
        assert!(matches!(result, Err(LifecycleError::NotFound { .. })));
    }

    // ========== delete ==========

    #[test]
    fn test_delete_removes_without_cascade() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let lifecycle = Lifecycle::new(&store);

        let equipment = store.add_equipment(Equipment::new("Forklift #3")).unwrap();
        let request = lifecycle
            .create(RequestDraft::new("Brake System Repair", equipment.id.as_str()))
            .unwrap();

        lifecycle.delete(&request.id).unwrap();

        assert!(store.find_request(&request.id).unwrap().is_none());
        assert!(store.find_equipment(&equipment.id).unwrap().is_some());
    }

    #[test]
    fn test_delete_unknown_id_is_not_found() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);
        let lifecycle = Lifecycle::new(&store);

        let result = lifecycle.delete(&RecordId::from("gone"));
        assert!(matches!(result, Err(LifecycleError::NotFound { .. })));
    }

    // ========== overdue classification ==========

    #[test]
    fn test_terminal_stages_are_never_overdue() {
        let now = Utc::now();
        // ten days old with a long-past schedule; still closed
        let repaired = request_with_dates(Stage::Repaired, 10, Some(-5));
        let scrapped = request_with_dates(Stage::Scrap, 10, Some(-5));

        assert!(!is_overdue(&repaired, now));
        assert!(!is_overdue(&scrapped, now));
    }

    #[test]
    fn test_unscheduled_goes_overdue_after_three_days() {
        let now = Utc::now();

        assert!(!is_overdue(&request_with_dates(Stage::New, 2, None), now));
        assert!(is_overdue(&request_with_dates(Stage::New, 4, None), now));
    }

    #[test]
    fn test_scheduled_compares_by_calendar_date() {
        let now = Utc::now();

        // scheduled today: not overdue regardless of time of day
        assert!(!is_overdue(&request_with_dates(Stage::New, 0, Some(0)), now));
        // scheduled yesterday: overdue
        assert!(is_overdue(&request_with_dates(Stage::New, 0, Some(-1)), now));
        // scheduled in the future: not overdue even if the request is old
        assert!(!is_overdue(&request_with_dates(Stage::New, 10, Some(5)), now));
    }
}
