//! Maintenance request records and the kanban vocabulary

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::identity::RecordId;

/// Kanban stage of a maintenance request.
///
/// Stages are board columns, not a strict pipeline - any stage is reachable
/// from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    #[default]
    New,
    InProgress,
    Repaired,
    Scrap,
}

impl Stage {
    /// Board column order
    pub const ALL: [Stage; 4] = [Stage::New, Stage::InProgress, Stage::Repaired, Stage::Scrap];

    /// Repaired and scrapped requests are closed for load and overdue purposes
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Repaired | Stage::Scrap)
    }

    /// Human column heading
    pub fn label(&self) -> &'static str {
        match self {
            Stage::New => "New",
            Stage::InProgress => "In Progress",
            Stage::Repaired => "Repaired",
            Stage::Scrap => "Scrap",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::New => write!(f, "new"),
            Stage::InProgress => write!(f, "in-progress"),
            Stage::Repaired => write!(f, "repaired"),
            Stage::Scrap => write!(f, "scrap"),
        }
    }
}

impl std::str::FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(Stage::New),
            "in-progress" | "in_progress" | "inprogress" => Ok(Stage::InProgress),
            "repaired" => Ok(Stage::Repaired),
            "scrap" => Ok(Stage::Scrap),
            _ => Err(format!(
                "Unknown stage: '{}'. Use new/in-progress/repaired/scrap",
                s
            )),
        }
    }
}

/// Corrective (reactive repair) vs preventive (scheduled) maintenance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    #[default]
    Corrective,
    Preventive,
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestType::Corrective => write!(f, "corrective"),
            RequestType::Preventive => write!(f, "preventive"),
        }
    }
}

impl std::str::FromStr for RequestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "corrective" => Ok(RequestType::Corrective),
            "preventive" => Ok(RequestType::Preventive),
            _ => Err(format!(
                "Unknown request type: '{}'. Use corrective or preventive",
                s
            )),
        }
    }
}

/// Request priority, serialized as its star level 1-3
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn level(&self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }

    pub fn stars(&self) -> String {
        "★".repeat(self.level() as usize)
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Priority::Low),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::High),
            n => Err(format!("Priority must be 1-3, got {}", n)),
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.level()
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.level())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1" | "low" => Ok(Priority::Low),
            "2" | "medium" => Ok(Priority::Medium),
            "3" | "high" => Ok(Priority::High),
            _ => Err(format!("Unknown priority: '{}'. Use 1-3 or low/medium/high", s)),
        }
    }
}

/// A worksheet entry. Immutable once appended; storage order is oldest
/// first. Newest-first rendering is a presentation choice, not storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: RecordId,
    pub author: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// A maintenance request card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceRequest {
    pub id: RecordId,

    pub subject: String,

    /// Weak reference to equipment; may dangle after equipment deletion
    pub equipment_id: RecordId,

    #[serde(rename = "type", default)]
    pub request_type: RequestType,

    #[serde(default)]
    pub stage: Stage,

    /// Relevant mainly for preventive requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,

    /// Estimated duration in hours
    #[serde(default)]
    pub duration: f64,

    #[serde(default)]
    pub priority: Priority,

    /// Assigned technician, free text - not a foreign key
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub technician: String,

    /// Weak reference to a maintenance team; may dangle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<RecordId>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub company: String,

    /// Internal notes
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,

    /// Work instructions for the technician
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instructions: String,

    /// Worksheet comments, oldest first, append-only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,

    /// Set once at creation, never changed
    pub created_at: DateTime<Utc>,

    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}
