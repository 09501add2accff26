//! Equipment records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::identity::{RecordId, RecordPrefix};

/// A piece of tracked equipment.
///
/// Invariant: `is_scrap == true` implies `scrap_date` is set. Every site
/// that sets `is_scrap` goes through [`Equipment::mark_scrapped`] or
/// [`EquipmentPatch::apply`], which both stamp the date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    pub id: RecordId,

    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub serial_number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,

    /// Warranty expiry date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub department: String,

    /// Employee the equipment is assigned to
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub employee: String,

    /// Weak reference to a maintenance team; may dangle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<RecordId>,

    /// Default technician, free text - not a foreign key
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub technician: String,

    /// Category name; tied to Category records by name only
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub company: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrap_date: Option<NaiveDate>,

    #[serde(default)]
    pub is_scrap: bool,
}

impl Equipment {
    /// Create equipment with a generated id; all optional fields empty
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(RecordPrefix::Equipment),
            name: name.into(),
            serial_number: String::new(),
            purchase_date: None,
            warranty: None,
            location: String::new(),
            department: String::new(),
            employee: String::new(),
            team_id: None,
            technician: String::new(),
            category: String::new(),
            company: String::new(),
            description: String::new(),
            assigned_date: None,
            scrap_date: None,
            is_scrap: false,
        }
    }

    /// Mark the equipment as scrapped, dated `date`. Idempotent; re-marking
    /// refreshes the scrap date.
    pub fn mark_scrapped(&mut self, date: NaiveDate) {
        self.is_scrap = true;
        self.scrap_date = Some(date);
    }
}

/// Field-level merge for equipment edits. Absent fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct EquipmentPatch {
    pub name: Option<String>,
    pub serial_number: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty: Option<NaiveDate>,
    pub location: Option<String>,
    pub department: Option<String>,
    pub employee: Option<String>,
    pub team_id: Option<RecordId>,
    pub technician: Option<String>,
    pub category: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    pub assigned_date: Option<NaiveDate>,
    pub is_scrap: Option<bool>,
}

impl EquipmentPatch {
    /// Apply the patch. `today` stamps `scrap_date` when the patch sets
    /// `is_scrap` without one, keeping the scrap invariant.
    pub fn apply(self, equipment: &mut Equipment, today: NaiveDate) {
        if let Some(name) = self.name {
            equipment.name = name;
        }
        if let Some(serial_number) = self.serial_number {
            equipment.serial_number = serial_number;
        }
        if let Some(purchase_date) = self.purchase_date {
            equipment.purchase_date = Some(purchase_date);
        }
        if let Some(warranty) = self.warranty {
            equipment.warranty = Some(warranty);
        }
        if let Some(location) = self.location {
            equipment.location = location;
        }
        if let Some(department) = self.department {
            equipment.department = department;
        }
        if let Some(employee) = self.employee {
            equipment.employee = employee;
        }
        if let Some(team_id) = self.team_id {
            equipment.team_id = Some(team_id);
        }
        if let Some(technician) = self.technician {
            equipment.technician = technician;
        }
        if let Some(category) = self.category {
            equipment.category = category;
        }
        if let Some(company) = self.company {
            equipment.company = company;
        }
        if let Some(description) = self.description {
            equipment.description = description;
        }
        if let Some(assigned_date) = self.assigned_date {
            equipment.assigned_date = Some(assigned_date);
        }
        match self.is_scrap {
            Some(true) => equipment.mark_scrapped(today),
            // Un-scrapping keeps the historical scrap date
            Some(false) => equipment.is_scrap = false,
            None => {}
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.serial_number.is_none()
            && self.purchase_date.is_none()
            && self.warranty.is_none()
            && self.location.is_none()
            && self.department.is_none()
            && self.employee.is_none()
            && self.team_id.is_none()
            && self.technician.is_none()
            && self.category.is_none()
            && self.company.is_none()
            && self.description.is_none()
            && self.assigned_date.is_none()
            && self.is_scrap.is_none()
    }
}
