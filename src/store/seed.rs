//! Sample data for demos and first runs
//!
//! Mirrors the demo data set GearGuard ships with: three teams, five
//! categories, five pieces of equipment, and six requests with staggered
//! creation dates so the dashboard and board have something to show.

use chrono::{DateTime, Duration, Utc};

use crate::core::identity::{RecordId, RecordPrefix};
use crate::entities::{
    Category, Equipment, MaintenanceRequest, Priority, RequestType, Stage, Team,
};
use crate::store::{Store, StoreError};

/// Build a request with the documented defaults, created now
pub fn sample_request(subject: &str, equipment_id: &RecordId) -> MaintenanceRequest {
    let now = Utc::now();
    MaintenanceRequest {
        id: RecordId::new(RecordPrefix::Request),
        subject: subject.to_string(),
        equipment_id: equipment_id.clone(),
        request_type: RequestType::default(),
        stage: Stage::default(),
        scheduled_date: None,
        duration: 0.0,
        priority: Priority::default(),
        technician: String::new(),
        team_id: None,
        company: String::new(),
        notes: String::new(),
        instructions: String::new(),
        comments: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

/// Seed each empty collection with the demo data. Collections that already
/// hold records are left alone.
pub fn seed_sample_data(store: &Store, now: DateTime<Utc>) -> Result<(), StoreError> {
    let company = "GearGuard Inc";

    let teams = if store.teams()?.is_empty() {
        let teams = vec![
            Team::new("Mechanics").with_members(vec![
                "John Doe".to_string(),
                "Jane Smith".to_string(),
                "Mike Johnson".to_string(),
            ]),
            Team::new("Electricians")
                .with_members(vec!["Sarah Williams".to_string(), "Tom Brown".to_string()]),
            Team::new("IT Support").with_members(vec![
                "Alex Chen".to_string(),
                "Emily Davis".to_string(),
                "Chris Wilson".to_string(),
            ]),
        ];
        store.set_teams(&teams)?;
        teams
    } else {
        store.teams()?
    };

    if store.categories()?.is_empty() {
        let categories: Vec<Category> = [
            ("Manufacturing", "John Doe"),
            ("Computer", "Alex Chen"),
            ("Vehicle", "Mike Johnson"),
            ("Power", "Sarah Williams"),
            ("Server", "Emily Davis"),
        ]
        .into_iter()
        .map(|(name, responsible)| {
            let mut category = Category::new(name);
            category.responsible = responsible.to_string();
            category.company = company.to_string();
            category
        })
        .collect();
        store.set_categories(&categories)?;
    }

    let team_id = |name: &str| teams.iter().find(|t| t.name == name).map(|t| t.id.clone());

    let equipment = if store.equipment()?.is_empty() {
        let specs = [
            (
                "CNC Machine #1",
                "CNC-2023-001",
                "2023-01-15",
                "2025-01-15",
                "Factory Floor A",
                "Production",
                "",
                "Mechanics",
                "John Doe",
                "Manufacturing",
            ),
            (
                "Laptop Dell XPS",
                "DELL-2024-042",
                "2024-03-10",
                "2027-03-10",
                "Office 3rd Floor",
                "IT",
                "Robert Martinez",
                "IT Support",
                "Alex Chen",
                "Computer",
            ),
            (
                "Generator Backup",
                "GEN-2022-005",
                "2022-06-20",
                "2024-06-20",
                "Basement",
                "Facilities",
                "",
                "Electricians",
                "Sarah Williams",
                "Power",
            ),
            (
                "Forklift #3",
                "FRK-2021-003",
                "2021-09-05",
                "2023-09-05",
                "Warehouse",
                "Logistics",
                "",
                "Mechanics",
                "Mike Johnson",
                "Vehicle",
            ),
            (
                "Server Rack #2",
                "SRV-2023-012",
                "2023-11-01",
                "2028-11-01",
                "Data Center",
                "IT",
                "",
                "IT Support",
                "Emily Davis",
                "Server",
            ),
        ];
        let equipment: Vec<Equipment> = specs
            .into_iter()
            .map(
                |(name, serial, purchased, warranty, location, department, employee, team, technician, category)| {
                    let mut item = Equipment::new(name);
                    item.serial_number = serial.to_string();
                    item.purchase_date = purchased.parse().ok();
                    item.warranty = warranty.parse().ok();
                    item.location = location.to_string();
                    item.department = department.to_string();
                    item.employee = employee.to_string();
                    item.team_id = team_id(team);
                    item.technician = technician.to_string();
                    item.category = category.to_string();
                    item.company = company.to_string();
                    item
                },
            )
            .collect();
        store.set_equipment(&equipment)?;
        equipment
    } else {
        store.equipment()?
    };

    if store.requests()?.is_empty() {
        let equipment_id = |name: &str| {
            equipment
                .iter()
                .find(|e| e.name == name)
                .map(|e| e.id.clone())
                .unwrap_or_else(|| RecordId::from(name))
        };

        let request = |subject: &str,
                           equipment_name: &str,
                           request_type: RequestType,
                           stage: Stage,
                           age_days: i64,
                           scheduled_in_days: Option<i64>,
                           duration: f64,
                           priority: Priority,
                           technician: &str,
                           team: &str| {
            let created = now - Duration::days(age_days);
            MaintenanceRequest {
                id: RecordId::new(RecordPrefix::Request),
                subject: subject.to_string(),
                equipment_id: equipment_id(equipment_name),
                request_type,
                stage,
                scheduled_date: scheduled_in_days
                    .map(|days| (now + Duration::days(days)).date_naive()),
                duration,
                priority,
                technician: technician.to_string(),
                team_id: team_id(team),
                company: company.to_string(),
                notes: String::new(),
                instructions: String::new(),
                comments: Vec::new(),
                created_at: created,
                updated_at: created,
            }
        };

        let requests = vec![
            request(
                "Oil Leak Detected",
                "CNC Machine #1",
                RequestType::Corrective,
                Stage::New,
                2,
                None,
                0.0,
                Priority::High,
                "John Doe",
                "Mechanics",
            ),
            request(
                "Screen Flickering Issue",
                "Laptop Dell XPS",
                RequestType::Corrective,
                Stage::InProgress,
                1,
                None,
                2.0,
                Priority::Medium,
                "Alex Chen",
                "IT Support",
            ),
            request(
                "Monthly Preventive Check",
                "Generator Backup",
                RequestType::Preventive,
                Stage::New,
                0,
                Some(5),
                0.0,
                Priority::Low,
                "Sarah Williams",
                "Electricians",
            ),
            request(
                "Brake System Repair",
                "Forklift #3",
                RequestType::Corrective,
                Stage::Repaired,
                7,
                None,
                5.0,
                Priority::High,
                "Mike Johnson",
                "Mechanics",
            ),
            request(
                "Quarterly Server Maintenance",
                "Server Rack #2",
                RequestType::Preventive,
                Stage::New,
                0,
                Some(10),
                0.0,
                Priority::Medium,
                "Emily Davis",
                "IT Support",
            ),
            request(
                "Overheating Problem",
                "CNC Machine #1",
                RequestType::Corrective,
                Stage::New,
                5,
                None,
                0.0,
                Priority::High,
                "John Doe",
                "Mechanics",
            ),
        ];
        store.set_requests(&requests)?;
    }

    Ok(())
}
