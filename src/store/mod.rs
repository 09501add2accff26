//! The record store - four YAML collections under the project data dir
//!
//! `get_all`/`set_all` are whole-collection reads and full replaces; the
//! engines never issue partial patches to storage. A missing collection
//! file reads as an empty sequence, so a freshly initialized project needs
//! no placeholder files.

use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::core::identity::RecordId;
use crate::core::project::Project;
use crate::entities::{
    Category, CategoryPatch, Equipment, EquipmentPatch, MaintenanceRequest, Team, TeamPatch,
};

pub mod seed;

/// The four record collections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Equipment,
    Teams,
    Categories,
    Requests,
}

impl Collection {
    pub fn file_name(&self) -> &'static str {
        match self {
            Collection::Equipment => "equipment.yaml",
            Collection::Teams => "teams.yaml",
            Collection::Categories => "categories.yaml",
            Collection::Requests => "requests.yaml",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Collection::Equipment => write!(f, "equipment"),
            Collection::Teams => write!(f, "teams"),
            Collection::Categories => write!(f, "categories"),
            Collection::Requests => write!(f, "requests"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

/// Handle to a project's collection files
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn open(project: &Project) -> Self {
        Self {
            dir: project.data_dir(),
        }
    }

    fn path(&self, collection: Collection) -> PathBuf {
        self.dir.join(collection.file_name())
    }

    /// Read a whole collection, in document order
    pub fn get_all<T: DeserializeOwned + 'static>(&self, collection: Collection) -> Result<Vec<T>, StoreError> {
        let path = self.path(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_yml::from_str(&content).map_err(|e| StoreError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Replace a whole collection
    pub fn set_all<T: Serialize>(&self, collection: Collection, records: &[T]) -> Result<(), StoreError> {
        let path = self.path(collection);
        let content = serde_yml::to_string(&records).map_err(|e| StoreError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        fs::write(&path, content).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    // ========== TYPED ACCESSORS ==========

    pub fn equipment(&self) -> Result<Vec<Equipment>, StoreError> {
        self.get_all(Collection::Equipment)
    }

    pub fn set_equipment(&self, items: &[Equipment]) -> Result<(), StoreError> {
        self.set_all(Collection::Equipment, items)
    }

    pub fn teams(&self) -> Result<Vec<Team>, StoreError> {
        self.get_all(Collection::Teams)
    }

    pub fn set_teams(&self, items: &[Team]) -> Result<(), StoreError> {
        self.set_all(Collection::Teams, items)
    }

    pub fn categories(&self) -> Result<Vec<Category>, StoreError> {
        self.get_all(Collection::Categories)
    }

    pub fn set_categories(&self, items: &[Category]) -> Result<(), StoreError> {
        self.set_all(Collection::Categories, items)
    }

    pub fn requests(&self) -> Result<Vec<MaintenanceRequest>, StoreError> {
        self.get_all(Collection::Requests)
    }

    pub fn set_requests(&self, items: &[MaintenanceRequest]) -> Result<(), StoreError> {
        self.set_all(Collection::Requests, items)
    }

    // ========== WEAK-REFERENCE LOOKUPS ==========
    // A miss is "unknown/unassigned", never an error.

    pub fn find_equipment(&self, id: &RecordId) -> Result<Option<Equipment>, StoreError> {
        Ok(self.equipment()?.into_iter().find(|e| &e.id == id))
    }

    pub fn find_team(&self, id: &RecordId) -> Result<Option<Team>, StoreError> {
        Ok(self.teams()?.into_iter().find(|t| &t.id == id))
    }

    pub fn find_category(&self, id: &RecordId) -> Result<Option<Category>, StoreError> {
        Ok(self.categories()?.into_iter().find(|c| &c.id == id))
    }

    pub fn find_request(&self, id: &RecordId) -> Result<Option<MaintenanceRequest>, StoreError> {
        Ok(self.requests()?.into_iter().find(|r| &r.id == id))
    }

    // ========== TRIVIAL CRUD ==========
    // Request mutations live in the lifecycle engine; the other three
    // collections are plain record keeping.

    pub fn add_equipment(&self, item: Equipment) -> Result<Equipment, StoreError> {
        let mut items = self.equipment()?;
        items.push(item.clone());
        self.set_equipment(&items)?;
        Ok(item)
    }

    /// Merge a patch into an equipment record. Returns the updated record,
    /// or `None` when the id does not resolve.
    pub fn update_equipment(
        &self,
        id: &RecordId,
        patch: EquipmentPatch,
        today: NaiveDate,
    ) -> Result<Option<Equipment>, StoreError> {
        let mut items = self.equipment()?;
        let Some(item) = items.iter_mut().find(|e| &e.id == id) else {
            return Ok(None);
        };
        patch.apply(item, today);
        let updated = item.clone();
        self.set_equipment(&items)?;
        Ok(Some(updated))
    }

    /// Remove an equipment record. No cascade: requests referencing it keep
    /// their dangling id. Returns whether anything was removed.
    pub fn delete_equipment(&self, id: &RecordId) -> Result<bool, StoreError> {
        let mut items = self.equipment()?;
        let before = items.len();
        items.retain(|e| &e.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.set_equipment(&items)?;
        Ok(true)
    }

    pub fn add_team(&self, item: Team) -> Result<Team, StoreError> {
        let mut items = self.teams()?;
        items.push(item.clone());
        self.set_teams(&items)?;
        Ok(item)
    }

    pub fn update_team(&self, id: &RecordId, patch: TeamPatch) -> Result<Option<Team>, StoreError> {
        let mut items = self.teams()?;
        let Some(item) = items.iter_mut().find(|t| &t.id == id) else {
            return Ok(None);
        };
        patch.apply(item);
        let updated = item.clone();
        self.set_teams(&items)?;
        Ok(Some(updated))
    }

    pub fn delete_team(&self, id: &RecordId) -> Result<bool, StoreError> {
        let mut items = self.teams()?;
        let before = items.len();
        items.retain(|t| &t.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.set_teams(&items)?;
        Ok(true)
    }

    pub fn add_category(&self, item: Category) -> Result<Category, StoreError> {
        let mut items = self.categories()?;
        items.push(item.clone());
        self.set_categories(&items)?;
        Ok(item)
    }

    pub fn update_category(
        &self,
        id: &RecordId,
        patch: CategoryPatch,
    ) -> Result<Option<Category>, StoreError> {
        let mut items = self.categories()?;
        let Some(item) = items.iter_mut().find(|c| &c.id == id) else {
            return Ok(None);
        };
        patch.apply(item);
        let updated = item.clone();
        self.set_categories(&items)?;
        Ok(Some(updated))
    }

    pub fn delete_category(&self, id: &RecordId) -> Result<bool, StoreError> {
        let mut items = self.categories()?;
        let before = items.len();
        items.retain(|c| &c.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.set_categories(&items)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_store(tmp: &tempfile::TempDir) -> Store {
        let project = Project::init(tmp.path()).unwrap();
        Store::open(&project)
    }

    #[test]
    fn test_missing_collection_reads_empty() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);

        assert!(store.equipment().unwrap().is_empty());
        assert!(store.requests().unwrap().is_empty());
    }

    #[test]
    fn test_set_then_get_preserves_order() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);

        let teams = vec![
            Team::new("Mechanics"),
            Team::new("Electricians"),
            Team::new("IT Support"),
        ];
        store.set_teams(&teams).unwrap();

        let names: Vec<String> = store.teams().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Mechanics", "Electricians", "IT Support"]);
    }

    #[test]
    fn test_set_all_is_full_replace() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);

        store
            .set_categories(&[Category::new("Power"), Category::new("Vehicle")])
            .unwrap();
        store.set_categories(&[Category::new("Server")]).unwrap();

        let categories = store.categories().unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Server");
    }

    #[test]
    fn test_find_miss_is_none_not_error() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);

        let missing = store.find_equipment(&RecordId::from("gone")).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_equipment_crud() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);

        let equipment = store.add_equipment(Equipment::new("CNC Machine #1")).unwrap();
        let id = equipment.id.clone();

        let patch = EquipmentPatch {
            location: Some("Factory Floor A".to_string()),
            ..Default::default()
        };
        let today = "2026-08-05".parse().unwrap();
        let updated = store.update_equipment(&id, patch, today).unwrap().unwrap();
        assert_eq!(updated.location, "Factory Floor A");

        assert!(store.delete_equipment(&id).unwrap());
        assert!(!store.delete_equipment(&id).unwrap());
        assert!(store.find_equipment(&id).unwrap().is_none());
    }

    #[test]
    fn test_update_miss_returns_none() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);

        let result = store
            .update_team(&RecordId::from("gone"), TeamPatch::default())
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_delete_equipment_leaves_requests_dangling() {
        let tmp = tempdir().unwrap();
        let store = test_store(&tmp);

        let equipment = store.add_equipment(Equipment::new("Forklift #3")).unwrap();
        let request = seed::sample_request("Brake System Repair", &equipment.id);
        store.set_requests(std::slice::from_ref(&request)).unwrap();

        store.delete_equipment(&equipment.id).unwrap();

        let requests = store.requests().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].equipment_id, equipment.id);
        assert!(store.find_equipment(&requests[0].equipment_id).unwrap().is_none());
    }
}
