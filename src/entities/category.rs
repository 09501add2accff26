//! Equipment category records
//!
//! Equipment references categories by name, not id. Renaming a category
//! silently orphans the equipment that carried the old name; that looseness
//! is relied upon by existing data and is left as-is.

use serde::{Deserialize, Serialize};

use crate::core::identity::{RecordId, RecordPrefix};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: RecordId,

    pub name: String,

    /// Responsible person, free text
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub responsible: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub company: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(RecordPrefix::Category),
            name: name.into(),
            responsible: String::new(),
            company: String::new(),
        }
    }
}

/// Field-level merge for category edits
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub responsible: Option<String>,
    pub company: Option<String>,
}

impl CategoryPatch {
    pub fn apply(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(responsible) = self.responsible {
            category.responsible = responsible;
        }
        if let Some(company) = self.company {
            category.company = company;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.responsible.is_none() && self.company.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_does_not_touch_anything_else() {
        let mut category = Category::new("Power");
        category.responsible = "Sarah Williams".to_string();

        let patch = CategoryPatch {
            name: Some("Electrical".to_string()),
            ..Default::default()
        };
        patch.apply(&mut category);

        assert_eq!(category.name, "Electrical");
        assert_eq!(category.responsible, "Sarah Williams");
    }
}
