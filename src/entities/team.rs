//! Maintenance team records

use serde::{Deserialize, Serialize};

use crate::core::identity::{RecordId, RecordPrefix};

/// A maintenance team. Members are free-text names, in roster order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: RecordId,

    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub company: String,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(RecordPrefix::Team),
            name: name.into(),
            members: Vec::new(),
            company: String::new(),
        }
    }

    pub fn with_members(mut self, members: Vec<String>) -> Self {
        self.members = members;
        self
    }
}

/// Field-level merge for team edits
#[derive(Debug, Clone, Default)]
pub struct TeamPatch {
    pub name: Option<String>,
    pub members: Option<Vec<String>>,
    pub company: Option<String>,
}

impl TeamPatch {
    pub fn apply(self, team: &mut Team) {
        if let Some(name) = self.name {
            team.name = name;
        }
        if let Some(members) = self.members {
            team.members = members;
        }
        if let Some(company) = self.company {
            team.company = company;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.members.is_none() && self.company.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_keep_roster_order() {
        let team = Team::new("Mechanics").with_members(vec![
            "John Doe".to_string(),
            "Jane Smith".to_string(),
            "Mike Johnson".to_string(),
        ]);

        let yaml = serde_yml::to_string(&team).unwrap();
        let parsed: Team = serde_yml::from_str(&yaml).unwrap();

        assert_eq!(parsed.members, team.members);
    }

    #[test]
    fn test_patch_replaces_members_wholesale() {
        let mut team = Team::new("Electricians")
            .with_members(vec!["Sarah Williams".to_string(), "Tom Brown".to_string()]);

        let patch = TeamPatch {
            members: Some(vec!["Sarah Williams".to_string()]),
            ..Default::default()
        };
        patch.apply(&mut team);

        assert_eq!(team.members, vec!["Sarah Williams".to_string()]);
        assert_eq!(team.name, "Electricians");
    }
}
