use serde::{Deserialize, Serialize};

use super::Record;

/// A portfolio project card.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Record for Project {
    const COLLECTION: &'static str = "projects";
    const KIND: &'static str = "project";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn order(&self) -> Option<u32> {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = Some(order);
    }

    fn set_created_at(&mut self, ts: String) {
        self.created_at = Some(ts);
    }

    fn set_updated_at(&mut self, ts: String) {
        self.updated_at = Some(ts);
    }

    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        Ok(())
    }
}

/// External links attached to an experience entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_study: Option<String>,
}

/// A work/experience entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub stack: Vec<String>,
    #[serde(default)]
    pub links: ExperienceLinks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Record for ExperienceEntry {
    const COLLECTION: &'static str = "experience";
    const KIND: &'static str = "experience entry";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn order(&self) -> Option<u32> {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = Some(order);
    }

    fn set_created_at(&mut self, ts: String) {
        self.created_at = Some(ts);
    }

    fn set_updated_at(&mut self, ts: String) {
        self.updated_at = Some(ts);
    }

    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        if self.company.trim().is_empty() {
            return Err("Company is required".to_string());
        }
        Ok(())
    }
}

/// A single skill badge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Record for Skill {
    const COLLECTION: &'static str = "skills";
    const KIND: &'static str = "skill";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn order(&self) -> Option<u32> {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = Some(order);
    }

    fn set_created_at(&mut self, ts: String) {
        self.created_at = Some(ts);
    }

    fn set_updated_at(&mut self, ts: String) {
        self.updated_at = Some(ts);
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        Ok(())
    }
}

/// Incoming shape for the skills bulk save.
///
/// Historical clients send either a bare name string or a
/// `{name, order?}` object; both are accepted and normalized before
/// anything touches the store.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SkillInput {
    Name(String),
    Entry {
        name: String,
        #[serde(default)]
        order: Option<u32>,
    },
}

impl SkillInput {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Entry { name, .. } => name,
        }
    }
}

/// Normalize bulk-save inputs to canonical [`Skill`] drafts.
///
/// Client-supplied `order` values are discarded: after a bulk save the
/// position in the input sequence is the order.
pub fn normalize_skills(inputs: Vec<SkillInput>) -> Result<Vec<Skill>, String> {
    let mut skills = Vec::with_capacity(inputs.len());
    for input in inputs {
        let name = input.name().trim().to_string();
        if name.is_empty() {
            return Err("Name is required".to_string());
        }
        skills.push(Skill {
            name,
            ..Skill::default()
        });
    }
    Ok(skills)
}
