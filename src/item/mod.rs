//! Portfolio record types and the `Record` trait shared by the
//! collection layer.

mod record;
mod types;

pub use record::Record;
pub use types::{
    normalize_skills, ExperienceEntry, ExperienceLinks, Project, Skill, SkillInput,
};
