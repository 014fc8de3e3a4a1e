//! Project documents

use crate::error::StoreError;
use crate::resources::collection::OrderedResource;
use crate::resources::normalize::ListInput;
use crate::validation::{optional, required};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    Planned,
    #[default]
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub role: String,
    pub outcome: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_repo_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_repo_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_repo_owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_repo_url: Option<String>,
    #[serde(default = "featured_by_default")]
    pub is_featured: bool,
}

fn featured_by_default() -> bool {
    true
}

/// Client-supplied project fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub role: Option<String>,
    pub outcome: Option<String>,
    pub status: Option<ProjectStatus>,
    pub technologies: Option<ListInput>,
    pub highlights: Option<ListInput>,
    pub github_link: Option<String>,
    pub live_link: Option<String>,
    pub image: Option<String>,
    pub github_repo_id: Option<i64>,
    pub github_repo_name: Option<String>,
    pub github_repo_owner: Option<String>,
    pub github_repo_url: Option<String>,
    pub is_featured: Option<bool>,
}

const TITLE_REQUIRED: &str = "Project title is required";
const DESCRIPTION_REQUIRED: &str = "Project description is required";
const ROLE_REQUIRED: &str = "Project role is required";
const OUTCOME_REQUIRED: &str = "Outcome is required";

impl OrderedResource for Project {
    const COLLECTION: &'static str = "projects";
    const LABEL: &'static str = "Project";

    type Payload = ProjectPayload;

    fn from_payload(p: ProjectPayload) -> Result<Self, StoreError> {
        Ok(Project {
            title: required(p.title.as_deref(), TITLE_REQUIRED)?,
            description: required(p.description.as_deref(), DESCRIPTION_REQUIRED)?,
            summary: optional(p.summary.as_deref()),
            role: required(p.role.as_deref(), ROLE_REQUIRED)?,
            outcome: required(p.outcome.as_deref(), OUTCOME_REQUIRED)?,
            status: p.status.unwrap_or_default(),
            technologies: p.technologies.map(|l| l.normalize()).unwrap_or_default(),
            highlights: p.highlights.map(|l| l.normalize()).unwrap_or_default(),
            github_link: optional(p.github_link.as_deref()),
            live_link: optional(p.live_link.as_deref()),
            image: optional(p.image.as_deref()),
            github_repo_id: p.github_repo_id,
            github_repo_name: optional(p.github_repo_name.as_deref()),
            github_repo_owner: optional(p.github_repo_owner.as_deref()),
            github_repo_url: optional(p.github_repo_url.as_deref()),
            is_featured: p.is_featured.unwrap_or(true),
        })
    }

    fn apply(&mut self, p: ProjectPayload) -> Result<(), StoreError> {
        if let Some(title) = p.title.as_deref() {
            self.title = required(Some(title), TITLE_REQUIRED)?;
        }
        if let Some(description) = p.description.as_deref() {
            self.description = required(Some(description), DESCRIPTION_REQUIRED)?;
        }
        if let Some(role) = p.role.as_deref() {
            self.role = required(Some(role), ROLE_REQUIRED)?;
        }
        if let Some(outcome) = p.outcome.as_deref() {
            self.outcome = required(Some(outcome), OUTCOME_REQUIRED)?;
        }
        if p.summary.is_some() {
            self.summary = optional(p.summary.as_deref());
        }
        if let Some(status) = p.status {
            self.status = status;
        }
        if let Some(technologies) = p.technologies {
            self.technologies = technologies.normalize();
        }
        if let Some(highlights) = p.highlights {
            self.highlights = highlights.normalize();
        }
        if p.github_link.is_some() {
            self.github_link = optional(p.github_link.as_deref());
        }
        if p.live_link.is_some() {
            self.live_link = optional(p.live_link.as_deref());
        }
        if p.image.is_some() {
            self.image = optional(p.image.as_deref());
        }
        if p.github_repo_id.is_some() {
            self.github_repo_id = p.github_repo_id;
        }
        if p.github_repo_name.is_some() {
            self.github_repo_name = optional(p.github_repo_name.as_deref());
        }
        if p.github_repo_owner.is_some() {
            self.github_repo_owner = optional(p.github_repo_owner.as_deref());
        }
        if p.github_repo_url.is_some() {
            self.github_repo_url = optional(p.github_repo_url.as_deref());
        }
        if let Some(is_featured) = p.is_featured {
            self.is_featured = is_featured;
        }
        Ok(())
    }
}
