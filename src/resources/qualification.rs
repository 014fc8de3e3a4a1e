//! Qualification documents (education, certificates, courses)

use crate::error::StoreError;
use crate::resources::collection::OrderedResource;
use crate::resources::normalize::ListInput;
use crate::validation::required;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualificationKind {
    #[default]
    College,
    University,
    Certificate,
    Course,
    Bootcamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Qualification {
    pub institution: String,
    pub program: String,
    pub status: String,
    pub period: String,
    pub location: String,
    #[serde(rename = "type", default)]
    pub kind: QualificationKind,
    pub description: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualificationPayload {
    pub institution: Option<String>,
    pub program: Option<String>,
    pub status: Option<String>,
    pub period: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<QualificationKind>,
    pub description: Option<String>,
    pub highlights: Option<ListInput>,
}

const INSTITUTION_REQUIRED: &str = "Institution is required";
const PROGRAM_REQUIRED: &str = "Program or degree is required";
const STATUS_REQUIRED: &str = "Status is required";
const PERIOD_REQUIRED: &str = "Program period is required";
const LOCATION_REQUIRED: &str = "Location is required";
const DESCRIPTION_REQUIRED: &str = "Description is required";

/// Overwrite `slot` with a required field when the payload carries it
fn merge_required(slot: &mut String, value: Option<&str>, message: &str) -> Result<(), StoreError> {
    if value.is_some() {
        *slot = required(value, message)?;
    }
    Ok(())
}

impl OrderedResource for Qualification {
    const COLLECTION: &'static str = "qualifications";
    const LABEL: &'static str = "Qualification";

    type Payload = QualificationPayload;

    fn from_payload(p: QualificationPayload) -> Result<Self, StoreError> {
        Ok(Qualification {
            institution: required(p.institution.as_deref(), INSTITUTION_REQUIRED)?,
            program: required(p.program.as_deref(), PROGRAM_REQUIRED)?,
            status: required(p.status.as_deref(), STATUS_REQUIRED)?,
            period: required(p.period.as_deref(), PERIOD_REQUIRED)?,
            location: required(p.location.as_deref(), LOCATION_REQUIRED)?,
            kind: p.kind.unwrap_or_default(),
            description: required(p.description.as_deref(), DESCRIPTION_REQUIRED)?,
            highlights: p.highlights.map(|l| l.normalize()).unwrap_or_default(),
        })
    }

    fn apply(&mut self, p: QualificationPayload) -> Result<(), StoreError> {
        merge_required(&mut self.institution, p.institution.as_deref(), INSTITUTION_REQUIRED)?;
        merge_required(&mut self.program, p.program.as_deref(), PROGRAM_REQUIRED)?;
        merge_required(&mut self.status, p.status.as_deref(), STATUS_REQUIRED)?;
        merge_required(&mut self.period, p.period.as_deref(), PERIOD_REQUIRED)?;
        merge_required(&mut self.location, p.location.as_deref(), LOCATION_REQUIRED)?;
        merge_required(&mut self.description, p.description.as_deref(), DESCRIPTION_REQUIRED)?;
        if let Some(kind) = p.kind {
            self.kind = kind;
        }
        if let Some(highlights) = p.highlights {
            self.highlights = highlights.normalize();
        }
        Ok(())
    }
}
