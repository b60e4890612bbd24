//! The project requirements record produced at the end of an intake.
//!
//! Model output is never deserialized straight into [`ProjectRequirements`].
//! It is decoded into a draft where every field is optional, and each entity
//! has a validation function that either yields the finished value or names
//! the first violation it found. A record therefore exists only when every
//! required field was present and well-typed.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};
use thiserror::Error;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, EnumString, Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectType {
    NewProject,
    FeatureEnhancement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Feature {
    /// Short name of the feature.
    title: String,
    /// What the feature does and who it is for.
    description: String,
}

impl Feature {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ProjectRequirements {
    /// Name of the project.
    project_name: String,
    /// Whether this is a brand new project or an enhancement of an existing one.
    project_type: ProjectType,
    /// Person or team that owns the project.
    stakeholder: String,
    /// The problem the project solves.
    problem_statement: String,
    /// Features the project needs. May be empty.
    features: Vec<Feature>,
    /// How success will be measured.
    success_metrics: Vec<String>,
    /// Budget, deadline, technology or other constraints, if any were given.
    #[serde(skip_serializing_if = "Option::is_none")]
    constraints: Option<Vec<String>>,
}

impl ProjectRequirements {
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn project_type(&self) -> ProjectType {
        self.project_type
    }

    pub fn stakeholder(&self) -> &str {
        &self.stakeholder
    }

    pub fn problem_statement(&self) -> &str {
        &self.problem_statement
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn success_metrics(&self) -> &[String] {
        &self.success_metrics
    }

    pub fn constraints(&self) -> Option<&[String]> {
        self.constraints.as_deref()
    }

    /// JSON schema describing the record, as handed to the model.
    pub fn json_schema() -> serde_json::Value {
        schemars::schema_for!(ProjectRequirements).to_value()
    }

    /// Parses and validates a JSON document produced by the model.
    pub fn from_json(json: &str) -> Result<Self, SchemaViolation> {
        let draft: RequirementsDraft =
            serde_json::from_str(json).map_err(|e| SchemaViolation::Malformed(e.to_string()))?;
        draft.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("output is not a JSON object of the expected shape: {0}")]
    Malformed(String),

    #[error("required field `{0}` is missing")]
    MissingField(String),

    #[error("`{0}` is not a valid project_type (expected NEW_PROJECT or FEATURE_ENHANCEMENT)")]
    UnknownProjectType(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FeatureDraft {
    title: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RequirementsDraft {
    project_name: Option<String>,
    project_type: Option<String>,
    stakeholder: Option<String>,
    problem_statement: Option<String>,
    features: Option<Vec<FeatureDraft>>,
    success_metrics: Option<Vec<String>>,
    constraints: Option<Vec<String>>,
}

/// Absent, `null` and blank strings all count as missing.
fn required_text(value: Option<String>, field: &str) -> Result<String, SchemaViolation> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| SchemaViolation::MissingField(field.to_string()))
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, SchemaViolation> {
    value.ok_or_else(|| SchemaViolation::MissingField(field.to_string()))
}

impl FeatureDraft {
    fn validate(self, index: usize) -> Result<Feature, SchemaViolation> {
        Ok(Feature {
            title: required_text(self.title, &format!("features[{index}].title"))?,
            description: required_text(self.description, &format!("features[{index}].description"))?,
        })
    }
}

impl RequirementsDraft {
    fn validate(self) -> Result<ProjectRequirements, SchemaViolation> {
        let project_name = required_text(self.project_name, "project_name")?;
        let project_type = required_text(self.project_type, "project_type")?;
        let project_type = ProjectType::from_str(project_type.trim())
            .map_err(|_| SchemaViolation::UnknownProjectType(project_type))?;
        let stakeholder = required_text(self.stakeholder, "stakeholder")?;
        let problem_statement = required_text(self.problem_statement, "problem_statement")?;
        let features = required(self.features, "features")?
            .into_iter()
            .enumerate()
            .map(|(index, feature)| feature.validate(index))
            .collect::<Result<Vec<_>, _>>()?;
        let success_metrics = required(self.success_metrics, "success_metrics")?;

        Ok(ProjectRequirements {
            project_name,
            project_type,
            stakeholder,
            problem_statement,
            features,
            success_metrics,
            constraints: self.constraints,
        })
    }
}
