use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    PythonCli,
    PythonLib,
    NodeFrontend,
    Infrastructure,
    Documentation,
    Lab,
    Unknown,
}

impl ProjectType {
    /// Concrete types in enumeration order. Detection ties resolve to the earliest entry.
    pub const ALL: [ProjectType; 6] = [
        ProjectType::PythonCli,
        ProjectType::PythonLib,
        ProjectType::NodeFrontend,
        ProjectType::Infrastructure,
        ProjectType::Documentation,
        ProjectType::Lab,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::PythonCli => "python-cli",
            ProjectType::PythonLib => "python-lib",
            ProjectType::NodeFrontend => "node-frontend",
            ProjectType::Infrastructure => "infrastructure",
            ProjectType::Documentation => "documentation",
            ProjectType::Lab => "lab",
            ProjectType::Unknown => "unknown",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProjectType::PythonCli => "Python CLI Application",
            ProjectType::PythonLib => "Python Library",
            ProjectType::NodeFrontend => "Node.js Frontend",
            ProjectType::Infrastructure => "Infrastructure (Terraform/Ansible)",
            ProjectType::Documentation => "Documentation (MkDocs)",
            ProjectType::Lab => "Lab/Tutorial",
            ProjectType::Unknown => "Unknown",
        }
    }

    /// Name of the built-in standards layer stacked on top of `base` for this type.
    pub fn standards_layer(&self) -> Option<&'static str> {
        match self {
            ProjectType::PythonCli | ProjectType::PythonLib => Some("python"),
            ProjectType::NodeFrontend => Some("node"),
            ProjectType::Infrastructure => Some("infra"),
            ProjectType::Documentation => Some("documentation"),
            ProjectType::Lab => Some("lab"),
            ProjectType::Unknown => None,
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "python-cli" => Ok(ProjectType::PythonCli),
            "python-lib" => Ok(ProjectType::PythonLib),
            "node-frontend" => Ok(ProjectType::NodeFrontend),
            "infrastructure" => Ok(ProjectType::Infrastructure),
            "documentation" => Ok(ProjectType::Documentation),
            "lab" => Ok(ProjectType::Lab),
            "unknown" => Ok(ProjectType::Unknown),
            other => Err(Error::UnknownProjectType(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Passed,
    Failed,
    Warning,
    Skipped,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Passed => "passed",
            CheckStatus::Failed => "failed",
            CheckStatus::Warning => "warning",
            CheckStatus::Skipped => "skipped",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CheckLevel {
    #[default]
    Required,
    Recommended,
    Optional,
}

impl CheckLevel {
    pub const ALL: [CheckLevel; 3] = [CheckLevel::Required, CheckLevel::Recommended, CheckLevel::Optional];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckLevel::Required => "required",
            CheckLevel::Recommended => "recommended",
            CheckLevel::Optional => "optional",
        }
    }

    /// Lenient parse used for user level overrides; anything else is ignored by the caller.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "required" => Some(CheckLevel::Required),
            "recommended" => Some(CheckLevel::Recommended),
            "optional" => Some(CheckLevel::Optional),
            _ => None,
        }
    }
}

impl fmt::Display for CheckLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DetectionResult {
    pub project_type: ProjectType,
    pub confidence: f64,
    pub markers_found: Vec<String>,
    pub markers_checked: std::collections::BTreeSet<String>,
}

impl DetectionResult {
    pub fn is_confident(&self) -> bool {
        self.confidence >= 0.7
    }
}
