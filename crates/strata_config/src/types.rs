//! Configuration types deserialized from `strata.toml`.

use serde::Deserialize;

/// The top-level configuration parsed from `strata.toml`.
#[derive(Debug, Deserialize)]
pub struct StrataConfig {
    /// Project metadata.
    pub project: ProjectMeta,
    /// Behavior of class member caches.
    #[serde(default)]
    pub members: MemberSettings,
}

/// Core project metadata required in every `strata.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
}

/// Settings for class member caches (`[members]` table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MemberSettings {
    /// Merge members supplied by the augmentation provider into member lists.
    pub collect_augments: bool,
    /// Materialize the `values()`/`valueOf(String)` methods of enums.
    pub synthesize_enum_methods: bool,
    /// Severity used when a member without a name is found.
    pub malformed_severity: MalformedSeverity,
}

impl Default for MemberSettings {
    fn default() -> Self {
        Self {
            collect_augments: true,
            synthesize_enum_methods: true,
            malformed_severity: MalformedSeverity::Error,
        }
    }
}

/// Severity of diagnostics reported for malformed members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedSeverity {
    /// Report as an error.
    #[default]
    Error,
    /// Report as a warning.
    Warning,
}
