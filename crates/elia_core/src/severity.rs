//! Interaction severity levels.
//!
//! Four ordered categories describing how much a product can degrade
//! contraceptive efficacy, plus the default timing advice keyed on them.

use serde::{Deserialize, Serialize};

/// Interaction risk level, ordered from harmless to unclassifiable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[serde(alias = "faible")]
    Low,
    #[serde(alias = "moderate")]
    Medium,
    #[serde(alias = "high")]
    Severe,
    #[default]
    Unknown,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::Severe => "severe",
            Severity::Unknown => "unknown",
        }
    }

    /// French label for display.
    pub fn label_fr(&self) -> &'static str {
        match self {
            Severity::Low => "faible",
            Severity::Medium => "modérée",
            Severity::Severe => "sévère",
            Severity::Unknown => "inconnue",
        }
    }

    /// Whether this is the lowest (no-concern) level.
    pub fn is_lowest(&self) -> bool {
        matches!(self, Severity::Low)
    }

    /// Default timing advice used when a verdict carries none.
    pub fn default_timing(&self) -> &'static str {
        match self {
            Severity::Low => {
                "Aucune précaution particulière : les prises peuvent avoir lieu au même moment."
            }
            Severity::Medium => "Espacez les deux prises d'au moins 3 à 4 heures.",
            Severity::Severe => {
                "Ne prenez pas ce produit sans avis médical tant que vous utilisez votre contraception."
            }
            Severity::Unknown => {
                "Par précaution, espacez les prises de quelques heures et demandez conseil à votre pharmacien."
            }
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
