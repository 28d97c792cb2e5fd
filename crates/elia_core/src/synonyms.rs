//! Synonym table: maps commercial and foreign names to canonical substances.
//!
//! v0.3.0: shipped as a builtin table, with an optional TOML override so
//! deployments can extend it without a rebuild.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::EliaError;

/// One substance with every name users write it under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynonymRow {
    pub canonical: String,
    pub synonyms: Vec<String>,
}

/// Ordered synonym rows. Order matters: earlier rows win ties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynonymTable {
    #[serde(default, rename = "row")]
    rows: Vec<SynonymRow>,
}

impl SynonymTable {
    /// The built-in table covering the substances the local knowledge base
    /// knows about.
    pub fn builtin() -> Self {
        let rows = vec![
            SynonymRow {
                canonical: "millepertuis (Hypericum perforatum)".to_string(),
                synonyms: vec![
                    "millepertuis".to_string(),
                    "hypericum perforatum".to_string(),
                    "hypericum".to_string(),
                    "st john's wort".to_string(),
                    "saint john's wort".to_string(),
                    "herbe de la saint-jean".to_string(),
                ],
            },
            SynonymRow {
                canonical: "charbon actif".to_string(),
                synonyms: vec![
                    "charbon actif".to_string(),
                    "charbon végétal".to_string(),
                    "charbon".to_string(),
                    "activated charcoal".to_string(),
                ],
            },
            SynonymRow {
                canonical: "vitamine C".to_string(),
                synonyms: vec![
                    "vitamine c".to_string(),
                    "vitamin c".to_string(),
                    "acide ascorbique".to_string(),
                    "ascorbic acid".to_string(),
                ],
            },
            SynonymRow {
                canonical: "collagène".to_string(),
                synonyms: vec![
                    "collagène".to_string(),
                    "collagene".to_string(),
                    "collagen".to_string(),
                    "collagène marin".to_string(),
                ],
            },
            SynonymRow {
                canonical: "spiruline".to_string(),
                synonyms: vec!["spiruline".to_string(), "spirulina".to_string()],
            },
        ];
        Self { rows }
    }

    /// Parse a table from TOML text. An empty table is an error: a
    /// deployment override that matches nothing is a configuration bug,
    /// not a fallback case.
    pub fn from_toml_str(text: &str) -> Result<Self, EliaError> {
        let table: SynonymTable = toml::from_str(text)?;
        if table.rows.is_empty() {
            return Err(EliaError::InvalidData(
                "synonym table contains no rows".to_string(),
            ));
        }
        Ok(table)
    }

    /// Load a table from a TOML file.
    pub fn load(path: &Path) -> Result<Self, EliaError> {
        let text = std::fs::read_to_string(path)?;
        let table = Self::from_toml_str(&text)?;
        info!(path = %path.display(), rows = table.rows.len(), "loaded synonym table");
        Ok(table)
    }

    pub fn rows(&self) -> &[SynonymRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
