//! Local knowledge base of curated interaction verdicts.
//!
//! The builtin entries cover the substances most often asked about, so the
//! common cases resolve without any network call. A TOML file can replace
//! the builtin set per deployment.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::EliaError;
use crate::interaction::{InteractionResult, Recommendation, SourceRef};
use crate::normalize::{fold_text, text_matches_synonym};
use crate::severity::Severity;

/// Appended to the explanation when the safety net rewrites a verdict.
pub const FUZZY_MATCH_NOTE: &str =
    " Substance identifiée malgré une orthographe approximative.";

/// One curated verdict, keyed by canonical product name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KbEntry {
    pub canonical: String,
    #[serde(flatten)]
    pub result: InteractionResult,
}

/// Maps a high-risk trigger word back to its canonical entry. Used to catch
/// dangerous substances the remote model failed to identify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighRiskTrigger {
    pub trigger: String,
    pub canonical: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default, rename = "entry")]
    entries: Vec<KbEntry>,
    #[serde(default, rename = "high_risk")]
    high_risk: Vec<HighRiskTrigger>,
}

impl KnowledgeBase {
    pub fn builtin() -> Self {
        let entries = vec![
            KbEntry {
                canonical: "millepertuis (Hypericum perforatum)".to_string(),
                result: InteractionResult {
                    level: Severity::Severe,
                    title: "Millepertuis et contraception hormonale : interaction majeure"
                        .to_string(),
                    explanation: "Le millepertuis est un inducteur enzymatique puissant du \
                                  cytochrome P450 3A4, la voie qui dégrade les hormones de \
                                  votre contraception. Il accélère leur élimination et peut \
                                  rendre la pilule inefficace."
                        .to_string(),
                    scientific_basis: "Interaction documentée par l'ANSM et le thésaurus des \
                                       interactions médicamenteuses : association déconseillée \
                                       avec les contraceptifs hormonaux."
                        .to_string(),
                    sources: vec![
                        SourceRef::new(
                            "ANSM — Thésaurus des interactions médicamenteuses",
                            "https://ansm.sante.fr/dossiers-thematiques/interactions-medicamenteuses",
                        ),
                        SourceRef::new("Vidal — Millepertuis", "https://www.vidal.fr"),
                    ],
                    contraception_impact: "Risque réel de grossesse non désirée : l'effet \
                                           inducteur persiste jusqu'à deux semaines après \
                                           l'arrêt du millepertuis."
                        .to_string(),
                    recommendation: Recommendation {
                        timing: "N'associez pas le millepertuis à votre contraception sans \
                                 avis médical ; l'espacement des prises ne suffit pas."
                            .to_string(),
                        alternative: "Parlez-en à votre médecin : d'autres approches du \
                                      moral existent (safran, aubépine) sans effet connu \
                                      sur la contraception."
                            .to_string(),
                    },
                },
            },
            KbEntry {
                canonical: "charbon actif".to_string(),
                result: InteractionResult {
                    level: Severity::Medium,
                    title: "Charbon actif : absorption de la pilule réduite".to_string(),
                    explanation: "Le charbon actif adsorbe les molécules présentes dans le \
                                  tube digestif, y compris les hormones de votre pilule si \
                                  les prises sont proches."
                        .to_string(),
                    scientific_basis: "Propriété adsorbante bien établie du charbon activé ; \
                                       précaution classique avec tout médicament oral."
                        .to_string(),
                    sources: vec![SourceRef::new("Vidal — Charbon activé", "https://www.vidal.fr")],
                    contraception_impact: "Une prise simultanée peut diminuer la quantité \
                                           d'hormones réellement absorbée."
                        .to_string(),
                    recommendation: Recommendation {
                        timing: "Espacez la prise de charbon d'au moins 3 à 4 heures de \
                                 celle de votre pilule."
                            .to_string(),
                        alternative: String::new(),
                    },
                },
            },
            KbEntry {
                canonical: "vitamine C".to_string(),
                result: InteractionResult {
                    level: Severity::Low,
                    title: "Vitamine C : pas d'interaction significative".to_string(),
                    explanation: "Aux doses usuelles des compléments, la vitamine C n'a pas \
                                  d'effet cliniquement significatif sur l'efficacité des \
                                  contraceptifs hormonaux."
                        .to_string(),
                    scientific_basis: "Les données anciennes sur une compétition de \
                                       sulfoconjugaison n'ont pas été confirmées à doses \
                                       usuelles."
                        .to_string(),
                    sources: vec![SourceRef::new("Vidal — Acide ascorbique", "https://www.vidal.fr")],
                    contraception_impact: "Aucun impact attendu sur votre contraception."
                        .to_string(),
                    recommendation: Recommendation {
                        timing: String::new(),
                        alternative: String::new(),
                    },
                },
            },
            KbEntry {
                canonical: "collagène".to_string(),
                result: InteractionResult {
                    level: Severity::Low,
                    title: "Collagène : aucune interaction connue".to_string(),
                    explanation: "Le collagène est une protéine digérée comme celles de \
                                  l'alimentation. Aucun mécanisme d'interaction avec les \
                                  hormones contraceptives n'est décrit."
                        .to_string(),
                    scientific_basis: "Absence de signal dans la littérature et les bases \
                                       d'interactions."
                        .to_string(),
                    sources: vec![SourceRef::new("Vidal", "https://www.vidal.fr")],
                    contraception_impact: "Aucun impact attendu sur votre contraception."
                        .to_string(),
                    recommendation: Recommendation {
                        timing: String::new(),
                        alternative: String::new(),
                    },
                },
            },
            KbEntry {
                canonical: "spiruline".to_string(),
                result: InteractionResult {
                    level: Severity::Low,
                    title: "Spiruline : pas d'interaction documentée".to_string(),
                    explanation: "La spiruline n'a pas d'effet connu sur les enzymes qui \
                                  métabolisent les hormones contraceptives."
                        .to_string(),
                    scientific_basis: "Aucune interaction répertoriée dans les bases de \
                                       référence françaises."
                        .to_string(),
                    sources: vec![SourceRef::new(
                        "ANSES — Compléments alimentaires",
                        "https://www.anses.fr",
                    )],
                    contraception_impact: "Aucun impact attendu sur votre contraception."
                        .to_string(),
                    recommendation: Recommendation {
                        timing: "Aucune précaution d'horaire nécessaire.".to_string(),
                        alternative: String::new(),
                    },
                },
            },
        ];

        let high_risk = vec![
            HighRiskTrigger {
                trigger: "millepertuis".to_string(),
                canonical: "millepertuis (Hypericum perforatum)".to_string(),
            },
            HighRiskTrigger {
                trigger: "hypericum".to_string(),
                canonical: "millepertuis (Hypericum perforatum)".to_string(),
            },
            HighRiskTrigger {
                trigger: "st john's wort".to_string(),
                canonical: "millepertuis (Hypericum perforatum)".to_string(),
            },
        ];

        Self { entries, high_risk }
    }

    /// Exact lookup by canonical name.
    pub fn get(&self, canonical: &str) -> Option<&KbEntry> {
        self.entries.iter().find(|e| e.canonical == canonical)
    }

    pub fn entries(&self) -> &[KbEntry] {
        &self.entries
    }

    /// Last line of defense: if a verdict came back unclassified but the
    /// query names a known high-risk substance (typos included), replace
    /// the verdict with the curated entry and annotate the rewrite.
    ///
    /// A verdict with any known severity passes through untouched, so
    /// applying the net twice changes nothing.
    pub fn apply_safety_net(
        &self,
        result: InteractionResult,
        query: &str,
    ) -> InteractionResult {
        if result.level != Severity::Unknown {
            return result;
        }
        let folded = fold_text(query);
        for trigger in &self.high_risk {
            if text_matches_synonym(&folded, &fold_text(&trigger.trigger)) {
                if let Some(entry) = self.get(&trigger.canonical) {
                    warn!(
                        query,
                        canonical = %trigger.canonical,
                        "unclassified verdict overridden for high-risk substance"
                    );
                    let mut replacement = entry.result.clone();
                    replacement.explanation.push_str(FUZZY_MATCH_NOTE);
                    return replacement;
                }
            }
        }
        result
    }

    pub fn from_toml_str(text: &str) -> Result<Self, EliaError> {
        let kb: KnowledgeBase = toml::from_str(text)?;
        if kb.entries.is_empty() {
            return Err(EliaError::InvalidData(
                "knowledge base contains no entries".to_string(),
            ));
        }
        Ok(kb)
    }

    pub fn load(path: &Path) -> Result<Self, EliaError> {
        let text = std::fs::read_to_string(path)?;
        let kb = Self::from_toml_str(&text)?;
        info!(path = %path.display(), entries = kb.entries.len(), "loaded knowledge base");
        Ok(kb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_covers_known_substances() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.entries().len(), 5);
        let millepertuis = kb.get("millepertuis (Hypericum perforatum)").unwrap();
        assert_eq!(millepertuis.result.level, Severity::Severe);
        let charbon = kb.get("charbon actif").unwrap();
        assert_eq!(charbon.result.level, Severity::Medium);
    }

    #[test]
    fn test_get_misses_unknown_name() {
        let kb = KnowledgeBase::builtin();
        assert!(kb.get("curcuma").is_none());
    }

    #[test]
    fn test_safety_net_overrides_unclassified_high_risk() {
        let kb = KnowledgeBase::builtin();
        let unknown = InteractionResult {
            level: Severity::Unknown,
            ..Default::default()
        };
        let rewritten = kb.apply_safety_net(unknown, "gelules de milepertui");
        assert_eq!(rewritten.level, Severity::Severe);
        assert!(rewritten.explanation.ends_with(FUZZY_MATCH_NOTE));
    }

    #[test]
    fn test_safety_net_is_idempotent() {
        let kb = KnowledgeBase::builtin();
        let unknown = InteractionResult {
            level: Severity::Unknown,
            ..Default::default()
        };
        let once = kb.apply_safety_net(unknown, "millepertuis");
        let twice = kb.apply_safety_net(once.clone(), "millepertuis");
        assert_eq!(once, twice);
        assert_eq!(once.explanation.matches(FUZZY_MATCH_NOTE).count(), 1);
    }

    #[test]
    fn test_safety_net_leaves_classified_verdicts_alone() {
        let kb = KnowledgeBase::builtin();
        let low = InteractionResult {
            level: Severity::Low,
            explanation: "rien à signaler".to_string(),
            ..Default::default()
        };
        let same = kb.apply_safety_net(low.clone(), "millepertuis");
        assert_eq!(same, low);
    }

    #[test]
    fn test_safety_net_ignores_unrelated_queries() {
        let kb = KnowledgeBase::builtin();
        let unknown = InteractionResult {
            level: Severity::Unknown,
            ..Default::default()
        };
        let same = kb.apply_safety_net(unknown.clone(), "poudre de perlimpinpin");
        assert_eq!(same, unknown);
    }

    #[test]
    fn test_from_toml_str_parses_entries() {
        let text = r#"
            [[entry]]
            canonical = "curcuma"
            level = "low"
            title = "Curcuma"
            explanation = "Pas d'interaction connue."

            [[high_risk]]
            trigger = "curcuma fort"
            canonical = "curcuma"
        "#;
        let kb = KnowledgeBase::from_toml_str(text).unwrap();
        assert_eq!(kb.entries().len(), 1);
        assert_eq!(kb.entries()[0].result.level, Severity::Low);
        assert_eq!(kb.high_risk.len(), 1);
    }

    #[test]
    fn test_empty_kb_is_rejected() {
        let parsed = KnowledgeBase::from_toml_str("");
        assert!(matches!(parsed, Err(EliaError::InvalidData(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[[entry]]\ncanonical = \"curcuma\"\nlevel = \"low\"\n"
        )
        .unwrap();
        let kb = KnowledgeBase::load(file.path()).unwrap();
        assert_eq!(kb.entries().len(), 1);
    }
}
