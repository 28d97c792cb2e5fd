//! Session profile: the user's contraception regimen.
//!
//! Filled slot by slot from free text during the opening turns, then fixed
//! for the rest of the session. Never persisted across restarts.

use serde::{Deserialize, Serialize};

/// Sentinel stored in both slots for methods without a daily intake
/// (implant, patch, ring, hormonal IUD).
pub const CONTINUOUS_DELIVERY: &str = "diffusion continue";

/// The user's contraception regimen for this session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Pill brand, or the continuous-delivery sentinel.
    #[serde(default)]
    pub contraceptive_name: String,
    /// Intake time ("8h", "21h30"), or the continuous-delivery sentinel.
    #[serde(default)]
    pub intake_descriptor: String,
    /// Other regular medication, free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_medications: Option<String>,
}

impl UserProfile {
    pub fn has_contraceptive(&self) -> bool {
        !self.contraceptive_name.trim().is_empty()
    }

    pub fn has_intake(&self) -> bool {
        !self.intake_descriptor.trim().is_empty()
    }

    /// Both slots filled: the opening stage is done.
    pub fn is_complete(&self) -> bool {
        self.has_contraceptive() && self.has_intake()
    }

    /// True when the method has no daily dosing decision point.
    pub fn is_continuous_delivery(&self) -> bool {
        self.contraceptive_name == CONTINUOUS_DELIVERY
            || self.intake_descriptor == CONTINUOUS_DELIVERY
    }

    pub fn record_contraceptive(&mut self, name: &str) {
        self.contraceptive_name = name.trim().to_string();
    }

    pub fn record_intake(&mut self, descriptor: &str) {
        self.intake_descriptor = descriptor.trim().to_string();
    }

    /// Set both slots to the continuous-delivery sentinel.
    pub fn record_continuous_delivery(&mut self) {
        self.contraceptive_name = CONTINUOUS_DELIVERY.to_string();
        self.intake_descriptor = CONTINUOUS_DELIVERY.to_string();
    }

    /// One-line French summary for prompts and confirmations.
    pub fn summary(&self) -> String {
        if self.is_continuous_delivery() {
            "méthode à diffusion continue (implant, patch, anneau ou stérilet)".to_string()
        } else {
            format!(
                "{}, prise à {}",
                self.contraceptive_name, self.intake_descriptor
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profile_is_incomplete() {
        let profile = UserProfile::default();
        assert!(!profile.has_contraceptive());
        assert!(!profile.has_intake());
        assert!(!profile.is_complete());
        assert!(!profile.is_continuous_delivery());
    }

    #[test]
    fn test_record_slots_trims() {
        let mut profile = UserProfile::default();
        profile.record_contraceptive("  Leeloo ");
        profile.record_intake(" 8h ");
        assert_eq!(profile.contraceptive_name, "Leeloo");
        assert_eq!(profile.intake_descriptor, "8h");
        assert!(profile.is_complete());
    }

    #[test]
    fn test_continuous_delivery_fills_both_slots() {
        let mut profile = UserProfile::default();
        profile.record_continuous_delivery();
        assert_eq!(profile.contraceptive_name, CONTINUOUS_DELIVERY);
        assert_eq!(profile.intake_descriptor, CONTINUOUS_DELIVERY);
        assert!(profile.is_complete());
        assert!(profile.is_continuous_delivery());
    }

    #[test]
    fn test_summary_mentions_both_slots() {
        let mut profile = UserProfile::default();
        profile.record_contraceptive("Optilova");
        profile.record_intake("21h");
        let summary = profile.summary();
        assert!(summary.contains("Optilova"));
        assert!(summary.contains("21h"));
    }
}
