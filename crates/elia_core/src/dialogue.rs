//! Everything Elia says, in one place.
//!
//! Wording lives here so the conversation flow stays free of copy. Variant
//! banks are picked by a stable seed: the same session state re-asks with
//! the same words, different sessions vary.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::profile::UserProfile;

/// Stable seed from arbitrary text.
pub fn seed_from_str(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

/// Pick one variant by seed. Panics on an empty bank, so banks are
/// compile-time non-empty slices only.
fn pick_varied<'a>(bank: &[&'a str], seed: u64) -> &'a str {
    bank[(seed % bank.len() as u64) as usize]
}

pub fn greeting_intro() -> String {
    "Bonjour, je suis Elia 👋 Je vérifie les interactions entre votre contraception et les \
     produits que vous prenez (compléments, plantes, médicaments courants)."
        .to_string()
}

pub fn greeting_question() -> String {
    "Pour commencer : quelle contraception utilisez-vous, et à quelle heure la prenez-vous ? \
     Par exemple « Leeloo à 21h »."
        .to_string()
}

pub fn ask_intake_time(brand: &str) -> String {
    format!("{brand}, c'est noté. À quelle heure la prenez-vous ? Par exemple « à 8h ».")
}

pub fn ask_brand(time: &str) -> String {
    format!("Prise à {time}, c'est noté. Quelle pilule utilisez-vous ?")
}

pub fn reprompt_contraception(seed: u64) -> String {
    let bank = [
        "Je n'ai pas réussi à vous lire. Indiquez votre pilule et l'heure de prise, par \
         exemple « Leeloo à 8h ».",
        "Pardon, je n'ai pas compris. Donnez-moi le nom de votre pilule et l'heure de prise, \
         comme « Optilova à 21h ».",
    ];
    pick_varied(&bank, seed).to_string()
}

pub fn profile_confirmed(profile: &UserProfile) -> String {
    if profile.is_continuous_delivery() {
        "C'est noté : méthode à diffusion continue (implant, patch, anneau ou stérilet). \
         Quel produit ou complément voulez-vous vérifier ?"
            .to_string()
    } else {
        format!(
            "Parfait : {}. Quel produit ou complément voulez-vous vérifier ?",
            profile.summary()
        )
    }
}

pub fn empty_query_notice() -> String {
    "Je n'ai pas saisi de produit à vérifier. Donnez-moi son nom, par exemple \
     « millepertuis » ou « vitamine C »."
        .to_string()
}

pub fn backend_unavailable_notice() -> String {
    "Ce produit n'est pas dans ma base locale et je ne peux pas interroger ma base distante \
     pour le moment. Demandez conseil à votre pharmacien, ou réessayez plus tard."
        .to_string()
}

pub fn incomplete_response_notice() -> String {
    "La réponse que j'ai reçue est incomplète. Pouvez-vous préciser ou reformuler le nom du \
     produit ?"
        .to_string()
}

pub fn backend_failure_notice(error: &str) -> String {
    format!("Désolée, l'analyse a échoué ({error}). Vous pouvez réessayer dans un instant.")
}

pub fn another_check_prompt(seed: u64) -> String {
    let bank = [
        "Souhaitez-vous vérifier un autre produit ?",
        "Un autre produit à vérifier ?",
        "Je peux vérifier un autre produit si vous voulez.",
    ];
    pick_varied(&bank, seed).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_stable() {
        assert_eq!(seed_from_str("leeloo"), seed_from_str("leeloo"));
        assert_ne!(seed_from_str("leeloo"), seed_from_str("optilova"));
    }

    #[test]
    fn test_same_seed_same_variant() {
        assert_eq!(reprompt_contraception(7), reprompt_contraception(7));
        assert_eq!(another_check_prompt(42), another_check_prompt(42));
    }

    #[test]
    fn test_variants_cover_the_bank() {
        let a = another_check_prompt(0);
        let b = another_check_prompt(1);
        let c = another_check_prompt(2);
        assert_ne!(a, b);
        assert_ne!(b, c);
    }

    #[test]
    fn test_ask_prompts_embed_the_slot() {
        assert!(ask_intake_time("Leeloo").contains("Leeloo"));
        assert!(ask_brand("21h30").contains("21h30"));
    }

    #[test]
    fn test_confirmation_covers_both_regimens() {
        let mut pill = UserProfile::default();
        pill.record_contraceptive("Optilova");
        pill.record_intake("8h");
        assert!(profile_confirmed(&pill).contains("Optilova"));

        let mut continuous = UserProfile::default();
        continuous.record_continuous_delivery();
        assert!(profile_confirmed(&continuous).contains("diffusion continue"));
    }
}
