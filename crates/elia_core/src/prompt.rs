//! Prompt construction for the remote model.

use crate::model::Prompt;
use crate::profile::UserProfile;

const SYSTEM_PROMPT: &str = "Tu es une assistante spécialisée en pharmacologie de la \
    contraception. Tu évalues l'interaction entre un produit et la contraception d'une \
    utilisatrice. Réponds UNIQUEMENT avec un objet JSON valide, sans texte autour, en français.";

/// Build the evaluation prompt for one product against one profile.
pub fn build_prompt(profile: &UserProfile, canonical_product: &str) -> Prompt {
    let other = profile
        .other_medications
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or("aucun");

    let user = format!(
        "Profil :\n\
         - Contraception : {contraception}\n\
         - Prise : {intake}\n\
         - Autres médicaments : {other}\n\
         \n\
         Produit à évaluer : {product}\n\
         \n\
         Règles :\n\
         1. Réponds en français.\n\
         2. Réponds avec un unique objet JSON de la forme exacte : \
         {{\"level\": \"low|medium|severe|unknown\", \"title\": \"...\", \
         \"explanation\": \"...\", \"scientific_basis\": \"...\", \
         \"sources\": [{{\"name\": \"...\", \"url\": \"...\"}}], \
         \"contraception_impact\": \"...\", \
         \"recommendation\": {{\"timing\": \"...\", \"alternative\": \"...\"}}}}\n\
         3. \"level\" mesure le risque pour l'efficacité contraceptive, pas la toxicité du \
         produit.\n\
         4. En l'absence de preuve d'une interaction cliniquement significative, classe \
         \"level\" à \"low\", pas à \"unknown\".\n\
         5. Réserve \"unknown\" aux produits que tu ne peux pas identifier.\n\
         6. Ne cite en source que des URL http ou https réelles.",
        contraception = profile.contraceptive_name,
        intake = profile.intake_descriptor,
        other = other,
        product = canonical_product,
    );

    Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user,
    }
}
