//! Slot extraction for the opening turns: pill brand, intake time,
//! continuous-delivery methods.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::normalize::fold_text;

/// Intake time, optionally introduced by a particle: "à 8h", "vers 21h30",
/// "at 8h05", bare "8h". Minutes are optional and bounded to 00-59.
const TIME_PATTERN: &str =
    r"(?i)(?:\b(?:at|around|a|à|vers)\s+)?\b(\d{1,2})\s*h(?:eures?)?(?:\s*([0-5][0-9]))?\b";

static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(TIME_PATTERN).expect("time pattern is valid"));

/// Words that signal a method with no daily intake. Short entries (token
/// ambiguity: "diu" sits inside "diurétique") match whole tokens only.
const CONTINUOUS_KEYWORDS: &[&str] = &[
    "implant",
    "patch",
    "anneau",
    "sterilet",
    "diu",
    "iud",
    "ring",
    "diffusion continue",
    "continuous diffusion",
];

/// Connectors and chat filler that never belong to a brand name. Folded.
/// Elided forms ("j'ai", "l'") fold to separate parts, so single letters
/// appear here too.
const STOP_WORDS: &[&str] = &[
    "et", "and", "at", "around", "a", "vers", "avec", "with", "je", "prends", "la", "le", "ma",
    "mon", "pilule", "tous", "les", "jours", "un", "une", "de", "du", "des", "en", "sous", "suis",
    "utilise", "depuis", "j", "l", "d", "n", "ai",
];

/// Known pill brands, folded lookup key to display spelling.
const ALIAS_TABLE: &[(&str, &str)] = &[
    ("leeloo", "Leeloo"),
    ("leeloo ge", "Leeloo Gé"),
    ("ludeal", "Ludéal"),
    ("ludeal ge", "Ludéal Gé"),
    ("optilova", "Optilova"),
    ("optimizette", "Optimizette"),
    ("desobel", "Désobel"),
    ("minidril", "Minidril"),
    ("trinordiol", "Trinordiol"),
    ("jasmine", "Jasmine"),
    ("jasminelle", "Jasminelle"),
    ("qlaira", "Qlaira"),
    ("yaz", "Yaz"),
    ("zoely", "Zoely"),
];

/// A recognized intake time with its span in the original text.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeMatch {
    /// Rendered form, hour unpadded: "8h", "8h05", "21h30".
    pub display: String,
    pub start: usize,
    pub end: usize,
}

/// First plausible intake time in the text, if any.
pub fn find_time(text: &str) -> Option<TimeMatch> {
    for caps in TIME_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let Some(hour_raw) = caps.get(1) else { continue };
        let Ok(hour) = hour_raw.as_str().parse::<u32>() else {
            continue;
        };
        if hour > 23 {
            continue;
        }
        let minute = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        return Some(TimeMatch {
            display: format!("{hour}h{minute}"),
            start: whole.start(),
            end: whole.end(),
        });
    }
    None
}

/// True when the folded text names a continuous-delivery method.
pub fn mentions_continuous_delivery(folded: &str) -> bool {
    CONTINUOUS_KEYWORDS.iter().any(|keyword| {
        if keyword.chars().count() <= 4 {
            folded.split_whitespace().any(|token| token == *keyword)
        } else {
            folded.contains(keyword)
        }
    })
}

/// Brand name left once the time span and stop words are removed.
/// Aliases map to their display spelling, unknown names pass through as
/// typed.
pub fn extract_brand(text: &str, time: Option<&TimeMatch>) -> Option<String> {
    let without_time = match time {
        Some(t) => format!("{} {}", &text[..t.start], &text[t.end..]),
        None => text.to_string(),
    };
    let tokens: Vec<&str> = without_time
        .split_whitespace()
        .map(|tok| tok.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|tok| !tok.is_empty())
        .filter(|tok| {
            let folded = fold_text(tok);
            !folded.is_empty()
                && !folded
                    .split_whitespace()
                    .all(|part| STOP_WORDS.contains(&part))
        })
        .collect();
    if tokens.is_empty() {
        return None;
    }
    let candidate = tokens.join(" ");
    let folded = fold_text(&candidate);
    for (key, display) in ALIAS_TABLE {
        if folded == *key {
            return Some((*display).to_string());
        }
    }
    Some(candidate)
}

/// Slots recognized in one contraception-stage turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotScan {
    pub brand: Option<String>,
    pub time: Option<TimeMatch>,
    pub continuous: bool,
}

/// Scan one user turn for contraception slots. A continuous-delivery
/// mention wins outright: no brand or time is extracted alongside it.
pub fn scan_turn(text: &str) -> SlotScan {
    let folded = fold_text(text);
    if mentions_continuous_delivery(&folded) {
        return SlotScan {
            continuous: true,
            ..Default::default()
        };
    }
    let time = find_time(text);
    let brand = extract_brand(text, time.as_ref());
    SlotScan {
        brand,
        time,
        continuous: false,
    }
}
