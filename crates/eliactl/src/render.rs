//! Terminal rendering of the conversation and verdict cards.

use elia_core::{InteractionResult, Message, Sender, Severity};
use owo_colors::OwoColorize;

const INDENT: &str = "        ";

pub fn bot_prefix() -> String {
    "[elia]".bright_cyan().to_string()
}

pub fn user_prefix() -> String {
    "[vous]".bright_green().to_string()
}

pub fn print_message(message: &Message) {
    match message.sender {
        Sender::User => {
            if let Some(text) = &message.text {
                println!("{}  {}", user_prefix(), text);
            }
        }
        Sender::Bot => {
            if let Some(result) = &message.analysis {
                print_analysis(result);
            } else if let Some(text) = &message.text {
                print_bot_text(text);
            }
        }
    }
}

pub fn print_bot_text(text: &str) {
    println!("{}  {}", bot_prefix(), text);
}

/// Severity rendered in its alert color.
pub fn severity_label(level: Severity) -> String {
    match level {
        Severity::Low => level.label_fr().green().to_string(),
        Severity::Medium => level.label_fr().yellow().to_string(),
        Severity::Severe => level.label_fr().red().bold().to_string(),
        Severity::Unknown => level.label_fr().dimmed().to_string(),
    }
}

/// Verdict card: title, level, explanation, then advice and sources.
pub fn print_analysis(result: &InteractionResult) {
    println!();
    if !result.title.is_empty() {
        println!("{}  {}", bot_prefix(), result.title.bold());
    } else {
        println!("{}  Analyse de l'interaction", bot_prefix());
    }
    println!("{INDENT}Niveau : {}", severity_label(result.level));

    if !result.explanation.is_empty() {
        println!("{INDENT}{}", result.explanation);
    }
    if !result.scientific_basis.is_empty() {
        println!("{INDENT}Données : {}", result.scientific_basis);
    }
    if !result.contraception_impact.is_empty() {
        println!("{INDENT}Impact contraception : {}", result.contraception_impact);
    }
    if !result.recommendation.timing.is_empty() {
        println!("{INDENT}Conseil de prise : {}", result.recommendation.timing);
    }
    if !result.recommendation.alternative.is_empty() {
        println!("{INDENT}Alternative : {}", result.recommendation.alternative);
    }
    if !result.sources.is_empty() {
        println!("{INDENT}{}", "Sources :".dimmed());
        for source in &result.sources {
            println!(
                "{INDENT}{}",
                format!("- {} <{}>", source.name, source.url).dimmed()
            );
        }
    }
    println!();
}
