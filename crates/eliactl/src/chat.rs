//! Command handlers: interactive chat, one-shot check, product listing.

use std::io::{IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use elia_core::resolver::Outcome;
use elia_core::{
    ConversationStage, EliaConfig, HttpModelClient, Message, Resolver, Session, UserProfile,
};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tracing::info;

use crate::render;

/// Pause between consecutive bot messages, so multi-line replies read like
/// typing rather than a dump.
const TYPING_DELAY_MS: u64 = 900;

fn build_resolver(config: &EliaConfig) -> Result<Resolver> {
    let kb = config.load_knowledge_base()?;
    let synonyms = config.load_synonyms()?;
    let mut resolver = Resolver::new(kb, synonyms).with_retry(config.retry.policy());

    if let Some(api_key) = config.resolve_api_key() {
        let client = HttpModelClient::new(
            &config.model.endpoint,
            &api_key,
            config.model.timeout_secs,
        )?;
        resolver = resolver.with_client(Arc::new(client), &config.model.model);
        info!(model = %config.model.model, "backend configured");
    }

    Ok(resolver)
}

async fn print_replies(replies: &[Message]) {
    for (index, reply) in replies.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(Duration::from_millis(TYPING_DELAY_MS)).await;
        }
        render::print_message(reply);
    }
}

/// Interactive chat loop.
pub async fn run(config: &EliaConfig) -> Result<()> {
    let resolver = build_resolver(config)?;
    let has_backend = resolver.has_backend();
    let mut session = Session::new(resolver);

    print_replies(&session.greet()).await;
    if !has_backend {
        println!(
            "{}",
            "(mode local : sans clé d'API, seuls les produits de la base locale sont couverts)"
                .dimmed()
        );
    }

    let stdin = std::io::stdin();
    loop {
        print!("{}  ", render::user_prefix());
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input.to_lowercase().as_str(), "quit" | "exit" | "quitter") {
            break;
        }

        let resolving = session.stage() == ConversationStage::AwaitingProduct;
        let spinner = resolving.then(resolution_spinner);
        let replies = session.submit(input).await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        print_replies(&replies).await;
    }

    render::print_bot_text("À bientôt, prenez soin de vous.");
    Ok(())
}

/// One-shot check from the command line.
pub async fn check(
    config: &EliaConfig,
    product: &str,
    pill: Option<String>,
    time: Option<String>,
    continuous: bool,
    medications: Option<String>,
    json: bool,
) -> Result<()> {
    let resolver = build_resolver(config)?;

    let mut profile = UserProfile::default();
    if continuous {
        profile.record_continuous_delivery();
    } else {
        if let Some(pill) = &pill {
            profile.record_contraceptive(pill);
        }
        if let Some(time) = &time {
            profile.record_intake(time);
        }
    }
    profile.other_medications = medications;

    match resolver.resolve(product, &profile).await {
        Outcome::Verdict(result) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                render::print_analysis(&result);
            }
        }
        Outcome::Notice(text) => {
            if json {
                println!("{}", serde_json::json!({ "notice": text }));
            } else {
                render::print_bot_text(&text);
            }
        }
    }
    Ok(())
}

/// List the knowledge base coverage.
pub fn products(config: &EliaConfig) -> Result<()> {
    let kb = config.load_knowledge_base()?;
    println!("{}", "Produits couverts par la base locale :".bold());
    for entry in kb.entries() {
        println!(
            "  {}  [{}]",
            entry.canonical,
            render::severity_label(entry.result.level)
        );
    }
    Ok(())
}

/// Braille frames with a colored dot on a capable terminal, bare ASCII
/// frames otherwise.
fn spinner_style(fancy: bool) -> ProgressStyle {
    let style = if fancy {
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{prefix}  {spinner:.yellow} {msg}")
    } else {
        ProgressStyle::default_spinner()
            .tick_strings(&["-", "\\", "|", "/"])
            .template("{prefix}  {spinner} {msg}")
    };
    style.unwrap()
}

/// Spinner shown while a resolution is in flight. Drawn on stderr so the
/// transcript on stdout stays clean; indicatif hides it entirely when
/// stderr is not a terminal.
fn resolution_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style(std::io::stderr().is_terminal()));
    spinner.set_prefix(render::bot_prefix());
    spinner.set_message("analyse en cours...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_styles_build() {
        spinner_style(true);
        spinner_style(false);
    }

    #[test]
    fn test_resolution_spinner_carries_the_message() {
        let spinner = resolution_spinner();
        assert!(spinner.message().contains("analyse"));
        spinner.finish_and_clear();
        assert!(spinner.is_finished());
    }
}
