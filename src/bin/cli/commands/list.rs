use anyhow::{Context, Result};

use memmaster_lib::flashcards::finder::sort_cards;

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let finder = app.finder();
    let today = finder.today();
    let mut cards = finder.all_cards().context("Failed to scan vault")?;
    sort_cards(&mut cards);

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = cards
                .iter()
                .map(|card| {
                    serde_json::json!({
                        "path": card.document.path(),
                        "nextReview": card.next_review,
                        "stage": card.stage,
                        "scheduled": card.scheduled,
                        "due": card.is_due(today),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("No flashcards found.");
                return Ok(());
            }

            let path_width = cards.iter().map(|c| c.document.path().len()).max().unwrap_or(4).max(4);

            println!("{:<width$} {:<12} Stage", "Card", "Next review", width = path_width);
            println!("{} {} {}", "\u{2500}".repeat(path_width), "\u{2500}".repeat(12), "\u{2500}".repeat(5));

            for card in &cards {
                let next = if card.next_review.is_empty() { "-" } else { card.next_review.as_str() };
                let next = format!("{:<12}", next);
                let next = if card.is_due(today) {
                    terminal::paint(&next, Color::GREEN, use_color)
                } else {
                    next
                };
                println!("{:<width$} {} {}", card.document.path(), next, card.stage, width = path_width);
            }

            println!("\n{} flashcards total", cards.len());
        }
    }

    Ok(())
}
