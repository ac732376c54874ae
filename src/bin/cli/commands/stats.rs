use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let stats = app.finder().stats().context("Failed to scan vault")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            println!("Flashcards:    {}", stats.total_cards);
            println!("Due now:       {}", stats.due_cards);
            println!("Never graded:  {}", stats.unscheduled_cards);
            println!("Near mastery:  {}", stats.near_mastery_cards);
        }
    }

    Ok(())
}
