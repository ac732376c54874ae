use anyhow::{Context, Result};

use memmaster_lib::flashcards::algorithm::{format_interval, parse_stage, preview_intervals};
use memmaster_lib::flashcards::frontmatter::extract_schedule;
use memmaster_lib::flashcards::{Difficulty, GradeOutcome};
use memmaster_lib::storage::{DocumentRef, DocumentStore};

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub fn run(
    app: &App,
    path: &str,
    difficulty: &str,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let document = app.resolve_document(path)?;
    let difficulty: Difficulty = difficulty.trim().to_lowercase().parse()?;
    if let Difficulty::Other(label) = &difficulty {
        log::warn!("Unknown difficulty '{}', scheduling for tomorrow", label);
    }

    let outcome = app
        .scheduler()
        .review(&document, &difficulty)
        .with_context(|| format!("Failed to grade {}", document))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "path": document.path(),
                "result": outcome,
                "notice": outcome.notice(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", terminal::render_notice(&outcome.notice(), use_color));
            if let GradeOutcome::Updated { .. } = outcome {
                print_next_intervals(app, &document);
            }
        }
    }

    Ok(())
}

/// Show what each grade would do on the card's next review
fn print_next_intervals(app: &App, document: &DocumentRef) {
    let Ok(content) = app.vault.read_document(document) else {
        return;
    };
    let Some(schedule) = extract_schedule(&content) else {
        return;
    };
    let [easy, medium, hard] = preview_intervals(parse_stage(&schedule.stage));
    println!(
        "  next time: easy {}, medium {}, hard {}",
        format_interval(easy),
        format_interval(medium),
        format_interval(hard)
    );
}
