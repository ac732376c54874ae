use anyhow::{Context, Result};

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub fn run(app: &App, path: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let document = app.resolve_document(path)?;
    let outcome = app
        .scheduler()
        .make_card(&document)
        .with_context(|| format!("Failed to make {} a flashcard", document))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "path": outcome.document().unwrap_or(&document).path(),
                "created": outcome.is_created(),
                "result": outcome,
                "notice": outcome.notice(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", terminal::render_notice(&outcome.notice(), use_color));
        }
    }

    Ok(())
}
