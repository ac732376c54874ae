use anyhow::{Context, Result};

use memmaster_lib::settings::{normalize_folder, normalize_tag, Settings, SourceMode};

use crate::app::App;
use crate::OutputFormat;

pub fn run_show(app: &App, format: &OutputFormat) -> Result<()> {
    print_settings(&app.settings, format)
}

pub fn run_set_tag(app: &App, tag: &str, format: &OutputFormat) -> Result<()> {
    let tag = normalize_tag(tag);
    let settings = app
        .settings_storage
        .update(|s| {
            s.source_mode = SourceMode::Tag;
            s.tag_name = tag;
        })
        .context("Failed to save settings")?;
    print_settings(&settings, format)
}

pub fn run_set_folder(app: &App, folder: &str, format: &OutputFormat) -> Result<()> {
    let folder = normalize_folder(folder);
    let settings = app
        .settings_storage
        .update(|s| {
            s.source_mode = SourceMode::Folder;
            s.folder_name = folder;
        })
        .context("Failed to save settings")?;
    print_settings(&settings, format)
}

fn print_settings(settings: &Settings, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(settings)?);
        }
        OutputFormat::Plain => {
            match settings.source_mode {
                SourceMode::Tag => println!("Cards: notes tagged #{}", settings.normalized_tag()),
                SourceMode::Folder => println!("Cards: notes in folder {}", settings.normalized_folder()),
            }
            println!("Blur card text:   {}", settings.is_blur_flashcard_text);
            println!("Open in preview:  {}", settings.open_in_preview_mode);
        }
    }
    Ok(())
}
