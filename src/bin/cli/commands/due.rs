use anyhow::{Context, Result};

use memmaster_lib::flashcards::review_list::{build_review_list, filter_items};
use memmaster_lib::flashcards::SortOrder;

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(
    app: &App,
    search: Option<&str>,
    sort: SortOrder,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let finder = app.finder();
    let cards = finder.due_cards().context("Failed to scan vault")?;
    let items = build_review_list(&cards, finder.now(), sort);
    let items = filter_items(&items, search.unwrap_or(""));

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        OutputFormat::Plain => {
            if items.is_empty() {
                if search.map_or(false, |q| !q.trim().is_empty()) {
                    println!("No cards match your search.");
                } else {
                    println!("No cards due. Well done!");
                }
                return Ok(());
            }

            for item in &items {
                println!(
                    "{}  {}",
                    terminal::paint(&item.title, Color::BOLD, use_color),
                    terminal::render_due_label(&item.next_review, item.days_overdue, use_color)
                );
                println!("  {}", terminal::paint(item.document.path(), Color::GRAY, use_color));
                if !item.tags.is_empty() {
                    println!("  {}", terminal::paint(&item.tags.join(" "), Color::DIM, use_color));
                }
                if !item.preview.is_empty() {
                    println!("  {}", item.preview);
                }
            }

            println!("\n{} cards due", items.len());
        }
    }

    Ok(())
}
