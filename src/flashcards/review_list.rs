//! Review queue projection
//!
//! Turns the due set into rows a review list can show, search and re-sort.
//! Rebuild it whenever a `CardUpdated` event arrives.

use chrono::{DateTime, NaiveTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::storage::DocumentRef;

use super::models::CardMetadata;

/// Characters of body text kept for a row preview
const PREVIEW_LEN: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Most overdue first
    #[default]
    OldestFirst,
    /// Least overdue first
    NewestFirst,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "oldest-first" | "oldest" => Ok(Self::OldestFirst),
            "newest-first" | "newest" => Ok(Self::NewestFirst),
            other => Err(format!("Unknown sort order: {}", other)),
        }
    }
}

/// One row of the review list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub document: DocumentRef,
    /// File name without extension
    pub title: String,
    pub next_review: String,
    pub stage: String,
    /// Whole days since the review date; 0 for unscheduled cards
    pub days_overdue: i64,
    /// `#tags` found on non-heading lines
    pub tags: Vec<String>,
    /// Text with the metadata block and tags removed, newlines flattened
    pub preview: String,
    #[serde(skip)]
    search_text: String,
}

impl ReviewItem {
    pub fn from_card(card: &CardMetadata, now: DateTime<Utc>) -> Self {
        let tags = extract_tags(&card.content);
        let search_text = format!(
            "{}\n{}\n{}",
            card.document.stem().to_lowercase(),
            card.content.to_lowercase(),
            tags.join(" ").to_lowercase()
        );

        Self {
            document: card.document.clone(),
            title: card.document.stem().to_string(),
            next_review: card.next_review.clone(),
            stage: card.stage.clone(),
            days_overdue: days_overdue(card, now),
            tags,
            preview: preview_text(&card.content),
            search_text,
        }
    }

    /// Case-insensitive match on title, content or tags
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty() || self.search_text.contains(&query)
    }
}

/// Rows for a due set, in the given order
pub fn build_review_list(cards: &[CardMetadata], now: DateTime<Utc>, order: SortOrder) -> Vec<ReviewItem> {
    let mut items: Vec<ReviewItem> = cards.iter().map(|c| ReviewItem::from_card(c, now)).collect();
    sort_items(&mut items, order);
    items
}

pub fn filter_items<'a>(items: &'a [ReviewItem], query: &str) -> Vec<&'a ReviewItem> {
    items.iter().filter(|item| item.matches(query)).collect()
}

/// Stable sort by days overdue
pub fn sort_items(items: &mut [ReviewItem], order: SortOrder) {
    match order {
        SortOrder::OldestFirst => items.sort_by(|a, b| b.days_overdue.cmp(&a.days_overdue)),
        SortOrder::NewestFirst => items.sort_by(|a, b| a.days_overdue.cmp(&b.days_overdue)),
    }
}

fn days_overdue(card: &CardMetadata, now: DateTime<Utc>) -> i64 {
    match card.review_date() {
        Some(date) => {
            let due_at = date.and_time(NaiveTime::MIN).and_utc();
            // Hosts east of UTC can see a card due before its UTC midnight
            (now - due_at).num_milliseconds().div_euclid(86_400_000).max(0)
        }
        None => 0,
    }
}

/// Words starting with a single `#` on lines that are not headings
pub fn extract_tags(content: &str) -> Vec<String> {
    let heading = Regex::new(r"^#+\s").ok();

    content
        .split('\n')
        .filter(|line| {
            let is_heading = heading
                .as_ref()
                .map_or(false, |re| re.is_match(line.trim()));
            !is_heading && line.contains('#')
        })
        .flat_map(|line| line.split_whitespace())
        .filter(|word| word.len() > 1 && word.starts_with('#') && !word.starts_with("##"))
        .map(|word| word.to_string())
        .collect()
}

fn preview_text(content: &str) -> String {
    let without_block = match Regex::new(r"^---[\s\S]*?---") {
        Ok(re) => re.replace(content, "").into_owned(),
        Err(_) => content.to_string(),
    };
    let without_tags = match Regex::new(r"#[^\s#]+") {
        Ok(re) => re.replace_all(&without_block, "").into_owned(),
        Err(_) => without_block,
    };
    let flattened = match Regex::new(r"\n+") {
        Ok(re) => re.replace_all(&without_tags, " ").into_owned(),
        Err(_) => without_tags,
    };
    flattened.trim().chars().take(PREVIEW_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::CardSchedule;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap()
    }

    fn card(path: &str, next_review: &str, content: &str) -> CardMetadata {
        let schedule = if next_review.is_empty() {
            None
        } else {
            Some(CardSchedule {
                next_review: next_review.to_string(),
                stage: "3".to_string(),
            })
        };
        CardMetadata::new(DocumentRef::new(path), content.to_string(), schedule)
    }

    #[test]
    fn test_item_fields() {
        let content = "---\nmemmaster-next-review: 2024-03-07\nmemmaster-stage: 3\n---\n\n# Cell biology\n#flashcard #bio\nWhat is ATP?\n";
        let item = ReviewItem::from_card(&card("Notes/Cells.md", "2024-03-07", content), now());

        assert_eq!(item.title, "Cells");
        assert_eq!(item.days_overdue, 3);
        assert_eq!(item.tags, vec!["#flashcard", "#bio"]);
        assert_eq!(item.preview, "# Cell biology   What is ATP?");
    }

    #[test]
    fn test_unscheduled_is_not_overdue() {
        let item = ReviewItem::from_card(&card("a.md", "", "#flashcard"), now());
        assert_eq!(item.days_overdue, 0);
    }

    #[test]
    fn test_due_before_utc_midnight_is_not_negative() {
        let before_midnight = Utc.with_ymd_and_hms(2024, 3, 9, 23, 0, 0).unwrap();
        let item = ReviewItem::from_card(&card("a.md", "2024-03-10", "#flashcard"), before_midnight);
        assert_eq!(item.days_overdue, 0);
    }

    #[test]
    fn test_extract_tags_skips_headings_and_double_hash() {
        let content = "# Title #notatag\n## Section\nText #one ##two #\n  #three";
        assert_eq!(extract_tags(content), vec!["#one", "#three"]);
    }

    #[test]
    fn test_search() {
        let items = build_review_list(
            &[
                card("Mitochondria.md", "", "#flashcard #bio\nPowerhouse"),
                card("Acids.md", "", "#flashcard #chem\npH below 7"),
            ],
            now(),
            SortOrder::OldestFirst,
        );

        let titles = |found: Vec<&ReviewItem>| found.iter().map(|i| i.title.clone()).collect::<Vec<_>>();
        assert_eq!(titles(filter_items(&items, "MITO")), vec!["Mitochondria"]);
        assert_eq!(titles(filter_items(&items, "ph below")), vec!["Acids"]);
        assert_eq!(titles(filter_items(&items, "#chem")), vec!["Acids"]);
        assert_eq!(filter_items(&items, "").len(), 2);
        assert!(filter_items(&items, "zebra").is_empty());
    }

    #[test]
    fn test_sort_orders() {
        let cards = [
            card("recent.md", "2024-03-09", "#flashcard"),
            card("old.md", "2024-02-01", "#flashcard"),
            card("new.md", "", "#flashcard"),
        ];

        let items = build_review_list(&cards, now(), SortOrder::OldestFirst);
        let order: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(order, vec!["old", "recent", "new"]);

        let items = build_review_list(&cards, now(), SortOrder::NewestFirst);
        let order: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(order, vec!["new", "recent", "old"]);
    }

    #[test]
    fn test_sort_order_from_str() {
        assert_eq!("newest-first".parse::<SortOrder>(), Ok(SortOrder::NewestFirst));
        assert!("random".parse::<SortOrder>().is_err());
    }
}
