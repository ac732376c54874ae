//! Metadata block codec
//!
//! A document may open with a block of `key: value` lines:
//!
//! ```text
//! ---
//! source: Campbell ch.4
//! memmaster-next-review: 2024-03-01
//! memmaster-stage: 3
//! ---
//! body...
//! ```
//!
//! This is deliberately not YAML. The block is a flat, ordered overlay of
//! string pairs: keys split at the first colon, both sides trimmed. Lines
//! without a colon or with an empty key are not part of the grammar and do
//! not survive a rewrite. Unknown keys are carried through untouched.

/// Day the card becomes due (`YYYY-MM-DD`)
pub const NEXT_REVIEW_KEY: &str = "memmaster-next-review";
/// Number of successful reviews
pub const STAGE_KEY: &str = "memmaster-stage";
/// Prefix reserved for keys this crate owns
pub const RESERVED_PREFIX: &str = "memmaster-";

const OPENING: &str = "---\n";
const CLOSING: &str = "\n---";

/// Ordered key-value pairs of a metadata block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    entries: Vec<(String, String)>,
}

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the inner text of a block (without delimiters)
    pub fn parse(block: &str) -> Self {
        let mut frontmatter = Self::new();
        for line in block.split('\n') {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            frontmatter.set(key, value.trim());
        }
        frontmatter
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Update a key in place, or append it if absent
    pub fn set(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys not reserved by this crate, in order
    pub fn passthrough(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries().filter(|(k, _)| !k.starts_with(RESERVED_PREFIX))
    }

    /// Schedule data, present only when both reserved keys are
    pub fn schedule(&self) -> Option<CardSchedule> {
        let next_review = self.get(NEXT_REVIEW_KEY)?;
        let stage = self.get(STAGE_KEY)?;
        Some(CardSchedule {
            next_review: next_review.to_string(),
            stage: stage.to_string(),
        })
    }

    pub fn set_schedule(&mut self, schedule: &CardSchedule) {
        self.set(NEXT_REVIEW_KEY, &schedule.next_review);
        self.set(STAGE_KEY, &schedule.stage);
    }

    /// Render as a delimited block, without a trailing newline
    pub fn render(&self) -> String {
        let lines: Vec<String> = self
            .entries
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v).trim_end().to_string())
            .collect();
        format!("{}{}{}", OPENING, lines.join("\n"), CLOSING)
    }
}

/// Raw `memmaster-*` values as stored in the block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSchedule {
    pub next_review: String,
    pub stage: String,
}

impl CardSchedule {
    /// Default for a card that has never been graded: due now, stage 0
    pub fn unscheduled() -> Self {
        Self {
            next_review: String::new(),
            stage: "0".to_string(),
        }
    }
}

/// A document split into its metadata block and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument<'a> {
    pub frontmatter: Frontmatter,
    /// Content after the block, whitespace-trimmed; the whole content
    /// untouched when there is no block
    pub body: &'a str,
    pub has_block: bool,
}

/// Locate the block: `(inner text, content after the closing delimiter)`.
///
/// The content must start with `---\n`; the block ends at the first
/// following `\n---`.
pub fn split_block(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix(OPENING)?;
    let end = rest.find(CLOSING)?;
    Some((&rest[..end], &rest[end + CLOSING.len()..]))
}

pub fn parse_document(content: &str) -> ParsedDocument<'_> {
    match split_block(content) {
        Some((inner, after)) => ParsedDocument {
            frontmatter: Frontmatter::parse(inner),
            body: after.trim(),
            has_block: true,
        },
        None => ParsedDocument {
            frontmatter: Frontmatter::new(),
            body: content,
            has_block: false,
        },
    }
}

/// Schedule stored in the document, if it carries both reserved keys
pub fn extract_schedule(content: &str) -> Option<CardSchedule> {
    let (inner, _) = split_block(content)?;
    Frontmatter::parse(inner).schedule()
}

/// Document content with the metadata block removed
pub fn strip_block(content: &str) -> &str {
    parse_document(content).body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_block() {
        let content = "---\ntitle: Cells\nurl: https://example.com/a:b\n---\n\n# Hello\n";
        let doc = parse_document(content);

        assert!(doc.has_block);
        assert_eq!(doc.frontmatter.get("title"), Some("Cells"));
        assert_eq!(doc.frontmatter.get("url"), Some("https://example.com/a:b"));
        assert_eq!(doc.body, "# Hello");
    }

    #[test]
    fn test_no_block() {
        let content = "  #flashcard\nHello\n";
        let doc = parse_document(content);

        assert!(!doc.has_block);
        assert_eq!(doc.frontmatter, Frontmatter::new());
        assert_eq!(doc.body, content);
    }

    #[test]
    fn test_block_must_start_the_document() {
        assert!(split_block("\n---\na: b\n---\n").is_none());
        assert!(split_block("---\r\na: b\r\n---\r\n").is_none());
        assert!(split_block("---\nunterminated: yes\n").is_none());
    }

    #[test]
    fn test_empty_block() {
        let (inner, after) = split_block("---\n\n---\nbody").unwrap();
        assert_eq!(inner, "");
        assert_eq!(after, "\nbody");
    }

    #[test]
    fn test_grammar_is_flat() {
        let block = "tags:\n  - biology\n  - cells\nplain line\n: orphan\nempty:";
        let fm = Frontmatter::parse(block);

        let keys: Vec<&str> = fm.entries().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["tags", "empty"]);
        assert_eq!(fm.get("tags"), Some(""));
    }

    #[test]
    fn test_duplicate_key_keeps_first_position_last_value() {
        let fm = Frontmatter::parse("a: 1\nb: 2\na: 3");
        let entries: Vec<(&str, &str)> = fm.entries().collect();
        assert_eq!(entries, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_schedule_requires_both_keys() {
        assert!(extract_schedule("---\nmemmaster-stage: 2\n---\nbody").is_none());
        assert!(extract_schedule("---\nmemmaster-next-review: 2024-01-01\n---\n").is_none());
        assert!(extract_schedule("no block").is_none());

        let schedule =
            extract_schedule("---\nmemmaster-next-review:\nmemmaster-stage: 2\n---\n").unwrap();
        assert_eq!(schedule.next_review, "");
        assert_eq!(schedule.stage, "2");
    }

    #[test]
    fn test_roundtrip_preserves_passthrough_order() {
        let original = "---\nauthor: Ada\nmemmaster-next-review: 2024-01-05\nsource: book\nmemmaster-stage: 4\n---\n\nBody";
        let doc = parse_document(original);
        let rewritten = format!("{}\n\n{}", doc.frontmatter.render(), doc.body);

        let reparsed = parse_document(&rewritten);
        assert_eq!(reparsed.frontmatter, doc.frontmatter);
        assert_eq!(reparsed.body, "Body");

        let passthrough: Vec<(&str, &str)> = reparsed.frontmatter.passthrough().collect();
        assert_eq!(passthrough, vec![("author", "Ada"), ("source", "book")]);

        let schedule = reparsed.frontmatter.schedule().unwrap();
        assert_eq!(schedule.next_review, "2024-01-05");
        assert_eq!(schedule.stage, "4");
    }

    #[test]
    fn test_set_schedule_overlays_in_place() {
        let mut fm = Frontmatter::parse("memmaster-stage: 1\nauthor: Ada");
        fm.set_schedule(&CardSchedule {
            next_review: "2024-02-02".to_string(),
            stage: "2".to_string(),
        });

        assert_eq!(
            fm.render(),
            "---\nmemmaster-stage: 2\nauthor: Ada\nmemmaster-next-review: 2024-02-02\n---"
        );
    }

    #[test]
    fn test_render_empty_value() {
        let mut fm = Frontmatter::new();
        fm.set("empty", "");
        assert_eq!(fm.render(), "---\nempty:\n---");
    }

    #[test]
    fn test_strip_block() {
        assert_eq!(strip_block("---\na: b\n---\n\n  text  \n"), "text");
    }
}
