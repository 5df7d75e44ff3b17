//! Section recovery from the model's markdown reply.
//!
//! The generator is not contract-enforced: it may drop the numbering, dress
//! a title in emphasis, reorder sections, or wrap the whole reply in
//! preamble. Parsing is therefore total. Every input, including the empty
//! string, yields a full [`TravelPlanSections`], with placeholders standing
//! in for anything unrecognizable. Degradation is not an error.

use std::sync::LazyLock;

use regex::Regex;

use itinera_types::{SectionId, TravelPlanSections};

/// Start of a numbered section header: a line leading with optional heading
/// or bold markers, then digits, a period, and whitespace.
static HEADER_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:#{1,6}[ \t]*)?(?:\*{1,2}[ \t]*)?[0-9]{1,3}\.[ \t]+")
        .expect("header boundary pattern must compile")
});

/// Resolution when the reply matches the same section title twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Later chunks overwrite earlier ones; garbled renumbering usually
    /// means the model corrected or continued itself.
    #[default]
    LastWins,
    /// The first matched chunk is kept.
    FirstWins,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SectionParser {
    policy: DuplicatePolicy,
}

impl SectionParser {
    #[must_use]
    pub const fn new(policy: DuplicatePolicy) -> Self {
        Self { policy }
    }

    /// Parse a markdown reply into the six-section record.
    ///
    /// Never fails. Text before the first recognizable header is preamble
    /// and is discarded; chunks whose title matches no section contribute
    /// nothing; sections left unmatched receive their placeholder body.
    #[must_use]
    pub fn parse(&self, markdown: &str) -> TravelPlanSections {
        let mut bodies: [Option<String>; 6] = [None, None, None, None, None, None];

        let starts: Vec<usize> = HEADER_BOUNDARY
            .find_iter(markdown)
            .map(|m| m.start())
            .collect();

        for (position, &start) in starts.iter().enumerate() {
            let end = starts.get(position + 1).copied().unwrap_or(markdown.len());
            let chunk = &markdown[start..end];

            let (header, body) = chunk.split_once('\n').unwrap_or((chunk, ""));
            let Some(id) = match_title(header) else {
                continue;
            };

            let body = body.trim();
            if body.is_empty() {
                continue;
            }

            let slot = &mut bodies[id.number() - 1];
            match self.policy {
                DuplicatePolicy::LastWins => *slot = Some(body.to_string()),
                DuplicatePolicy::FirstWins => {
                    if slot.is_none() {
                        *slot = Some(body.to_string());
                    }
                }
            }
        }

        TravelPlanSections::from_fn(|id| {
            bodies[id.number() - 1]
                .take()
                .unwrap_or_else(|| id.placeholder().to_string())
        })
    }
}

/// Parse with the default policy.
#[must_use]
pub fn parse(markdown: &str) -> TravelPlanSections {
    SectionParser::default().parse(markdown)
}

/// Map a header line to a section by its title text.
fn match_title(header_line: &str) -> Option<SectionId> {
    let normalized = normalize_title(header_line);
    if normalized.is_empty() {
        return None;
    }
    SectionId::ALL
        .into_iter()
        .find(|id| normalize_title(id.title()) == normalized)
}

/// Reduce a header line (or canonical title) to comparable form: emphasis
/// and heading markers removed, leading `N.` numbering removed, a trailing
/// parenthetical qualifier and trailing colon removed, whitespace collapsed,
/// case folded.
fn normalize_title(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|c| !matches!(c, '*' | '_' | '#' | '`'))
        .collect();
    let mut title = stripped.trim();

    let digits = title
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(title.len());
    if digits > 0 && title[digits..].starts_with('.') {
        title = title[digits + 1..].trim_start();
    }

    title = title.trim_end().trim_end_matches(':').trim_end();
    if title.ends_with(')')
        && let Some(open) = title.rfind('(')
    {
        title = &title[..open];
    }

    let mut normalized = String::with_capacity(title.len());
    for word in title.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        for c in word.chars() {
            normalized.extend(c.to_lowercase());
        }
    }
    normalized
}
