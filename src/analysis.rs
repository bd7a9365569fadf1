//! Word-frequency analysis over translated headlines.
//!
//! Pure, synchronous, no I/O. All translated titles are joined with single
//! spaces and split back on whitespace; tokens are compared exactly as the
//! translator produced them (no case folding, no punctuation stripping).
//! Only tokens occurring strictly more than the threshold survive.

use std::collections::HashMap;

/// Count repeated words across `titles`, keeping only words whose total
/// occurrence count is strictly greater than `threshold`.
///
/// Deterministic for identical input. The returned map's iteration order
/// carries no meaning.
pub fn repeated_words(titles: &[String], threshold: usize) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for word in titles.join(" ").split_whitespace() {
        *counts.entry(word.to_string()).or_insert(0) += 1;
    }
    counts.retain(|_, count| *count > threshold);
    counts
}

/// Render the frequency map for the console report, most frequent first,
/// ties broken alphabetically so output is stable.
pub fn format_report(words: &HashMap<String, usize>) -> String {
    if words.is_empty() {
        return "(none)".to_string();
    }
    let mut entries: Vec<(&String, &usize)> = words.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .iter()
        .map(|(word, count)| format!("{word}: {count}"))
        .collect::<Vec<_>>()
        .join(", ")
}
