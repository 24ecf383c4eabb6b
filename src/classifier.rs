//! Classifier Module
//!
//! Decides which game screen a screenshot shows from the text of its info banner.

use serde::Serialize;
use std::fmt;

/// The screen category a screenshot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageType {
    Character,
    Weapon,
    Echo,
    Sequences,
    Forte,
    #[serde(rename = "unknown")]
    Unknown,
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageType::Character => "Character",
            PageType::Weapon => "Weapon",
            PageType::Echo => "Echo",
            PageType::Sequences => "Sequences",
            PageType::Forte => "Forte",
            PageType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

// OCR renders the stylized "C" of the cost icon in several ways.
const COST_PATTERNS: [&str; 4] = ["cost", "ost", "€ost", "cst"];
const COST_TOTAL: &str = "/12";
const COST_TOKENS: [&str; 2] = ["all", "at"];

// Checked in order after the echo vote.
const KEYWORDS: [(&str, PageType); 4] = [
    ("overview", PageType::Character),
    ("weapon", PageType::Weapon),
    ("forte", PageType::Forte),
    ("resonance", PageType::Sequences),
];

/// Classifies info-banner OCR text.
///
/// Echo pages are detected by a vote over three weak signals, since the cost
/// banner is small and rarely read cleanly. Everything else is keyword based.
pub fn classify(text: &str) -> PageType {
    let text = text.to_lowercase();

    let has_cost = COST_PATTERNS.iter().any(|p| text.contains(p));
    let has_cost_total = text.contains(COST_TOTAL);
    let has_cost_token = text.split_whitespace().any(|word| COST_TOKENS.contains(&word));

    let votes = [has_cost, has_cost_total, has_cost_token]
        .iter()
        .filter(|&&signal| signal)
        .count();
    if votes >= 2 {
        return PageType::Echo;
    }

    KEYWORDS
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|&(_, page)| page)
        .unwrap_or(PageType::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_pages() {
        assert_eq!(classify("Overview\nLv 90"), PageType::Character);
        assert_eq!(classify("WEAPON"), PageType::Weapon);
        assert_eq!(classify("forte circuit"), PageType::Forte);
        assert_eq!(classify("Resonance Chain"), PageType::Sequences);
    }

    #[test]
    fn test_echo_vote_beats_keywords() {
        // cost + /12 while also mentioning a keyword
        assert_eq!(classify("overview cost 10/12"), PageType::Echo);
        // garbled cost glyph + standalone "at"
        assert_eq!(classify("€ost at weapon"), PageType::Echo);
        // /12 + "all"
        assert_eq!(classify("all 8/12 resonance"), PageType::Echo);
    }

    #[test]
    fn test_garbled_cost_variants_vote() {
        assert_eq!(classify("ost 9/12"), PageType::Echo);
        assert_eq!(classify("cst at"), PageType::Echo);
        assert_eq!(classify("COST ALL"), PageType::Echo);
    }

    #[test]
    fn test_single_echo_signal_falls_through() {
        assert_eq!(classify("overview cost"), PageType::Character);
        assert_eq!(classify("overview 4/12"), PageType::Character);
        assert_eq!(classify("overview at"), PageType::Character);
    }

    #[test]
    fn test_cost_token_must_be_whole_word() {
        // "attack" and "ball" are not the "at"/"all" tokens.
        assert_eq!(classify("attack ball /12"), PageType::Unknown);
    }

    #[test]
    fn test_keyword_order_wins() {
        assert_eq!(classify("weapon overview"), PageType::Character);
        assert_eq!(classify("resonance forte"), PageType::Forte);
    }

    #[test]
    fn test_unrecognized_text_is_unknown() {
        assert_eq!(classify(""), PageType::Unknown);
        assert_eq!(classify("~~ |\\ lorem"), PageType::Unknown);
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(serde_json::to_string(&PageType::Unknown).unwrap(), "\"unknown\"");
        assert_eq!(serde_json::to_string(&PageType::Sequences).unwrap(), "\"Sequences\"");
        assert_eq!(PageType::Unknown.to_string(), "unknown");
    }
}
