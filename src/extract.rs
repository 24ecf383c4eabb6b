//! Field Extraction Module
//!
//! Parses OCR text from the detail panels into structured fields, resolving
//! names against the reference tables.

use crate::reference::ReferenceData;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Level patterns, tried in order. Only the current level (first group) is kept.
static LEVEL_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"Lv[\.|\s]*(\d+)[\s/]+(\d+)").unwrap(),
        Regex::new(r"v[\.]?(\d+)[\s/]+(\d+)").unwrap(),
        Regex::new(r"Level[\s]*(\d+)[\s/]+(\d+)").unwrap(),
    ]
});

static RANK_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"rank\s*(\d+)").unwrap());

/// Characters OCR commonly hallucinates around the weapon title.
const TITLE_NOISE: [char; 4] = ['©', '\\', '%', ':'];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterInfo {
    pub name: Option<String>,
    pub level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaponInfo {
    pub name: Option<String>,
    #[serde(rename = "weaponType")]
    pub weapon_type: Option<String>,
    pub level: Option<String>,
    pub rank: Option<String>,
}

/// Reads the character name and level from the character overview panel.
pub fn character_info(text: &str, reference: &ReferenceData) -> CharacterInfo {
    let text = normalize(text);
    CharacterInfo {
        name: reference.find_character(&text).map(str::to_string),
        level: find_level(&text),
    }
}

/// Reads weapon name, type, level and rank from the weapon panel.
///
/// The weapon name is matched against the first line only, where the title sits.
pub fn weapon_info(text: &str, reference: &ReferenceData) -> WeaponInfo {
    let title = clean_title(text.split('\n').next().unwrap_or_default());
    let (weapon_type, name) = match reference.find_weapon(&title) {
        Some((kind, name)) => (Some(kind.to_string()), Some(name.to_string())),
        None => (None, None),
    };

    let text = normalize(text);
    let rank = RANK_PATTERN
        .captures(&text.to_lowercase())
        .map(|caps| caps[1].to_string());

    WeaponInfo {
        name,
        weapon_type,
        level: find_level(&text),
        rank,
    }
}

/// Lower-cases text and keeps only words longer than two characters.
pub fn clean_text(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .filter(|word| word.chars().count() > 2)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strips punctuation that OCR scatters between level digits.
fn normalize(text: &str) -> String {
    text.replace(':', "").replace('.', " ").replace("  ", " ")
}

fn clean_title(line: &str) -> String {
    line.trim()
        .replace(&TITLE_NOISE[..], "")
        .replace("  ", " ")
        .replace('q', "g")
        .trim()
        .to_string()
}

fn find_level(text: &str) -> Option<String> {
    LEVEL_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(text))
        .map(|caps| caps[1].to_string())
}
