//! Reference Data Module
//!
//! Static lookup tables of known character and weapon names, used to snap
//! noisy OCR output to canonical names.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CHARACTERS_FILE: &str = "Characters.json";
pub const WEAPONS_FILE: &str = "Weapons.json";

/// One entry of `Characters.json`. Other fields in the file are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CharacterEntry {
    pub name: String,
}

/// Weapon names grouped by weapon type, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeaponTable {
    groups: Vec<(String, Vec<String>)>,
}

impl WeaponTable {
    pub fn new(groups: Vec<(String, Vec<String>)>) -> Self {
        WeaponTable { groups }
    }

    /// Iterates `(weapon_type, weapon_name)` pairs in table order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.groups.iter().flat_map(|(kind, names)| {
            names.iter().map(move |name| (kind.as_str(), name.as_str()))
        })
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, names)| names.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read-only reference tables, built once and shared with the pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceData {
    pub characters: Vec<CharacterEntry>,
    pub weapons: WeaponTable,
}

impl ReferenceData {
    /// Loads both tables from `data_dir`.
    ///
    /// A missing or malformed file is logged and replaced by an empty table;
    /// lookups against it simply find nothing.
    pub fn load(data_dir: &Path) -> Self {
        let characters = load_characters(&data_dir.join(CHARACTERS_FILE)).unwrap_or_else(|e| {
            warn!("Character reference data unavailable, using empty table: {:#}", e);
            Vec::new()
        });
        let weapons = load_weapons(&data_dir.join(WEAPONS_FILE)).unwrap_or_else(|e| {
            warn!("Weapon reference data unavailable, using empty table: {:#}", e);
            WeaponTable::default()
        });

        info!(
            "Loaded {} characters and {} weapons from {:?}",
            characters.len(),
            weapons.len(),
            data_dir
        );
        ReferenceData { characters, weapons }
    }

    /// First character whose name appears in `text`, ignoring case.
    pub fn find_character(&self, text: &str) -> Option<&str> {
        let haystack = text.to_lowercase();
        self.characters
            .iter()
            .find(|c| haystack.contains(&c.name.to_lowercase()))
            .map(|c| c.name.as_str())
    }

    /// First `(weapon_type, weapon_name)` whose name appears in `text`, ignoring case.
    pub fn find_weapon(&self, text: &str) -> Option<(&str, &str)> {
        let haystack = text.to_lowercase();
        self.weapons
            .entries()
            .find(|(_, name)| haystack.contains(&name.to_lowercase()))
    }
}

fn load_characters(path: &Path) -> Result<Vec<CharacterEntry>> {
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON format in {:?}", path))
}

fn load_weapons(path: &Path) -> Result<WeaponTable> {
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    // serde_json is built with `preserve_order`, so the map keeps file order.
    let map: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&raw).with_context(|| format!("Invalid JSON format in {:?}", path))?;

    let groups = map
        .into_iter()
        .map(|(kind, names)| {
            let names: Vec<String> = serde_json::from_value(names)
                .with_context(|| format!("Weapon type '{}' is not a list of names", kind))?;
            Ok((kind, names))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(WeaponTable::new(groups))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_keeps_file_order() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CHARACTERS_FILE),
            r#"[{"name": "Jinhsi", "element": "Spectro"}, {"name": "Jiyan"}]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join(WEAPONS_FILE),
            r#"{"Sword": ["Emerald of Genesis", "Lumingloss"], "Broadblade": ["Verdant Summit"]}"#,
        )
        .unwrap();

        let data = ReferenceData::load(dir.path());
        assert_eq!(data.characters.len(), 2);
        assert_eq!(data.characters[0].name, "Jinhsi");

        let entries: Vec<_> = data.weapons.entries().collect();
        assert_eq!(
            entries,
            vec![
                ("Sword", "Emerald of Genesis"),
                ("Sword", "Lumingloss"),
                ("Broadblade", "Verdant Summit"),
            ]
        );
    }

    #[test]
    fn test_missing_files_degrade_to_empty() {
        let dir = tempdir().unwrap();
        let data = ReferenceData::load(dir.path());
        assert!(data.characters.is_empty());
        assert!(data.weapons.is_empty());
    }

    #[test]
    fn test_malformed_file_only_affects_its_table() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CHARACTERS_FILE), "[{\"name\": ").unwrap();
        fs::write(dir.path().join(WEAPONS_FILE), r#"{"Pistols": ["Static Mist"]}"#).unwrap();

        let data = ReferenceData::load(dir.path());
        assert!(data.characters.is_empty());
        assert_eq!(data.weapons.len(), 1);
    }

    #[test]
    fn test_weapon_type_must_hold_names() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(WEAPONS_FILE), r#"{"Pistols": "Static Mist"}"#).unwrap();
        let data = ReferenceData::load(dir.path());
        assert!(data.weapons.is_empty());
    }

    #[test]
    fn test_lookups_are_case_insensitive_and_ordered() {
        let data = ReferenceData {
            characters: vec![
                CharacterEntry { name: "Jin".into() },
                CharacterEntry { name: "Jinhsi".into() },
            ],
            weapons: WeaponTable::new(vec![
                ("Rectifier".into(), vec!["Stellar Symphony".into()]),
                ("Sword".into(), vec!["Symphony".into()]),
            ]),
        };

        // "Jin" is listed first, so it wins over the longer match.
        assert_eq!(data.find_character("OVERVIEW JINHSI"), Some("Jin"));
        assert_eq!(data.find_character("Calcharo"), None);
        assert_eq!(
            data.find_weapon("stellar symphony lv 90"),
            Some(("Rectifier", "Stellar Symphony"))
        );
        assert_eq!(data.find_weapon("symphony"), Some(("Sword", "Symphony")));
    }
}
