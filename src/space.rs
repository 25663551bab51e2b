//! Naming of requirement bits

use crate::*;

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

static RE_ITEM_COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+) x (\d+)$").unwrap());

/// The compiled bit index space of a loaded ruleset.
///
/// Every requirement-relevant identifier (an inventory item state, a location
/// check, an entrance) is interned once and assigned a stable bit. The space
/// is built while rules are compiled and stays immutable afterwards: all
/// solver structures operate purely on the integer bits and only come back
/// here for error reporting and tooltip rendering.
///
/// Raw identifiers follow the ruleset's path convention, e.g.
/// `"Faron Woods\Deep Woods Chest"`; counted item states are encoded as
/// `"<name> x <n>"`. [LogicSpace::readable_name] resolves both through the
/// registered display-name tables, falling back to the trailing path segment.
///
/// ```
/// use reachkit::LogicSpace;
///
/// let mut space = LogicSpace::default();
/// let sword = space.add("Progressive Sword x 2");
/// space.set_pretty("Progressive Sword", 2, "Goddess Sword");
///
/// assert_eq!(space.bit("Progressive Sword x 2").unwrap(), sword);
/// assert_eq!(space.readable_name("Progressive Sword x 2"), "Goddess Sword");
/// ```
#[derive(Clone, Default, Debug)]
pub struct LogicSpace {
    ids: Vec<String>,
    by_id: HashMap<String, usize>,
    display: HashMap<String, String>,
    pretty: HashMap<String, HashMap<u32, String>>,
}

impl LogicSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern an identifier, returning its stable bit.
    ///
    /// Re-adding a known identifier returns the existing bit.
    pub fn add(&mut self, id: &str) -> usize {
        if let Some(&bit) = self.by_id.get(id) {
            return bit;
        }
        let bit = self.ids.len();
        self.ids.push(id.to_string());
        self.by_id.insert(id.to_string(), bit);
        bit
    }

    /// Resolve an identifier to its bit.
    ///
    /// An unknown identifier signals a stale or incompatible ruleset and is
    /// surfaced as an error at the point of lookup, never silently defaulted.
    pub fn bit(&self, id: &str) -> Result<usize, TrackError> {
        self.by_id
            .get(id)
            .copied()
            .ok_or_else(|| TrackError::UnknownCheck(id.to_string()))
    }

    /// Get the raw identifier associated to a bit
    pub fn id(&self, bit: usize) -> Result<&str, TrackError> {
        self.ids
            .get(bit)
            .map(String::as_str)
            .ok_or(TrackError::UnknownBit(bit))
    }

    /// Number of interned identifiers (the size of the bit index space)
    pub fn num_bits(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate over `(bit, id)` pairs in bit order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.ids.iter().enumerate().map(|(bit, id)| (bit, id.as_str()))
    }

    /// Register the display name of a check or location
    pub fn set_display(&mut self, id: &str, text: &str) {
        self.display.insert(id.to_string(), text.to_string());
    }

    /// Register the display name of an item at a specific count
    pub fn set_pretty(&mut self, base: &str, count: u32, text: &str) {
        self.pretty
            .entry(base.to_string())
            .or_default()
            .insert(count, text.to_string());
    }

    /// Map a raw identifier to its human-readable name.
    ///
    /// Resolution order: the item's own pretty name (count 1), then the
    /// per-count pretty name for `"<base> x <n>"` encodings, then the
    /// registered check display name, and finally the trailing segment after
    /// the last `\` separator.
    pub fn readable_name(&self, raw: &str) -> String {
        if let Some(text) = self.pretty.get(raw).and_then(|counts| counts.get(&1)) {
            return text.clone();
        }
        if let Some(cap) = RE_ITEM_COUNT.captures(raw) {
            let base = cap.get(1).unwrap().as_str();
            if let Ok(count) = cap.get(2).unwrap().as_str().parse::<u32>() {
                if let Some(text) = self.pretty.get(base).and_then(|counts| counts.get(&count)) {
                    return text.clone();
                }
            }
        }
        if let Some(text) = self.display.get(raw) {
            return text.clone();
        }
        match raw.rsplit('\\').next() {
            Some(segment) if !segment.is_empty() => segment.to_string(),
            _ => raw.to_string(),
        }
    }
}

impl fmt::Display for LogicSpace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (bit, id) in self.iter() {
            writeln!(f, "{:4} {}", bit, id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn interning_is_stable() {
        let mut space = LogicSpace::default();
        let sword = space.add("Sword");
        let woods = space.add("Faron Woods\\Deep Woods Chest");

        assert_eq!(space.add("Sword"), sword);
        assert_eq!(space.bit("Sword").unwrap(), sword);
        assert_eq!(space.bit("Faron Woods\\Deep Woods Chest").unwrap(), woods);
        assert_eq!(space.num_bits(), 2);
        assert_eq!(space.id(woods).unwrap(), "Faron Woods\\Deep Woods Chest");
    }

    #[test]
    fn unknown_lookups_fail() {
        let space = LogicSpace::default();
        assert!(matches!(
            space.bit("Missing"),
            Err(TrackError::UnknownCheck(_))
        ));
        assert!(matches!(space.id(3), Err(TrackError::UnknownBit(3))));
    }

    #[test]
    fn pretty_names() {
        let mut space = LogicSpace::default();
        space.set_pretty("Progressive Sword", 1, "Practice Sword");
        space.set_pretty("Progressive Sword", 2, "Goddess Sword");

        assert_eq!(space.readable_name("Progressive Sword"), "Practice Sword");
        assert_eq!(
            space.readable_name("Progressive Sword x 2"),
            "Goddess Sword"
        );
        // unregistered count falls through to the raw trailing segment
        assert_eq!(
            space.readable_name("Progressive Sword x 9"),
            "Progressive Sword x 9"
        );
    }

    #[test]
    fn display_and_fallback() {
        let mut space = LogicSpace::default();
        space.set_display("Skyloft\\Fledge's Gift", "Fledge's Gift");

        assert_eq!(space.readable_name("Skyloft\\Fledge's Gift"), "Fledge's Gift");
        assert_eq!(space.readable_name("Eldin Volcano\\Chest behind Bombable Wall"), "Chest behind Bombable Wall");
        assert_eq!(space.readable_name("Clawshots"), "Clawshots");
    }
}
