//! Seated players and their racks

use std::collections::BTreeMap;

/// A multiset of tiles keyed by letter, `-` for blanks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rack {
    tiles: BTreeMap<char, usize>,
}

impl Rack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_letters<I: IntoIterator<Item = char>>(letters: I) -> Self {
        let mut rack = Self::new();
        rack.add_all(letters);
        rack
    }

    pub fn add(&mut self, letter: char) {
        *self.tiles.entry(letter.to_ascii_uppercase()).or_insert(0) += 1;
    }

    pub fn add_all<I: IntoIterator<Item = char>>(&mut self, letters: I) {
        for letter in letters {
            self.add(letter);
        }
    }

    pub fn count(&self, letter: char) -> usize {
        self.tiles
            .get(&letter.to_ascii_uppercase())
            .copied()
            .unwrap_or(0)
    }

    /// True when every letter of `letters` is in the rack, respecting multiplicity
    pub fn contains_all(&self, letters: &[char]) -> bool {
        let mut needed: BTreeMap<char, usize> = BTreeMap::new();
        for letter in letters {
            *needed.entry(letter.to_ascii_uppercase()).or_insert(0) += 1;
        }
        needed
            .iter()
            .all(|(letter, &count)| self.count(*letter) >= count)
    }

    /// Removes all of `letters` or nothing
    pub fn remove_all(&mut self, letters: &[char]) -> bool {
        if !self.contains_all(letters) {
            return false;
        }
        for letter in letters {
            let letter = letter.to_ascii_uppercase();
            if let Some(count) = self.tiles.get_mut(&letter) {
                *count -= 1;
                if *count == 0 {
                    self.tiles.remove(&letter);
                }
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.tiles.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tiles in letter order, blanks first
    pub fn letters(&self) -> Vec<char> {
        self.tiles
            .iter()
            .flat_map(|(letter, &count)| std::iter::repeat(*letter).take(count))
            .collect()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    name: String,
    score: u32,
    rack: Rack,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: 0,
            rack: Rack::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn rack(&self) -> &Rack {
        &self.rack
    }

    pub fn rack_mut(&mut self) -> &mut Rack {
        &mut self.rack
    }

    pub fn add_score(&mut self, points: u32) {
        self.score += points;
    }

    /// Clears score and rack for a rematch
    pub fn reset(&mut self) {
        self.score = 0;
        self.rack.clear();
    }
}
