//! Weighted letter sampling without replacement

use crate::config::LetterSpec;
use rand::Rng;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct TileBag {
    remaining: BTreeMap<char, u32>,
    values: BTreeMap<char, u32>,
    initial: BTreeMap<char, u32>,
}

impl TileBag {
    pub fn new(letters: &BTreeMap<char, LetterSpec>) -> Self {
        let initial: BTreeMap<char, u32> = letters.iter().map(|(l, s)| (*l, s.count)).collect();
        Self {
            remaining: initial.clone(),
            values: letters.iter().map(|(l, s)| (*l, s.value)).collect(),
            initial,
        }
    }

    /// Point value of a letter; unknown letters are worth nothing
    pub fn letter_value(&self, letter: char) -> u32 {
        self.values
            .get(&letter.to_ascii_uppercase())
            .copied()
            .unwrap_or(0)
    }

    pub fn tiles_left(&self) -> usize {
        self.remaining.values().map(|&n| n as usize).sum()
    }

    pub fn remaining(&self, letter: char) -> u32 {
        self.remaining.get(&letter).copied().unwrap_or(0)
    }

    /// Size of the full configured set
    pub fn total_tiles(&self) -> usize {
        self.initial.values().map(|&n| n as usize).sum()
    }

    /// Draws up to `n` tiles, each weighted by how many of that letter remain
    ///
    /// Returns fewer than `n` only when the bag runs out.
    pub fn draw_tiles<R: Rng>(&mut self, n: usize, rng: &mut R) -> Vec<char> {
        let n = n.min(self.tiles_left());
        let mut drawn = Vec::with_capacity(n);
        for _ in 0..n {
            if let Some(letter) = self.draw_one(rng) {
                drawn.push(letter);
            }
        }
        drawn
    }

    fn draw_one<R: Rng>(&mut self, rng: &mut R) -> Option<char> {
        let left = self.tiles_left();
        if left == 0 {
            return None;
        }

        let mut pick = rng.gen_range(0..left);
        for (letter, count) in self.remaining.iter_mut() {
            let available = *count as usize;
            if pick < available {
                *count -= 1;
                return Some(*letter);
            }
            pick -= available;
        }
        None
    }

    /// Puts `old` back into the bag, then draws the same number of tiles
    ///
    /// A returned letter can come straight back out in the same swap.
    pub fn swap_tiles<R: Rng>(&mut self, old: &[char], rng: &mut R) -> Vec<char> {
        self.return_tiles(old);
        self.draw_tiles(old.len(), rng)
    }

    pub fn return_tiles(&mut self, tiles: &[char]) {
        for tile in tiles {
            *self.remaining.entry(tile.to_ascii_uppercase()).or_insert(0) += 1;
        }
    }

    /// Restores the full configured set
    pub fn refill(&mut self) {
        self.remaining = self.initial.clone();
    }

    /// Removes one specific tile, for scripting racks in tests
    #[cfg(test)]
    pub(crate) fn take(&mut self, letter: char) -> bool {
        match self.remaining.get_mut(&letter) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameRules;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn standard_bag() -> TileBag {
        TileBag::new(&GameRules::default().letters)
    }

    fn tiny_bag() -> TileBag {
        let mut letters = BTreeMap::new();
        letters.insert('A', LetterSpec { count: 2, value: 1 });
        letters.insert('Z', LetterSpec { count: 1, value: 10 });
        TileBag::new(&letters)
    }

    #[test]
    fn test_letter_values() {
        let bag = standard_bag();
        assert_eq!(bag.letter_value('A'), 1);
        assert_eq!(bag.letter_value('q'), 10);
        assert_eq!(bag.letter_value('-'), 0);
        assert_eq!(bag.letter_value('?'), 0);
    }

    #[test]
    fn test_tiles_left() {
        let bag = standard_bag();
        assert_eq!(bag.tiles_left(), 100);
        assert_eq!(bag.total_tiles(), 100);
    }

    #[test]
    fn test_draw_reduces_supply() {
        let mut bag = standard_bag();
        let mut rng = StdRng::seed_from_u64(7);

        let drawn = bag.draw_tiles(7, &mut rng);
        assert_eq!(drawn.len(), 7);
        assert_eq!(bag.tiles_left(), 93);
    }

    #[test]
    fn test_draw_clamps_to_supply() {
        let mut bag = tiny_bag();
        let mut rng = StdRng::seed_from_u64(1);

        let mut drawn = bag.draw_tiles(10, &mut rng);
        drawn.sort();
        assert_eq!(drawn, vec!['A', 'A', 'Z']);
        assert_eq!(bag.tiles_left(), 0);
        assert!(bag.draw_tiles(1, &mut rng).is_empty());
    }

    #[test]
    fn test_draw_is_deterministic_for_seed() {
        let mut first = standard_bag();
        let mut second = standard_bag();

        let a = first.draw_tiles(20, &mut StdRng::seed_from_u64(42));
        let b = second.draw_tiles(20, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_draw_never_exceeds_letter_counts() {
        let mut bag = standard_bag();
        let mut rng = StdRng::seed_from_u64(99);

        let drawn = bag.draw_tiles(100, &mut rng);
        assert_eq!(drawn.len(), 100);
        assert_eq!(drawn.iter().filter(|&&c| c == 'E').count(), 12);
        assert_eq!(drawn.iter().filter(|&&c| c == 'Q').count(), 1);
        assert_eq!(drawn.iter().filter(|&&c| c == '-').count(), 2);
    }

    #[test]
    fn test_swap_keeps_bag_size() {
        let mut bag = standard_bag();
        let mut rng = StdRng::seed_from_u64(3);

        let rack = bag.draw_tiles(7, &mut rng);
        let before = bag.tiles_left();

        let new_tiles = bag.swap_tiles(&rack[..3], &mut rng);
        assert_eq!(new_tiles.len(), 3);
        assert_eq!(bag.tiles_left(), before);
    }

    #[test]
    fn test_swap_can_redraw_returned_tile() {
        let mut bag = tiny_bag();
        let mut rng = StdRng::seed_from_u64(5);

        let all = bag.draw_tiles(3, &mut rng);
        assert_eq!(bag.tiles_left(), 0);

        // The only tile in the bag is the one just returned
        let swapped = bag.swap_tiles(&all[..1], &mut rng);
        assert_eq!(swapped, vec![all[0]]);
        assert_eq!(bag.tiles_left(), 0);
    }

    #[test]
    fn test_refill() {
        let mut bag = standard_bag();
        let mut rng = StdRng::seed_from_u64(11);
        bag.draw_tiles(50, &mut rng);

        bag.refill();
        assert_eq!(bag.tiles_left(), 100);
        assert_eq!(bag.remaining('E'), 12);
    }
}
