//! Letter frequency tables.
//!
//! A `Frequency` says in what proportion each letter appears in a pool. The
//! pool is sized by the game configuration, not by the table: a table is a
//! set of integer weights, and [`Frequency::apportion`] scales it to any
//! requested total with the largest-remainder method so every pool of the
//! same size and table has exactly the same letter counts.
//!
//! ```
//! use tile_rush::tiles::Frequency;
//!
//! let counts = Frequency::Scrabble.apportion(98).unwrap();
//! let e = counts.iter().find(|(letter, _)| *letter == 'E').unwrap();
//! assert_eq!(e.1, 12);
//! assert_eq!(counts.iter().map(|(_, n)| n).sum::<usize>(), 98);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// English letter frequencies in hundredths of a percent.
const STANDARD: [(char, u32); 26] = [
    ('A', 804), ('B', 148), ('C', 334), ('D', 382), ('E', 1249), ('F', 240),
    ('G', 187), ('H', 505), ('I', 757), ('J', 16), ('K', 54), ('L', 407),
    ('M', 251), ('N', 723), ('O', 764), ('P', 214), ('Q', 12), ('R', 628),
    ('S', 651), ('T', 928), ('U', 273), ('V', 105), ('W', 168), ('X', 23),
    ('Y', 166), ('Z', 9),
];

/// Letter counts of the 144-tile Bananagrams bag.
const BANANAGRAMS: [(char, u32); 26] = [
    ('A', 13), ('B', 3), ('C', 3), ('D', 6), ('E', 18), ('F', 3),
    ('G', 4), ('H', 3), ('I', 12), ('J', 2), ('K', 2), ('L', 5),
    ('M', 3), ('N', 8), ('O', 11), ('P', 3), ('Q', 2), ('R', 9),
    ('S', 6), ('T', 9), ('U', 6), ('V', 3), ('W', 3), ('X', 2),
    ('Y', 3), ('Z', 2),
];

/// Letter counts of the 98 lettered Scrabble tiles.
const SCRABBLE: [(char, u32); 26] = [
    ('A', 9), ('B', 2), ('C', 2), ('D', 4), ('E', 12), ('F', 2),
    ('G', 3), ('H', 2), ('I', 9), ('J', 1), ('K', 1), ('L', 4),
    ('M', 2), ('N', 6), ('O', 8), ('P', 2), ('Q', 1), ('R', 6),
    ('S', 4), ('T', 6), ('U', 4), ('V', 2), ('W', 2), ('X', 1),
    ('Y', 2), ('Z', 1),
];

/// Distribution governing letter proportions in a pool.
///
/// Serializes as `"standard"`, `"bananagrams"`, `"scrabble"` or
/// `{"custom": {"A": 3, "B": 1}}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Letter frequencies of written English.
    #[default]
    Standard,
    /// Proportions of a Bananagrams bag.
    Bananagrams,
    /// Proportions of a Scrabble bag, blanks excluded.
    Scrabble,
    /// Caller-supplied weights keyed by single letters.
    Custom(BTreeMap<String, u32>),
}

impl Frequency {
    /// Resolve this distribution to `(letter, weight)` pairs.
    ///
    /// Fails for custom tables with keys that are not a single ASCII
    /// letter, whose weights are all zero, or whose case-folded weights
    /// for one letter overflow `u32`.
    pub fn weights(&self) -> Result<Vec<(char, u32)>> {
        let weights = match self {
            Self::Standard => STANDARD.to_vec(),
            Self::Bananagrams => BANANAGRAMS.to_vec(),
            Self::Scrabble => SCRABBLE.to_vec(),
            Self::Custom(table) => {
                let mut merged: BTreeMap<char, u32> = BTreeMap::new();
                for (key, &weight) in table {
                    let mut chars = key.chars();
                    let letter = match (chars.next(), chars.next()) {
                        (Some(c), None) if c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
                        _ => {
                            return Err(EngineError::configuration(
                                "frequency",
                                format!("{key:?}"),
                                "single ASCII letters as keys",
                            ))
                        }
                    };
                    let slot = merged.entry(letter).or_default();
                    *slot = slot.checked_add(weight).ok_or_else(|| {
                        EngineError::configuration(
                            "frequency",
                            format!("{letter} weight over {}", u32::MAX),
                            "per-letter weights summing to at most u32::MAX",
                        )
                    })?;
                }
                merged.into_iter().filter(|&(_, w)| w > 0).collect()
            }
        };

        if weights.is_empty() {
            return Err(EngineError::configuration(
                "frequency",
                "no letters with positive weight",
                "at least one letter with a positive weight",
            ));
        }

        Ok(weights)
    }

    /// Scale this distribution to exactly `total` tiles.
    ///
    /// Returns `(letter, count)` pairs in alphabetical order; counts sum to
    /// `total`. Letters whose share rounds to nothing are omitted.
    pub fn apportion(&self, total: usize) -> Result<Vec<(char, usize)>> {
        if total == 0 {
            return Err(EngineError::configuration("num_tiles", 0, "a positive pool size"));
        }

        let weights = self.weights()?;
        let weight_sum: u64 = weights.iter().map(|&(_, w)| u64::from(w)).sum();
        let total_u64 = total as u64;

        // Integer shares first, then hand out the leftovers to the largest
        // remainders. Ties go to the earlier letter.
        let mut counts: Vec<(char, usize, u64)> = weights
            .iter()
            .map(|&(letter, w)| {
                let scaled = total_u64 * u64::from(w);
                (letter, (scaled / weight_sum) as usize, scaled % weight_sum)
            })
            .collect();

        let assigned: usize = counts.iter().map(|&(_, n, _)| n).sum();
        let mut order: Vec<usize> = (0..counts.len()).collect();
        order.sort_by(|&a, &b| counts[b].2.cmp(&counts[a].2).then(a.cmp(&b)));
        for &i in order.iter().take(total - assigned) {
            counts[i].1 += 1;
        }

        Ok(counts
            .into_iter()
            .filter(|&(_, n, _)| n > 0)
            .map(|(letter, n, _)| (letter, n))
            .collect())
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Bananagrams => write!(f, "bananagrams"),
            Self::Scrabble => write!(f, "scrabble"),
            Self::Custom(table) => write!(f, "custom({} letters)", table.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_of(counts: &[(char, usize)], letter: char) -> usize {
        counts
            .iter()
            .find(|(l, _)| *l == letter)
            .map_or(0, |&(_, n)| n)
    }

    #[test]
    fn test_builtin_tables_cover_alphabet() {
        for freq in [Frequency::Standard, Frequency::Bananagrams, Frequency::Scrabble] {
            let weights = freq.weights().unwrap();
            assert_eq!(weights.len(), 26, "{freq}");
            assert!(weights.iter().all(|&(_, w)| w > 0));
        }
    }

    #[test]
    fn test_bananagrams_full_bag() {
        let counts = Frequency::Bananagrams.apportion(144).unwrap();
        assert_eq!(count_of(&counts, 'A'), 13);
        assert_eq!(count_of(&counts, 'E'), 18);
        assert_eq!(count_of(&counts, 'Z'), 2);
    }

    #[test]
    fn test_apportion_sums_to_total() {
        for total in [1, 2, 7, 20, 75, 299, 15_000] {
            let counts = Frequency::Standard.apportion(total).unwrap();
            assert_eq!(counts.iter().map(|(_, n)| n).sum::<usize>(), total);
        }
    }

    #[test]
    fn test_apportion_small_pool_favours_common_letters() {
        let counts = Frequency::Standard.apportion(1).unwrap();
        assert_eq!(counts, vec![('E', 1)]);
    }

    #[test]
    fn test_apportion_zero_total() {
        let err = Frequency::Standard.apportion(0).unwrap_err();
        assert!(matches!(err, EngineError::Configuration { parameter: "num_tiles", .. }));
    }

    #[test]
    fn test_custom_table() {
        let table = BTreeMap::from([("a".to_string(), 1), ("B".to_string(), 3)]);
        let counts = Frequency::Custom(table).apportion(8).unwrap();
        assert_eq!(counts, vec![('A', 2), ('B', 6)]);
    }

    #[test]
    fn test_custom_table_rejects_bad_keys() {
        let table = BTreeMap::from([("AB".to_string(), 1)]);
        assert!(Frequency::Custom(table).weights().is_err());

        let table = BTreeMap::from([("7".to_string(), 1)]);
        assert!(Frequency::Custom(table).weights().is_err());
    }

    #[test]
    fn test_custom_table_rejects_zero_weights() {
        let table = BTreeMap::from([("A".to_string(), 0)]);
        assert!(Frequency::Custom(table).apportion(10).is_err());
        assert!(Frequency::Custom(BTreeMap::new()).apportion(10).is_err());
    }

    #[test]
    fn test_custom_table_case_folded_overflow() {
        let table = BTreeMap::from([("a".to_string(), u32::MAX), ("A".to_string(), 1)]);
        let err = Frequency::Custom(table).weights().unwrap_err();
        assert!(matches!(err, EngineError::Configuration { parameter: "frequency", .. }));

        // Merging up to the limit is still fine.
        let table = BTreeMap::from([("a".to_string(), u32::MAX - 1), ("A".to_string(), 1)]);
        assert_eq!(Frequency::Custom(table).weights().unwrap(), vec![('A', u32::MAX)]);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Frequency::Standard).unwrap(), r#""standard""#);

        let freq: Frequency = serde_json::from_str(r#""bananagrams""#).unwrap();
        assert_eq!(freq, Frequency::Bananagrams);

        let freq: Frequency = serde_json::from_str(r#"{"custom":{"Q":2}}"#).unwrap();
        assert_eq!(freq, Frequency::Custom(BTreeMap::from([("Q".to_string(), 2)])));
    }
}
