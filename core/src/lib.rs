#![no_std]

extern crate alloc;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use observer::*;
pub use scheduler::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod observer;
mod scheduler;
mod types;

/// Parameters of a round: an `size`×`size` grid with `count` cells to remember, shown for
/// `reveal_delay_ms` before being hidden.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RoundConfigRepr")]
pub struct RoundConfig {
    size: Coord,
    count: CellCount,
    reveal_delay_ms: u32,
}

impl RoundConfig {
    pub const DEFAULT_SIZE: Coord = 5;
    pub const DEFAULT_COUNT: CellCount = 9;
    pub const DEFAULT_REVEAL_DELAY_MS: u32 = 5000;

    pub fn new(size: Coord, count: CellCount) -> Result<Self> {
        Self::with_reveal_delay(size, count, Self::DEFAULT_REVEAL_DELAY_MS)
    }

    pub fn with_reveal_delay(size: Coord, count: CellCount, reveal_delay_ms: u32) -> Result<Self> {
        if size < 1 || count < 1 || count > mult(size, size) || reveal_delay_ms < 1 {
            return Err(GameError::InvalidConfiguration);
        }
        Ok(Self {
            size,
            count,
            reveal_delay_ms,
        })
    }

    pub const fn size(&self) -> Coord {
        self.size
    }

    pub const fn count(&self) -> CellCount {
        self.count
    }

    pub const fn reveal_delay_ms(&self) -> u32 {
        self.reveal_delay_ms
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size, self.size)
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            size: Self::DEFAULT_SIZE,
            count: Self::DEFAULT_COUNT,
            reveal_delay_ms: Self::DEFAULT_REVEAL_DELAY_MS,
        }
    }
}

#[derive(Deserialize)]
struct RoundConfigRepr {
    size: Coord,
    count: CellCount,
    reveal_delay_ms: u32,
}

impl TryFrom<RoundConfigRepr> for RoundConfig {
    type Error = GameError;

    fn try_from(repr: RoundConfigRepr) -> Result<Self> {
        Self::with_reveal_delay(repr.size, repr.count, repr.reveal_delay_ms)
    }
}

/// Square boolean grid used both for the target pattern and the player's selection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PatternRepr")]
pub struct Pattern {
    mask: Array2<bool>,
    marked_count: CellCount,
}

impl Pattern {
    pub fn empty(size: Coord) -> Self {
        Self {
            mask: Array2::default((size, size).to_nd_index()),
            marked_count: 0,
        }
    }

    pub fn from_mask(mask: Array2<bool>) -> Result<Self> {
        let (rows, cols) = mask.dim();
        if rows != cols || Coord::try_from(rows).is_err() {
            return Err(GameError::PatternMismatch);
        }
        let marked_count = mask
            .iter()
            .filter(|&&marked| marked)
            .count()
            .try_into()
            .map_err(|_| GameError::PatternMismatch)?;
        Ok(Self { mask, marked_count })
    }

    pub fn from_coords(size: Coord, coords: &[Coord2]) -> Result<Self> {
        let mut pattern = Self::empty(size);
        for &pos in coords {
            pattern.mark(pattern.validate_coords(pos)?);
        }
        Ok(pattern)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size && coords.1 < size {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord {
        // square and bounded by `from_mask`/`empty`
        self.mask.dim().0 as Coord
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size(), self.size())
    }

    pub fn marked_count(&self) -> CellCount {
        self.marked_count
    }

    pub fn is_marked(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn iter_marked(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mask
            .indexed_iter()
            .filter(|&(_, &marked)| marked)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    /// Cell-by-cell equality, which also requires identical dimensions.
    pub fn matches(&self, other: &Pattern) -> bool {
        self.mask == other.mask
    }

    pub fn fits(&self, config: &RoundConfig) -> bool {
        let size = usize::from(config.size());
        self.mask.dim() == (size, size) && self.marked_count == config.count()
    }

    pub(crate) fn mark(&mut self, coords: Coord2) -> MarkOutcome {
        let cell = &mut self.mask[coords.to_nd_index()];
        if *cell {
            MarkOutcome::NoChange
        } else {
            *cell = true;
            self.marked_count += 1;
            MarkOutcome::Changed
        }
    }
}

#[derive(Deserialize)]
struct PatternRepr {
    mask: Array2<bool>,
    marked_count: CellCount,
}

impl TryFrom<PatternRepr> for Pattern {
    type Error = GameError;

    fn try_from(repr: PatternRepr) -> Result<Self> {
        let pattern = Self::from_mask(repr.mask)?;
        if pattern.marked_count != repr.marked_count {
            return Err(GameError::PatternMismatch);
        }
        Ok(pattern)
    }
}

impl Index<Coord2> for Pattern {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mask[coords.to_nd_index()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Won,
    Lost,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SelectOutcome {
    NoChange,
    Selected,
    Won,
    Lost,
}

impl SelectOutcome {
    pub const fn has_update(self) -> bool {
        use SelectOutcome::*;
        match self {
            NoChange => false,
            Selected => true,
            Won => true,
            Lost => true,
        }
    }

    pub const fn verdict(self) -> Option<Verdict> {
        match self {
            Self::Won => Some(Verdict::Won),
            Self::Lost => Some(Verdict::Lost),
            Self::NoChange | Self::Selected => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn config_rejects_out_of_range_values() {
        assert_eq!(RoundConfig::new(0, 1), Err(GameError::InvalidConfiguration));
        assert_eq!(RoundConfig::new(3, 0), Err(GameError::InvalidConfiguration));
        assert_eq!(RoundConfig::new(1, 2), Err(GameError::InvalidConfiguration));
        assert_eq!(
            RoundConfig::with_reveal_delay(3, 2, 0),
            Err(GameError::InvalidConfiguration)
        );
        assert!(RoundConfig::new(3, 9).is_ok());
    }

    #[test]
    fn config_defaults_match_widget_defaults() {
        let config = RoundConfig::default();
        assert_eq!(config.size(), 5);
        assert_eq!(config.count(), 9);
        assert_eq!(config.reveal_delay_ms(), 5000);
    }

    #[test]
    fn config_deserialization_is_validated() {
        let ok: RoundConfig =
            serde_json::from_str(r#"{"size":3,"count":2,"reveal_delay_ms":100}"#).unwrap();
        assert_eq!(ok, RoundConfig::with_reveal_delay(3, 2, 100).unwrap());

        let bad = serde_json::from_str::<RoundConfig>(r#"{"size":1,"count":2,"reveal_delay_ms":100}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn pattern_deserialization_is_validated() {
        let fixture = Pattern::from_coords(3, &[(0, 0), (1, 1)]).unwrap();
        let json = serde_json::to_string(&fixture).unwrap();
        assert_eq!(serde_json::from_str::<Pattern>(&json).unwrap(), fixture);

        let forged_count = serde_json::to_string(&Pattern::empty(3))
            .unwrap()
            .replace(r#""marked_count":0"#, r#""marked_count":2"#);
        assert!(serde_json::from_str::<Pattern>(&forged_count).is_err());

        let mut non_square = serde_json::to_value(Pattern::empty(3)).unwrap();
        non_square["mask"]["dim"] = serde_json::json!([3, 4]);
        non_square["mask"]["data"] = serde_json::Value::from(alloc::vec![false; 12]);
        assert!(serde_json::from_value::<Pattern>(non_square).is_err());
    }

    #[test]
    fn fits_requires_square_size_and_count() {
        let config = RoundConfig::new(3, 2).unwrap();
        assert!(Pattern::from_coords(3, &[(0, 0), (1, 1)]).unwrap().fits(&config));
        assert!(!Pattern::from_coords(3, &[(0, 0)]).unwrap().fits(&config));
        assert!(!Pattern::from_coords(4, &[(0, 0), (1, 1)]).unwrap().fits(&config));
    }

    #[test]
    fn pattern_from_coords_counts_duplicates_once() {
        let pattern = Pattern::from_coords(3, &[(0, 0), (1, 1), (0, 0)]).unwrap();
        assert_eq!(pattern.marked_count(), 2);
        assert!(pattern.is_marked((1, 1)));
        assert!(!pattern.is_marked((2, 2)));
        assert_eq!(pattern.iter_marked().collect::<Vec<_>>(), [(0, 0), (1, 1)]);
    }

    #[test]
    fn pattern_from_coords_rejects_out_of_range() {
        assert_eq!(
            Pattern::from_coords(3, &[(3, 0)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn pattern_from_mask_requires_square() {
        let mask: Array2<bool> = Array2::default([2, 3]);
        assert_eq!(Pattern::from_mask(mask), Err(GameError::PatternMismatch));
    }

    #[test]
    fn only_final_outcomes_carry_a_verdict() {
        assert_eq!(SelectOutcome::Won.verdict(), Some(Verdict::Won));
        assert_eq!(SelectOutcome::Lost.verdict(), Some(Verdict::Lost));
        assert_eq!(SelectOutcome::Selected.verdict(), None);
        assert_eq!(SelectOutcome::NoChange.verdict(), None);
    }

    #[test]
    fn single_differing_cell_breaks_match() {
        let a = Pattern::from_coords(3, &[(0, 0), (1, 1)]).unwrap();
        let b = Pattern::from_coords(3, &[(0, 0), (2, 2)]).unwrap();
        assert!(a.matches(&a.clone()));
        assert!(!a.matches(&b));
        assert!(!a.matches(&Pattern::from_coords(4, &[(0, 0), (1, 1)]).unwrap()));
    }
}
