use super::*;
use crate::types::coords_from_flat;

/// Purely random generation strategy, reproducible from its seed.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomPatternGenerator {
    seed: u64,
    sampling: Sampling,
}

impl RandomPatternGenerator {
    pub fn new(seed: u64, sampling: Sampling) -> Self {
        Self { seed, sampling }
    }

    fn sample_rejection(rng: &mut impl rand::Rng, config: RoundConfig) -> Pattern {
        let size = config.size();
        let mut pattern = Pattern::empty(size);
        let mut draws: u32 = 0;
        while pattern.marked_count() < config.count() {
            let row = rng.random_range(0..size);
            let col = rng.random_range(0..size);
            draws = draws.saturating_add(1);
            pattern.mark((row, col));
        }
        log::trace!(
            "rejection sampling placed {} cells in {} draws",
            config.count(),
            draws
        );
        pattern
    }

    fn sample_indices(rng: &mut impl rand::Rng, config: RoundConfig) -> Pattern {
        let size = config.size();
        let mut pattern = Pattern::empty(size);
        let indices = rand::seq::index::sample(
            rng,
            config.total_cells().into(),
            config.count().into(),
        );
        for index in indices.iter() {
            pattern.mark(coords_from_flat(index, size));
        }
        pattern
    }
}

impl PatternGenerator for RandomPatternGenerator {
    fn generate(self, config: RoundConfig) -> Pattern {
        use rand::prelude::*;

        let total_cells = config.total_cells();

        // optimize for full boards
        if config.count() >= total_cells {
            let size = config.size();
            let mask = Array2::from_elem((size, size).to_nd_index(), true);
            return Pattern::from_mask(mask).unwrap_or_else(|_| Pattern::empty(size));
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let pattern = match self.sampling {
            Sampling::Rejection => Self::sample_rejection(&mut rng, config),
            Sampling::IndexSample => Self::sample_indices(&mut rng, config),
        };

        // double check marked count
        if pattern.marked_count() != config.count() {
            log::warn!(
                "Generated pattern count mismatch, actual: {}, requested: {}",
                pattern.marked_count(),
                config.count()
            );
        }
        pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRATEGIES: [Sampling; 2] = [Sampling::Rejection, Sampling::IndexSample];

    #[test]
    fn generated_pattern_has_exact_count_and_size() {
        let config = RoundConfig::new(5, 9).unwrap();
        for sampling in STRATEGIES {
            for seed in 0..200 {
                let pattern = RandomPatternGenerator::new(seed, sampling).generate(config);
                assert_eq!(pattern.size(), 5);
                assert_eq!(pattern.marked_count(), 9);
                assert_eq!(pattern.iter_marked().count(), 9);
            }
        }
    }

    #[test]
    fn full_board_marks_every_cell() {
        let config = RoundConfig::new(4, 16).unwrap();
        for sampling in STRATEGIES {
            let pattern = RandomPatternGenerator::new(7, sampling).generate(config);
            assert_eq!(pattern.marked_count(), 16);
            assert_eq!(pattern.iter_marked().count(), 16);
            assert!(pattern.matches(&Pattern::from_mask(Array2::from_elem([4, 4], true)).unwrap()));
        }
    }

    #[test]
    fn nearly_full_board_still_terminates() {
        let config = RoundConfig::new(6, 35).unwrap();
        for sampling in STRATEGIES {
            let pattern = RandomPatternGenerator::new(3, sampling).generate(config);
            assert_eq!(pattern.marked_count(), 35);
        }
    }

    #[test]
    fn same_seed_same_pattern() {
        let config = RoundConfig::new(8, 12).unwrap();
        for sampling in STRATEGIES {
            let a = RandomPatternGenerator::new(42, sampling).generate(config);
            let b = RandomPatternGenerator::new(42, sampling).generate(config);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn every_cell_is_reachable() {
        let config = RoundConfig::new(3, 1).unwrap();
        for sampling in STRATEGIES {
            let mut seen = Pattern::empty(3);
            for seed in 0..500 {
                let pattern = RandomPatternGenerator::new(seed, sampling).generate(config);
                for pos in pattern.iter_marked() {
                    seen.mark(pos);
                }
            }
            assert_eq!(seen.marked_count(), 9);
        }
    }
}
