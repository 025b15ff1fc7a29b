use crate::*;
pub use random::*;

mod random;

pub trait PatternGenerator {
    fn generate(self, config: RoundConfig) -> Pattern;
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sampling {
    /// Draw random cells until enough distinct ones are marked.
    #[default]
    Rejection,
    /// Draw distinct flat indices directly, better suited to dense grids.
    IndexSample,
}
