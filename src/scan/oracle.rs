/// Classification strategies
///
/// The workflow asks an oracle for a verdict once an item's processing
/// delay has elapsed. The shipped oracle is a random stand-in for a real
/// inference backend; it does not look at the pixels.
use rand::Rng;
use std::ops::Range;

use super::source::ImageSource;
use crate::state::catalog::Catalog;
use crate::state::data::Disease;

/// What an oracle decided for one image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub disease: &'static Disease,
    pub confidence: f32,
}

/// Produces a verdict for an uploaded image.
///
/// Implementations must always return an entry of `catalog`.
pub trait ClassificationOracle: Send + Sync {
    fn classify(&self, source: &ImageSource, catalog: &Catalog) -> Verdict;
}

/// Uniform random draw over the catalog with a uniform confidence
#[derive(Debug, Clone)]
pub struct RandomOracle {
    confidence: Range<f32>,
}

impl RandomOracle {
    /// `confidence` must be a non-empty range inside [0, 1]
    pub fn new(confidence: Range<f32>) -> Self {
        Self { confidence }
    }
}

impl Default for RandomOracle {
    fn default() -> Self {
        Self::new(0.70..1.0)
    }
}

impl ClassificationOracle for RandomOracle {
    fn classify(&self, source: &ImageSource, catalog: &Catalog) -> Verdict {
        let mut rng = rand::thread_rng();
        let index = rng.gen_range(0..catalog.len());
        let disease = &catalog.diseases()[index];
        let confidence = if self.confidence.is_empty() {
            self.confidence.start
        } else {
            rng.gen_range(self.confidence.clone())
        };

        tracing::debug!(
            file = source.name(),
            disease = disease.id,
            confidence,
            "simulated classification"
        );

        Verdict {
            disease,
            confidence,
        }
    }
}
