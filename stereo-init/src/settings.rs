use crate::Algorithm;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The settings for a stereo initialisation.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StereoSettings {
    /// The triangulation strategy, which has no default
    pub algorithm: Algorithm,
    /// Discard points without a positive, finite depth.
    ///
    /// `None` uses [`Algorithm::filters_depth`], which is off for the disparity-ray variant.
    #[cfg_attr(feature = "serde-serialize", serde(default))]
    pub depth_filter: Option<bool>,
    /// The epsilon used by the SVD and symmetric eigen solvers
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_epsilon"))]
    pub epsilon: f64,
    /// The maximum iterations of the SVD and symmetric eigen solvers
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_max_iterations"))]
    pub max_iterations: usize,
    /// Points whose homogeneous component is below this fraction of their direction are reported as
    /// degenerate (near-parallel rays).
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_parallax_epsilon"))]
    pub parallax_epsilon: f64,
}

impl StereoSettings {
    /// Settings for the given algorithm with everything else left default.
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            depth_filter: None,
            epsilon: default_epsilon(),
            max_iterations: default_max_iterations(),
            parallax_epsilon: default_parallax_epsilon(),
        }
    }

    /// Force the depth filter on or off regardless of the algorithm.
    #[must_use]
    pub fn depth_filter(self, depth_filter: bool) -> Self {
        Self {
            depth_filter: Some(depth_filter),
            ..self
        }
    }

    /// Whether the depth filter is applied with these settings.
    pub fn filters_depth(&self) -> bool {
        self.depth_filter.unwrap_or_else(|| self.algorithm.filters_depth())
    }
}

fn default_epsilon() -> f64 {
    1e-12
}
fn default_max_iterations() -> usize {
    1000
}
fn default_parallax_epsilon() -> f64 {
    1e-9
}
