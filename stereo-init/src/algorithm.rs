use crate::ConfigurationError;
use std::{fmt, str::FromStr};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The triangulation strategy used by the engine.
///
/// Every dispatch on this enum is an exhaustive match, so there is no default algorithm. Names are
/// parsed with [`FromStr`], which rejects anything it does not know.
///
/// ```
/// use stereo_init::Algorithm;
/// assert_eq!("DLT".parse::<Algorithm>(), Ok(Algorithm::Dlt));
/// assert_eq!("lsq".parse::<Algorithm>(), Ok(Algorithm::LeastSquaresReprojection));
/// assert!("opencv".parse::<Algorithm>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-serialize", serde(rename_all = "snake_case"))]
pub enum Algorithm {
    /// [`stereo_geom::DltTriangulator`]
    Dlt,
    /// [`stereo_geom::LeastSquaresTriangulator`]
    LeastSquaresReprojection,
    /// [`stereo_geom::DisparityRayTriangulator`]
    DisparityRay,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::Dlt,
        Algorithm::LeastSquaresReprojection,
        Algorithm::DisparityRay,
    ];

    /// Whether points with non-positive depth are discarded unless overridden in the settings.
    ///
    /// The disparity-ray variant historically kept every point.
    pub fn filters_depth(self) -> bool {
        match self {
            Algorithm::Dlt => true,
            Algorithm::LeastSquaresReprojection => true,
            Algorithm::DisparityRay => false,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Dlt => "dlt",
            Algorithm::LeastSquaresReprojection => "least_squares_reprojection",
            Algorithm::DisparityRay => "disparity_ray",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "dlt" | "direct_linear" => Ok(Algorithm::Dlt),
            "least_squares_reprojection" | "least_squares" | "lsq" => {
                Ok(Algorithm::LeastSquaresReprojection)
            }
            "disparity_ray" | "disparity" => Ok(Algorithm::DisparityRay),
            _ => Err(ConfigurationError::UnknownAlgorithm(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn names_round_trip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<Algorithm>(), Ok(algorithm));
        }
    }

    #[test]
    fn unknown_names_are_errors() {
        assert_eq!(
            "".parse::<Algorithm>(),
            Err(ConfigurationError::UnknownAlgorithm(String::new()))
        );
        assert_eq!(
            "triangulate".parse::<Algorithm>(),
            Err(ConfigurationError::UnknownAlgorithm("triangulate".to_owned()))
        );
    }

    #[test]
    fn only_disparity_ray_keeps_negative_depth() {
        assert!(Algorithm::Dlt.filters_depth());
        assert!(Algorithm::LeastSquaresReprojection.filters_depth());
        assert!(!Algorithm::DisparityRay.filters_depth());
    }
}
