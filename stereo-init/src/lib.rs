//! Stereo map initialisation.
//!
//! Given keypoints matched between the left and right image of a calibrated stereo pair, this crate
//! recovers the 3d position of every match in the left camera frame and discards the points that
//! are not physically valid. The right camera is displaced by `baseline` along the left camera's
//! `+x` axis and both cameras share the same intrinsic matrix.
//!
//! Keypoints arrive as [`PixelIndex`] in `(row, col)` order. They are converted into homogeneous
//! `(x, y, 1)` columns, triangulated with one of the [`Algorithm`]s, and filtered. The result keeps
//! the left keypoints in `(row, col)` order next to their 3d points.
//!
//! ```
//! use stereo_core::{FeatureMatch, PixelIndex};
//! use stereo_init::{stereo_initialisation, PrecomputedMatches};
//! use nalgebra::Matrix3;
//!
//! let matches = PrecomputedMatches::new(vec![FeatureMatch(
//!     PixelIndex::new(240.0, 320.0),
//!     PixelIndex::new(240.0, 288.0),
//! )]);
//! let intrinsics = Matrix3::new(700.0, 0.0, 320.0, 0.0, 700.0, 240.0, 0.0, 0.0, 1.0);
//! let result = stereo_initialisation(&matches, &(), &(), &intrinsics, 0.5, "disparity_ray").unwrap();
//! assert!((result.points_3d[(2, 0)] - 10.9375).abs() < 1e-9);
//! ```

mod adapter;
mod algorithm;
mod correspondence;
mod engine;
mod error;
mod filter;
mod initialisation;
mod observer;
mod settings;

pub use adapter::*;
pub use algorithm::*;
pub use correspondence::*;
pub use engine::*;
pub use error::*;
pub use filter::*;
pub use initialisation::*;
pub use observer::*;
pub use settings::*;

pub use stereo_core::PixelIndex;
