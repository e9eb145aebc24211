//! This crate contains the stereo triangulation algorithms used by `stereo-init`.
//!
//! ## Triangulation
//!
//! We know the intrinsic matrix shared by both cameras of a stereo rig, the baseline between them,
//! and the pixel at which the same feature was observed in each image. We want to find the point
//! of intersection of the two rays in the frame of the left camera.
//!
//! Three strategies are provided, each implementing [`stereo_core::TriangulatorStereo`]:
//!
//! - [`DltTriangulator`] solves the direct linear transform with the null space of a 4x4 design
//!   matrix built from both projection matrices.
//! - [`LeastSquaresTriangulator`] minimizes the squared reprojection residual orthogonal to each
//!   bearing with a symmetric eigen decomposition.
//! - [`DisparityRayTriangulator`] intersects the two back-projected rays directly, which only
//!   works for a rig with no rotation between the cameras.
//!
//! On noiseless data all three agree. On noisy data they weigh the error differently and their
//! outputs diverge.

#![no_std]

pub mod triangulation;

pub use triangulation::*;
