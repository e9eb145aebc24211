//! # Stereo Core
//!
//! This library provides the common abstractions and types used to triangulate points seen by a
//! calibrated stereo rig. The other crates in this workspace (`stereo-pinhole`, `stereo-geom` and
//! `stereo-init`) depend on it for keypoints, homogeneous points and the camera and triangulator
//! traits. The crate is kept small and works with `#![no_std]`, even without an allocator.
//!
//! ## Conventions
//!
//! Correspondence searches usually index images as matrices, so their keypoints arrive in
//! `(row, column)` order ([`PixelIndex`]). Projective geometry works in `(x, y)` image
//! coordinates where X points right and Y points down ([`KeyPoint`]). Both convert into the
//! homogeneous `(x, y, 1)` vector consumed by every [`TriangulatorStereo`].
//!
//! 3d points are expressed in the frame of the left camera: X points towards the right camera,
//! Y points down and Z points forwards. A physically valid point has a positive Z (depth).
//!
//! ## Triangulation
//!
//! The two cameras share one intrinsic matrix `K` and are related by a pure translation of length
//! `baseline` along the X axis of the left camera:
//!
//! - `p` the point we are trying to triangulate
//! - `a` the keypoint on the left image
//! - `b` the keypoint on the right image
//! - `O` the optical center of a camera
//! - `@` the image plane
//!
//! ```text
//!                  p
//!                 / \
//!                /   \
//!               /     \
//!     @@@@@@@@@a@@@@@@@b@@@@@@@@@
//!             /         \
//!            O-----------O
//!             <baseline>
//! ```
//!
//! Because the rays out of `a` and `b` are built from noisy keypoints they rarely intersect exactly.
//! The triangulators in `stereo-geom` deal with this error in different ways.

#![no_std]

mod camera;
mod keypoint;
mod matches;
mod point;
mod triangulation;

pub use camera::*;
pub use keypoint::*;
pub use matches::*;
pub use nalgebra;
pub use point::*;
pub use triangulation::*;
