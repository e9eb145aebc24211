use crate::{positive_depth_mask, Algorithm, ConfigurationError, Observer, Result, StereoSettings};
use log::*;
use stereo_core::{nalgebra::Matrix3xX, CameraPoint, Projective, TriangulatorStereo};
use stereo_geom::{DisparityRayTriangulator, DltTriangulator, LeastSquaresTriangulator};
use stereo_pinhole::PinholeStereo;

#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "rayon")]
use stereo_core::nalgebra::Vector3;

/// The raw output of the triangulation engine, one column per correspondence.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangulation {
    /// Euclidean points in the left camera frame. Unsolved correspondences are NaN.
    pub points: Matrix3xX<f64>,
    /// Whether each point has a positive, finite depth.
    pub valid: Vec<bool>,
    /// Whether the solver produced a point for each correspondence.
    pub solved: Vec<bool>,
    /// Indices of correspondences whose rays were nearly parallel.
    pub degenerate: Vec<usize>,
}

impl Triangulation {
    pub fn len(&self) -> usize {
        self.points.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.points.ncols() == 0
    }
}

/// Triangulates every pair of homogeneous pixel columns with the algorithm from `settings`.
///
/// Column `i` of `left` and `right` form one correspondence. No point is discarded here; the
/// validity mask is returned for the caller to apply.
pub fn triangulate(
    left: &Matrix3xX<f64>,
    right: &Matrix3xX<f64>,
    rig: &PinholeStereo,
    settings: &StereoSettings,
    observer: impl Observer,
) -> Result<Triangulation> {
    if left.ncols() != right.ncols() {
        return Err(ConfigurationError::MismatchedCorrespondences {
            left: left.ncols(),
            right: right.ncols(),
        });
    }

    let solutions = match settings.algorithm {
        Algorithm::Dlt => solve_all(
            &DltTriangulator::new()
                .epsilon(settings.epsilon)
                .max_iterations(settings.max_iterations),
            rig,
            left,
            right,
        ),
        Algorithm::LeastSquaresReprojection => solve_all(
            &LeastSquaresTriangulator::new()
                .epsilon(settings.epsilon)
                .max_iterations(settings.max_iterations),
            rig,
            left,
            right,
        ),
        Algorithm::DisparityRay => solve_all(&DisparityRayTriangulator, rig, left, right),
    };

    let mut degenerate = vec![];
    for (ix, solution) in solutions.iter().enumerate() {
        match solution {
            Some(point) if point.is_near_infinity(settings.parallax_epsilon) => {
                warn!(
                    "correspondence {} has near-parallel rays, its point is unreliable",
                    ix
                );
                observer.degenerate_point(ix);
                degenerate.push(ix);
            }
            Some(_) => {}
            None => warn!(
                "{} solver did not converge for correspondence {}",
                settings.algorithm, ix
            ),
        }
    }

    let solved = solutions.iter().map(Option::is_some).collect();
    let mut points = Matrix3xX::from_element(solutions.len(), f64::NAN);
    for (mut column, solution) in points.column_iter_mut().zip(&solutions) {
        if let Some(point) = solution {
            column.copy_from(&point.euclidean());
        }
    }
    let valid = positive_depth_mask(&points);
    Ok(Triangulation {
        points,
        valid,
        solved,
        degenerate,
    })
}

#[cfg(not(feature = "rayon"))]
fn solve_all<T: TriangulatorStereo>(
    triangulator: &T,
    rig: &PinholeStereo,
    left: &Matrix3xX<f64>,
    right: &Matrix3xX<f64>,
) -> Vec<Option<CameraPoint>> {
    left.column_iter()
        .zip(right.column_iter())
        .map(|(l, r)| triangulator.triangulate_stereo(rig, l.into_owned(), r.into_owned()))
        .collect()
}

#[cfg(feature = "rayon")]
fn solve_all<T: TriangulatorStereo + Sync>(
    triangulator: &T,
    rig: &PinholeStereo,
    left: &Matrix3xX<f64>,
    right: &Matrix3xX<f64>,
) -> Vec<Option<CameraPoint>> {
    (0..left.ncols())
        .into_par_iter()
        .map(|ix| {
            let l: Vector3<f64> = left.column(ix).into_owned();
            let r: Vector3<f64> = right.column(ix).into_owned();
            triangulator.triangulate_stereo(rig, l, r)
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use stereo_core::nalgebra::Matrix3;

    fn rig() -> PinholeStereo {
        let intrinsics = Matrix3::new(700.0, 0.0, 320.0, 0.0, 700.0, 240.0, 0.0, 0.0, 1.0);
        PinholeStereo::new(intrinsics, 0.5).unwrap()
    }

    #[test]
    fn mismatched_columns_are_rejected() {
        let left = Matrix3xX::from_element(5, 1.0);
        let right = Matrix3xX::from_element(4, 1.0);
        for algorithm in Algorithm::ALL {
            assert_eq!(
                triangulate(&left, &right, &rig(), &StereoSettings::new(algorithm), ()),
                Err(ConfigurationError::MismatchedCorrespondences { left: 5, right: 4 })
            );
        }
    }

    #[test]
    fn every_column_is_reported() {
        let left = Matrix3xX::from_column_slice(&[320.0, 240.0, 1.0, 288.0, 240.0, 1.0]);
        let right = Matrix3xX::from_column_slice(&[288.0, 240.0, 1.0, 320.0, 240.0, 1.0]);
        let triangulation = triangulate(
            &left,
            &right,
            &rig(),
            &StereoSettings::new(Algorithm::DisparityRay),
            (),
        )
        .unwrap();
        assert_eq!(triangulation.len(), 2);
        assert_eq!(triangulation.solved, vec![true, true]);
        assert_eq!(triangulation.valid, vec![true, false]);
        assert!(triangulation.degenerate.is_empty());
    }
}
