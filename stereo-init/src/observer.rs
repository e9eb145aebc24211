use std::time::Duration;

/// A step of a stereo initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Retrieving matched keypoints from the correspondence provider
    Correspondence,
    /// Converting `(row, col)` keypoints into homogeneous `(x, y, 1)` columns
    Adapt,
    /// Triangulating every correspondence
    Triangulate,
    /// Discarding invalid points
    Filter,
}

/// Hook for timing and diagnostics.
///
/// All methods default to doing nothing. The triangulation itself never depends on the observer.
pub trait Observer {
    /// Called after each [`Stage`] finishes.
    fn stage_finished(&self, _stage: Stage, _elapsed: Duration) {}

    /// Called for each correspondence whose rays are nearly parallel.
    ///
    /// The point is still triangulated on a best-effort basis.
    fn degenerate_point(&self, _index: usize) {}
}

impl Observer for () {}

impl<O: Observer + ?Sized> Observer for &O {
    fn stage_finished(&self, stage: Stage, elapsed: Duration) {
        (**self).stage_finished(stage, elapsed);
    }

    fn degenerate_point(&self, index: usize) {
        (**self).degenerate_point(index);
    }
}
