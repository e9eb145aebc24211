use thiserror::Error;

/// Malformed input to a stereo initialisation.
///
/// These are the only fatal conditions. Geometrically poor input (near-parallel rays, points behind
/// the cameras, an empty match set) degrades the output instead of failing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("unrecognized triangulation algorithm `{0}`")]
    UnknownAlgorithm(String),
    #[error("correspondence count mismatch: {left} left keypoints and {right} right keypoints")]
    MismatchedCorrespondences { left: usize, right: usize },
    #[error("the intrinsic matrix must be 3x3, got {rows}x{cols}")]
    IntrinsicsShape { rows: usize, cols: usize },
    #[error("the intrinsic matrix is not invertible")]
    SingularIntrinsics,
}

pub type Result<T, E = ConfigurationError> = std::result::Result<T, E>;
