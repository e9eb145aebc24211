/// A left/right keypoint match believed to image the same world point.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct FeatureMatch<P>(pub P, pub P);
