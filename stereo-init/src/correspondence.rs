use stereo_core::{FeatureMatch, PixelIndex};

/// Finds matching keypoints between a left and a right image.
///
/// Detection, description and matching all happen outside this crate. The two returned sequences
/// must be index-aligned: element `i` of each is one correspondence. Both are in `(row, col)` order.
pub trait CorrespondenceProvider {
    /// The image representation the provider works on. It is never inspected here.
    type Image: ?Sized;

    fn correspondences(
        &self,
        left: &Self::Image,
        right: &Self::Image,
    ) -> (Vec<PixelIndex>, Vec<PixelIndex>);
}

/// Splits matches into the two index-aligned keypoint sequences.
pub fn unzip_matches(
    matches: impl IntoIterator<Item = FeatureMatch<PixelIndex>>,
) -> (Vec<PixelIndex>, Vec<PixelIndex>) {
    matches
        .into_iter()
        .map(|FeatureMatch(left, right)| (left, right))
        .unzip()
}

/// A provider that ignores the images and hands out matches computed ahead of time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrecomputedMatches {
    pub left: Vec<PixelIndex>,
    pub right: Vec<PixelIndex>,
}

impl PrecomputedMatches {
    pub fn new(matches: impl IntoIterator<Item = FeatureMatch<PixelIndex>>) -> Self {
        let (left, right) = unzip_matches(matches);
        Self { left, right }
    }
}

impl CorrespondenceProvider for PrecomputedMatches {
    type Image = ();

    fn correspondences(&self, _: &(), _: &()) -> (Vec<PixelIndex>, Vec<PixelIndex>) {
        (self.left.clone(), self.right.clone())
    }
}
