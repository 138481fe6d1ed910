use super::{SharedUndistortionModel, UndistortionModel};
use depth_core::DepthRepresentation;
use std::sync::{Arc, OnceLock};

/// Identity undistortion, i.e. no correction at all.
///
/// $$
/// f(d) = d
/// $$
///
/// This is the model of every sensor that has not been calibrated yet. It implements
/// [`UndistortionModel`] for every representation, so a single instance is shared by the whole
/// process (see [`NoUndistortion::shared`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoUndistortion;

impl NoUndistortion {
    /// Retrieve the process-wide instance.
    pub fn shared<R: DepthRepresentation>() -> SharedUndistortionModel<R> {
        static SHARED: OnceLock<Arc<NoUndistortion>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(NoUndistortion)).clone()
    }
}

impl<R: DepthRepresentation> UndistortionModel<R> for NoUndistortion {
    fn correct(&self, point: &R::Point) -> R::Point {
        point.clone()
    }

    fn correct_cloud(&self, cloud: &R::Cloud) -> R::Cloud {
        cloud.clone()
    }

    fn correct_cloud_in_place(&self, _: &mut R::Cloud) {}
}
