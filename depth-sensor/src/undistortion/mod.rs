mod erased;
mod grid;
mod identity;
mod interpolated;
mod local;
mod polynomial;

pub use erased::*;
pub use grid::*;
pub use identity::*;
pub use interpolated::*;
pub use local::*;
pub use polynomial::*;

use depth_core::nalgebra::{self, ComplexField, Point3};
use depth_core::{DepthRepresentation, NormalizedPoint};
use core::any::type_name;
use core::fmt::Debug;
use std::sync::Arc;

/// Corrects raw depth samples of a depth sensor.
///
/// A model is generic over the [`DepthRepresentation`] it corrects, so the same calibration can
/// be applied to dense fields and to point clouds. Models are frozen once constructed: there is
/// no way to change the coefficients of a model, which is what makes sharing one model between
/// several sensors and threads safe.
///
/// Composing several corrections is done by calling them one after another. A model never wraps
/// another model.
pub trait UndistortionModel<R>: Debug + Send + Sync
where
    R: DepthRepresentation,
{
    /// Name of the model, used in logs.
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }

    /// Corrects a single sample. The input is left untouched.
    fn correct(&self, point: &R::Point) -> R::Point;

    /// Corrects every sample of a field. The input is left untouched.
    fn correct_cloud(&self, cloud: &R::Cloud) -> R::Cloud {
        let mut corrected = cloud.clone();
        self.correct_cloud_in_place(&mut corrected);
        corrected
    }

    /// Corrects every sample of a field, overwriting it.
    ///
    /// This avoids the copy made by [`UndistortionModel::correct_cloud`] when the raw field is no
    /// longer needed.
    fn correct_cloud_in_place(&self, cloud: &mut R::Cloud) {
        R::map_cloud(cloud, |point| self.correct(point));
    }
}

/// A handle to an undistortion model that may be held by several sensors at once.
pub type SharedUndistortionModel<R> = Arc<dyn UndistortionModel<R>>;

/// Moves a sample along its viewing ray to the depth computed by `correction`.
///
/// `correction` receives the normalized image point of the sample and its raw depth. Samples with
/// a depth that is not finite and positive, and samples for which `correction` returns `None`,
/// are returned unchanged.
pub(crate) fn correct_along_ray<R, F>(point: &R::Point, correction: F) -> R::Point
where
    R: DepthRepresentation,
    F: FnOnce(&NormalizedPoint<R::Scalar>, R::Scalar) -> Option<R::Scalar>,
{
    let position = R::position(point);
    let depth = position.z;
    if !depth.is_finite() || depth <= nalgebra::zero() {
        return point.clone();
    }
    let corrected = NormalizedPoint::from_position(&position)
        .and_then(|normalized| correction(&normalized, depth));
    match corrected {
        Some(corrected) => {
            let scale = corrected / depth;
            R::with_position(
                point,
                Point3::new(position.x * scale, position.y * scale, corrected),
            )
        }
        None => point.clone(),
    }
}
