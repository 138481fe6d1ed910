use crate::NormalizedPoint;
use nalgebra::{Matrix3, Point2, Point3, RealField, Vector2};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Pinhole intrinsics of a depth sensor, as per
/// [this Wikipedia page](https://en.wikipedia.org/wiki/Camera_resectioning#Intrinsic_parameters).
///
/// Depth images are rectified by the sensor driver, so there is no skew or lens distortion here.
/// These are only used to move between pixel coordinates and the virtual image plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct DepthIntrinsics<T: RealField + Copy> {
    pub focals: Vector2<T>,
    pub principal_point: Point2<T>,
}

impl<T: RealField + Copy> DepthIntrinsics<T> {
    /// Creates intrinsics with unit focal lengths and the principal point at the origin.
    pub fn identity() -> Self {
        Self {
            focals: Vector2::new(nalgebra::one(), nalgebra::one()),
            principal_point: Point2::origin(),
        }
    }

    pub fn focals(self, focals: Vector2<T>) -> Self {
        Self { focals, ..self }
    }

    pub fn focal(self, focal: T) -> Self {
        Self {
            focals: Vector2::new(focal, focal),
            ..self
        }
    }

    pub fn principal_point(self, principal_point: Point2<T>) -> Self {
        Self {
            principal_point,
            ..self
        }
    }

    #[rustfmt::skip]
    pub fn matrix(&self) -> Matrix3<T> {
        let zero = nalgebra::zero();
        let one = nalgebra::one();
        Matrix3::new(
            self.focals.x,  zero,           self.principal_point.x,
            zero,           self.focals.y,  self.principal_point.y,
            zero,           zero,           one,
        )
    }

    /// Converts pixel coordinates into a [`NormalizedPoint`].
    pub fn normalize(&self, pixel: Point2<T>) -> NormalizedPoint<T> {
        let centered = pixel - self.principal_point;
        NormalizedPoint(Point2::new(
            centered.x / self.focals.x,
            centered.y / self.focals.y,
        ))
    }

    /// Converts a [`NormalizedPoint`] back into pixel coordinates.
    pub fn pixel(&self, normalized: NormalizedPoint<T>) -> Point2<T> {
        let NormalizedPoint(point) = normalized;
        Point2::new(
            point.x * self.focals.x + self.principal_point.x,
            point.y * self.focals.y + self.principal_point.y,
        )
    }

    /// Unprojects a pixel with a depth reading into the camera frame.
    pub fn unproject(&self, pixel: Point2<T>, depth: T) -> Point3<T> {
        self.normalize(pixel).with_depth(depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn kinect() -> DepthIntrinsics<f64> {
        DepthIntrinsics::identity()
            .focals(Vector2::new(5.25e2, 5.2e2))
            .principal_point(Point2::new(3.195e2, 2.395e2))
    }

    #[test]
    fn pixel_roundtrip() {
        let intrinsics = kinect();
        let pixel = Point2::new(471.0, 322.0);
        let back = intrinsics.pixel(intrinsics.normalize(pixel));
        assert_relative_eq!(back, pixel, epsilon = 1e-9);
    }

    #[test]
    fn unproject_matches_matrix() {
        let intrinsics = kinect();
        let point = intrinsics.unproject(Point2::new(12.0, 400.0), 2.5);
        let projected = intrinsics.matrix() * point.coords;
        assert_relative_eq!(
            projected / projected.z,
            Vector3::new(12.0, 400.0, 1.0),
            epsilon = 1e-9
        );
    }
}
