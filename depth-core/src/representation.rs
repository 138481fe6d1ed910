use core::fmt::{self, Debug};
use derive_more::{AsRef, Deref, From, Into};
use nalgebra::{Point2, Point3, RealField};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The storage layout of a depth representation.
///
/// Two representations with the same kind may still be incompatible (for instance
/// a dense `f32` field and a dense `f64` field), but two representations of different
/// kinds never are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-serialize", serde(rename_all = "snake_case"))]
pub enum RepresentationKind {
    /// Samples are `nalgebra` points and fields are dense matrices.
    Dense,
    /// Samples are point records and fields are point clouds.
    PointCloud,
}

impl fmt::Display for RepresentationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dense => write!(f, "dense"),
            Self::PointCloud => write!(f, "point cloud"),
        }
    }
}

/// The capability set every depth backend provides.
///
/// A sample (a [`DepthRepresentation::Point`]) has a 3d position in the camera frame and its depth
/// is the Z component of that position. A field of samples (a [`DepthRepresentation::Cloud`]) is a
/// `width x height` arrangement of samples, where `height == 1` for unorganized clouds.
///
/// Implementors are zero-sized marker types that are never instantiated. They only tie the
/// scalar, sample and field types of a backend together.
pub trait DepthRepresentation: 'static {
    /// The scalar type of positions and depths.
    type Scalar: RealField + Copy + Send + Sync;

    /// A single depth sample.
    type Point: Clone + PartialEq + Debug + Send + Sync;

    /// A field of depth samples.
    type Cloud: Clone + PartialEq + Debug + Send + Sync;

    /// The storage layout of this backend.
    const KIND: RepresentationKind;

    /// Retrieve the position of a sample in the camera frame.
    fn position(point: &Self::Point) -> Point3<Self::Scalar>;

    /// Retrieve the depth of a sample.
    fn depth(point: &Self::Point) -> Self::Scalar {
        Self::position(point).z
    }

    /// Copies the sample, replacing its position. Any other data the sample carries is kept.
    fn with_position(point: &Self::Point, position: Point3<Self::Scalar>) -> Self::Point;

    /// Retrieve the `(width, height)` of a field.
    fn cloud_dimensions(cloud: &Self::Cloud) -> (usize, usize);

    /// Replaces every sample of the field with the output of `f`.
    fn map_cloud<F>(cloud: &mut Self::Cloud, f: F)
    where
        F: FnMut(&Self::Point) -> Self::Point;

    /// Retrieve the point where the viewing ray of the sample crosses the virtual image plane.
    ///
    /// Returns `None` for samples with a zero or non-finite depth.
    fn normalized(point: &Self::Point) -> Option<NormalizedPoint<Self::Scalar>> {
        NormalizedPoint::from_position(&Self::position(point))
    }
}

/// A point on the virtual image plane, which is the plane at a depth of `1.0` in front of the camera.
///
/// Every sample on the same viewing ray maps to the same normalized point, so this is the
/// coordinate that identifies "which pixel" a sample belongs to without needing the intrinsics
/// of the sensor.
#[derive(Debug, Clone, Copy, PartialEq, AsRef, Deref, From, Into)]
pub struct NormalizedPoint<T: RealField + Copy>(pub Point2<T>);

impl<T: RealField + Copy> NormalizedPoint<T> {
    /// Tries to convert a position in the camera frame into a [`NormalizedPoint`].
    ///
    /// This fails when the depth of the position is zero or is not finite.
    pub fn from_position(position: &Point3<T>) -> Option<Self> {
        let depth = position.z;
        if depth == nalgebra::zero() || !depth.is_finite() {
            return None;
        }
        Some(Self(Point2::new(position.x / depth, position.y / depth)))
    }

    /// Projects the normalized point out to the position with the given `depth`.
    pub fn with_depth(self, depth: T) -> Point3<T> {
        Point3::new(self.0.x * depth, self.0.y * depth, depth)
    }
}
