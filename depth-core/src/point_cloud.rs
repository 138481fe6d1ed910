use crate::{DepthRepresentation, RepresentationKind};
use core::fmt::Debug;
use core::marker::PhantomData;
use nalgebra::{Point3, RealField};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A point record stored in a [`PointCloud`].
///
/// Point records may carry more than a position (color, intensity, normals). Only the position is
/// visible to depth algorithms and everything else must be preserved by [`CloudPoint::with_xyz`].
pub trait CloudPoint: Clone + PartialEq + Debug + Send + Sync + 'static {
    type Scalar: RealField + Copy + Send + Sync;

    fn xyz(&self) -> Point3<Self::Scalar>;

    /// Copies the record, replacing its position.
    fn with_xyz(&self, xyz: Point3<Self::Scalar>) -> Self;
}

/// A bare 3d point. Invalid measurements are stored as `NaN` coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PointXYZ {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl PointXYZ {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// The point used for pixels without a valid measurement.
    pub fn nan() -> Self {
        Self::new(f32::NAN, f32::NAN, f32::NAN)
    }
}

impl From<Point3<f32>> for PointXYZ {
    fn from(point: Point3<f32>) -> Self {
        Self::new(point.x, point.y, point.z)
    }
}

impl CloudPoint for PointXYZ {
    type Scalar = f32;

    fn xyz(&self) -> Point3<f32> {
        Point3::new(self.x, self.y, self.z)
    }

    fn with_xyz(&self, xyz: Point3<f32>) -> Self {
        xyz.into()
    }
}

/// A 3d point with the color of the registered RGB pixel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PointXYZRGB {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rgb: [u8; 3],
}

impl PointXYZRGB {
    pub fn new(x: f32, y: f32, z: f32, rgb: [u8; 3]) -> Self {
        Self { x, y, z, rgb }
    }
}

impl CloudPoint for PointXYZRGB {
    type Scalar = f32;

    fn xyz(&self) -> Point3<f32> {
        Point3::new(self.x, self.y, self.z)
    }

    fn with_xyz(&self, xyz: Point3<f32>) -> Self {
        Self {
            x: xyz.x,
            y: xyz.y,
            z: xyz.z,
            ..*self
        }
    }
}

/// A cloud of point records.
///
/// Clouds coming straight from a depth sensor are organized: they keep the `width x height`
/// layout of the depth image and the record of pixel `(x, y)` is at index `y * width + x`.
/// Unorganized clouds have a `height` of `1`.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud<P> {
    width: usize,
    height: usize,
    points: Vec<P>,
}

impl<P: CloudPoint> PointCloud<P> {
    /// Creates an organized cloud, returning `None` if there are not `width * height` points.
    pub fn new(width: usize, height: usize, points: Vec<P>) -> Option<Self> {
        if width.checked_mul(height) != Some(points.len()) {
            return None;
        }
        Some(Self {
            width,
            height,
            points,
        })
    }

    /// Creates an unorganized cloud.
    pub fn unorganized(points: Vec<P>) -> Self {
        Self {
            width: points.len(),
            height: 1,
            points,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_organized(&self) -> bool {
        self.height > 1
    }

    /// Retrieve the record of pixel `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<&P> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.points.get(y * self.width + x)
    }

    pub fn points(&self) -> &[P] {
        &self.points
    }

    pub fn iter(&self) -> core::slice::Iter<'_, P> {
        self.points.iter()
    }

    pub fn into_points(self) -> Vec<P> {
        self.points
    }
}

impl<P: CloudPoint> FromIterator<P> for PointCloud<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::unorganized(iter.into_iter().collect())
    }
}

/// Point cloud depth backend.
///
/// Samples are point records of type `P` and fields are [`PointCloud`]s of them.
pub struct PointCloudDepth<P>(PhantomData<fn() -> P>);

impl<P> DepthRepresentation for PointCloudDepth<P>
where
    P: CloudPoint,
{
    type Scalar = P::Scalar;
    type Point = P;
    type Cloud = PointCloud<P>;

    const KIND: RepresentationKind = RepresentationKind::PointCloud;

    fn position(point: &P) -> Point3<P::Scalar> {
        point.xyz()
    }

    fn with_position(point: &P, position: Point3<P::Scalar>) -> P {
        point.with_xyz(position)
    }

    fn cloud_dimensions(cloud: &PointCloud<P>) -> (usize, usize) {
        (cloud.width, cloud.height)
    }

    fn map_cloud<F>(cloud: &mut PointCloud<P>, mut f: F)
    where
        F: FnMut(&P) -> P,
    {
        for point in &mut cloud.points {
            *point = f(point);
        }
    }
}
