use crate::{DepthIntrinsics, DepthRepresentation, RepresentationKind};
use core::marker::PhantomData;
use nalgebra::{DMatrix, Matrix3xX, Point2, Point3, RealField};

/// Dense depth backend.
///
/// Samples are plain [`Point3`] positions and fields are [`DenseCloud`]s.
pub struct DenseDepth<T>(PhantomData<fn() -> T>);

impl<T> DepthRepresentation for DenseDepth<T>
where
    T: RealField + Copy,
{
    type Scalar = T;
    type Point = Point3<T>;
    type Cloud = DenseCloud<T>;

    const KIND: RepresentationKind = RepresentationKind::Dense;

    fn position(point: &Point3<T>) -> Point3<T> {
        *point
    }

    fn with_position(_: &Point3<T>, position: Point3<T>) -> Point3<T> {
        position
    }

    fn cloud_dimensions(cloud: &DenseCloud<T>) -> (usize, usize) {
        (cloud.width, cloud.height)
    }

    fn map_cloud<F>(cloud: &mut DenseCloud<T>, mut f: F)
    where
        F: FnMut(&Point3<T>) -> Point3<T>,
    {
        for index in 0..cloud.points.ncols() {
            let point = Point3::from(cloud.points.column(index).into_owned());
            cloud.points.set_column(index, &f(&point).coords);
        }
    }
}

/// An organized field of 3d points stored column-wise in a `3 x (width * height)` matrix.
///
/// The point of pixel `(x, y)` is stored in column `y * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseCloud<T: RealField + Copy> {
    width: usize,
    height: usize,
    points: Matrix3xX<T>,
}

impl<T: RealField + Copy> DenseCloud<T> {
    /// Wraps a point matrix, returning `None` if it does not have `width * height` columns.
    pub fn new(width: usize, height: usize, points: Matrix3xX<T>) -> Option<Self> {
        if width.checked_mul(height) != Some(points.ncols()) {
            return None;
        }
        Some(Self {
            width,
            height,
            points,
        })
    }

    pub fn from_element(width: usize, height: usize, point: Point3<T>) -> Self {
        Self::from_fn(width, height, |_, _| point)
    }

    /// Creates a field by calling `f(x, y)` for every pixel.
    ///
    /// Panics if `width * height` overflows.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> Point3<T>,
    ) -> Self {
        let mut points = Matrix3xX::zeros(width * height);
        for y in 0..height {
            for x in 0..width {
                points.set_column(y * width + x, &f(x, y).coords);
            }
        }
        Self {
            width,
            height,
            points,
        }
    }

    /// Unprojects a depth image (`height` rows by `width` columns) into a field of points.
    pub fn from_depth_image(depth: &DMatrix<T>, intrinsics: &DepthIntrinsics<T>) -> Self {
        Self::from_fn(depth.ncols(), depth.nrows(), |x, y| {
            let pixel = Point2::new(nalgebra::convert(x as f64), nalgebra::convert(y as f64));
            intrinsics.unproject(pixel, depth[(y, x)])
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.points.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.points.ncols() == 0
    }

    /// Retrieve the point of pixel `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<Point3<T>> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(Point3::from(
            self.points.column(y * self.width + x).into_owned(),
        ))
    }

    /// Retrieve the underlying point matrix.
    pub fn points(&self) -> &Matrix3xX<T> {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = Point3<T>> + '_ {
        self.points
            .column_iter()
            .map(|column| Point3::from(column.into_owned()))
    }

    /// Extracts the depth (Z) component of every point as a `height x width` image.
    pub fn depth_image(&self) -> DMatrix<T> {
        DMatrix::from_fn(self.height, self.width, |y, x| {
            self.points[(2, y * self.width + x)]
        })
    }
}
