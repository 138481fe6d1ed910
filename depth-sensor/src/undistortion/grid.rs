use crate::{Error, Polynomial, Result};
use depth_core::nalgebra::{self, Point2, RealField, Vector2};
use depth_core::{DepthIntrinsics, NormalizedPoint};

/// A rectangle on the virtual image plane that a calibration grid is laid over.
///
/// Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageDomain<T: RealField + Copy> {
    min: Point2<T>,
    max: Point2<T>,
}

impl<T: RealField + Copy> ImageDomain<T> {
    pub fn new(min: Point2<T>, max: Point2<T>) -> Result<Self> {
        let finite = min.coords.iter().chain(max.coords.iter()).all(|v| v.is_finite());
        if !finite || min.x >= max.x || min.y >= max.y {
            return Err(Error::InvalidDomain);
        }
        Ok(Self { min, max })
    }

    /// The domain covered by a `width x height` depth image.
    ///
    /// Pixel centers lie on integer coordinates, so the domain extends half a pixel past the
    /// first and last pixel centers.
    pub fn from_image(
        intrinsics: &DepthIntrinsics<T>,
        width: usize,
        height: usize,
    ) -> Result<Self> {
        let half: T = nalgebra::convert(0.5);
        let min = intrinsics.normalize(Point2::new(-half, -half));
        let max = intrinsics.normalize(Point2::new(
            nalgebra::convert::<f64, T>(width as f64) - half,
            nalgebra::convert::<f64, T>(height as f64) - half,
        ));
        Self::new(min.0, max.0)
    }

    pub fn min(&self) -> Point2<T> {
        self.min
    }

    pub fn max(&self) -> Point2<T> {
        self.max
    }

    pub fn contains(&self, point: &NormalizedPoint<T>) -> bool {
        let NormalizedPoint(point) = *point;
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Position of the point relative to the domain, `(0, 0)` at `min` and `(1, 1)` at `max`.
    pub fn relative(&self, point: &NormalizedPoint<T>) -> Vector2<T> {
        (point.0 - self.min).component_div(&(self.max - self.min))
    }
}

/// A `cols x rows` arrangement of polynomials, stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialGrid<T: RealField + Copy, const N: usize> {
    cols: usize,
    rows: usize,
    polynomials: Vec<Polynomial<T, N>>,
}

impl<T: RealField + Copy, const N: usize> PolynomialGrid<T, N> {
    /// Fails if the grid is empty, if there are not `cols * rows` polynomials, or if a
    /// polynomial has a coefficient that is not finite.
    pub fn new(cols: usize, rows: usize, polynomials: Vec<Polynomial<T, N>>) -> Result<Self> {
        if cols == 0 || rows == 0 {
            return Err(Error::InvalidGrid {
                cols,
                rows,
                reason: "the grid is empty",
            });
        }
        let size = cols.checked_mul(rows).ok_or(Error::InvalidGrid {
            cols,
            rows,
            reason: "grid size overflows",
        })?;
        if polynomials.len() != size {
            return Err(Error::InvalidGrid {
                cols,
                rows,
                reason: "the number of polynomials does not match the grid size",
            });
        }
        for polynomial in &polynomials {
            polynomial.validate()?;
        }
        Ok(Self {
            cols,
            rows,
            polynomials,
        })
    }

    pub fn from_element(cols: usize, rows: usize, polynomial: Polynomial<T, N>) -> Result<Self> {
        let size = cols.checked_mul(rows).ok_or(Error::InvalidGrid {
            cols,
            rows,
            reason: "grid size overflows",
        })?;
        Self::new(cols, rows, vec![polynomial; size])
    }

    /// A grid where every polynomial is the identity.
    pub fn identity(cols: usize, rows: usize) -> Result<Self> {
        Self::from_element(cols, rows, Polynomial::identity())
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn get(&self, col: usize, row: usize) -> Option<&Polynomial<T, N>> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.polynomials.get(row * self.cols + col)
    }

    pub fn polynomials(&self) -> &[Polynomial<T, N>] {
        &self.polynomials
    }

    pub(crate) fn at(&self, col: usize, row: usize) -> &Polynomial<T, N> {
        &self.polynomials[row * self.cols + col]
    }
}

/// Splits a coordinate in `[0, extent]` into an integer index in `[0, last]` and the remainder.
pub(crate) fn split_index<T: RealField + Copy>(coordinate: T, last: usize) -> (usize, T) {
    let floor = coordinate.floor();
    let index = nalgebra::try_convert::<T, f64>(floor)
        .map(|f| f.max(0.0) as usize)
        .unwrap_or(0)
        .min(last);
    let fraction = coordinate - nalgebra::convert::<f64, T>(index as f64);
    (index, fraction)
}
