use super::grid::split_index;
use super::{correct_along_ray, ImageDomain, PolynomialGrid, UndistortionModel};
use depth_core::nalgebra::{self, RealField};
use depth_core::{DepthRepresentation, NormalizedPoint};

/// Corrects every sample with the polynomial of the grid cell it falls into.
///
/// The [`ImageDomain`] is split into `cols x rows` equally sized cells and each cell has its own
/// polynomial of depth. A sample whose viewing ray leaves the domain is returned unchanged, it is
/// not clamped to the closest cell.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalPolynomialUndistortion<T: RealField + Copy, const N: usize> {
    domain: ImageDomain<T>,
    grid: PolynomialGrid<T, N>,
}

impl<T: RealField + Copy, const N: usize> LocalPolynomialUndistortion<T, N> {
    pub fn new(domain: ImageDomain<T>, grid: PolynomialGrid<T, N>) -> Self {
        Self { domain, grid }
    }

    pub fn domain(&self) -> &ImageDomain<T> {
        &self.domain
    }

    pub fn grid(&self) -> &PolynomialGrid<T, N> {
        &self.grid
    }

    /// Retrieve the `(col, row)` of the cell containing the normalized point.
    pub fn cell(&self, point: &NormalizedPoint<T>) -> Option<(usize, usize)> {
        if !self.domain.contains(point) {
            return None;
        }
        let relative = self.domain.relative(point);
        let cols: T = nalgebra::convert(self.grid.cols() as f64);
        let rows: T = nalgebra::convert(self.grid.rows() as f64);
        let (col, _) = split_index(relative.x * cols, self.grid.cols() - 1);
        let (row, _) = split_index(relative.y * rows, self.grid.rows() - 1);
        Some((col, row))
    }

    /// Checks whether the sample lies inside the calibrated domain.
    pub fn covers<R>(&self, point: &R::Point) -> bool
    where
        R: DepthRepresentation<Scalar = T>,
    {
        R::normalized(point).map_or(false, |normalized| self.domain.contains(&normalized))
    }

    fn corrected_depth(&self, point: &NormalizedPoint<T>, depth: T) -> Option<T> {
        match self.cell(point) {
            Some((col, row)) => Some(self.grid.at(col, row).evaluate(depth)),
            None => {
                log::trace!("sample outside of the local undistortion domain left uncorrected");
                None
            }
        }
    }
}

impl<R, const N: usize> UndistortionModel<R> for LocalPolynomialUndistortion<R::Scalar, N>
where
    R: DepthRepresentation,
{
    fn correct(&self, point: &R::Point) -> R::Point {
        correct_along_ray::<R, _>(point, |normalized, depth| {
            self.corrected_depth(normalized, depth)
        })
    }
}
