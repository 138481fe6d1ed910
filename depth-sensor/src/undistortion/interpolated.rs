use super::grid::split_index;
use super::{correct_along_ray, ImageDomain, PolynomialGrid, UndistortionModel};
use crate::{Error, Result};
use depth_core::nalgebra::{self, Point2, RealField};
use depth_core::{DepthRepresentation, NormalizedPoint};

/// Corrects every sample with a bilinear blend of the polynomials of the four surrounding nodes.
///
/// The nodes of the grid sit on a regular lattice over the [`ImageDomain`], with the outer nodes
/// exactly on its border. For a sample between nodes `p00`, `p10`, `p01` and `p11` at fractional
/// position `(u, v)`:
///
/// $$
/// d' = (1 - v) \big((1 - u) p_{00}(d) + u p_{10}(d)\big) + v \big((1 - u) p_{01}(d) + u p_{11}(d)\big)
/// $$
///
/// A sample whose viewing ray leaves the domain is returned unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedUndistortion<T: RealField + Copy, const N: usize> {
    domain: ImageDomain<T>,
    grid: PolynomialGrid<T, N>,
}

impl<T: RealField + Copy, const N: usize> InterpolatedUndistortion<T, N> {
    /// Fails with [`Error::InvalidGrid`] when the grid has fewer than 2x2 nodes.
    pub fn new(domain: ImageDomain<T>, grid: PolynomialGrid<T, N>) -> Result<Self> {
        if grid.cols() < 2 || grid.rows() < 2 {
            return Err(Error::InvalidGrid {
                cols: grid.cols(),
                rows: grid.rows(),
                reason: "interpolation needs at least 2x2 nodes",
            });
        }
        Ok(Self { domain, grid })
    }

    pub fn domain(&self) -> &ImageDomain<T> {
        &self.domain
    }

    pub fn grid(&self) -> &PolynomialGrid<T, N> {
        &self.grid
    }

    /// Position of a node on the virtual image plane.
    pub fn node(&self, col: usize, row: usize) -> Option<NormalizedPoint<T>> {
        if col >= self.grid.cols() || row >= self.grid.rows() {
            return None;
        }
        let fraction = |index: usize, count: usize| -> T {
            let index: T = nalgebra::convert(index as f64);
            let last: T = nalgebra::convert((count - 1) as f64);
            index / last
        };
        let extent = self.domain.max() - self.domain.min();
        let min = self.domain.min();
        Some(NormalizedPoint(Point2::new(
            min.x + extent.x * fraction(col, self.grid.cols()),
            min.y + extent.y * fraction(row, self.grid.rows()),
        )))
    }

    /// Checks whether the sample lies inside the calibrated domain.
    pub fn covers<R>(&self, point: &R::Point) -> bool
    where
        R: DepthRepresentation<Scalar = T>,
    {
        R::normalized(point).map_or(false, |normalized| self.domain.contains(&normalized))
    }

    fn corrected_depth(&self, point: &NormalizedPoint<T>, depth: T) -> Option<T> {
        if !self.domain.contains(point) {
            log::trace!("sample outside of the interpolation domain left uncorrected");
            return None;
        }
        let relative = self.domain.relative(point);
        let cols = self.grid.cols();
        let rows = self.grid.rows();
        let (col, u) = split_index(
            relative.x * nalgebra::convert::<f64, T>((cols - 1) as f64),
            cols - 2,
        );
        let (row, v) = split_index(
            relative.y * nalgebra::convert::<f64, T>((rows - 1) as f64),
            rows - 2,
        );

        let one: T = nalgebra::one();
        let blend = |row: usize| {
            self.grid.at(col, row).evaluate(depth) * (one - u)
                + self.grid.at(col + 1, row).evaluate(depth) * u
        };
        Some(blend(row) * (one - v) + blend(row + 1) * v)
    }
}

impl<R, const N: usize> UndistortionModel<R> for InterpolatedUndistortion<R::Scalar, N>
where
    R: DepthRepresentation,
{
    fn correct(&self, point: &R::Point) -> R::Point {
        correct_along_ray::<R, _>(point, |normalized, depth| {
            self.corrected_depth(normalized, depth)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Polynomial, PolynomialUndistortion};
    use depth_core::nalgebra::Point3;
    use depth_core::{DenseCloud, DenseDepth, PointCloud, PointCloudDepth, PointXYZ};
    use float_eq::assert_float_eq;

    fn unit_domain() -> ImageDomain<f64> {
        ImageDomain::new(Point2::new(-1.0, -1.0), Point2::new(1.0, 1.0)).unwrap()
    }

    /// Identity on the left column of nodes, `2 d` on the right one.
    fn left_right() -> InterpolatedUndistortion<f64, 2> {
        let identity = Polynomial::identity();
        let double = Polynomial::from_coefficients([0.0, 2.0]);
        let grid = PolynomialGrid::new(2, 2, vec![identity, double, identity, double]).unwrap();
        InterpolatedUndistortion::new(unit_domain(), grid).unwrap()
    }

    fn correct<M>(model: &M, point: Point3<f64>) -> Point3<f64>
    where
        M: UndistortionModel<DenseDepth<f64>>,
    {
        model.correct(&point)
    }

    #[test]
    fn needs_two_by_two_nodes() {
        let grid = PolynomialGrid::<f64, 3>::identity(1, 4).unwrap();
        assert!(matches!(
            InterpolatedUndistortion::new(unit_domain(), grid),
            Err(Error::InvalidGrid { cols: 1, rows: 4, .. })
        ));
    }

    #[test]
    fn nodes_lie_on_the_domain_border() {
        let model = left_right();
        assert_eq!(model.node(0, 0).map(|n| n.0), Some(Point2::new(-1.0, -1.0)));
        assert_eq!(model.node(1, 1).map(|n| n.0), Some(Point2::new(1.0, 1.0)));
        assert!(model.node(2, 0).is_none());
    }

    #[test]
    fn exact_on_nodes() {
        let polynomials = (0..9)
            .map(|i| Polynomial::from_coefficients([0.01 * i as f64, 1.0, 0.001]))
            .collect();
        let grid = PolynomialGrid::new(3, 3, polynomials).unwrap();
        let domain = ImageDomain::new(Point2::new(0.0, 0.0), Point2::new(2.0, 2.0)).unwrap();
        let model = InterpolatedUndistortion::new(domain, grid.clone()).unwrap();

        for row in 0..3 {
            for col in 0..3 {
                let node = model.node(col, row).unwrap();
                let depth = 2.0;
                let corrected = correct(&model, node.with_depth(depth));
                let expected = grid.get(col, row).unwrap().evaluate(depth);
                assert_float_eq!(corrected.z, expected, ulps <= 1);
            }
        }
    }

    #[test]
    fn blends_between_nodes() {
        let model = left_right();
        assert_eq!(correct(&model, Point3::new(-2.0, 0.0, 2.0)).z, 2.0);
        assert_eq!(correct(&model, Point3::new(0.0, 0.0, 2.0)).z, 3.0);
        assert_eq!(correct(&model, Point3::new(2.0, 0.0, 2.0)).z, 4.0);
        assert_eq!(correct(&model, Point3::new(1.0, 1.0, 2.0)).z, 3.5);
    }

    #[test]
    fn constant_grid_matches_global_polynomial() {
        let polynomial = Polynomial::from_coefficients([0.02, 0.97, 0.004]);
        let grid = PolynomialGrid::from_element(4, 3, polynomial).unwrap();
        let interpolated = InterpolatedUndistortion::new(unit_domain(), grid).unwrap();
        let global = PolynomialUndistortion::new(polynomial).unwrap();

        let cloud = DenseCloud::from_fn(9, 7, |x, y| {
            Point3::new(0.2 * x as f64 - 0.8, 0.3 * y as f64 - 0.9, 1.0 + 0.1 * x as f64)
        });
        let a = UndistortionModel::<DenseDepth<f64>>::correct_cloud(&interpolated, &cloud);
        let b = UndistortionModel::<DenseDepth<f64>>::correct_cloud(&global, &cloud);
        for (a, b) in a.iter().zip(b.iter()) {
            assert_float_eq!(a.z, b.z, rmax <= 1e-12);
        }
    }

    #[test]
    fn outside_the_domain_is_identity() {
        let model = left_right();
        let outside = Point3::new(3.0, 0.0, 2.0);
        assert!(!model.covers::<DenseDepth<f64>>(&outside));
        assert!(model.covers::<DenseDepth<f64>>(&Point3::new(2.0, 2.0, 2.0)));
        assert_eq!(correct(&model, outside), outside);
    }

    #[test]
    fn corrects_point_clouds() {
        let identity = Polynomial::identity();
        let double = Polynomial::from_coefficients([0.0f32, 2.0]);
        let grid = PolynomialGrid::new(2, 2, vec![identity, double, identity, double]).unwrap();
        let domain = ImageDomain::new(Point2::new(-1.0f32, -1.0), Point2::new(1.0, 1.0)).unwrap();
        let model = InterpolatedUndistortion::new(domain, grid).unwrap();

        let cloud = PointCloud::unorganized(vec![
            PointXYZ::new(2.0, 0.0, 2.0),
            PointXYZ::nan(),
            PointXYZ::new(9.0, 0.0, 1.0),
        ]);
        let corrected =
            UndistortionModel::<PointCloudDepth<PointXYZ>>::correct_cloud(&model, &cloud);
        assert_eq!(corrected.points()[0], PointXYZ::new(4.0, 0.0, 4.0));
        assert!(corrected.points()[1].z.is_nan());
        assert_eq!(corrected.points()[2], PointXYZ::new(9.0, 0.0, 1.0));
    }
}
