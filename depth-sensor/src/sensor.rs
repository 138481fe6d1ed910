use crate::{
    AnyUndistortionModel, DepthErrorFunction, NoUndistortion, Result, SharedUndistortionModel,
};
use depth_core::{DenseDepth, DepthRepresentation, PointCloudDepth};
use core::fmt;

/// A depth sensor as seen by a calibration pipeline.
///
/// It carries the undistortion model applied to raw samples before residuals are computed, and
/// the error function used to weight those residuals by the expected noise at each depth.
///
/// A new sensor has no undistortion (the shared [`NoUndistortion`] instance) and a zero error
/// function. The undistortion model is held through an [`Arc`](std::sync::Arc), so several
/// sensors can share a single model, and replacing the model of one sensor never affects the
/// others.
pub struct DepthSensor<R: DepthRepresentation> {
    undistortion_model: SharedUndistortionModel<R>,
    depth_error_function: DepthErrorFunction<R::Scalar>,
}

/// A [`DepthSensor`] producing dense fields.
pub type DenseDepthSensor<T> = DepthSensor<DenseDepth<T>>;

/// A [`DepthSensor`] producing point clouds.
pub type PointCloudDepthSensor<P> = DepthSensor<PointCloudDepth<P>>;

impl<R: DepthRepresentation> DepthSensor<R> {
    pub fn new() -> Self {
        Self {
            undistortion_model: NoUndistortion::shared(),
            depth_error_function: DepthErrorFunction::zero(),
        }
    }

    /// Builder-style setter for the undistortion model.
    #[must_use]
    pub fn with_undistortion_model(mut self, model: SharedUndistortionModel<R>) -> Self {
        self.undistortion_model = model;
        self
    }

    pub fn undistortion_model(&self) -> &SharedUndistortionModel<R> {
        &self.undistortion_model
    }

    pub fn set_undistortion_model(&mut self, model: SharedUndistortionModel<R>) {
        log::debug!("replacing {} undistortion model with {}", R::KIND, model.name());
        self.undistortion_model = model;
    }

    /// Attach a model whose representation is only known at runtime.
    ///
    /// Fails with [`Error::RepresentationMismatch`](crate::Error::RepresentationMismatch) if the
    /// model corrects another representation, in which case the current model stays attached.
    pub fn set_undistortion_model_any(&mut self, model: &AnyUndistortionModel) -> Result<()> {
        match model.downcast::<R>() {
            Ok(model) => {
                self.set_undistortion_model(model);
                Ok(())
            }
            Err(e) => {
                log::warn!("undistortion model rejected: {}", e);
                Err(e)
            }
        }
    }

    pub fn depth_error_function(&self) -> DepthErrorFunction<R::Scalar> {
        self.depth_error_function
    }

    /// Fails with [`Error::InvalidPolynomial`](crate::Error::InvalidPolynomial) if a coefficient
    /// is not finite, in which case the current function is kept.
    pub fn set_depth_error_function(
        &mut self,
        function: DepthErrorFunction<R::Scalar>,
    ) -> Result<()> {
        if let Err(e) = function.validate() {
            log::warn!("depth error function rejected: {}", e);
            return Err(e);
        }
        log::debug!("replacing depth error function with {:?}", function.coefficients());
        self.depth_error_function = function;
        Ok(())
    }

    /// Expected measurement error at the given depth.
    pub fn depth_error(&self, depth: R::Scalar) -> R::Scalar {
        self.depth_error_function.evaluate(depth)
    }

    pub fn correct(&self, point: &R::Point) -> R::Point {
        self.undistortion_model.correct(point)
    }

    pub fn correct_cloud(&self, cloud: &R::Cloud) -> R::Cloud {
        self.undistortion_model.correct_cloud(cloud)
    }

    pub fn correct_cloud_in_place(&self, cloud: &mut R::Cloud) {
        self.undistortion_model.correct_cloud_in_place(cloud)
    }
}

impl<R: DepthRepresentation> Default for DepthSensor<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: DepthRepresentation> Clone for DepthSensor<R> {
    fn clone(&self) -> Self {
        Self {
            undistortion_model: self.undistortion_model.clone(),
            depth_error_function: self.depth_error_function,
        }
    }
}

impl<R: DepthRepresentation> fmt::Debug for DepthSensor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DepthSensor")
            .field("representation", &R::KIND)
            .field("undistortion_model", &self.undistortion_model)
            .field("depth_error_function", &self.depth_error_function)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Polynomial, PolynomialUndistortion};
    use depth_core::nalgebra::Point3;
    use depth_core::{DenseCloud, PointCloud, PointXYZ, PointXYZRGB, RepresentationKind};
    use float_eq::assert_float_eq;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn scaling(factor: f64) -> SharedUndistortionModel<DenseDepth<f64>> {
        Arc::new(PolynomialUndistortion::new(Polynomial::from_coefficients([0.0, factor])).unwrap())
    }

    #[test]
    fn new_sensor_has_no_undistortion() {
        let sensor = DenseDepthSensor::<f64>::new();
        let point = Point3::new(0.3, -0.4, 2.5);
        assert_eq!(sensor.undistortion_model().correct(&point), point);
        assert!(Arc::ptr_eq(
            sensor.undistortion_model(),
            &NoUndistortion::shared::<DenseDepth<f64>>()
        ));
    }

    #[test]
    fn new_sensor_has_zero_depth_error() {
        let sensor = PointCloudDepthSensor::<PointXYZ>::default();
        for &depth in &[0.0, 0.5, 3.0, 1e4] {
            assert_eq!(sensor.depth_error_function().evaluate(depth), 0.0);
            assert_eq!(sensor.depth_error(depth), 0.0);
        }
    }

    #[test]
    fn undistortion_model_roundtrip() {
        let model = scaling(1.01);
        let mut sensor = DenseDepthSensor::new();
        sensor.set_undistortion_model(model.clone());
        assert!(Arc::ptr_eq(sensor.undistortion_model(), &model));

        let sensor = DenseDepthSensor::new().with_undistortion_model(model.clone());
        assert!(Arc::ptr_eq(sensor.undistortion_model(), &model));
    }

    #[test]
    fn depth_error_function_roundtrip() {
        let mut sensor = DenseDepthSensor::<f64>::new();
        let function = DepthErrorFunction::from_coefficients([1.0, 2.0, 0.5]);
        sensor.set_depth_error_function(function).unwrap();
        assert_eq!(sensor.depth_error_function(), function);
        assert_eq!(sensor.depth_error(2.0), 7.0);
    }

    #[test]
    fn rejected_depth_error_function_is_not_applied() {
        let mut sensor = DenseDepthSensor::<f64>::new();
        let function = DepthErrorFunction::from_coefficients([0.001, 0.0, 0.002]);
        sensor.set_depth_error_function(function).unwrap();
        assert_eq!(
            sensor.set_depth_error_function(DepthErrorFunction::from_coefficients([
                0.0,
                f64::NAN,
                0.0
            ])),
            Err(Error::InvalidPolynomial { index: 1 })
        );
        assert_eq!(sensor.depth_error_function(), function);
    }

    #[test]
    fn mismatched_model_is_rejected() {
        let mut sensor = DenseDepthSensor::<f32>::new();
        let previous = sensor.undistortion_model().clone();
        let model =
            AnyUndistortionModel::new(NoUndistortion::shared::<PointCloudDepth<PointXYZRGB>>());

        match sensor.set_undistortion_model_any(&model) {
            Err(Error::RepresentationMismatch {
                expected_kind: RepresentationKind::Dense,
                found_kind: RepresentationKind::PointCloud,
                ..
            }) => {}
            other => panic!("unexpected result {:?}", other),
        }
        assert!(Arc::ptr_eq(sensor.undistortion_model(), &previous));
    }

    #[test]
    fn matching_model_is_attached() {
        let mut sensor = DenseDepthSensor::<f64>::new();
        let model = scaling(2.0);
        sensor
            .set_undistortion_model_any(&AnyUndistortionModel::new(model.clone()))
            .unwrap();
        assert!(Arc::ptr_eq(sensor.undistortion_model(), &model));
    }

    #[test]
    fn identity_is_exact_on_both_backends() {
        let dense = DenseDepthSensor::<f64>::new();
        let cloud = DenseCloud::from_fn(6, 4, |x, y| {
            Point3::new(x as f64 * 0.1, y as f64 * -0.3, 0.7 + x as f64)
        });
        assert_eq!(dense.correct_cloud(&cloud), cloud);
        let mut in_place = cloud.clone();
        dense.correct_cloud_in_place(&mut in_place);
        assert_eq!(in_place, cloud);

        let points = PointCloudDepthSensor::<PointXYZRGB>::new();
        let cloud: PointCloud<_> = (0..10)
            .map(|i| PointXYZRGB::new(i as f32, -(i as f32), 1.0 + i as f32, [i as u8, 0, 255]))
            .collect();
        for point in cloud.iter() {
            assert_eq!(&points.correct(point), point);
        }
        assert_eq!(points.correct_cloud(&cloud), cloud);
    }

    #[test]
    fn sharing_a_model() {
        let shared = scaling(1.5);
        let mut first = DenseDepthSensor::new().with_undistortion_model(shared.clone());
        let second = DenseDepthSensor::new().with_undistortion_model(shared.clone());

        first.set_undistortion_model(scaling(0.5));
        assert!(Arc::ptr_eq(second.undistortion_model(), &shared));
        assert_eq!(second.correct(&Point3::new(0.0, 0.0, 2.0)).z, 3.0);
        assert_eq!(first.correct(&Point3::new(0.0, 0.0, 2.0)).z, 1.0);
    }

    #[test]
    fn sharing_a_model_across_threads() {
        let shared = scaling(1.25);
        let sensors: Vec<_> = (0..4)
            .map(|_| DenseDepthSensor::new().with_undistortion_model(shared.clone()))
            .collect();
        std::thread::scope(|scope| {
            for sensor in &sensors {
                scope.spawn(move || {
                    let cloud = DenseCloud::from_element(16, 16, Point3::new(0.0, 0.0, 4.0));
                    let corrected = sensor.correct_cloud(&cloud);
                    assert!(corrected.iter().all(|p| p.z == 5.0));
                });
            }
        });
        assert_eq!(Arc::strong_count(&shared), 5);
    }

    proptest! {
        #[test]
        fn depth_error_is_horner_evaluation(
            c0 in -1.0f64..1.0,
            c1 in -1.0f64..1.0,
            c2 in -1.0f64..1.0,
            depth in 0.0f64..10.0,
        ) {
            let mut sensor = DenseDepthSensor::new();
            let function = DepthErrorFunction::from_coefficients([c0, c1, c2]);
            sensor.set_depth_error_function(function).unwrap();
            // Horner order is the reference evaluation, so results are bit-exact.
            let expected = (c2 * depth + c1) * depth + c0;
            assert_eq!(sensor.depth_error(depth), expected);
            assert_float_eq!(expected, c0 + c1 * depth + c2 * depth * depth, abs <= 1e-10);
        }
    }
}
