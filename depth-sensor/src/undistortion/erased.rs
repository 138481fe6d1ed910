use super::{SharedUndistortionModel, UndistortionModel};
use crate::{Error, Result};
use depth_core::{DepthRepresentation, RepresentationKind};
use core::any::{type_name, Any};
use core::fmt;
use std::sync::Arc;

/// An undistortion model whose representation is only known at runtime.
///
/// Models built from configuration or kept in a heterogeneous cache are passed around as
/// `AnyUndistortionModel`. The representation is checked once, when the model is attached to a
/// sensor with [`DepthSensor::set_undistortion_model_any`](crate::DepthSensor::set_undistortion_model_any)
/// or taken out with [`AnyUndistortionModel::downcast`], and never per sample.
#[derive(Clone)]
pub struct AnyUndistortionModel {
    kind: RepresentationKind,
    representation: &'static str,
    model: Arc<dyn Any + Send + Sync>,
}

impl AnyUndistortionModel {
    pub fn new<R: DepthRepresentation>(model: SharedUndistortionModel<R>) -> Self {
        Self {
            kind: R::KIND,
            representation: type_name::<R>(),
            model: Arc::new(model),
        }
    }

    pub fn from_model<R, M>(model: M) -> Self
    where
        R: DepthRepresentation,
        M: UndistortionModel<R> + 'static,
    {
        Self::new::<R>(Arc::new(model))
    }

    /// The kind of representation the model corrects.
    pub fn kind(&self) -> RepresentationKind {
        self.kind
    }

    /// Name of the representation type the model corrects.
    pub fn representation(&self) -> &'static str {
        self.representation
    }

    pub fn is<R: DepthRepresentation>(&self) -> bool {
        self.model.is::<SharedUndistortionModel<R>>()
    }

    /// Retrieve the model as a model of `R`.
    ///
    /// Fails with [`Error::RepresentationMismatch`] if the model corrects another representation.
    pub fn downcast<R: DepthRepresentation>(&self) -> Result<SharedUndistortionModel<R>> {
        self.model
            .downcast_ref::<SharedUndistortionModel<R>>()
            .cloned()
            .ok_or(Error::RepresentationMismatch {
                expected: type_name::<R>(),
                expected_kind: R::KIND,
                found: self.representation,
                found_kind: self.kind,
            })
    }
}

impl fmt::Debug for AnyUndistortionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyUndistortionModel")
            .field("kind", &self.kind)
            .field("representation", &self.representation)
            .finish_non_exhaustive()
    }
}

impl<R: DepthRepresentation> From<SharedUndistortionModel<R>> for AnyUndistortionModel {
    fn from(model: SharedUndistortionModel<R>) -> Self {
        Self::new(model)
    }
}
