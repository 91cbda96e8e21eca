use crate::error::ControllerError;

/// Feedback controller capability.
///
/// A controller maps the current error vector to a control vector. The
/// episode loop reads only the first output element, but controllers may
/// return more. Implementations are free to keep internal state, which is
/// why [`activate`] takes `&mut self`.
///
/// [`activate`]: Controller::activate
pub trait Controller {
    /// Compute the control vector for `inputs`.
    ///
    /// # Errors
    ///
    /// Any error aborts the episode that invoked the controller.
    fn activate(&mut self, inputs: &[f64]) -> Result<Vec<f64>, ControllerError>;
}

impl<C: Controller + ?Sized> Controller for &mut C {
    fn activate(&mut self, inputs: &[f64]) -> Result<Vec<f64>, ControllerError> {
        (**self).activate(inputs)
    }
}

/// Produces a fresh controller inside an evaluation worker.
///
/// Batches carry factories rather than live controllers, so every episode
/// starts from its own instance and construction failures stay local to the
/// task that caused them.
pub trait ControllerFactory: Send + Sync {
    type Controller: Controller;

    /// # Errors
    ///
    /// Returns an error if the representation cannot be turned into a
    /// working controller.
    fn build(&self) -> Result<Self::Controller, ControllerError>;
}

/// Always emits the same control vector.
#[derive(Clone, Debug, PartialEq)]
pub struct Constant(pub Vec<f64>);

impl Constant {
    /// Single-output controller returning `value` on every tick.
    #[must_use]
    pub fn scalar(value: f64) -> Self {
        Self(vec![value])
    }
}

impl Controller for Constant {
    fn activate(&mut self, _inputs: &[f64]) -> Result<Vec<f64>, ControllerError> {
        Ok(self.0.clone())
    }
}

impl ControllerFactory for Constant {
    type Controller = Self;

    fn build(&self) -> Result<Self, ControllerError> {
        Ok(self.clone())
    }
}

/// Adapts a closure into a [`Controller`].
#[derive(Clone)]
pub struct FnController<F>(pub F);

/// Wrap `f` as a controller.
#[must_use]
pub fn from_fn<F>(f: F) -> FnController<F>
where
    F: FnMut(&[f64]) -> Result<Vec<f64>, ControllerError>,
{
    FnController(f)
}

impl<F> Controller for FnController<F>
where
    F: FnMut(&[f64]) -> Result<Vec<f64>, ControllerError>,
{
    fn activate(&mut self, inputs: &[f64]) -> Result<Vec<f64>, ControllerError> {
        (self.0)(inputs)
    }
}

impl<F> ControllerFactory for FnController<F>
where
    F: FnMut(&[f64]) -> Result<Vec<f64>, ControllerError> + Clone + Send + Sync,
{
    type Controller = Self;

    fn build(&self) -> Result<Self, ControllerError> {
        Ok(self.clone())
    }
}
