use ml::ControllerError;
use physics::PhysicsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvaluationError {
    /// Invalid topology, setpoint or constants. Aborts a whole batch.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// The worker pool could not be created. Aborts a whole batch.
    #[error("worker pool unavailable: {0}")]
    Pool(String),
    #[error("controller failed: {0}")]
    Controller(#[from] ControllerError),
    #[error("integrator failed: {0}")]
    Physics(#[from] PhysicsError),
    #[error("controller panicked: {0}")]
    Panicked(String),
}

impl EvaluationError {
    /// Whether the error invalidates the whole batch rather than one episode.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Pool(_))
    }
}
