use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// A body left the finite range after a step.
    #[error("body {body} diverged to a non-finite state at step {step}")]
    Diverged { body: usize, step: u64 },
    #[error("unknown body index {0}")]
    UnknownBody(usize),
    #[error("timestep must be finite and positive, got {0}")]
    InvalidTimestep(f64),
    #[error("invalid body: {0}")]
    InvalidBody(&'static str),
    #[error("{topology} expects {expected} links, got {actual}")]
    LinkCount {
        topology: &'static str,
        expected: usize,
        actual: usize,
    },
}
