use serde::{Deserialize, Serialize};

use crate::controller::{Controller, ControllerFactory};
use crate::error::ControllerError;

/// A fully connected neural network layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dense {
    /// Row-major `out_dim x in_dim` weight matrix.
    pub weights: Vec<f64>,
    /// The bias vector for the layer.
    pub bias: Vec<f64>,
    /// The number of input dimensions.
    pub in_dim: usize,
    /// The number of output dimensions.
    pub out_dim: usize,
}

impl Dense {
    /// Creates a new `Dense` layer with the given weights and biases.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Shape`] if the buffers do not match the
    /// requested dimensions.
    pub fn new(weights: Vec<f64>, bias: Vec<f64>, in_dim: usize, out_dim: usize) -> Result<Self, ControllerError> {
        let layer = Self {
            weights,
            bias,
            in_dim,
            out_dim,
        };
        layer.check()?;
        Ok(layer)
    }

    /// Glorot-uniform weights, zero bias.
    #[must_use]
    pub fn random(in_dim: usize, out_dim: usize, rng: &mut fastrand::Rng) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let limit = (6.0 / (in_dim + out_dim).max(1) as f64).sqrt();
        let weights = (0..in_dim * out_dim)
            .map(|_| rng.f64() * 2.0 * limit - limit)
            .collect();
        Self {
            weights,
            bias: vec![0.0; out_dim],
            in_dim,
            out_dim,
        }
    }

    fn check(&self) -> Result<(), ControllerError> {
        if self.in_dim == 0 || self.out_dim == 0 {
            return Err(ControllerError::Shape("layer dimensions must be non-zero".into()));
        }
        if self.weights.len() != self.in_dim * self.out_dim {
            return Err(ControllerError::Shape(format!(
                "{} weights for a {}x{} layer",
                self.weights.len(),
                self.out_dim,
                self.in_dim
            )));
        }
        if self.bias.len() != self.out_dim {
            return Err(ControllerError::Shape(format!(
                "{} biases for {} outputs",
                self.bias.len(),
                self.out_dim
            )));
        }
        Ok(())
    }

    /// Affine map `W x + b`; no activation.
    #[must_use]
    pub fn forward(&self, x: &[f64]) -> Vec<f64> {
        self.weights
            .chunks_exact(self.in_dim.max(1))
            .zip(&self.bias)
            .map(|(row, b)| row.iter().zip(x).map(|(w, xi)| w * xi).sum::<f64>() + b)
            .collect()
    }
}

/// Layered feed-forward network with `tanh` on every layer.
///
/// Outputs are therefore bounded to `[-1, 1]`, which the episode loop scales
/// into a cart force.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedForward {
    layers: Vec<Dense>,
}

impl FeedForward {
    /// # Errors
    ///
    /// Returns [`ControllerError::Shape`] if there are no layers, a layer is
    /// malformed, or consecutive layers disagree on their shared dimension.
    pub fn new(layers: Vec<Dense>) -> Result<Self, ControllerError> {
        if layers.is_empty() {
            return Err(ControllerError::Shape("network needs at least one layer".into()));
        }
        for layer in &layers {
            layer.check()?;
        }
        for (i, pair) in layers.windows(2).enumerate() {
            if pair[0].out_dim != pair[1].in_dim {
                return Err(ControllerError::Shape(format!(
                    "layer {i} emits {} values but layer {} takes {}",
                    pair[0].out_dim,
                    i + 1,
                    pair[1].in_dim
                )));
            }
        }
        Ok(Self { layers })
    }

    /// Random network with the given layer sizes, inputs first.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Shape`] for fewer than two sizes or a
    /// zero-sized layer.
    pub fn random(sizes: &[usize], rng: &mut fastrand::Rng) -> Result<Self, ControllerError> {
        if sizes.len() < 2 {
            return Err(ControllerError::Shape("need input and output sizes".into()));
        }
        let layers = sizes
            .windows(2)
            .map(|pair| Dense::random(pair[0], pair[1], rng))
            .collect();
        Self::new(layers)
    }

    #[must_use]
    pub fn layers(&self) -> &[Dense] {
        &self.layers
    }

    #[must_use]
    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |layer| layer.in_dim)
    }

    #[must_use]
    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |layer| layer.out_dim)
    }

    /// Evaluate the network on one input vector.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::InputSize`] for a wrongly sized input.
    pub fn forward(&self, inputs: &[f64]) -> Result<Vec<f64>, ControllerError> {
        if inputs.len() != self.input_size() {
            return Err(ControllerError::InputSize {
                expected: self.input_size(),
                actual: inputs.len(),
            });
        }
        let mut x = inputs.to_vec();
        for layer in &self.layers {
            x = layer.forward(&x);
            x.iter_mut().for_each(|v| *v = v.tanh());
        }
        Ok(x)
    }
}

impl Controller for FeedForward {
    fn activate(&mut self, inputs: &[f64]) -> Result<Vec<f64>, ControllerError> {
        self.forward(inputs)
    }
}

impl ControllerFactory for FeedForward {
    type Controller = Self;

    fn build(&self) -> Result<Self, ControllerError> {
        Ok(self.clone())
    }
}
