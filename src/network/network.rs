use rand::Rng;
use tracing::{info, trace};

use crate::activation::activation::ActivationFunction;
use crate::error::Result;
use crate::layers::dense::{Layer, LayerGradients};
use crate::loss::loss_type::LossType;
use crate::math::matrix::Matrix;
use crate::math::shape::expect_row_of;
use crate::network::spec::NetworkSpec;

/// A fully connected feed-forward network trained by plain gradient descent,
/// one sample per step.
///
/// Hidden layers share one activation, the last layer has its own, and the
/// loss is fixed at construction. Parameters only change through
/// [`Network::back_propagation`] / [`Network::train_step`].
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    hidden_activation: ActivationFunction,
    output_activation: ActivationFunction,
    loss: LossType,
    learning_rate: f64,
}

/// Pre-activations `x_i` and activations `a_i` of every layer from one forward pass.
struct ForwardCache {
    pre: Vec<Matrix>,
    post: Vec<Matrix>,
}

impl Network {
    /// Builds a He-initialized network with the default learning rate.
    pub fn new(
        layer_sizes: &[usize],
        hidden_activation: ActivationFunction,
        output_activation: ActivationFunction,
        loss: LossType,
    ) -> Result<Network> {
        let spec = NetworkSpec::new(layer_sizes.to_vec(), hidden_activation, output_activation, loss);
        Network::from_spec(&spec)
    }

    pub fn from_spec(spec: &NetworkSpec) -> Result<Network> {
        Network::from_spec_with_rng(spec, &mut rand::thread_rng())
    }

    /// Same as [`Network::from_spec`] but draws the initial weights from `rng`.
    pub fn from_spec_with_rng<R: Rng + ?Sized>(spec: &NetworkSpec, rng: &mut R) -> Result<Network> {
        spec.validate()?;
        let layers = spec
            .layer_sizes
            .windows(2)
            .map(|pair| Layer::new(pair[0], pair[1], &mut *rng))
            .collect();

        info!(
            layer_sizes = ?spec.layer_sizes,
            hidden = ?spec.hidden_activation,
            output = ?spec.output_activation,
            loss = ?spec.loss,
            learning_rate = spec.learning_rate,
            "network constructed"
        );

        Ok(Network {
            layers,
            hidden_activation: spec.hidden_activation,
            output_activation: spec.output_activation,
            loss: spec.loss,
            learning_rate: spec.learning_rate,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_layers(
        layers: Vec<Layer>,
        hidden_activation: ActivationFunction,
        output_activation: ActivationFunction,
        loss: LossType,
        learning_rate: f64,
    ) -> Network {
        Network { layers, hidden_activation, output_activation, loss, learning_rate }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Input width followed by every layer's output width.
    pub fn layer_sizes(&self) -> Vec<usize> {
        std::iter::once(self.input_size())
            .chain(self.layers.iter().map(Layer::size))
            .collect()
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].input_size()
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].size()
    }

    pub fn hidden_activation(&self) -> ActivationFunction {
        self.hidden_activation
    }

    pub fn output_activation(&self) -> ActivationFunction {
        self.output_activation
    }

    pub fn loss(&self) -> LossType {
        self.loss
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Runs `input` (a `1 x input_size` row) through every layer.
    pub fn forward(&self, input: &Matrix) -> Result<Matrix> {
        expect_row_of("network input", input, self.input_size())?;
        let mut current = input.clone();
        for (i, layer) in self.layers.iter().enumerate() {
            let x = layer.affine(&current);
            current = self.activation_for(i).forward(&x)?;
        }
        Ok(current)
    }

    /// [`Network::forward`] on a plain slice.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        Ok(self.forward(&Matrix::row(input.to_vec()))?.into_row_values())
    }

    /// Prediction together with its loss against `teacher`.
    pub fn forward_with_loss(&self, input: &Matrix, teacher: &Matrix) -> Result<(Matrix, f64)> {
        self.check_sample(input, teacher)?;
        let predicted = self.forward(input)?;
        let loss = self.loss.loss(&predicted, teacher)?;
        Ok((predicted, loss))
    }

    /// One gradient-descent step on a single `(input, teacher)` pair.
    ///
    /// Shapes are checked before anything is touched; on error the network is
    /// unchanged.
    pub fn back_propagation(&mut self, input: &Matrix, teacher: &Matrix) -> Result<()> {
        self.train_step(input, teacher).map(|_| ())
    }

    /// [`Network::back_propagation`] that also returns the loss measured
    /// before the update.
    pub fn train_step(&mut self, input: &Matrix, teacher: &Matrix) -> Result<f64> {
        self.check_sample(input, teacher)?;
        let (loss, grads) = self.gradients(input, teacher)?;

        for (layer, grad) in self.layers.iter_mut().zip(grads.iter()) {
            layer.apply_gradients(grad, self.learning_rate);
        }

        trace!(loss, "train step");
        Ok(loss)
    }

    fn check_sample(&self, input: &Matrix, teacher: &Matrix) -> Result<()> {
        expect_row_of("network input", input, self.input_size())?;
        expect_row_of("teacher", teacher, self.output_size())
    }

    fn activation_for(&self, layer_index: usize) -> ActivationFunction {
        if layer_index + 1 == self.layers.len() {
            self.output_activation
        } else {
            self.hidden_activation
        }
    }

    fn forward_cached(&self, input: &Matrix) -> Result<ForwardCache> {
        let mut pre = Vec::with_capacity(self.layers.len());
        let mut post: Vec<Matrix> = Vec::with_capacity(self.layers.len());

        for (i, layer) in self.layers.iter().enumerate() {
            let previous = post.last().unwrap_or(input);
            let x = layer.affine(previous);
            let a = self.activation_for(i).forward(&x)?;
            pre.push(x);
            post.push(a);
        }

        Ok(ForwardCache { pre, post })
    }

    /// Loss and per-layer gradients for one sample, using the current weights.
    fn gradients(&self, input: &Matrix, teacher: &Matrix) -> Result<(f64, Vec<LayerGradients>)> {
        let cache = self.forward_cached(input)?;
        let last = self.layers.len() - 1;
        let output = &cache.post[last];

        let loss = self.loss.loss(output, teacher)?;
        let d_output = self.loss.derivative(output, teacher)?;

        // ∂L/∂x of the layer currently being processed.
        let mut delta = self.output_activation.backward(&cache.pre[last], &d_output)?;
        let mut grads = Vec::with_capacity(self.layers.len());

        for i in (0..self.layers.len()).rev() {
            let layer_input = if i == 0 { input } else { &cache.post[i - 1] };
            grads.push(self.layers[i].gradients(layer_input, &delta));

            if i > 0 {
                let d_activation = self.layers[i].input_gradient(&delta);
                delta = self.hidden_activation.backward(&cache.pre[i - 1], &d_activation)?;
            }
        }

        grads.reverse();
        Ok((loss, grads))
    }
}
