use rand::Rng;

use crate::layers::affine;
use crate::math::init;
use crate::math::matrix::Matrix;

/// One affine layer: `x = a · W + B`.
///
/// `weights` is `input_size x size`, `biases` is `1 x size`.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    weights: Matrix,
    biases: Matrix,
}

/// ∂L/∂W and ∂L/∂B for one layer.
#[derive(Debug, Clone)]
pub(crate) struct LayerGradients {
    pub weights: Matrix,
    pub biases: Matrix,
}

impl Layer {
    /// He-initialized layer. The bias row is drawn the same way with a fan-in of 1.
    pub fn new<R: Rng + ?Sized>(input_size: usize, size: usize, rng: &mut R) -> Layer {
        let weights = init::he(input_size, size, rng);
        let biases = init::he(1, size, rng);
        Layer { weights, biases }
    }

    /// Panics if `biases` is not `1 x weights.cols`.
    #[cfg(test)]
    pub(crate) fn from_parameters(weights: Matrix, biases: Matrix) -> Layer {
        assert_eq!(biases.shape(), (1, weights.cols), "bias must be 1 x n_out");
        Layer { weights, biases }
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &Matrix {
        &self.biases
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    pub fn size(&self) -> usize {
        self.weights.cols
    }

    /// Pre-activation for a `1 x input_size` row.
    pub fn affine(&self, input: &Matrix) -> Matrix {
        &(input * &self.weights) + &self.biases
    }

    /// Gradients of this layer's parameters given the layer input and ∂L/∂x.
    pub(crate) fn gradients(&self, input: &Matrix, upstream: &Matrix) -> LayerGradients {
        LayerGradients {
            weights: affine::grad_weights(input, upstream),
            biases: affine::grad_biases(upstream),
        }
    }

    /// ∂L/∂a of the previous layer's activation.
    pub(crate) fn input_gradient(&self, upstream: &Matrix) -> Matrix {
        affine::grad_input(&self.weights, upstream)
    }

    /// `W -= lr * dW`, `B -= lr * dB`.
    pub(crate) fn apply_gradients(&mut self, grads: &LayerGradients, lr: f64) {
        self.weights = &self.weights - &grads.weights.scale(lr);
        self.biases = &self.biases - &grads.biases.scale(lr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn new_layer_has_consistent_shapes() {
        let layer = Layer::new(4, 3, &mut StdRng::seed_from_u64(0));
        assert_eq!(layer.weights().shape(), (4, 3));
        assert_eq!(layer.biases().shape(), (1, 3));
        assert_eq!(layer.input_size(), 4);
        assert_eq!(layer.size(), 3);
    }

    #[test]
    fn affine_adds_bias() {
        let layer = Layer::from_parameters(
            Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]]),
            Matrix::row(vec![0.5, -0.5]),
        );
        let x = layer.affine(&Matrix::row(vec![1.0, 1.0]));
        assert_eq!(x.row_values(), &[4.5, 5.5]);
    }

    #[test]
    fn apply_gradients_steps_downhill() {
        let mut layer = Layer::from_parameters(Matrix::row(vec![1.0]), Matrix::row(vec![1.0]));
        let grads = LayerGradients {
            weights: Matrix::row(vec![2.0]),
            biases: Matrix::row(vec![-4.0]),
        };
        layer.apply_gradients(&grads, 0.5);
        assert_eq!(layer.weights().row_values(), &[0.0]);
        assert_eq!(layer.biases().row_values(), &[3.0]);
    }
}
