use crate::error::{NetError, Result};
use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// One in-order pass over `inputs`, one gradient step per sample.
/// Returns the mean loss measured before each step.
pub fn train_network(network: &mut Network, inputs: &[Matrix], teachers: &[Matrix]) -> Result<f64> {
    check_pairs(inputs, teachers)?;
    let mut total_loss = 0.0;
    for (input, teacher) in inputs.iter().zip(teachers) {
        total_loss += network.train_step(input, teacher)?;
    }
    Ok(total_loss / inputs.len() as f64)
}

pub(crate) fn check_pairs(inputs: &[Matrix], teachers: &[Matrix]) -> Result<()> {
    if inputs.is_empty() {
        return Err(NetError::Configuration("training inputs must not be empty".into()));
    }
    if inputs.len() != teachers.len() {
        return Err(NetError::Configuration(format!(
            "{} inputs but {} teacher vectors",
            inputs.len(),
            teachers.len()
        )));
    }
    Ok(())
}
