use nnet::{train_network, ActivationFunction, LossType, Matrix, Network, NetworkSpec};

fn main() -> nnet::Result<()> {
    let spec = NetworkSpec::new(
        vec![2, 4, 1],
        ActivationFunction::Sigmoid,
        ActivationFunction::Sigmoid,
        LossType::Mse,
    )
    .with_learning_rate(0.5);
    let mut network = Network::from_spec(&spec)?;

    let inputs = vec![
        Matrix::row(vec![1.0, 0.0]),
        Matrix::row(vec![1.0, 1.0]),
        Matrix::row(vec![0.0, 1.0]),
        Matrix::row(vec![0.0, 0.0]),
    ];
    let expected_outputs = vec![
        Matrix::row(vec![1.0]),
        Matrix::row(vec![0.0]),
        Matrix::row(vec![1.0]),
        Matrix::row(vec![0.0]),
    ];

    let epochs = 10000;

    for epoch in 0..epochs {
        let loss = train_network(&mut network, &inputs, &expected_outputs)?;
        if epoch % 1000 == 0 {
            println!("Epoch {epoch}: loss = {loss:.6}");
        }
    }

    for input in &inputs {
        println!("Input: {:?} -> Output: {:.4}", input.row_values(), network.forward(input)?.get(0, 0));
    }
    Ok(())
}
