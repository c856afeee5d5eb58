//! Training and evaluation loops.
//!
//! Both loops are synchronous. Every batch runs forward, loss, backward and
//! the optimizer step to completion before the next batch is fetched. A
//! failure aborts the loop and leaves the model with whatever updates the
//! completed batches applied.

use crate::config::TrainConfig;
use crate::data::DataLoader;
use crate::error::{Result, TrainError};
use crate::losses::Loss;
use crate::metrics::{Accuracy, EpochMetrics, Metric, TrainHistory};
use crate::nn::Sequential;
use crate::optimizers::Optimizer;
use crate::tensor::{Labels, Tensor};

/// Trains `model` for `epochs` passes over `(inputs, labels)`.
///
/// Returns per-epoch accuracy (correct / dataset size) and per-epoch loss.
/// The epoch loss is the sum of the batch losses, not their mean.
pub fn train<L, O>(
    model: &mut Sequential,
    inputs: &Tensor,
    labels: &Labels,
    loss_fn: &mut L,
    optimizer: &mut O,
    epochs: usize,
    batch_size: usize,
) -> Result<TrainHistory>
where
    L: Loss + ?Sized,
    O: Optimizer + ?Sized,
{
    run_training(
        model,
        inputs,
        labels,
        loss_fn,
        optimizer,
        &TrainConfig::new(epochs, batch_size),
    )
}

/// [`train`] driven by a validated [`TrainConfig`], which also controls
/// shuffling and sets the optimizer's learning rate.
pub fn train_with_config<L, O>(
    model: &mut Sequential,
    inputs: &Tensor,
    labels: &Labels,
    loss_fn: &mut L,
    optimizer: &mut O,
    config: &TrainConfig,
) -> Result<TrainHistory>
where
    L: Loss + ?Sized,
    O: Optimizer + ?Sized,
{
    config.validate()?;
    optimizer.set_learning_rate(config.learning_rate);
    run_training(model, inputs, labels, loss_fn, optimizer, config)
}

fn run_training<L, O>(
    model: &mut Sequential,
    inputs: &Tensor,
    labels: &Labels,
    loss_fn: &mut L,
    optimizer: &mut O,
    config: &TrainConfig,
) -> Result<TrainHistory>
where
    L: Loss + ?Sized,
    O: Optimizer + ?Sized,
{
    let span = tracing::info_span!(
        "train",
        epochs = config.epochs,
        batch_size = config.batch_size,
        lr = optimizer.learning_rate(),
        label_conditioned = model.requires_labels(),
        loss = loss_fn.name()
    );
    let _enter = span.enter();

    model.train();

    let mut loader = DataLoader::new(inputs, labels, config.batch_size)?.shuffle(config.shuffle);
    if let Some(seed) = config.seed {
        loader = loader.seed(seed);
    }
    if loader.is_empty() {
        return Err(TrainError::EmptyDataset);
    }
    let total = loader.len();

    let mut history = TrainHistory::new();
    let mut metrics = EpochMetrics::new();

    for epoch in 0..config.epochs {
        metrics.reset();

        for (batch_idx, batch) in loader.iter().enumerate() {
            let predictions = model.forward(&batch.features, Some(&batch.labels))?;
            metrics.record_predictions(&predictions, &batch.labels)?;

            let batch_loss = loss_fn.compute(&batch.labels, &predictions)?;
            metrics.record_loss(batch_loss);

            let grad = loss_fn.backward()?;
            model.backward(&grad)?;
            optimizer.step(model.parameters_mut())?;

            tracing::debug!(
                epoch = epoch + 1,
                batch = batch_idx + 1,
                rows = batch.len(),
                batch_loss,
                running_correct = metrics.correct(),
                "batch"
            );
        }

        let (accuracy, loss) = metrics.finish(total)?;
        tracing::info!(epoch = epoch + 1, accuracy, loss, "epoch complete");
        history.push(accuracy, loss);
    }

    Ok(history)
}

/// Evaluates `model` on `(inputs, labels)` and returns its accuracy.
///
/// Switches the model to eval mode and never passes labels to it. Loss is
/// not computed.
pub fn test(model: &mut Sequential, inputs: &Tensor, labels: &Labels, batch_size: usize) -> Result<f64> {
    let span = tracing::info_span!("test", batch_size);
    let _enter = span.enter();

    model.eval();

    let mut loader = DataLoader::new(inputs, labels, batch_size)?;
    if loader.is_empty() {
        return Err(TrainError::EmptyDataset);
    }

    let mut accuracy = Accuracy::new();
    for batch in loader.iter() {
        let predictions = model.forward(&batch.features, None)?;
        accuracy.update(&predictions, &batch.labels)?;
    }

    let result = accuracy.correct() as f64 / loader.len() as f64;
    tracing::info!(
        accuracy = result,
        correct = accuracy.correct(),
        total = loader.len(),
        "evaluation complete"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::losses::CrossEntropyLoss;
    use crate::nn::{Layer, Linear, Mode, Rbf, ReLU};
    use crate::optimizers::Sgd;
    use ndarray::{array, Array};

    /// Two well separated blobs around (-2, -2) and (2, 2).
    fn blobs() -> (Tensor, Labels) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..20 {
            let jitter = (i as f32 * 0.37).sin() * 0.3;
            let (centre, label) = if i % 2 == 0 { (-2.0, 0) } else { (2.0, 1) };
            rows.extend([centre + jitter, centre - jitter]);
            labels.push(label);
        }
        (
            Array::from_shape_vec((20, 2), rows).unwrap(),
            Array::from_vec(labels),
        )
    }

    #[test]
    fn test_linear_model_learns_blobs() {
        let (x, y) = blobs();
        let mut model = Sequential::new().add(Linear::with_seed(2, 2, 1));
        let mut loss = CrossEntropyLoss::new();
        let mut sgd = Sgd::new(0.1);

        let history = train(&mut model, &x, &y, &mut loss, &mut sgd, 30, 4).unwrap();
        assert_eq!(history.epochs(), 30);
        assert!(history.loss[29] < history.loss[0]);

        let acc = test(&mut model, &x, &y, 4).unwrap();
        assert_eq!(acc, 1.0);
        assert_eq!(model.mode(), Mode::Eval);
    }

    #[test]
    fn test_hidden_layer_loss_goes_down() {
        let (x, y) = blobs();
        let mut model = Sequential::new()
            .add(Linear::with_seed(2, 8, 1))
            .add(ReLU::new())
            .add(Linear::with_seed(8, 2, 2));
        let mut loss = CrossEntropyLoss::new();
        let mut sgd = Sgd::with_momentum(0.05, 0.9);

        let history = train(&mut model, &x, &y, &mut loss, &mut sgd, 20, 4).unwrap();
        assert!(history.loss[19] < history.loss[0]);
    }

    #[test]
    fn test_rbf_model_learns_blobs() {
        let (x, y) = blobs();
        let mut model = Sequential::label_conditioned(vec![Box::new(Rbf::new(2, 2, 1.0)) as Box<dyn Layer>]);
        let mut loss = CrossEntropyLoss::new();
        let mut sgd = Sgd::new(0.1);

        train(&mut model, &x, &y, &mut loss, &mut sgd, 1, 5).unwrap();
        assert_eq!(test(&mut model, &x, &y, 5).unwrap(), 1.0);
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let x = Tensor::zeros((0, 2));
        let y = Labels::zeros(0);
        let mut model = Sequential::new();

        assert!(matches!(
            test(&mut model, &x, &y, 4),
            Err(TrainError::EmptyDataset)
        ));
        assert!(matches!(
            train(&mut model, &x, &y, &mut CrossEntropyLoss::new(), &mut Sgd::new(0.1), 1, 4),
            Err(TrainError::EmptyDataset)
        ));
    }

    #[test]
    fn test_row_mismatch_between_inputs_and_labels() {
        let x = Tensor::zeros((3, 2));
        let y = array![0, 1];
        let mut model = Sequential::new();
        assert!(matches!(
            test(&mut model, &x, &y, 2),
            Err(TrainError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_config_validation_happens_before_training() {
        let (x, y) = blobs();
        let mut model = Sequential::new().add(Linear::with_seed(2, 2, 3));
        let config = TrainConfig::new(0, 4);
        let err = train_with_config(
            &mut model,
            &x,
            &y,
            &mut CrossEntropyLoss::new(),
            &mut Sgd::new(0.1),
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, TrainError::InvalidConfig(_)));
    }
}
