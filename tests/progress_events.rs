//! Checks the tracing events the training and evaluation loops emit.

use rustyseq::losses::CrossEntropyLoss;
use rustyseq::nn::{Linear, Sequential};
use rustyseq::optimizers::Sgd;
use rustyseq::{test, train, Labels, Tensor};

use ndarray::array;
use std::io;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap().lines().map(str::to_owned).collect()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `f` with a DEBUG-level fmt subscriber scoped to this thread.
fn capture<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    let out = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(out.clone())
        .with_max_level(Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, out.lines())
}

fn data() -> (Tensor, Labels) {
    (array![[0.0], [1.0], [2.0], [3.0]], array![0, 0, 1, 1])
}

#[test]
fn train_and_test_emit_progress_events() {
    let (x, y) = data();
    let mut model = Sequential::new().add(Linear::with_seed(1, 2, 4));

    let (history, lines) = capture(|| {
        train(
            &mut model,
            &x,
            &y,
            &mut CrossEntropyLoss::new(),
            &mut Sgd::new(0.1),
            2,
            2,
        )
    });
    let history = history.unwrap();

    let epoch_lines: Vec<&String> = lines.iter().filter(|l| l.contains("epoch complete")).collect();
    assert_eq!(epoch_lines.len(), 2);
    for (i, line) in epoch_lines.iter().enumerate() {
        assert!(line.trim_start().starts_with("INFO"), "{line}");
        assert!(line.contains("train{"), "{line}");
        assert!(line.contains(&format!("epoch={}", i + 1)), "{line}");
        assert!(line.contains(&format!("accuracy={:?}", history.accuracy[i])), "{line}");
        assert!(line.contains(&format!("loss={:?}", history.loss[i])), "{line}");
    }

    let batch_lines: Vec<&String> = lines
        .iter()
        .filter(|l| l.contains("rustyseq::train: batch "))
        .collect();
    assert_eq!(batch_lines.len(), 4);
    for line in &batch_lines {
        assert!(line.trim_start().starts_with("DEBUG"), "{line}");
        assert!(line.contains("train{"), "{line}");
        assert!(line.contains("batch_loss="), "{line}");
        assert!(line.contains("running_correct="), "{line}");
        assert!(line.contains("rows=2"), "{line}");
    }

    let (accuracy, lines) = capture(|| test(&mut model, &x, &y, 2));
    let accuracy = accuracy.unwrap();

    let eval_lines: Vec<&String> = lines.iter().filter(|l| l.contains("evaluation complete")).collect();
    assert_eq!(eval_lines.len(), 1);
    assert!(eval_lines[0].trim_start().starts_with("INFO"));
    assert!(eval_lines[0].contains("test{"));
    assert!(eval_lines[0].contains(&format!("accuracy={accuracy:?}")));
    assert!(eval_lines[0].contains("total=4"));
}
