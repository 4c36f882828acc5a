// crates/atlas-core/src/batch.rs

//! # Bounded Batch Processing
//!
//! Runs an async operation over many independent inputs with a hard cap on
//! how many run at once. Every input yields exactly one [`BatchItem`]; a
//! failing (or panicking) item never affects its siblings.
//!
//! Tasks live in a [`JoinSet`], so dropping the future returned by
//! [`BatchProcessor::run`] aborts whatever is still pending.

use crate::error::{AtlasError, Result};
use futures::FutureExt;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::any::Any;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

pub const DEFAULT_CONCURRENCY_LIMIT: usize = 10;

/// One input paired with its outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchItem<I, O> {
    pub input: I,
    pub outcome: std::result::Result<O, String>,
}

impl<I, O> BatchItem<I, O> {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn value(&self) -> Option<&O> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&str> {
        self.outcome.as_ref().err().map(String::as_str)
    }
}

impl<I: Serialize, O: Serialize> Serialize for BatchItem<I, O> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("BatchItem", 3)?;
        s.serialize_field("input", &self.input)?;
        match &self.outcome {
            Ok(value) => {
                s.serialize_field("success", &true)?;
                s.serialize_field("result", value)?;
            }
            Err(reason) => {
                s.serialize_field("success", &false)?;
                s.serialize_field("error", reason)?;
            }
        }
        s.end()
    }
}

/// Success/failure tally over a finished batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn from_items<I, O>(items: &[BatchItem<I, O>]) -> Self {
        let succeeded = items.iter().filter(|i| i.is_ok()).count();
        BatchReport {
            total: items.len(),
            succeeded,
            failed: items.len() - succeeded,
        }
    }
}

/// Fan-out/fan-in over a fixed number of concurrency slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchProcessor {
    concurrency_limit: usize,
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self {
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
        }
    }
}

impl BatchProcessor {
    /// Fails for a limit of zero or one larger than the semaphore supports.
    pub fn new(concurrency_limit: usize) -> Result<Self> {
        if concurrency_limit == 0 {
            return Err(AtlasError::InvalidArgument(
                "concurrency limit must be at least 1".into(),
            ));
        }
        if concurrency_limit > Semaphore::MAX_PERMITS {
            return Err(AtlasError::InvalidArgument(format!(
                "concurrency limit {concurrency_limit} exceeds {}",
                Semaphore::MAX_PERMITS
            )));
        }
        Ok(Self { concurrency_limit })
    }

    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    /// Run `op` once per input, at most `concurrency_limit` at a time.
    ///
    /// Results come back in input order once every item has finished.
    /// Must be called from within a tokio runtime.
    ///
    /// ```rust
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// use atlas_core::BatchProcessor;
    ///
    /// let items = BatchProcessor::new(2)
    ///     .unwrap()
    ///     .run(vec![1u32, 2, 3], |n| async move {
    ///         if n == 2 { Err("two") } else { Ok(n * 10) }
    ///     })
    ///     .await;
    ///
    /// assert_eq!(items[0].outcome, Ok(10));
    /// assert_eq!(items[1].outcome, Err("two".to_string()));
    /// assert_eq!(items[2].outcome, Ok(30));
    /// # }
    /// ```
    pub async fn run<I, O, E, F, Fut>(&self, inputs: Vec<I>, op: F) -> Vec<BatchItem<I, O>>
    where
        I: Clone + Send + 'static,
        O: Send + 'static,
        E: Display + Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<O, E>> + Send + 'static,
    {
        let total = inputs.len();
        let semaphore = Arc::new(Semaphore::new(self.concurrency_limit));
        let op = Arc::new(op);
        let mut tasks = JoinSet::new();

        for (index, input) in inputs.iter().cloned().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let op = Arc::clone(&op);
            tasks.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    // the permit is held for the whole arm and dropped on every path
                    Ok(_permit) => run_guarded(op.as_ref(), input.clone()).await,
                    Err(_) => Err("batch was shut down before this item ran".to_owned()),
                };
                (index, BatchItem { input, outcome })
            });
        }

        let mut slots: Vec<Option<BatchItem<I, O>>> = (0..total).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, item)) => {
                    if let Err(reason) = &item.outcome {
                        warn!(index, %reason, "batch item failed");
                    }
                    slots[index] = Some(item);
                }
                Err(e) => warn!(error = %e, "batch task did not complete"),
            }
        }

        let items: Vec<BatchItem<I, O>> = slots
            .into_iter()
            .zip(inputs)
            .map(|(slot, input)| {
                slot.unwrap_or_else(|| BatchItem {
                    input,
                    outcome: Err("batch task did not complete".to_owned()),
                })
            })
            .collect();

        let report = BatchReport::from_items(&items);
        info!(
            total = report.total,
            succeeded = report.succeeded,
            failed = report.failed,
            limit = self.concurrency_limit,
            "batch finished"
        );
        items
    }
}

/// Free-function form of [`BatchProcessor::run`].
///
/// A `concurrency_limit` of zero is rejected once for the whole batch.
pub async fn process_batch<I, O, E, F, Fut>(
    inputs: Vec<I>,
    concurrency_limit: usize,
    op: F,
) -> Result<Vec<BatchItem<I, O>>>
where
    I: Clone + Send + 'static,
    O: Send + 'static,
    E: Display + Send + 'static,
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<O, E>> + Send + 'static,
{
    let processor = BatchProcessor::new(concurrency_limit)?;
    Ok(processor.run(inputs, op).await)
}

/// Turns both `Err` and panics into the item's error string.
async fn run_guarded<I, O, E, F, Fut>(op: &F, input: I) -> std::result::Result<O, String>
where
    E: Display,
    F: Fn(I) -> Fut,
    Fut: Future<Output = std::result::Result<O, E>>,
{
    match AssertUnwindSafe(async { op(input).await }).catch_unwind().await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.to_string()),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            debug!(%message, "batch operation panicked");
            Err(format!("operation panicked: {message}"))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn zero_limit_is_rejected_once() {
        let err = process_batch(vec![1, 2, 3], 0, |n: i32| async move { Ok::<_, String>(n) })
            .await
            .unwrap_err();
        assert!(matches!(err, AtlasError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn empty_input_is_empty_output() {
        let items = process_batch(Vec::<String>::new(), 4, |s: String| async move {
            Ok::<_, String>(s)
        })
        .await
        .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn failing_item_does_not_affect_siblings() {
        let items = process_batch(vec!["a", "b", "c"], 10, |s: &'static str| async move {
            if s == "b" {
                Err(format!("{s} is broken"))
            } else {
                Ok(s.to_uppercase())
            }
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].value().map(String::as_str), Some("A"));
        assert_eq!(items[1].error(), Some("b is broken"));
        assert_eq!(items[2].value().map(String::as_str), Some("C"));
    }

    #[tokio::test]
    async fn panics_become_item_errors() {
        let items = process_batch(vec![1u8, 2, 3], 2, |n: u8| async move {
            if n == 2 {
                panic!("boom on {n}");
            }
            Ok::<_, String>(n)
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok());
        assert_eq!(items[1].error(), Some("operation panicked: boom on 2"));
        assert!(items[2].is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn never_exceeds_the_ceiling() {
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let (a, p) = (Arc::clone(&active), Arc::clone(&peak));
        let items = process_batch((0..50).collect::<Vec<u32>>(), 10, move |n| {
            let (active, peak) = (Arc::clone(&a), Arc::clone(&p));
            async move {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                active.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, String>(n)
            }
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 50);
        assert!(items.iter().all(BatchItem::is_ok));
        let peak = peak.load(Ordering::SeqCst);
        assert!(peak <= 10, "observed {peak} concurrent operations");
        assert!(peak >= 2, "expected some parallelism, saw {peak}");
    }

    #[tokio::test(start_paused = true)]
    async fn results_follow_input_order_not_completion_order() {
        let items = process_batch(vec![30u64, 10, 20], 3, |ms| async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok::<_, String>(ms * 2)
        })
        .await
        .unwrap();

        let inputs: Vec<_> = items.iter().map(|i| i.input).collect();
        assert_eq!(inputs, vec![30, 10, 20]);
        assert_eq!(items[1].outcome, Ok(20));
    }

    #[test]
    fn report_counts() {
        let items = vec![
            BatchItem { input: 1, outcome: Ok(()) },
            BatchItem { input: 2, outcome: Err("x".to_owned()) },
        ];
        assert_eq!(
            BatchReport::from_items(&items),
            BatchReport { total: 2, succeeded: 1, failed: 1 }
        );
    }

    #[test]
    fn item_serializes_flat() {
        let ok = BatchItem::<_, u8> { input: "1.1.1.1", outcome: Ok(7) };
        let v = serde_json::to_value(&ok).unwrap();
        assert_eq!(v, serde_json::json!({"input": "1.1.1.1", "success": true, "result": 7}));

        let err = BatchItem::<_, u8> { input: "x", outcome: Err("bad".into()) };
        let v = serde_json::to_value(&err).unwrap();
        assert_eq!(v, serde_json::json!({"input": "x", "success": false, "error": "bad"}));
    }
}
