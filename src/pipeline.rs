//! Run coordination and the partial-failure policy.
//!
//! One run handles one staged object, strictly in sequence:
//!
//! ```text
//! Fetch → Identify & Classify → Plan → Transform → Publish   (fatal)
//!       → Cleanup → Record append                            (best-effort)
//! ```
//!
//! ## Failure policy
//!
//! Every step up to and including Publish is fatal: the error propagates to
//! the caller as a [`PipelineError`] and nothing already written is rolled
//! back. Once the image is published the run has succeeded. Removing the
//! staged original and appending the photo record are bookkeeping: their
//! outcome is captured as a [`BestEffort`] in the [`RunReport`] and logged,
//! but never turned into an error.
//!
//! No retries happen here. Whoever delivered the trigger owns redelivery.
//!
//! ## Idempotence
//!
//! Encoding is deterministic, so re-running a key republishes byte-identical
//! output. The record append is not deduplicated: every successful run adds
//! one more [`PhotoRecord`].

use crate::classify::{
    AspectCategory, ClassifyError, CorrectedDimensions, ImageMetrics, classify_metrics,
};
use crate::event::TriggerEvent;
use crate::imaging::{BackendError, ImageBackend, TransformParams};
use crate::key::{KeyError, SourceKey};
use crate::plan::{ResizeSpec, plan};
use crate::store::{ObjectStore, PutReceipt, RecordStore, StoreError};
use crate::types::{PhotoRecord, Response};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, info_span, warn};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid trigger key: {0}")]
    InvalidKey(#[from] KeyError),
    #[error("Failed to fetch '{key}' from staging: {source}")]
    Fetch {
        key: String,
        #[source]
        source: StoreError,
    },
    #[error("Failed to decode '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: BackendError,
    },
    #[error(transparent)]
    InvalidDimensions(#[from] ClassifyError),
    #[error("Failed to transform '{key}': {source}")]
    Transform {
        key: String,
        #[source]
        source: BackendError,
    },
    #[error("Failed to publish '{key}' to serving: {source}")]
    Publish {
        key: String,
        #[source]
        source: StoreError,
    },
}

/// Outcome of a step whose failure must not fail the run.
#[derive(Debug)]
#[must_use]
pub enum BestEffort {
    Done,
    Failed(StoreError),
}

impl BestEffort {
    /// Capture a result, logging a failure instead of propagating it.
    fn capture<T>(step: &'static str, key: &str, result: Result<T, StoreError>) -> Self {
        match result {
            Ok(_) => BestEffort::Done,
            Err(error) => {
                warn!(step, key, %error, "best-effort step failed, run still succeeds");
                BestEffort::Failed(error)
            }
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, BestEffort::Done)
    }
}

/// Everything a successful run did.
#[derive(Debug)]
pub struct RunReport {
    pub key: SourceKey,
    pub metrics: ImageMetrics,
    pub dimensions: CorrectedDimensions,
    pub category: AspectCategory,
    pub resize: ResizeSpec,
    pub published: PutReceipt,
    /// Removal of the original from staging.
    pub cleanup: BestEffort,
    /// Append of the photo record.
    pub record: BestEffort,
}

impl RunReport {
    /// Success payload, independent of the best-effort outcomes.
    pub fn response(&self) -> Response {
        Response::ok(self.key.path())
    }
}

/// The image engine and the three stores, built once per process.
pub struct Worker<B, S, P, R> {
    backend: B,
    staging: S,
    serving: P,
    records: R,
}

impl<B, S, P, R> Worker<B, S, P, R>
where
    B: ImageBackend,
    S: ObjectStore,
    P: ObjectStore,
    R: RecordStore,
{
    pub fn new(backend: B, staging: S, serving: P, records: R) -> Self {
        Self {
            backend,
            staging,
            serving,
            records,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn staging(&self) -> &S {
        &self.staging
    }

    pub fn serving(&self) -> &P {
        &self.serving
    }

    pub fn records(&self) -> &R {
        &self.records
    }

    /// Process one staged object.
    pub fn run(&self, key: &str) -> Result<RunReport, PipelineError> {
        let published = self.publish(key)?;
        Ok(self.settle(published))
    }

    /// Run every record of a trigger event as an independent run.
    ///
    /// The fatal steps of all runs execute on the global rayon pool. Cleanup
    /// and record appends then follow in event order, so records landing in
    /// the same group list keep the order the event names them. Results keep
    /// event order too.
    pub fn handle_event(
        &self,
        event: &TriggerEvent,
    ) -> Vec<(String, Result<RunReport, PipelineError>)> {
        let published: Vec<(String, Result<Published, PipelineError>)> = event
            .keys()
            .par_iter()
            .map(|key| (key.to_string(), self.publish(key)))
            .collect();

        published
            .into_iter()
            .map(|(key, result)| (key, result.map(|run| self.settle(run))))
            .collect()
    }

    /// Fetch through Publish. Every failure here is fatal.
    fn publish(&self, key: &str) -> Result<Published, PipelineError> {
        let span = info_span!("run", key);
        let _enter = span.enter();

        let source_key = SourceKey::parse(key)?;
        let path = source_key.path();

        let raw = self
            .staging
            .get(&path)
            .map_err(|source| PipelineError::Fetch {
                key: path.clone(),
                source,
            })?;
        info!(bytes = raw.len(), "retrieved image to process");

        let metrics = self
            .backend
            .identify(&raw)
            .map_err(|source| PipelineError::Decode {
                key: path.clone(),
                source,
            })?;
        let (dimensions, category) = classify_metrics(&metrics)?;
        let resize = plan(category, dimensions.width, dimensions.height);
        debug!(
            raw_width = metrics.raw_width,
            raw_height = metrics.raw_height,
            orientation = ?metrics.orientation,
            width = dimensions.width,
            height = dimensions.height,
            %category,
            target_width = resize.target_width,
            target_height = ?resize.target_height,
            "planned resize"
        );

        let encoded = self
            .backend
            .transform(&raw, &TransformParams::new(resize))
            .map_err(|source| PipelineError::Transform {
                key: path.clone(),
                source,
            })?;

        let receipt = self
            .serving
            .put(&path, &encoded)
            .map_err(|source| PipelineError::Publish {
                key: path.clone(),
                source,
            })?;
        info!(bytes = receipt.size, etag = %receipt.etag, %category, "published");

        Ok(Published {
            key: source_key,
            path,
            metrics,
            dimensions,
            category,
            resize,
            receipt,
        })
    }

    /// Cleanup and record append for a published run. Never fails.
    fn settle(&self, run: Published) -> RunReport {
        let span = info_span!("run", key = %run.path);
        let _enter = span.enter();

        let cleanup = BestEffort::capture("cleanup", &run.path, self.staging.delete(&run.path));
        let record = BestEffort::capture(
            "record-append",
            &run.path,
            self.records.append_photo(
                &run.key.collection_id,
                &run.key.group_id,
                PhotoRecord::new(run.key.item_id.as_str()),
            ),
        );

        RunReport {
            key: run.key,
            metrics: run.metrics,
            dimensions: run.dimensions,
            category: run.category,
            resize: run.resize,
            published: run.receipt,
            cleanup,
            record,
        }
    }
}

/// A run past its commit point, waiting for its best-effort steps.
struct Published {
    key: SourceKey,
    path: String,
    metrics: ImageMetrics,
    dimensions: CorrectedDimensions,
    category: AspectCategory,
    resize: ResizeSpec,
    receipt: PutReceipt,
}
