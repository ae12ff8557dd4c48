//! Analysis orchestrator.
//!
//! Drives the upload → analyze → report lifecycle over an explicit state
//! object, and merges classification results back into the record store
//! by identifier. Runs are serialized: the state is mutated only through
//! `&mut self`, so no second run can interleave with one in flight.

use crate::classify::{Analysis, Classifier};
use crate::error::{Error, Result};
use crate::store::{ImageRecord, ImageStore};
use std::collections::HashMap;

/// Lifecycle phase. Upload is implicit and synchronous, so there is no
/// separate uploading phase to observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    ReadyToAnalyze,
    /// A classification call is in flight; the start-analysis affordance
    /// is suspended.
    Analyzing,
    Reported,
}

/// Explicit inspection state threaded through every transition.
#[derive(Default)]
pub struct Inspection {
    store: ImageStore,
    phase: Phase,
}

impl Inspection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The in-flight flag the presentation layer mirrors.
    pub fn is_analyzing(&self) -> bool {
        self.phase == Phase::Analyzing
    }

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    /// Add uploaded payloads. A stale report is invalidated, but analyses
    /// already attached to retained records are preserved until
    /// overwritten by a later run. Empty input changes nothing.
    pub fn add_images(&mut self, payloads: Vec<Vec<u8>>) -> &[ImageRecord] {
        if payloads.is_empty() {
            return &[];
        }
        self.phase = Phase::ReadyToAnalyze;
        self.store.add(payloads)
    }

    /// Remove one record. A no-op removal (unknown id) does not
    /// invalidate a report.
    pub fn remove_image(&mut self, id: &str) {
        if self.store.remove(id) {
            self.phase = if self.store.is_empty() {
                Phase::Idle
            } else {
                Phase::ReadyToAnalyze
            };
        }
    }

    /// Drop every record, release previews, reset the asset name.
    pub fn clear(&mut self) {
        self.store.clear();
        self.phase = Phase::Idle;
    }

    /// Pure rename: recomputes display names, no phase change.
    pub fn set_asset_name(&mut self, asset_name: &str) {
        self.store.set_asset_name(asset_name);
    }

    /// Run one batched classification over the full current record set.
    ///
    /// Guarded: an empty collection or a blank asset name blocks locally
    /// with a validation message and no remote call. On success the
    /// results are merged as a single state update and the phase becomes
    /// `Reported`; on failure no partial merge is applied and the phase
    /// returns to `ReadyToAnalyze` so the user may retry.
    pub async fn begin_analysis(&mut self, classifier: &dyn Classifier) -> Result<()> {
        if self.phase == Phase::Analyzing {
            return Err(Error::Validation("analysis already in progress".to_string()));
        }
        if self.store.is_empty() {
            return Err(Error::Validation("no images to analyze".to_string()));
        }
        if self.store.asset_name().trim().is_empty() {
            return Err(Error::Validation(
                "identify the equipment before starting the analysis".to_string(),
            ));
        }

        self.phase = Phase::Analyzing;
        tracing::info!(records = self.store.len(), "starting classification run");

        match classifier.classify(self.store.records()).await {
            Ok(results) => {
                let matched = self.merge(results);
                tracing::info!(matched, "classification run complete");
                self.phase = Phase::Reported;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "classification run failed");
                self.phase = Phase::ReadyToAnalyze;
                Err(e.into())
            }
        }
    }

    /// Merge returned results into matching records. Identifiers that do
    /// not belong to the collection are dropped; requested records absent
    /// from the results keep whatever analysis they already had.
    fn merge(&mut self, results: HashMap<String, Analysis>) -> usize {
        let mut matched = 0;
        for (id, analysis) in results {
            if self.store.attach_analysis(&id, analysis) {
                matched += 1;
            } else {
                tracing::warn!(%id, "dropping analysis for unknown record id");
            }
        }
        matched
    }
}
