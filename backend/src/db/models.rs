//! Records exchanged between the service layer and the repositories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::algorithms::DetectionStrategy;
use crate::models::OverlapPair;

/// Scope under which the `overlapping_sections` relation is materialized.
pub const OVERLAP_SCOPE: &str = "overlapping_sections";

/// Marker written alongside a populated overlap relation.
///
/// Its presence, not the row count, means "already computed": a catalog
/// with no conflicts still leaves a marker with `pair_count == 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializationRecord {
    pub scope: String,
    pub input_checksum: String,
    pub interval_count: usize,
    pub pair_count: usize,
    pub strategy: DetectionStrategy,
    pub materialized_at: DateTime<Utc>,
}

/// One run's complete result, persisted as a single unit.
#[derive(Debug, Clone)]
pub struct OverlapBatch {
    pub pairs: Vec<OverlapPair>,
    pub input_checksum: String,
    pub interval_count: usize,
    pub strategy: DetectionStrategy,
}

impl OverlapBatch {
    pub fn new(
        pairs: Vec<OverlapPair>,
        input_checksum: impl Into<String>,
        interval_count: usize,
        strategy: DetectionStrategy,
    ) -> Self {
        Self {
            pairs,
            input_checksum: input_checksum.into(),
            interval_count,
            strategy,
        }
    }

    /// Marker describing this batch once it has been written.
    pub fn record(&self, materialized_at: DateTime<Utc>) -> MaterializationRecord {
        MaterializationRecord {
            scope: OVERLAP_SCOPE.to_string(),
            input_checksum: self.input_checksum.clone(),
            interval_count: self.interval_count,
            pair_count: self.pairs.len(),
            strategy: self.strategy,
            materialized_at,
        }
    }
}

/// Result of [`ensure_computed`](crate::db::services::ensure_computed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "record", rename_all = "snake_case")]
pub enum MaterializationOutcome {
    /// A previous run had populated the relation; nothing was recomputed.
    AlreadyMaterialized(MaterializationRecord),
    /// This run computed and persisted the relation.
    Computed(MaterializationRecord),
}

impl MaterializationOutcome {
    pub fn record(&self) -> &MaterializationRecord {
        match self {
            Self::AlreadyMaterialized(record) | Self::Computed(record) => record,
        }
    }

    pub fn was_computed(&self) -> bool {
        matches!(self, Self::Computed(_))
    }
}
