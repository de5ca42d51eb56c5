//! Per-cell and per-query failure taxonomy.
//!
//! Failures are isolated at cell and query granularity: the batch entry
//! points collect these instead of propagating them, so one bad cell never
//! aborts the rest of a run.

use crate::coords::{CellKey, QueryKey};
use thiserror::Error;

/// Why a (lat, lon) group cannot form a valid 360-degree sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedCell {
    #[error("mean-motion degree {0} outside 0..360")]
    DegreeOutOfRange(u32),
    #[error("duplicate sample for mean-motion degree {0}")]
    DuplicateDegree(u32),
    #[error("only {present} of 360 mean-motion degrees present")]
    IncompleteSweep { present: usize },
}

/// A failure local to a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CellError {
    /// The cell's sweep is not a dense, duplicate-free 0..360 sequence.
    #[error("cell ({key}) is malformed: {reason}")]
    Malformed { key: CellKey, reason: MalformedCell },
    /// The filtered density integrates to zero, so probability is undefined.
    #[error("cell ({key}) has zero integrated density; probability is undefined")]
    Degenerate { key: CellKey },
}

impl CellError {
    /// The cell the failure belongs to.
    pub fn key(&self) -> CellKey {
        match *self {
            CellError::Malformed { key, .. } | CellError::Degenerate { key } => key,
        }
    }
}

/// A failure local to a single query.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum QueryError {
    /// The query references a (lat, lon) pair absent from the processed
    /// cells, either because it was never surveyed or because its cell
    /// failed and was excluded.
    #[error("query ({key}) references an unknown cell")]
    UnknownCell { key: QueryKey },
}

impl QueryError {
    pub fn key(&self) -> QueryKey {
        match *self {
            QueryError::UnknownCell { key } => key,
        }
    }
}
