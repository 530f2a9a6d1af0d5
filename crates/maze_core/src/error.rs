//! Error types for map generation.

use thiserror::Error;

use crate::math::Fixed;

/// Result type alias using [`MapError`].
pub type Result<T> = std::result::Result<T, MapError>;

/// Top-level error type for all map generation errors.
///
/// Parse-time errors are recoverable: generation aborts and any previously
/// generated map state is left untouched. Precondition errors
/// ([`MapError::MissingAsset`], [`MapError::NoActiveCells`]) mean generation
/// never proceeds past validation.
#[derive(Debug, Error)]
pub enum MapError {
    /// Map file header has too few fields or a non-integer field.
    #[error("map header needs at least 3 integer fields (width,height,cellSize), found {found}")]
    MalformedHeader {
        /// Number of usable fields found in the header line.
        found: usize,
    },

    /// Row count or row length does not match the declared dimensions.
    #[error("map dimensions do not match drawn grid (expected {expected}, found {found})")]
    DimensionMismatch {
        /// Expected count (rows for the file, tokens for a single row).
        expected: usize,
        /// Count actually present.
        found: usize,
        /// 1-based data line the mismatch occurred on; `None` for the
        /// file-level row count check.
        line: Option<usize>,
    },

    /// A grid token was something other than `0` or `1`.
    #[error("invalid cell token {token:?} at line {line}, column {column}")]
    InvalidCellToken {
        /// 1-based data line containing the token.
        line: usize,
        /// 0-based column of the token within the line.
        column: usize,
        /// The offending token text.
        token: String,
    },

    /// A required asset or collaborator was not configured.
    #[error("missing asset: {0}")]
    MissingAsset(String),

    /// The layout contains no active cells, so no spawn can be placed.
    #[error("map layout has no active cells")]
    NoActiveCells,

    /// A fixed spawn position maps to no active grid cell.
    #[error("spawn position ({x}, {y}) is outside the grid or on an inactive cell")]
    SpawnOutsideGrid {
        /// World-space X of the rejected position.
        x: Fixed,
        /// World-space Y of the rejected position.
        y: Fixed,
    },

    /// A world position could not be mapped onto the navigable surface.
    #[error("position ({x}, {y}) is not on the navigable surface")]
    PositionOffSurface {
        /// World-space X of the rejected position.
        x: Fixed,
        /// World-space Y of the rejected position.
        y: Fixed,
    },

    /// No path exists between two cells of the built surface.
    #[error("no navigable path between cell {from} and cell {to}")]
    PathQueryFailed {
        /// Grid index the query started from.
        from: usize,
        /// Grid index the query targeted.
        to: usize,
    },
}
