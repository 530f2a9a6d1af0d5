//! Map layout files: parsing and re-serialization.
//!
//! A map file is plain text, comma-separated, newline-delimited:
//!
//! ```text
//! <width>,<height>,<cellSize>
//! <row for y = height-1>
//! ...
//! <row for y = 0>
//! ```
//!
//! Each row holds `width` tokens of `0` (inactive) or `1` (active). Textual
//! rows run top-to-bottom while grid rows run bottom-to-top: the *last*
//! line of the file is grid row `y = 0`. The grid origin is bottom-left and
//! cells are addressed column-major, `index = x * height + y`, which keeps
//! coordinate-to-index mapping O(1) without compacting inactive cells.

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::math::{fixed_serde, Fixed};

/// Parsed map layout: dimensions, cell size and the active-cell grid.
///
/// Created once per map load and consumed by the grid graph builder.
/// Invariant: `active.len() == width * height`; parsing fails otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapLayout {
    /// Grid width in cells.
    width: u32,
    /// Grid height in cells.
    height: u32,
    /// Side length of a square cell in world units.
    #[serde(with = "fixed_serde")]
    cell_size: Fixed,
    /// Active flags, column-major (`index = x * height + y`).
    active: Vec<bool>,
}

impl MapLayout {
    /// Parse a map layout from its textual form.
    ///
    /// # Errors
    ///
    /// - [`MapError::MalformedHeader`] when the first line has fewer than
    ///   3 comma-separated fields or a field is not an integer.
    /// - [`MapError::DimensionMismatch`] when the data line count is not
    ///   `height`, or a line does not split into exactly `width` tokens.
    /// - [`MapError::InvalidCellToken`] when a token is not `0` or `1`.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines();
        let header = lines.next().unwrap_or("");
        let fields: Vec<&str> = header.split(',').map(str::trim).collect();
        if fields.len() < 3 {
            return Err(MapError::MalformedHeader {
                found: fields.len(),
            });
        }

        let parse_field = |s: &str| -> Result<u32> {
            s.parse::<u32>().map_err(|_| MapError::MalformedHeader {
                found: fields.len(),
            })
        };
        let width = parse_field(fields[0])?;
        let height = parse_field(fields[1])?;
        let cell_size = Fixed::from_num(parse_field(fields[2])?);

        let rows: Vec<&str> = lines.collect();
        if rows.len() != height as usize {
            return Err(MapError::DimensionMismatch {
                expected: height as usize,
                found: rows.len(),
                line: None,
            });
        }

        let mut active = vec![false; (width as usize) * (height as usize)];
        for (n, row) in rows.iter().enumerate() {
            let tokens: Vec<&str> = row.split(',').map(str::trim).collect();
            if tokens.len() != width as usize {
                return Err(MapError::DimensionMismatch {
                    expected: width as usize,
                    found: tokens.len(),
                    line: Some(n + 1),
                });
            }
            // Data line 1 is the top of the grid; the last line is y = 0.
            let y = height - (n as u32 + 1);
            for (x, token) in tokens.iter().enumerate() {
                let on = match *token {
                    "0" => false,
                    "1" => true,
                    other => {
                        return Err(MapError::InvalidCellToken {
                            line: n + 1,
                            column: x,
                            token: other.to_string(),
                        })
                    }
                };
                active[x * height as usize + y as usize] = on;
            }
        }

        Ok(Self {
            width,
            height,
            cell_size,
            active,
        })
    }

    /// Re-serialize the layout to the map file text format.
    ///
    /// Exact inverse of [`MapLayout::parse`] for layouts produced by it.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = format!(
            "{},{},{}",
            self.width,
            self.height,
            self.cell_size.to_num::<i64>()
        );
        for n in 1..=self.height {
            let y = self.height - n;
            out.push('\n');
            for x in 0..self.width {
                if x > 0 {
                    out.push(',');
                }
                out.push(if self.is_active(x, y) { '1' } else { '0' });
            }
        }
        out
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Cell side length in world units.
    #[must_use]
    pub const fn cell_size(&self) -> Fixed {
        self.cell_size
    }

    /// Total number of index slots (active and inactive).
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether the layout has no cells at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Convert (x, y) coordinates to the grid index.
    #[must_use]
    pub const fn index_of(&self, x: u32, y: u32) -> usize {
        (x as usize) * (self.height as usize) + (y as usize)
    }

    /// Convert a grid index back to (x, y) coordinates.
    #[must_use]
    pub const fn coords_of(&self, index: usize) -> (u32, u32) {
        (
            (index / (self.height as usize)) as u32,
            (index % (self.height as usize)) as u32,
        )
    }

    /// Whether the cell at (x, y) is active. Out of bounds is inactive.
    #[must_use]
    pub fn is_active(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.active[self.index_of(x, y)]
    }

    /// Active flags slice, indexed by grid index.
    #[must_use]
    pub fn active_cells(&self) -> &[bool] {
        &self.active
    }

    /// Number of active cells in the layout.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The worked 3×2 example from the map file format documentation.
    const SAMPLE_3X2: &str = "3,2,1\n1,1,0\n1,0,1";

    #[test]
    fn test_parse_sample_dimensions() {
        let layout = MapLayout::parse(SAMPLE_3X2).unwrap();
        assert_eq!(layout.width(), 3);
        assert_eq!(layout.height(), 2);
        assert_eq!(layout.cell_size(), Fixed::from_num(1));
        assert_eq!(layout.len(), 6);
    }

    #[test]
    fn test_parse_sample_active_grid() {
        // Last textual line is y=0: "1,0,1" -> (0,0) (2,0) active.
        // First data line is y=1:   "1,1,0" -> (0,1) (1,1) active.
        let layout = MapLayout::parse(SAMPLE_3X2).unwrap();
        assert!(layout.is_active(0, 0));
        assert!(layout.is_active(0, 1));
        assert!(!layout.is_active(1, 0));
        assert!(layout.is_active(1, 1));
        assert!(layout.is_active(2, 0));
        assert!(!layout.is_active(2, 1));
        // By index (index = x*height + y)
        assert_eq!(
            layout.active_cells(),
            &[true, true, false, true, true, false]
        );
    }

    #[test]
    fn test_round_trip() {
        let layout = MapLayout::parse(SAMPLE_3X2).unwrap();
        assert_eq!(layout.to_text(), SAMPLE_3X2);
        let reparsed = MapLayout::parse(&layout.to_text()).unwrap();
        assert_eq!(reparsed, layout);
    }

    #[test]
    fn test_header_too_short() {
        let err = MapLayout::parse("3,2\n1,1,0\n1,0,1").unwrap_err();
        assert!(matches!(err, MapError::MalformedHeader { found: 2 }));
    }

    #[test]
    fn test_header_not_integer() {
        let err = MapLayout::parse("3,two,1\n1,1,0\n1,0,1").unwrap_err();
        assert!(matches!(err, MapError::MalformedHeader { .. }));
    }

    #[test]
    fn test_row_count_mismatch() {
        let err = MapLayout::parse("3,2,1\n1,1,0").unwrap_err();
        assert!(matches!(
            err,
            MapError::DimensionMismatch {
                expected: 2,
                found: 1,
                line: None,
            }
        ));
    }

    #[test]
    fn test_row_length_mismatch() {
        let err = MapLayout::parse("3,2,1\n1,1,0\n1,0").unwrap_err();
        assert!(matches!(
            err,
            MapError::DimensionMismatch {
                expected: 3,
                found: 2,
                line: Some(2),
            }
        ));
    }

    #[test]
    fn test_invalid_token() {
        let err = MapLayout::parse("3,2,1\n1,1,0\n1,2,1").unwrap_err();
        match err {
            MapError::InvalidCellToken {
                line,
                column,
                token,
            } => {
                assert_eq!(line, 2);
                assert_eq!(column, 1);
                assert_eq!(token, "2");
            }
            other => panic!("expected InvalidCellToken, got {other:?}"),
        }
    }

    #[test]
    fn test_whitespace_tolerated() {
        let layout = MapLayout::parse("3, 2, 1\n1, 1, 0\n1, 0, 1").unwrap();
        assert_eq!(layout.to_text(), SAMPLE_3X2);
    }

    #[test]
    fn test_trailing_newline_is_a_row_error() {
        // A trailing blank line reads as an extra (empty) row.
        let err = MapLayout::parse("3,2,1\n1,1,0\n1,0,1\n\n").unwrap_err();
        assert!(matches!(err, MapError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_header_extra_fields_ignored() {
        let layout = MapLayout::parse("3,2,1,99\n1,1,0\n1,0,1").unwrap();
        assert_eq!(layout.width(), 3);
    }

    #[test]
    fn test_coords_round_trip() {
        let layout = MapLayout::parse(SAMPLE_3X2).unwrap();
        for index in 0..layout.len() {
            let (x, y) = layout.coords_of(index);
            assert_eq!(layout.index_of(x, y), index);
        }
    }

    #[test]
    fn test_active_count() {
        let layout = MapLayout::parse(SAMPLE_3X2).unwrap();
        assert_eq!(layout.active_count(), 4);
    }
}
