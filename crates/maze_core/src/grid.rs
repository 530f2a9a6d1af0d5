//! Grid graph: active cells and their 4-directional adjacency.
//!
//! The graph is a sparse array with one slot per grid index, active or
//! not. Inactive cells carry no geometry and no links but keep their
//! index slot so coordinate-to-index mapping stays O(1).
//!
//! Building the graph is deterministic: the same layout always yields
//! the same neighbor sets.

use serde::{Deserialize, Serialize};

use crate::layout::MapLayout;
use crate::math::{Fixed, Vec2Fixed};

/// The four neighbor directions, in stored order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum Direction {
    /// Toward decreasing x.
    West = 0,
    /// Toward increasing y.
    North = 1,
    /// Toward decreasing y.
    South = 2,
    /// Toward increasing x.
    East = 3,
}

impl Direction {
    /// All directions in stored order.
    pub const ALL: [Self; 4] = [Self::West, Self::North, Self::South, Self::East];

    /// Coordinate offset for this direction.
    #[must_use]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Self::West => (-1, 0),
            Self::North => (0, 1),
            Self::South => (0, -1),
            Self::East => (1, 0),
        }
    }

    /// The opposing direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::West => Self::East,
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
        }
    }

    /// Slot index within a neighbor array.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One cell of the grid graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    /// Grid index (`x * height + y`).
    pub index: usize,
    /// Grid coordinates, origin bottom-left.
    pub coords: (u32, u32),
    /// Whether this slot holds a traversable maze cell.
    pub is_active: bool,
    /// Neighbor links by [`Direction`] slot; a link exists only if the
    /// neighbor is in bounds and active. Links are symmetric.
    pub neighbors: [Option<usize>; 4],
}

impl GridCell {
    fn new(index: usize, coords: (u32, u32), is_active: bool) -> Self {
        Self {
            index,
            coords,
            is_active,
            neighbors: [None; 4],
        }
    }

    /// Neighbor index in the given direction, if linked.
    #[must_use]
    pub const fn neighbor(&self, direction: Direction) -> Option<usize> {
        self.neighbors[direction.index()]
    }

    /// Whether a link exists in the given direction.
    #[must_use]
    pub const fn has_neighbor(&self, direction: Direction) -> bool {
        self.neighbors[direction.index()].is_some()
    }

    /// Number of linked neighbors.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.neighbors.iter().flatten().count()
    }
}

/// Connectivity graph over an active-cell grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridGraph {
    width: u32,
    height: u32,
    #[serde(with = "crate::math::fixed_serde")]
    cell_size: Fixed,
    cells: Vec<GridCell>,
}

impl GridGraph {
    /// Build the graph from a parsed layout.
    ///
    /// For every active cell the four directional neighbors are probed by
    /// coordinate offset; a link is added only when the offset is in
    /// bounds and the neighbor is active.
    #[must_use]
    pub fn build(layout: &MapLayout) -> Self {
        let width = layout.width();
        let height = layout.height();

        let mut cells = Vec::with_capacity(layout.len());
        for x in 0..width {
            for y in 0..height {
                let index = layout.index_of(x, y);
                cells.push(GridCell::new(index, (x, y), layout.is_active(x, y)));
            }
        }
        let mut graph = Self {
            width,
            height,
            cell_size: layout.cell_size(),
            cells,
        };

        for index in 0..graph.cells.len() {
            if !graph.cells[index].is_active {
                continue;
            }
            let (x, y) = graph.cells[index].coords;
            for direction in Direction::ALL {
                let (dx, dy) = direction.offset();
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                    continue;
                }
                let other = graph.index_of(nx as u32, ny as u32);
                if graph.cells[other].is_active {
                    graph.cells[index].neighbors[direction.index()] = Some(other);
                }
            }
        }

        graph
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

    /// Convert (x, y) coordinates to the grid index.
    #[must_use]
    pub const fn index_of(&self, x: u32, y: u32) -> usize {
        (x as usize) * (self.height as usize) + (y as usize)
    }

    /// All cells in index order, inactive slots included.
    #[must_use]
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// The cell at a grid index, if the index is in range.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<&GridCell> {
        self.cells.get(index)
    }

    /// Active cell indices in ascending order.
    pub fn active_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .filter(|cell| cell.is_active)
            .map(|cell| cell.index)
    }

    /// Number of active cells.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_active).count()
    }

    /// World position of a cell's geometric center.
    #[must_use]
    pub fn cell_center(&self, index: usize) -> Vec2Fixed {
        let (x, y) = self.cells[index].coords;
        let half = self.cell_size / Fixed::from_num(2);
        Vec2Fixed::new(
            Fixed::from_num(x) * self.cell_size + half,
            Fixed::from_num(y) * self.cell_size + half,
        )
    }

    /// Grid index containing a world position, or `None` when outside
    /// the grid bounds.
    #[must_use]
    pub fn index_at_position(&self, position: Vec2Fixed) -> Option<usize> {
        if position.x < Fixed::ZERO || position.y < Fixed::ZERO {
            return None;
        }
        let x = (position.x / self.cell_size).to_num::<i64>();
        let y = (position.y / self.cell_size).to_num::<i64>();
        if x >= 0 && x < self.width as i64 && y >= 0 && y < self.height as i64 {
            Some(self.index_of(x as u32, y as u32))
        } else {
            None
        }
    }
}
