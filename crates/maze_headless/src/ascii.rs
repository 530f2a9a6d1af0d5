//! ASCII maze renderer for terminal review.
//!
//! Renders a generated maze from the controller's read-only views.
//! Walls come out as `#`, corridors as spaces, plus one glyph per cell:
//! `S` spawn, `D` destination, `o` obstacle, `*` light.

use maze_core::cell::CellFactory;
use maze_core::controller::{GenerationEvents, MapController};
use maze_core::grid::Direction;
use maze_core::navigation::Navigator;

/// ASCII rendering options.
#[derive(Debug, Clone)]
pub struct AsciiConfig {
    /// Render `o` on cells holding an obstacle.
    pub show_obstacles: bool,
    /// Render `*` on cells with a room light.
    pub show_lights: bool,
}

impl Default for AsciiConfig {
    fn default() -> Self {
        Self {
            show_obstacles: true,
            show_lights: true,
        }
    }
}

/// Render the controller's current maze as ASCII art.
///
/// Returns an empty string when no generation is committed. Each cell
/// maps to a 2×2 block plus a shared border, so a w×h maze renders as
/// (2w+1)×(2h+1) characters with the top line being the highest grid
/// row.
pub fn render_maze<F, N, E>(controller: &MapController<F, N, E>, config: &AsciiConfig) -> String
where
    F: CellFactory,
    N: Navigator,
    E: GenerationEvents,
{
    let (Some(graph), Some(outcome)) = (controller.graph(), controller.outcome()) else {
        return String::new();
    };

    let width = graph.width() as usize;
    let height = graph.height() as usize;
    let canvas_width = width * 2 + 1;
    let canvas_height = height * 2 + 1;
    let mut canvas = vec![vec![b'#'; canvas_width]; canvas_height];

    for cell in graph.cells().iter().filter(|cell| cell.is_active) {
        let (x, y) = cell.coords;
        // Top canvas line is the highest grid row.
        let row = (height - 1 - y as usize) * 2 + 1;
        let col = x as usize * 2 + 1;

        let state = controller.cell_state(cell.index);
        let glyph = if cell.index == outcome.spawn_index {
            b'S'
        } else if cell.index == outcome.destination_index {
            b'D'
        } else if config.show_obstacles && state.is_some_and(|s| s.obstacle.is_some()) {
            b'o'
        } else if config.show_lights && state.is_some_and(|s| s.light) {
            b'*'
        } else {
            b' '
        };
        canvas[row][col] = glyph;

        // Carve open walls. East opens to the right, North opens upward.
        if cell.has_neighbor(Direction::East) {
            canvas[row][col + 1] = b' ';
        }
        if cell.has_neighbor(Direction::North) {
            canvas[row - 1][col] = b' ';
        }
        if cell.has_neighbor(Direction::West) {
            canvas[row][col - 1] = b' ';
        }
        if cell.has_neighbor(Direction::South) {
            canvas[row + 1][col] = b' ';
        }
    }

    let mut out = String::with_capacity(canvas_height * (canvas_width + 1));
    for row in canvas {
        out.push_str(&String::from_utf8_lossy(&row));
        out.push('\n');
    }
    out
}
