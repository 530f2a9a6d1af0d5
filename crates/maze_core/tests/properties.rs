//! Property-based tests over parsing, graph construction and generation.

use maze_core::controller::{MapController, NullEvents};
use maze_core::grid::{Direction, GridGraph};
use maze_core::layout::MapLayout;
use maze_core::navigation::GridNavigator;

use maze_test_utils::determinism::strategies::{arb_layout_text, arb_seed};
use maze_test_utils::fixtures::{test_config, RecordingFactory};
use proptest::prelude::*;

proptest! {
    /// Every neighbor link is mirrored by the opposite link on the
    /// neighbor, for any valid layout.
    #[test]
    fn prop_neighbor_links_are_symmetric(text in arb_layout_text(12, 12)) {
        let layout = MapLayout::parse(&text).unwrap();
        let graph = GridGraph::build(&layout);
        for cell in graph.cells() {
            for direction in Direction::ALL {
                if let Some(other) = cell.neighbor(direction) {
                    let back = graph.cells()[other].neighbor(direction.opposite());
                    prop_assert_eq!(back, Some(cell.index));
                }
            }
        }
    }

    /// Only active cells carry links, and links only point at active cells.
    #[test]
    fn prop_links_connect_active_cells_only(text in arb_layout_text(12, 12)) {
        let layout = MapLayout::parse(&text).unwrap();
        let graph = GridGraph::build(&layout);
        for cell in graph.cells() {
            for direction in Direction::ALL {
                if let Some(other) = cell.neighbor(direction) {
                    prop_assert!(cell.is_active);
                    prop_assert!(graph.cells()[other].is_active);
                }
            }
        }
    }

    /// Parsing then re-serializing a layout reproduces the text exactly.
    #[test]
    fn prop_parse_to_text_round_trips(text in arb_layout_text(12, 12)) {
        let layout = MapLayout::parse(&text).unwrap();
        prop_assert_eq!(layout.to_text(), text.clone());
        let reparsed = MapLayout::parse(&layout.to_text()).unwrap();
        prop_assert_eq!(reparsed, layout);
    }

    /// The graph preserves the layout's active-cell population.
    #[test]
    fn prop_graph_preserves_active_population(text in arb_layout_text(12, 12)) {
        let layout = MapLayout::parse(&text).unwrap();
        let graph = GridGraph::build(&layout);
        prop_assert_eq!(graph.cells().len(), layout.len());
        prop_assert_eq!(graph.active_count(), layout.active_count());
    }

    /// Generation from any layout and seed is reproducible: two fresh
    /// controllers with identical inputs produce identical outcomes.
    #[test]
    fn prop_generation_is_reproducible(
        text in arb_layout_text(8, 8),
        seed in arb_seed(),
    ) {
        let run = || {
            let mut controller = MapController::new(
                test_config(&text, seed),
                RecordingFactory::default(),
                GridNavigator,
                NullEvents,
            );
            controller.initialize_grid().unwrap()
        };
        prop_assert_eq!(run(), run());
    }

    /// Layouts survive a binary serialization round trip bit-exactly.
    #[test]
    fn prop_layout_bincode_round_trips(text in arb_layout_text(12, 12)) {
        let layout = MapLayout::parse(&text).unwrap();
        let bytes = bincode::serialize(&layout).unwrap();
        let restored: MapLayout = bincode::deserialize(&bytes).unwrap();
        prop_assert_eq!(restored, layout);
    }
}

#[test]
fn generation_outcome_bincode_round_trips() {
    let mut controller = MapController::new(
        test_config(maze_test_utils::fixtures::TWISTY_5X5, 99),
        RecordingFactory::default(),
        GridNavigator,
        NullEvents,
    );
    let outcome = controller.initialize_grid().unwrap();
    let bytes = bincode::serialize(&outcome).unwrap();
    let restored: maze_core::controller::GenerationOutcome =
        bincode::deserialize(&bytes).unwrap();
    assert_eq!(restored, outcome);
}
