use std::collections::HashSet;

use eframe::egui::{pos2, vec2};
use proptest::prelude::*;
use proptest::test_runner::Config;

use impact_graph::entity::Entity;
use impact_graph::layout::seed::seed_positions;
use impact_graph::layout::{LayoutProfile, TieWeights, ViewportController, ZoomConfig, derive_edges};

const TIES: TieWeights = TieWeights {
    shared_reference: 4.0,
    shared_tag: 1.2,
    shared_group: 0.0,
};

fn entity_strategy() -> impl Strategy<Value = Entity> {
    (
        "[a-f]{1,3}",
        prop::collection::vec(
            prop::sample::select(vec!["Environment", "Community", "Education", "Food Systems", "Other"]),
            0..3,
        ),
        prop::collection::vec("r[0-4]", 0..4),
    )
        .prop_map(|(id, tags, refs)| {
            Entity::new(id.clone(), format!("Entity {id}"))
                .with_tags(tags)
                .with_cross_refs(refs)
        })
}

/// Distinct ids, as the loader guarantees before edges are derived.
fn entities_strategy() -> impl Strategy<Value = Vec<Entity>> {
    prop::collection::vec(entity_strategy(), 0..14).prop_map(|entities| {
        let mut seen = HashSet::new();
        entities
            .into_iter()
            .filter(|entity| seen.insert(entity.id.clone()))
            .collect()
    })
}

proptest! {
    #![proptest_config(Config::with_cases(96))]

    #[test]
    fn edges_ignore_input_order(
        (entities, shuffled) in entities_strategy()
            .prop_flat_map(|entities| (Just(entities.clone()), Just(entities).prop_shuffle()))
    ) {
        let first = derive_edges(&entities, TIES);
        prop_assert_eq!(&first, &derive_edges(&entities, TIES));
        prop_assert_eq!(first, derive_edges(&shuffled, TIES));
    }

    #[test]
    fn edges_have_no_loops_or_parallel_pairs(entities in entities_strategy()) {
        let edges = derive_edges(&entities, TIES);
        let mut pairs = HashSet::new();
        for edge in &edges {
            prop_assert_ne!(&edge.source_id, &edge.target_id);
            prop_assert!(edge.weight > 0.0);
            let pair = if edge.source_id < edge.target_id {
                (edge.source_id.clone(), edge.target_id.clone())
            } else {
                (edge.target_id.clone(), edge.source_id.clone())
            };
            prop_assert!(pairs.insert(pair));
        }
    }

    #[test]
    fn seeded_positions_never_coincide(entities in entities_strategy(), team in any::<bool>()) {
        let profile = if team { LayoutProfile::team() } else { LayoutProfile::organisations() };
        let zones = profile.zones.resolve(&entities, profile.fallback_radius);
        let anchors = zones.anchors(&entities);
        let positions = seed_positions(&entities, &anchors, &zones, profile.seeding);

        prop_assert_eq!(positions.len(), entities.len());
        let mut seen = HashSet::new();
        for position in positions {
            prop_assert!(position.x.is_finite() && position.y.is_finite());
            prop_assert!(seen.insert((position.x.to_bits(), position.y.to_bits())));
        }
    }

    #[test]
    fn wheel_storms_keep_the_viewport_in_bounds(
        directions in prop::collection::vec(prop::sample::select(vec![-1.0f32, 1.0]), 1000),
        focus in (0.0f32..900.0, 0.0f32..700.0),
    ) {
        let zoom = ZoomConfig::default();
        let mut controller = ViewportController::new(zoom);
        controller.set_container(vec2(900.0, 700.0));

        for direction in directions {
            controller.zoom(direction, Some(pos2(focus.0, focus.1)));
            let viewport = controller.viewport();
            prop_assert!(viewport.x.is_finite() && viewport.y.is_finite());
            prop_assert!(viewport.width >= zoom.min_size[0] && viewport.width <= zoom.max_size[0]);
            prop_assert!(viewport.height >= zoom.min_size[1] && viewport.height <= zoom.max_size[1]);
        }
    }
}

#[test]
fn one_sided_wheel_runs_pin_to_the_limits() {
    let zoom = ZoomConfig::default();
    let mut controller = ViewportController::new(zoom);
    controller.set_container(vec2(900.0, 700.0));

    for _ in 0..1000 {
        controller.zoom(1.0, Some(pos2(10.0, 10.0)));
    }
    assert_eq!(controller.viewport().width, zoom.max_size[0]);
    assert_eq!(controller.viewport().height, zoom.max_size[1]);

    for _ in 0..1000 {
        controller.zoom(-1.0, None);
    }
    assert_eq!(controller.viewport().width, zoom.min_size[0]);
    assert_eq!(controller.viewport().height, zoom.min_size[1]);
}
