//! Starting positions for a freshly loaded entity set.

use std::collections::HashSet;
use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use super::config::Seeding;
use super::zone::{Anchor, ZoneSet};
use crate::entity::Entity;
use crate::util::{golden_direction, stable_pair};

const NUDGE_DISTANCE: f32 = 5.0;

/// One position per entity, in input order. No two returned positions are equal.
pub fn seed_positions(
    entities: &[Entity],
    anchors: &[Anchor],
    zones: &ZoneSet,
    seeding: Seeding,
) -> Vec<Vec2> {
    let mut positions = match seeding {
        Seeding::Scatter { jitter } => entities
            .iter()
            .zip(anchors)
            .map(|(entity, anchor)| match anchor {
                Anchor::Fallback { seed, .. } => *seed,
                Anchor::Zones { target, .. } => *target + hashed_offset(&entity.id, jitter),
            })
            .collect::<Vec<_>>(),
        Seeding::Ring {
            per_ring,
            inset,
            ring_gap,
            jitter,
        } => ring_positions(entities, anchors, zones, per_ring, inset, ring_gap, jitter),
    };

    separate_coincident(&mut positions);
    positions
}

fn hashed_offset(id: &str, jitter: f32) -> Vec2 {
    let (x, y) = stable_pair(id);
    vec2(x, y) * jitter
}

fn ring_positions(
    entities: &[Entity],
    anchors: &[Anchor],
    zones: &ZoneSet,
    per_ring: usize,
    inset: f32,
    ring_gap: f32,
    jitter: f32,
) -> Vec<Vec2> {
    let per_ring = per_ring.max(1);
    let mut members = vec![0usize; zones.zones().len()];
    for anchor in anchors {
        if let Some(zone) = anchor.primary_zone() {
            members[zone] += 1;
        }
    }

    let mut placed = vec![0usize; zones.zones().len()];
    entities
        .iter()
        .zip(anchors)
        .map(|(entity, anchor)| {
            let (Some(index), Anchor::Zones { target, .. }) = (anchor.primary_zone(), anchor) else {
                return match anchor {
                    Anchor::Fallback { seed, .. } => *seed,
                    Anchor::Zones { target, .. } => *target,
                };
            };

            let zone = &zones.zones()[index];
            let count = members[index].max(1);
            let slot = placed[index];
            placed[index] += 1;

            let angle = TAU * slot as f32 / count as f32;
            let ring = if count > per_ring { slot / per_ring } else { 0 };
            let (wobble, _) = stable_pair(&entity.id);
            let radius = (zone.radius - inset + ring as f32 * ring_gap + wobble * jitter).max(0.0);

            // Multi-zone members still orbit their own centroid.
            *target + vec2(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

fn position_key(position: Vec2) -> (u32, u32) {
    // `+ 0.0` folds -0.0 into 0.0 so both compare as one point.
    ((position.x + 0.0).to_bits(), (position.y + 0.0).to_bits())
}

/// Moves later duplicates of an occupied point along a golden-angle direction
/// until every position is distinct.
pub fn separate_coincident(positions: &mut [Vec2]) {
    let mut occupied = HashSet::with_capacity(positions.len());
    for index in 0..positions.len() {
        let mut attempt = 0usize;
        while !occupied.insert(position_key(positions[index])) {
            attempt += 1;
            positions[index] += golden_direction(index, attempt) * NUDGE_DISTANCE * attempt as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::zone::ZonePlan;

    fn assert_distinct(positions: &[Vec2]) {
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn scatter_stays_within_jitter_of_the_zone() {
        let zones = ZonePlan::impact_domains().resolve(&[], 150.0);
        let entities = (0..6)
            .map(|index| Entity::new(format!("e{index}"), "E").with_tags(["Education"]))
            .collect::<Vec<_>>();
        let anchors = zones.anchors(&entities);
        let positions = seed_positions(&entities, &anchors, &zones, Seeding::Scatter { jitter: 25.0 });

        for position in &positions {
            let offset = *position - vec2(180.0, 120.0);
            assert!(offset.x.abs() <= 25.5 && offset.y.abs() <= 25.5, "{offset:?}");
        }
        assert_distinct(&positions);
    }

    #[test]
    fn seeding_is_reproducible() {
        let zones = ZonePlan::impact_domains().resolve(&[], 150.0);
        let entities = [
            Entity::new("a", "A").with_tags(["Community"]),
            Entity::new("b", "B"),
        ];
        let anchors = zones.anchors(&entities);
        let seeding = Seeding::Scatter { jitter: 25.0 };
        assert_eq!(
            seed_positions(&entities, &anchors, &zones, seeding),
            seed_positions(&entities, &anchors, &zones, seeding)
        );
    }

    #[test]
    fn rings_wrap_after_the_configured_count() {
        let entities = (0..9)
            .map(|index| Entity::new(format!("m{index}"), "M").with_tags(["Land"]))
            .collect::<Vec<_>>();
        let zones = ZonePlan::team_grid().resolve(&entities, 150.0);
        let anchors = zones.anchors(&entities);
        let seeding = Seeding::Ring {
            per_ring: 7,
            inset: 40.0,
            ring_gap: 55.0,
            jitter: 0.0,
        };
        let positions = seed_positions(&entities, &anchors, &zones, seeding);
        let radius = zones.zones()[0].radius;

        assert!((positions[0].length() - (radius - 40.0)).abs() < 1e-3);
        assert!((positions[8].length() - (radius - 40.0 + 55.0)).abs() < 1e-3);
        assert_distinct(&positions);
    }

    #[test]
    fn coincident_points_are_nudged_apart() {
        let mut positions = vec![Vec2::ZERO, Vec2::ZERO, vec2(-0.0, 0.0), vec2(5.0, 5.0)];
        separate_coincident(&mut positions);
        assert_distinct(&positions);
        assert_eq!(positions[0], Vec2::ZERO);
        assert_eq!(positions[3], vec2(5.0, 5.0));
    }
}
