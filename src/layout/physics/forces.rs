use eframe::egui::Vec2;

use super::{LayoutNode, Link};
use crate::util::golden_direction;

#[derive(Clone, Copy)]
pub(super) struct PairParams {
    pub(super) repulsion: f32,
    pub(super) min_separation: f32,
    pub(super) collision_strength: f32,
}

/// Unit direction from `b` to `a` plus the true distance. Coincident points get
/// a fixed direction and a distance of zero.
fn separation(a: Vec2, b: Vec2, i: usize, j: usize) -> (Vec2, f32) {
    let delta = a - b;
    let distance_sq = delta.length_sq();
    if distance_sq > 0.0 {
        let distance = distance_sq.sqrt();
        (delta / distance, distance)
    } else {
        (golden_direction(i, j), 0.0)
    }
}

/// Repulsion followed by collision correction for every unordered pair.
///
/// Repulsion scales with `alpha`; the collision term does not, so overlaps
/// keep resolving while the run cools.
pub(super) fn apply_pair_forces(nodes: &mut [LayoutNode], params: PairParams, alpha: f32) {
    let node_count = nodes.len();
    for i in 0..node_count {
        for j in (i + 1)..node_count {
            let (direction, distance) = separation(nodes[i].position, nodes[j].position, i, j);

            let distance_sq = (distance * distance).max(1.0);
            let mut impulse = direction * (alpha * params.repulsion / distance_sq);

            if distance < params.min_separation {
                let overlap = params.min_separation - distance;
                impulse += direction * (overlap * params.collision_strength);
            }

            nodes[i].velocity += impulse;
            nodes[j].velocity -= impulse;
        }
    }
}

/// One positional pass: every pair closer than `min_separation` moves apart by
/// half the overlap each. Returns the largest overlap seen before moving.
pub(super) fn relax_overlaps(nodes: &mut [LayoutNode], min_separation: f32) -> f32 {
    let mut worst = 0.0f32;
    let node_count = nodes.len();
    for i in 0..node_count {
        for j in (i + 1)..node_count {
            let (direction, distance) = separation(nodes[i].position, nodes[j].position, i, j);
            if distance >= min_separation {
                continue;
            }

            let overlap = min_separation - distance;
            worst = worst.max(overlap);
            let push = direction * (overlap * 0.5);
            nodes[i].position += push;
            nodes[j].position -= push;
        }
    }
    worst
}

/// Springs toward `rest_length`, scaled by each link's weight.
pub(super) fn apply_links(
    nodes: &mut [LayoutNode],
    links: &[Link],
    rest_length: f32,
    strength: f32,
    alpha: f32,
) {
    for link in links {
        if link.from == link.to || link.from >= nodes.len() || link.to >= nodes.len() {
            continue;
        }

        let delta = nodes[link.to].position - nodes[link.from].position;
        let distance = match delta.length() {
            distance if distance > 0.0 => distance,
            _ => 1.0,
        };
        let pull = strength * link.weight * alpha * (distance - rest_length) / distance;
        let impulse = delta * pull;

        nodes[link.from].velocity += impulse;
        nodes[link.to].velocity -= impulse;
    }
}

pub(super) fn apply_zone_pull(nodes: &mut [LayoutNode], strength: f32, alpha: f32) {
    for node in nodes {
        let target = node.anchor.target();
        node.velocity += (target - node.position) * (strength * alpha);
    }
}

pub(super) fn apply_center_pull(nodes: &mut [LayoutNode], strength: f32, alpha: f32) {
    for node in nodes {
        node.velocity -= node.position * (strength * alpha);
    }
}

pub(super) fn integrate(nodes: &mut [LayoutNode], damping: f32) {
    for node in nodes {
        node.velocity *= damping;
        node.position += node.velocity;
    }
}
