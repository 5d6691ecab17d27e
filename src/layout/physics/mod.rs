//! The per-frame physics step.
//!
//! Pair forces are an all-pairs scan, matching the relationship deriver: fine
//! for the tens of nodes these graphs hold, quadratic beyond that.

mod forces;

use eframe::egui::Vec2;

use super::config::ForceConfig;
use super::zone::Anchor;
use crate::entity::Entity;
use forces::{
    PairParams, apply_center_pull, apply_links, apply_pair_forces, apply_zone_pull, integrate,
    relax_overlaps,
};

/// Relaxation stops once no pair overlaps by more than this.
const OVERLAP_TOLERANCE: f32 = 0.01;

/// An entity plus the state the simulation attaches to it.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    pub entity: Entity,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Top-centre of the node's label box, in logical units.
    pub label: Vec2,
    pub anchor: Anchor,
}

impl LayoutNode {
    pub fn new(entity: Entity, position: Vec2, anchor: Anchor) -> Self {
        Self {
            entity,
            position,
            velocity: Vec2::ZERO,
            label: position,
            anchor,
        }
    }

    pub fn id(&self) -> &str {
        &self.entity.id
    }
}

/// An edge resolved to node indices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub from: usize,
    pub to: usize,
    pub weight: f32,
}

#[derive(Clone, Debug)]
pub struct Simulation {
    nodes: Vec<LayoutNode>,
    links: Vec<Link>,
    forces: ForceConfig,
    alpha: f32,
    steps: usize,
}

impl Simulation {
    pub fn new(nodes: Vec<LayoutNode>, links: Vec<Link>, forces: ForceConfig) -> Self {
        Self {
            nodes,
            links,
            forces,
            alpha: 1.0,
            steps: 0,
        }
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    /// Mutable access for post-step passes that do not touch physics state,
    /// such as label placement.
    pub fn nodes_mut(&mut self) -> &mut [LayoutNode] {
        &mut self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn forces(&self) -> &ForceConfig {
        &self.forces
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Steps taken since the last reset.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn is_settled(&self) -> bool {
        self.nodes.is_empty() || !(self.alpha >= self.forces.alpha_min)
    }

    /// Restores full energy without moving any node.
    pub fn reheat(&mut self) {
        self.alpha = 1.0;
        self.steps = 0;
    }

    pub fn set_forces(&mut self, forces: ForceConfig) {
        self.forces = forces;
    }

    /// Advances one time step. Does nothing once settled.
    pub fn step(&mut self) -> bool {
        if self.is_settled() {
            return false;
        }

        let forces = self.forces;
        let alpha = self.alpha;

        apply_pair_forces(
            &mut self.nodes,
            PairParams {
                repulsion: forces.repulsion,
                min_separation: forces.min_separation(),
                collision_strength: forces.collision_strength,
            },
            alpha,
        );
        apply_links(
            &mut self.nodes,
            &self.links,
            forces.link_distance,
            forces.link_strength,
            alpha,
        );
        apply_zone_pull(&mut self.nodes, forces.zone_strength, alpha);
        apply_center_pull(&mut self.nodes, forces.center_strength, alpha);
        integrate(&mut self.nodes, forces.damping);

        self.alpha *= forces.alpha_decay;
        self.steps += 1;
        true
    }

    /// Pushes overlapping pairs apart without touching alpha or velocities,
    /// for at most `max_passes` passes. Returns the passes that moved a node.
    pub fn separate_overlaps(&mut self, max_passes: usize) -> usize {
        let min_separation = self.forces.min_separation();
        if !(min_separation > 0.0) {
            return 0;
        }

        let mut passes = 0;
        while passes < max_passes {
            let worst = relax_overlaps(&mut self.nodes, min_separation);
            if worst <= 0.0 {
                break;
            }
            passes += 1;
            if worst <= OVERLAP_TOLERANCE {
                break;
            }
        }
        passes
    }

    /// Steps until settled or `max_steps` is reached; returns the steps taken.
    pub fn run(&mut self, max_steps: usize) -> usize {
        let mut taken = 0;
        while taken < max_steps && self.step() {
            taken += 1;
        }
        taken
    }
}
