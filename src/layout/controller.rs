//! One graph instance: entities in, positions, edges and a viewport out.

use std::collections::HashMap;

use eframe::egui::{Pos2, Vec2};
use tracing::{debug, info};

use super::config::{ForceConfig, LayoutProfile};
use super::fit::fit_viewport;
use super::highlight::{Emphasis, Highlight};
use super::labels::place_labels;
use super::physics::{LayoutNode, Link, Simulation};
use super::relations::{Edge, derive_edges};
use super::scheduler::{FrameLoop, FrameScheduler};
use super::seed::seed_positions;
use super::viewport::{Viewport, ViewportController};
use super::zone::{Zone, ZoneSet};
use crate::entity::{Entity, EntityLoad, LoadWarning, validate_entities};

type ClickHandler = Box<dyn FnMut(&Entity)>;

/// Upper bound on the positional overlap passes run once a layout settles.
const SETTLE_RELAX_PASSES: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No run is armed.
    Idle,
    Stepped,
    /// The run finished during this frame and the loop was released.
    Settled { fitted: bool },
}

/// Owns the simulation, the edge list and the viewport of one graph.
///
/// Lifecycle: `new`, then `load_entities` (any number of times), with the
/// host calling `tick` whenever its scheduler fires.
pub struct GraphController {
    profile: LayoutProfile,
    simulation: Simulation,
    edges: Vec<Edge>,
    zones: ZoneSet,
    viewport: ViewportController,
    frame_loop: FrameLoop,
    has_fitted: bool,
    highlight: Highlight,
    hovered_zone: Option<usize>,
    warnings: Vec<LoadWarning>,
    on_click: Option<ClickHandler>,
}

impl GraphController {
    pub fn new(profile: LayoutProfile) -> Self {
        let zones = profile.zones.resolve(&[], profile.fallback_radius);
        Self {
            simulation: Simulation::new(Vec::new(), Vec::new(), profile.forces),
            edges: Vec::new(),
            zones,
            viewport: ViewportController::new(profile.zoom),
            frame_loop: FrameLoop::default(),
            has_fitted: false,
            highlight: Highlight::default(),
            hovered_zone: None,
            warnings: Vec::new(),
            on_click: None,
            profile,
        }
    }

    /// Replaces the whole graph and starts a fresh run. Any run in flight is
    /// cancelled first; no node survives from the previous set.
    pub fn load_entities(
        &mut self,
        entities: Vec<Entity>,
        scheduler: &mut dyn FrameScheduler,
    ) -> &[LoadWarning] {
        self.frame_loop.cancel();

        let submitted = entities.len();
        let EntityLoad { accepted, warnings } = validate_entities(entities);

        let edges = derive_edges(&accepted, self.profile.ties);
        let zones = self
            .profile
            .zones
            .resolve(&accepted, self.profile.fallback_radius);
        let anchors = zones.anchors(&accepted);
        let positions = seed_positions(&accepted, &anchors, &zones, self.profile.seeding);

        let index_by_id = accepted
            .iter()
            .enumerate()
            .map(|(index, entity)| (entity.id.as_str(), index))
            .collect::<HashMap<_, _>>();
        let links = edges
            .iter()
            .filter_map(|edge| {
                Some(Link {
                    from: *index_by_id.get(edge.source_id.as_str())?,
                    to: *index_by_id.get(edge.target_id.as_str())?,
                    weight: edge.weight,
                })
            })
            .collect::<Vec<_>>();

        let nodes = accepted
            .into_iter()
            .zip(positions)
            .zip(anchors)
            .map(|((entity, position), anchor)| LayoutNode::new(entity, position, anchor))
            .collect::<Vec<_>>();

        info!(
            kind = self.profile.kind.label(),
            accepted = nodes.len(),
            rejected = submitted - nodes.len(),
            edges = edges.len(),
            "loaded entities"
        );

        self.simulation = Simulation::new(nodes, links, self.profile.forces);
        place_labels(self.simulation.nodes_mut(), &self.profile.labels);
        self.edges = edges;
        self.zones = zones;
        self.warnings = warnings;
        self.highlight = Highlight::default();
        self.hovered_zone = None;
        self.has_fitted = false;
        self.frame_loop.arm(scheduler);

        &self.warnings
    }

    /// Rebuilds the current entity set from fresh seeds.
    pub fn restart(&mut self, scheduler: &mut dyn FrameScheduler) {
        let entities = self
            .simulation
            .nodes()
            .iter()
            .map(|node| node.entity.clone())
            .collect();
        let warnings = std::mem::take(&mut self.warnings);
        self.load_entities(entities, scheduler);
        self.warnings = warnings;
    }

    /// Applies new force constants and re-runs from the current positions.
    pub fn set_forces(&mut self, forces: ForceConfig, scheduler: &mut dyn FrameScheduler) {
        self.profile.forces = forces;
        self.simulation.set_forces(forces);
        self.simulation.reheat();
        self.has_fitted = false;
        self.frame_loop.arm(scheduler);
    }

    pub fn on_node_click<F>(&mut self, handler: F)
    where
        F: FnMut(&Entity) + 'static,
    {
        self.on_click = Some(Box::new(handler));
    }

    /// Runs one frame of the loop: at most one physics step, then either asks
    /// for the next frame or, on settling, fits the view once and stops.
    pub fn tick(&mut self, scheduler: &mut dyn FrameScheduler) -> FrameOutcome {
        if !self.frame_loop.is_armed() {
            return FrameOutcome::Idle;
        }

        if self.simulation.step() {
            place_labels(self.simulation.nodes_mut(), &self.profile.labels);
        }

        if !self.simulation.is_settled() {
            self.frame_loop.request_next(scheduler);
            return FrameOutcome::Stepped;
        }

        self.frame_loop.cancel();
        let passes = self.simulation.separate_overlaps(SETTLE_RELAX_PASSES);
        if passes > 0 {
            place_labels(self.simulation.nodes_mut(), &self.profile.labels);
        }
        let fitted = if self.has_fitted {
            false
        } else {
            self.has_fitted = true;
            self.fit_to_view()
        };
        debug!(steps = self.simulation.steps(), passes, fitted, "layout settled");
        FrameOutcome::Settled { fitted }
    }

    /// Keeps a live loop scheduled across frames that run no step.
    pub fn request_frame(&self, scheduler: &mut dyn FrameScheduler) {
        self.frame_loop.request_next(scheduler);
    }

    /// Frames the current positions. Leaves the viewport alone when there is
    /// nothing sensible to frame.
    pub fn fit_to_view(&mut self) -> bool {
        let Some(viewport) = fit_viewport(
            self.simulation.nodes().iter().map(|node| node.position),
            self.zones.zones(),
            &self.profile.fit,
            self.viewport.container(),
        ) else {
            debug!("fit skipped, nothing to frame");
            return false;
        };

        let applied = self.viewport.set_viewport(viewport);
        if applied {
            debug!(?viewport, "fitted view");
        }
        applied
    }

    /// Records a new container size. Once the layout has settled this refits
    /// from the last positions; the physics is never restarted.
    pub fn resize(&mut self, container: Vec2) -> bool {
        self.viewport.set_container(container);
        if self.has_fitted && self.simulation.is_settled() {
            return self.fit_to_view();
        }
        false
    }

    /// Index of the node under a container pixel, nearest first.
    pub fn node_at(&self, pixel: Pos2) -> Option<usize> {
        let logical = self.viewport.logical_at(pixel).to_vec2();
        let radius_sq = self.simulation.forces().node_radius.powi(2);
        self.simulation
            .nodes()
            .iter()
            .enumerate()
            .map(|(index, node)| (index, (node.position - logical).length_sq()))
            .filter(|&(_, distance_sq)| distance_sq <= radius_sq)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    pub fn pointer_pressed(&mut self, pixel: Pos2) {
        self.viewport.begin_pan(pixel);
    }

    pub fn pointer_moved(&mut self, pixel: Pos2) {
        if self.viewport.is_panning() {
            self.viewport.pan_to(pixel);
        }
        self.hover(self.node_at(pixel));
        self.hovered_zone = self.zones.zone_at(self.viewport.logical_at(pixel).to_vec2());
    }

    pub fn pointer_released(&mut self) {
        self.viewport.end_pan();
    }

    pub fn pointer_left(&mut self) {
        self.viewport.pointer_left();
        self.hover(None);
        self.hovered_zone = None;
    }

    /// One wheel notch at `pixel`; positive `direction` zooms out.
    pub fn scrolled(&mut self, direction: f32, pixel: Pos2) -> bool {
        self.viewport.zoom(direction, Some(pixel))
    }

    /// Resolves a click to a node and hands its entity to the click handler.
    pub fn clicked(&mut self, pixel: Pos2) -> Option<&Entity> {
        let index = self.node_at(pixel)?;
        let entity = &self.simulation.nodes()[index].entity;
        if let Some(handler) = self.on_click.as_mut() {
            handler(entity);
        }
        Some(entity)
    }

    fn hover(&mut self, index: Option<usize>) {
        if self.highlight.focus() == index {
            return;
        }
        self.highlight = match index {
            Some(index) => Highlight::new(index, self.simulation.links()),
            None => Highlight::default(),
        };
    }

    pub fn profile(&self) -> &LayoutProfile {
        &self.profile
    }

    pub fn forces(&self) -> &ForceConfig {
        &self.profile.forces
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        self.simulation.nodes()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges resolved to node indices, in the same order as `edges()`.
    pub fn links(&self) -> &[Link] {
        self.simulation.links()
    }

    pub fn zones(&self) -> &ZoneSet {
        &self.zones
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.viewport()
    }

    pub fn viewport_controller(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn hovered_index(&self) -> Option<usize> {
        self.highlight.focus()
    }

    pub fn hovered(&self) -> Option<&LayoutNode> {
        self.hovered_index()
            .and_then(|index| self.simulation.nodes().get(index))
    }

    /// Zone disc under the pointer, if any.
    pub fn hovered_zone(&self) -> Option<&Zone> {
        self.hovered_zone
            .and_then(|index| self.zones.zones().get(index))
    }

    pub fn node_emphasis(&self, index: usize) -> Emphasis {
        self.highlight.node(index)
    }

    pub fn link_emphasis(&self, index: usize) -> Emphasis {
        self.highlight.link(index)
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.is_armed()
    }

    pub fn is_settled(&self) -> bool {
        self.simulation.is_settled()
    }

    pub fn alpha(&self) -> f32 {
        self.simulation.alpha()
    }

    pub fn steps(&self) -> usize {
        self.simulation.steps()
    }

    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use eframe::egui::{pos2, vec2};

    use super::*;
    use crate::layout::scheduler::ManualScheduler;

    fn settle(controller: &mut GraphController, scheduler: &mut ManualScheduler) -> usize {
        scheduler.run_until_idle(1_000, |scheduler| {
            controller.tick(scheduler);
        })
    }

    fn sample() -> Vec<Entity> {
        vec![
            Entity::new("a", "Alpha").with_tags(["Environment"]).with_cross_refs(["r1"]),
            Entity::new("b", "Beta").with_tags(["Environment"]).with_cross_refs(["r1"]),
            Entity::new("c", "Gamma").with_tags(["Education"]),
        ]
    }

    #[test]
    fn load_then_run_settles_and_fits_once() {
        let mut controller = GraphController::new(LayoutProfile::organisations());
        let mut scheduler = ManualScheduler::new();
        controller.resize(vec2(900.0, 700.0));
        controller.load_entities(sample(), &mut scheduler);
        assert!(controller.is_running());

        let frames = settle(&mut controller, &mut scheduler);
        assert_eq!(frames, ForceConfig::ORGANISATIONS.settle_steps());
        assert!(controller.is_settled());
        assert!(!controller.is_running());
        assert!(controller.viewport().is_valid());
        assert_eq!(controller.tick(&mut scheduler), FrameOutcome::Idle);
    }

    #[test]
    fn malformed_entities_are_reported_not_fatal() {
        let mut controller = GraphController::new(LayoutProfile::organisations());
        let mut scheduler = ManualScheduler::new();
        let mut entities = sample();
        entities.push(Entity::new("", "No id"));
        entities.push(Entity::new("a", "Dup"));

        let warnings = controller.load_entities(entities, &mut scheduler).to_vec();
        assert_eq!(warnings.len(), 2);
        assert_eq!(controller.nodes().len(), 3);
        assert_eq!(controller.edges().len(), 1);
    }

    #[test]
    fn empty_load_settles_on_the_first_frame() {
        let mut controller = GraphController::new(LayoutProfile::team());
        let mut scheduler = ManualScheduler::new();
        let before = controller.viewport();
        controller.load_entities(Vec::new(), &mut scheduler);

        assert_eq!(
            controller.tick(&mut scheduler),
            FrameOutcome::Settled { fitted: false }
        );
        assert_eq!(controller.viewport(), before);
    }

    #[test]
    fn reloading_cancels_the_previous_run() {
        let mut controller = GraphController::new(LayoutProfile::organisations());
        let mut scheduler = ManualScheduler::new();
        controller.load_entities(sample(), &mut scheduler);
        for _ in 0..10 {
            controller.tick(&mut scheduler);
        }

        controller.load_entities(sample()[..2].to_vec(), &mut scheduler);
        assert_eq!(controller.nodes().len(), 2);
        assert_eq!(controller.steps(), 0);
        assert_eq!(controller.alpha(), 1.0);
    }

    #[test]
    fn clicking_a_node_reports_its_entity() {
        let mut controller = GraphController::new(LayoutProfile::organisations());
        let mut scheduler = ManualScheduler::new();
        controller.resize(vec2(900.0, 700.0));
        controller.load_entities(sample(), &mut scheduler);
        settle(&mut controller, &mut scheduler);

        let clicked = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&clicked);
        controller.on_node_click(move |entity| *sink.borrow_mut() = Some(entity.id.clone()));

        let target = controller.nodes()[2].position;
        let pixel = controller.viewport_controller().pixel_at(Pos2::ZERO + target);
        let entity = controller.clicked(pixel).map(|entity| entity.id.clone());

        assert_eq!(entity.as_deref(), Some("c"));
        assert_eq!(clicked.borrow().as_deref(), Some("c"));
    }

    #[test]
    fn hover_does_not_touch_positions() {
        let mut controller = GraphController::new(LayoutProfile::organisations());
        let mut scheduler = ManualScheduler::new();
        controller.resize(vec2(900.0, 700.0));
        controller.load_entities(sample(), &mut scheduler);
        settle(&mut controller, &mut scheduler);

        let before = controller.nodes().to_vec();
        let pixel = controller
            .viewport_controller()
            .pixel_at(Pos2::ZERO + controller.nodes()[0].position);
        controller.pointer_moved(pixel);

        assert_eq!(controller.hovered_index(), Some(0));
        assert_eq!(controller.node_emphasis(0), Emphasis::Focus);
        assert_eq!(controller.node_emphasis(1), Emphasis::Neighbor);
        assert_eq!(controller.node_emphasis(2), Emphasis::Faded);
        assert_eq!(controller.nodes(), before.as_slice());

        controller.pointer_left();
        assert_eq!(controller.hovered_index(), None);
        assert_eq!(controller.node_emphasis(2), Emphasis::Normal);
    }

    #[test]
    fn resize_before_settling_waits_for_the_auto_fit() {
        let mut controller = GraphController::new(LayoutProfile::organisations());
        let mut scheduler = ManualScheduler::new();
        controller.load_entities(sample(), &mut scheduler);
        let before = controller.viewport();
        assert!(!controller.resize(vec2(640.0, 480.0)));
        assert_eq!(controller.viewport(), before);

        settle(&mut controller, &mut scheduler);
        let fitted = controller.viewport();
        assert_ne!(fitted, before);
        assert!(controller.resize(vec2(640.0, 480.0)));
        assert!(controller.resize(vec2(640.0, 480.0)));
        assert_eq!(controller.viewport(), fitted);
    }

    #[test]
    fn pixel_far_from_every_node_hits_nothing() {
        let mut controller = GraphController::new(LayoutProfile::organisations());
        let mut scheduler = ManualScheduler::new();
        controller.load_entities(sample(), &mut scheduler);
        assert_eq!(controller.node_at(pos2(-5_000.0, -5_000.0)), None);
    }

    #[test]
    fn hovering_a_zone_disc_names_it_until_the_pointer_leaves() {
        let mut controller = GraphController::new(LayoutProfile::organisations());
        let mut scheduler = ManualScheduler::new();
        controller.resize(vec2(900.0, 700.0));
        controller.load_entities(sample(), &mut scheduler);

        controller.pointer_moved(pos2(450.0, 350.0));
        assert_eq!(
            controller.hovered_zone().map(|zone| zone.key.as_str()),
            Some("Systems")
        );

        controller.pointer_left();
        assert!(controller.hovered_zone().is_none());
    }
}
