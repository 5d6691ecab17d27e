use std::cell::RefCell;
use std::rc::Rc;

use eframe::egui::Vec2;
use tracing::info;

use impact_graph::entity::{DataFile, Entity};
use impact_graph::layout::{
    FixedStepClock, FrameScheduler, GraphController, GraphKind, TuningOverrides,
};

use super::super::ViewModel;

fn entities_for(data: &DataFile, kind: GraphKind) -> Vec<Entity> {
    match kind {
        GraphKind::Organisations => data.organisation_entities(),
        GraphKind::Team => data.team_entities(),
    }
}

impl ViewModel {
    pub(in crate::app) fn new(
        data: DataFile,
        kind: GraphKind,
        tuning: TuningOverrides,
        scheduler: &mut dyn FrameScheduler,
    ) -> Self {
        let profile = tuning.profile(kind);
        let forces = profile.forces;
        let mut model = Self {
            data,
            kind,
            tuning,
            controller: GraphController::new(profile),
            forces,
            selected: Rc::new(RefCell::new(None)),
            clock: FixedStepClock::default(),
            last_container: Vec2::ZERO,
            show_zones: true,
            show_labels: true,
        };
        model.rebuild_graph(scheduler);
        model
    }

    /// Throws away the current controller and lays out the active graph kind
    /// from scratch.
    pub(in crate::app) fn rebuild_graph(&mut self, scheduler: &mut dyn FrameScheduler) {
        let profile = self.tuning.profile(self.kind);
        self.forces = profile.forces;
        self.controller = GraphController::new(profile);
        self.selected.replace(None);
        self.clock.reset();
        self.last_container = Vec2::ZERO;

        let selected = Rc::clone(&self.selected);
        self.controller.on_node_click(move |entity| {
            selected.replace(Some(entity.clone()));
        });

        let entities = entities_for(&self.data, self.kind);
        let warnings = self.controller.load_entities(entities, scheduler).len();
        info!(kind = self.kind.label(), warnings, "graph rebuilt");
    }

    pub(in crate::app) fn switch_kind(&mut self, kind: GraphKind, scheduler: &mut dyn FrameScheduler) {
        if self.kind == kind {
            return;
        }
        self.kind = kind;
        self.rebuild_graph(scheduler);
    }

    /// Pushes slider values into the running layout when they differ.
    pub(in crate::app) fn apply_forces(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.forces == *self.controller.forces() {
            return;
        }
        self.controller.set_forces(self.forces, scheduler);
    }

    pub(in crate::app) fn reset_forces(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.forces = self.tuning.profile(self.kind).forces;
        self.apply_forces(scheduler);
    }
}
