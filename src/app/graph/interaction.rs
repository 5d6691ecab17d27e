use eframe::egui::{self, Pos2, Rect, Ui, Vec2};

use super::super::ViewModel;

fn local(rect: Rect, screen: Pos2) -> Pos2 {
    Pos2::ZERO + (screen - rect.min)
}

impl ViewModel {
    pub(in crate::app) fn handle_graph_resize(&mut self, rect: Rect) {
        let size = rect.size();
        if size == self.last_container {
            return;
        }
        self.last_container = size;
        self.controller.resize(size);
    }

    /// Wheel zoom over the graph. The scroll is consumed so nothing else on
    /// the page scrolls while the pointer is here.
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }
        ui.ctx().input_mut(|input| {
            input.raw_scroll_delta = Vec2::ZERO;
            input.smooth_scroll_delta = Vec2::ZERO;
        });

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        // egui reports wheel-up as positive; wheel-up zooms in.
        self.controller.scrolled(-scroll.signum(), local(rect, pointer));
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if response.drag_started() {
            let origin = ui
                .input(|input| input.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            if let Some(origin) = origin {
                self.controller.pointer_pressed(local(rect, origin));
            }
        }

        if response.dragged()
            && let Some(pointer) = response.interact_pointer_pos()
        {
            self.controller.pointer_moved(local(rect, pointer));
        }

        if response.drag_stopped() {
            self.controller.pointer_released();
        }
    }

    pub(in crate::app) fn handle_graph_hover(&mut self, rect: Rect, response: &egui::Response) {
        match response.hover_pos() {
            Some(pointer) if !response.dragged() => {
                self.controller.pointer_moved(local(rect, pointer));
            }
            Some(_) => {}
            None => {
                if self.controller.hovered_index().is_some()
                    || self.controller.viewport_controller().is_panning()
                {
                    self.controller.pointer_left();
                }
            }
        }
    }

    pub(in crate::app) fn handle_graph_click(&mut self, rect: Rect, response: &egui::Response) {
        if !response.clicked_by(egui::PointerButton::Primary) {
            return;
        }
        if let Some(pointer) = response.interact_pointer_pos() {
            self.controller.clicked(local(rect, pointer));
        }
    }
}
