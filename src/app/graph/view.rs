use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};

use impact_graph::layout::{Emphasis, FrameOutcome};
use impact_graph::util::initials;

use super::super::render_utils::{
    ScreenMap, circle_visible, draw_background, edge_stroke, edge_visible, emphasised, rgb,
    with_alpha,
};
use super::super::{RepaintScheduler, ViewModel};

const NODE_FALLBACK_COLOR: Color32 = Color32::from_rgb(140, 140, 150);

impl ViewModel {
    /// Runs however many fixed steps this frame's time covers.
    fn advance_layout(&mut self, ui: &Ui) {
        let frame_seconds = ui.input(|input| input.stable_dt).clamp(0.0, 0.25);
        let ctx = ui.ctx().clone();
        let mut scheduler = RepaintScheduler { ctx: &ctx };

        if !self.controller.is_running() {
            self.clock.reset();
            return;
        }

        let steps = self.clock.advance(frame_seconds);
        for _ in 0..steps {
            if !matches!(self.controller.tick(&mut scheduler), FrameOutcome::Stepped) {
                self.clock.reset();
                return;
            }
        }
        if steps == 0 {
            self.controller.request_frame(&mut scheduler);
        }
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        self.handle_graph_resize(rect);
        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(ui, rect, &response);
        self.handle_graph_hover(rect, &response);
        self.handle_graph_click(rect, &response);

        self.advance_layout(ui);

        let controller = &self.controller;
        let map = ScreenMap::new(rect, controller.viewport_controller());
        draw_background(&painter, rect, &map);

        if controller.nodes().is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No entities to lay out for this graph.",
                FontId::proportional(15.0),
                Color32::from_gray(90),
            );
            return;
        }

        let zones = controller.zones().zones();
        if self.show_zones {
            for zone in zones {
                let center = map.point(zone.center);
                let radius = map.length(zone.radius);
                if !circle_visible(rect, center, radius) {
                    continue;
                }
                let color = rgb(zone.color);
                painter.circle_filled(center, radius, with_alpha(color, 26));
                painter.circle_stroke(center, radius, Stroke::new(1.2, with_alpha(color, 110)));
                painter.text(
                    center - vec2(0.0, radius + 6.0),
                    Align2::CENTER_BOTTOM,
                    &zone.label,
                    FontId::proportional(14.0),
                    with_alpha(color, 220),
                );
            }

            if controller.hovered().is_none()
                && let Some(zone) = controller.hovered_zone()
            {
                painter.text(
                    map.point(zone.center),
                    Align2::CENTER_CENTER,
                    &zone.label,
                    FontId::proportional(24.0),
                    Color32::from_rgb(26, 26, 26),
                );
            }
        }

        let nodes = controller.nodes();
        for (index, link) in controller.links().iter().enumerate() {
            let start = map.point(nodes[link.from].position);
            let end = map.point(nodes[link.to].position);
            if !edge_visible(rect, start, end, 2.0) {
                continue;
            }
            let stroke = edge_stroke(link.weight, controller.link_emphasis(index), map.scale());
            painter.line_segment([start, end], stroke);
        }

        let radius = map.length(controller.forces().node_radius).max(3.0);
        let font_size = (radius * 0.7).clamp(8.0, 20.0);
        for (index, node) in nodes.iter().enumerate() {
            let position = map.point(node.position);
            if !circle_visible(rect, position, radius + 2.0) {
                continue;
            }

            let emphasis = controller.node_emphasis(index);
            let base = node
                .anchor
                .primary_zone()
                .and_then(|zone| zones.get(zone))
                .map_or(NODE_FALLBACK_COLOR, |zone| rgb(zone.color));
            let color = emphasised(base, emphasis);

            painter.circle_filled(position, radius, color);
            let outline = if emphasis == Emphasis::Focus {
                Stroke::new(2.4, Color32::from_rgb(40, 36, 32))
            } else {
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(255, 255, 255, 200))
            };
            painter.circle_stroke(position, radius, outline);

            if radius >= 9.0 {
                painter.text(
                    position,
                    Align2::CENTER_CENTER,
                    initials(&node.entity.display_name),
                    FontId::proportional(font_size),
                    Color32::WHITE,
                );
            }

            if self.show_labels && emphasis != Emphasis::Faded {
                let label = map.point(node.label);
                if rect.contains(label) {
                    painter.text(
                        label,
                        Align2::CENTER_TOP,
                        &node.entity.display_name,
                        FontId::proportional(12.0),
                        Color32::from_gray(40),
                    );
                }
            }
        }

        if let Some(node) = controller.hovered() {
            let panel_text = format!(
                "{}  |  {}  |  refs {}",
                node.entity.display_name,
                node.entity.primary_tag().unwrap_or("untagged"),
                node.entity.cross_ref_ids.len()
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                panel_text,
                FontId::proportional(13.0),
                Color32::from_gray(30),
            );
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }
    }
}
