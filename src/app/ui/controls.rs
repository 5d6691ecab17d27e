use std::ops::RangeInclusive;

use eframe::egui::{self, Key, Response, RichText, Ui};

use super::super::{RepaintScheduler, ViewModel};

const SLIDER_KEY_BASE_RATE: f32 = 10.0;
const SLIDER_KEY_ACCEL_PER_SEC: f32 = 9.0;
const SLIDER_KEY_ACCEL_MAX: f32 = 40.0;

#[derive(Clone, Copy, Default)]
struct SliderKeyHoldState {
    positive_secs: f32,
    negative_secs: f32,
}

fn slider_key_accel_multiplier(hold_secs: f32) -> f32 {
    let ramp = hold_secs * SLIDER_KEY_ACCEL_PER_SEC;
    (1.0 + ramp + ramp * ramp * 0.15).min(SLIDER_KEY_ACCEL_MAX)
}

/// Holding an arrow key on a focused slider speeds up the longer it is held.
fn apply_slider_arrow_acceleration(
    ui: &Ui,
    response: &Response,
    value: &mut f32,
    range: &RangeInclusive<f32>,
) -> bool {
    let state_id = response.id.with("arrow_key_hold_state");
    let mut hold_state = ui.ctx().data(|data| {
        data.get_temp::<SliderKeyHoldState>(state_id)
            .unwrap_or_default()
    });

    if !response.has_focus() {
        ui.ctx()
            .data_mut(|data| data.insert_temp(state_id, SliderKeyHoldState::default()));
        return false;
    }

    let (delta_time, increase_down, decrease_down) = ui.input(|input| {
        (
            input.stable_dt.min(0.1),
            input.key_down(Key::ArrowRight) || input.key_down(Key::ArrowUp),
            input.key_down(Key::ArrowLeft) || input.key_down(Key::ArrowDown),
        )
    });

    hold_state.positive_secs = if increase_down {
        hold_state.positive_secs + delta_time
    } else {
        0.0
    };
    hold_state.negative_secs = if decrease_down {
        hold_state.negative_secs + delta_time
    } else {
        0.0
    };
    ui.ctx()
        .data_mut(|data| data.insert_temp(state_id, hold_state));

    let direction = (increase_down as i8) - (decrease_down as i8);
    if direction == 0 {
        return false;
    }

    let hold_secs = if direction > 0 {
        hold_state.positive_secs
    } else {
        hold_state.negative_secs
    };
    let (min, max) = (*range.start(), *range.end());
    let step = ((max - min) / 200.0).max(0.0005);
    let speed = SLIDER_KEY_BASE_RATE * slider_key_accel_multiplier(hold_secs);
    let old_value = *value;
    *value = (*value + direction as f32 * step * speed * delta_time).clamp(min, max);

    ui.ctx().request_repaint();
    (*value - old_value).abs() > f32::EPSILON
}

fn force_slider(
    ui: &mut Ui,
    value: &mut f32,
    range: RangeInclusive<f32>,
    label: &str,
    hint: &str,
) -> bool {
    let response = ui
        .add(
            egui::Slider::new(value, range.clone())
                .text(label)
                .clamping(egui::SliderClamping::Always),
        )
        .on_hover_text(hint);
    if response.hovered() {
        response.request_focus();
    }
    let mut changed = response.changed();
    changed |= apply_slider_arrow_acceleration(ui, &response, value, &range);
    changed
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Layout Controls");
        ui.separator();
        ui.add_space(4.0);

        let mut changed = false;
        let forces = &mut self.forces;

        ui.collapsing("Forces", |ui| {
            changed |= force_slider(
                ui,
                &mut forces.repulsion,
                100.0..=5000.0,
                "Repulsion",
                "How strongly every pair of nodes pushes apart.",
            );
            changed |= force_slider(
                ui,
                &mut forces.link_strength,
                0.0..=0.1,
                "Link strength",
                "Spring stiffness of related pairs, scaled by tie weight.",
            );
            changed |= force_slider(
                ui,
                &mut forces.link_distance,
                20.0..=400.0,
                "Link distance",
                "Rest length of the spring between related nodes.",
            );
            changed |= force_slider(
                ui,
                &mut forces.zone_strength,
                0.0..=0.1,
                "Zone pull",
                "Pull of each node toward its zone centre.",
            );
            changed |= force_slider(
                ui,
                &mut forces.center_strength,
                0.0..=0.05,
                "Centre pull",
                "Weak pull of every node toward the origin.",
            );
            changed |= force_slider(
                ui,
                &mut forces.collision_strength,
                0.0..=1.0,
                "Collision",
                "How hard overlapping nodes are pushed apart each step.",
            );
            changed |= force_slider(
                ui,
                &mut forces.collision_padding,
                0.0..=120.0,
                "Collision padding",
                "Extra gap kept between node edges.",
            );
            changed |= force_slider(
                ui,
                &mut forces.damping,
                0.3..=0.99,
                "Velocity damping",
                "Share of velocity carried into the next step.",
            );
            changed |= force_slider(
                ui,
                &mut forces.alpha_decay,
                0.9..=0.995,
                "Cooling",
                "Alpha multiplier per step; higher runs longer.",
            );
        })
        .header_response
        .on_hover_text("Changing any force reheats the layout.");

        let ctx = ui.ctx().clone();
        let mut scheduler = RepaintScheduler { ctx: &ctx };
        if changed {
            self.apply_forces(&mut scheduler);
        }
        if ui
            .button("Reset forces")
            .on_hover_text("Restore the tuning for this graph kind.")
            .clicked()
        {
            self.reset_forces(&mut scheduler);
        }

        ui.separator();
        ui.checkbox(&mut self.show_zones, "Show zones");
        ui.checkbox(&mut self.show_labels, "Show labels");

        let warnings = self.controller.warnings();
        if !warnings.is_empty() {
            ui.separator();
            ui.label(RichText::new(format!("Skipped entities ({})", warnings.len())).strong());
            egui::ScrollArea::vertical()
                .id_salt("load_warnings")
                .max_height(180.0)
                .show(ui, |ui| {
                    for warning in warnings {
                        ui.label(RichText::new(warning.to_string()).small());
                    }
                });
        }
    }
}
