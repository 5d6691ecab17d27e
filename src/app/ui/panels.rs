use eframe::egui::{self, Align, Context, Layout};

use impact_graph::layout::GraphKind;

use super::super::{RepaintScheduler, ViewModel};

impl ViewModel {
    fn status_text(&self) -> String {
        if self.controller.is_running() {
            format!("settling, alpha {:.3}", self.controller.alpha())
        } else {
            format!("settled after {} steps", self.controller.steps())
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        let mut scheduler = RepaintScheduler { ctx };

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("impact-graph");
                    ui.separator();

                    let mut kind = self.kind;
                    for option in [GraphKind::Organisations, GraphKind::Team] {
                        ui.selectable_value(&mut kind, option, option.label());
                    }
                    if kind != self.kind {
                        self.switch_kind(kind, &mut scheduler);
                    }
                    ui.separator();

                    ui.label(format!("nodes: {}", self.controller.nodes().len()));
                    ui.label(format!("edges: {}", self.controller.edges().len()));
                    ui.label(self.status_text());

                    if ui
                        .button("Re-run layout")
                        .on_hover_text("Reseed the nodes and run the layout again.")
                        .clicked()
                    {
                        self.controller.restart(&mut scheduler);
                        self.clock.reset();
                    }
                    if ui.button("Fit view").clicked() {
                        self.controller.fit_to_view();
                    }
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload data"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!("source: {source}"));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading network data...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }
}
