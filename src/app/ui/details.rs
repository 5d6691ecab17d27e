use eframe::egui::{self, RichText, Ui};

use super::super::ViewModel;

impl ViewModel {
    /// Strongest ties of an entity, named, heaviest first.
    fn related_for_details(&self, id: &str, limit: usize) -> Vec<(String, f32)> {
        let mut related: Vec<(String, f32)> = self
            .controller
            .edges()
            .iter()
            .filter(|edge| edge.touches(id))
            .map(|edge| {
                let other = if edge.source_id == id {
                    &edge.target_id
                } else {
                    &edge.source_id
                };
                let name = self
                    .controller
                    .nodes()
                    .iter()
                    .find(|node| node.id() == other.as_str())
                    .map_or_else(|| other.clone(), |node| node.entity.display_name.clone());
                (name, edge.weight)
            })
            .collect();
        related.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        related.truncate(limit);
        related
    }

    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(entity) = self.selected.borrow().clone() else {
            ui.label("Click a node in the graph to inspect it.");
            return;
        };

        ui.label(RichText::new(&entity.display_name).strong());
        ui.small(entity.id.as_str());
        ui.add_space(6.0);

        if let Some(summary) = &entity.summary {
            ui.label(summary.as_str());
            ui.add_space(6.0);
        }

        if entity.category_tags.is_empty() {
            ui.label("Tags: none");
        } else {
            ui.label(format!("Tags: {}", entity.category_tags.join(", ")));
        }
        if !entity.cross_ref_ids.is_empty() {
            ui.label(format!("Cross references: {}", entity.cross_ref_ids.join(", ")));
        }
        if let Some(url) = &entity.image_url {
            ui.hyperlink_to("Image", url);
        }

        ui.separator();
        let related = self.related_for_details(&entity.id, 32);
        ui.label(RichText::new(format!("Related entities ({})", related.len())).strong());
        if related.is_empty() {
            ui.label("No shared references, tags or groups.");
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt("related_entities")
            .show(ui, |ui| {
                for (name, weight) in related {
                    ui.label(format!("{name}  (tie {weight:.1})"));
                }
            });
    }
}
