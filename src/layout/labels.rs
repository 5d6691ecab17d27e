use std::collections::BTreeMap;

use eframe::egui::vec2;

use super::config::LabelConfig;
use super::physics::LayoutNode;

/// Puts each label below its node, then pushes labels down within a cluster
/// until no two boxes in that cluster overlap.
pub fn place_labels(nodes: &mut [LayoutNode], config: &LabelConfig) {
    let mut clusters: BTreeMap<Option<usize>, Vec<usize>> = BTreeMap::new();
    for (index, node) in nodes.iter_mut().enumerate() {
        node.label = node.position + vec2(0.0, config.offset);
        clusters
            .entry(node.anchor.primary_zone())
            .or_default()
            .push(index);
    }

    let row = config.height + config.padding;
    for mut members in clusters.into_values() {
        members.sort_by(|&a, &b| {
            nodes[a]
                .label
                .y
                .total_cmp(&nodes[b].label.y)
                .then_with(|| nodes[a].label.x.total_cmp(&nodes[b].label.x))
                .then(a.cmp(&b))
        });

        let mut placed: Vec<usize> = Vec::with_capacity(members.len());
        for index in members {
            let mut label = nodes[index].label;
            for &other in &placed {
                let other_label = nodes[other].label;
                // `placed` is ordered by final y, so one pass resolves every conflict.
                if (label.x - other_label.x).abs() < config.width
                    && (label.y - other_label.y).abs() < row
                {
                    label.y = other_label.y + row;
                }
            }
            nodes[index].label = label;

            let at = placed
                .iter()
                .position(|&other| nodes[other].label.y > label.y)
                .unwrap_or(placed.len());
            placed.insert(at, index);
        }
    }
}
