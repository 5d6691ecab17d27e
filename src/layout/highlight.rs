use std::collections::HashSet;

use super::physics::Link;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    /// Nothing is hovered.
    Normal,
    /// The hovered node itself.
    Focus,
    /// Directly linked to the hovered node.
    Neighbor,
    Faded,
}

/// Hover emphasis derived from the edge list. Read-only with respect to the
/// simulation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Highlight {
    focus: Option<usize>,
    related_nodes: HashSet<usize>,
    related_links: HashSet<usize>,
}

impl Highlight {
    pub fn new(focus: usize, links: &[Link]) -> Self {
        let mut related_nodes = HashSet::new();
        let mut related_links = HashSet::new();
        for (index, link) in links.iter().enumerate() {
            let other = if link.from == focus {
                link.to
            } else if link.to == focus {
                link.from
            } else {
                continue;
            };
            related_nodes.insert(other);
            related_links.insert(index);
        }

        Self {
            focus: Some(focus),
            related_nodes,
            related_links,
        }
    }

    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    pub fn node(&self, index: usize) -> Emphasis {
        match self.focus {
            None => Emphasis::Normal,
            Some(focus) if focus == index => Emphasis::Focus,
            Some(_) if self.related_nodes.contains(&index) => Emphasis::Neighbor,
            Some(_) => Emphasis::Faded,
        }
    }

    /// Links touching the focus count as `Focus`.
    pub fn link(&self, index: usize) -> Emphasis {
        match self.focus {
            None => Emphasis::Normal,
            Some(_) if self.related_links.contains(&index) => Emphasis::Focus,
            Some(_) => Emphasis::Faded,
        }
    }
}
