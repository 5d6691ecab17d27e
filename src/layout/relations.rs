//! Weighted relationships derived from shared entity attributes.
//!
//! Every unordered pair is scanned, so cost grows with the square of the
//! entity count. Graphs here hold tens of participants; loading thousands
//! will make each load (and each physics step) visibly slow.

use std::collections::{BTreeSet, HashMap};

use serde::Deserialize;

use crate::entity::Entity;
use crate::util::normalize_tag;

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TieWeights {
    /// Per shared cross-reference id ("strong tie").
    pub shared_reference: f32,
    /// Per shared category tag ("weak tie").
    pub shared_tag: f32,
    /// Added once when both entities have the same primary tag.
    pub shared_group: f32,
}

/// Unordered, weighted relationship. `source_id` always sorts before `target_id`.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub source_id: String,
    pub target_id: String,
    pub weight: f32,
}

impl Edge {
    pub fn touches(&self, id: &str) -> bool {
        self.source_id == id || self.target_id == id
    }
}

struct Profile<'a> {
    id: &'a str,
    references: BTreeSet<&'a str>,
    tags: BTreeSet<String>,
    group: Option<String>,
}

impl<'a> Profile<'a> {
    fn new(entity: &'a Entity) -> Self {
        Self {
            id: entity.id.as_str(),
            references: entity
                .cross_ref_ids
                .iter()
                .map(|reference| reference.as_str())
                .filter(|reference| !reference.is_empty())
                .collect(),
            tags: entity
                .category_tags
                .iter()
                .map(|tag| normalize_tag(tag))
                .filter(|tag| !tag.is_empty())
                .collect(),
            group: entity.primary_tag().map(normalize_tag),
        }
    }
}

pub fn pair_weight(a: &Entity, b: &Entity, ties: TieWeights) -> f32 {
    weight_between(&Profile::new(a), &Profile::new(b), ties)
}

fn weight_between(a: &Profile<'_>, b: &Profile<'_>, ties: TieWeights) -> f32 {
    let shared_references = a.references.intersection(&b.references).count();
    let shared_tags = a.tags.intersection(&b.tags).count();
    let same_group = a.group.is_some() && a.group == b.group;

    let mut weight = 0.0;
    if shared_references > 0 {
        weight += shared_references as f32 * ties.shared_reference;
    }
    if shared_tags > 0 {
        weight += shared_tags as f32 * ties.shared_tag;
    }
    if same_group {
        weight += ties.shared_group;
    }
    weight
}

/// All edges with positive weight, sorted by `(source_id, target_id)`. The
/// result does not depend on the order of `entities`. Entities sharing an id
/// are treated as one participant and never linked to themselves.
pub fn derive_edges(entities: &[Entity], ties: TieWeights) -> Vec<Edge> {
    let profiles = entities.iter().map(Profile::new).collect::<Vec<_>>();
    let mut edges: HashMap<(&str, &str), f32> = HashMap::new();

    for i in 0..profiles.len() {
        for j in (i + 1)..profiles.len() {
            let (a, b) = (&profiles[i], &profiles[j]);
            if a.id == b.id {
                continue;
            }

            let weight = weight_between(a, b, ties);
            if !(weight > 0.0) || !weight.is_finite() {
                continue;
            }

            let key = if a.id < b.id { (a.id, b.id) } else { (b.id, a.id) };
            edges.entry(key).or_insert(weight);
        }
    }

    let mut edges = edges
        .into_iter()
        .map(|((source_id, target_id), weight)| Edge {
            source_id: source_id.to_owned(),
            target_id: target_id.to_owned(),
            weight,
        })
        .collect::<Vec<_>>();
    edges.sort_by(|a, b| {
        a.source_id
            .cmp(&b.source_id)
            .then_with(|| a.target_id.cmp(&b.target_id))
    });
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORGANISATION_TIES: TieWeights = TieWeights {
        shared_reference: 4.0,
        shared_tag: 1.2,
        shared_group: 0.0,
    };

    #[test]
    fn strong_and_weak_ties_accumulate_into_one_edge() {
        let entities = [
            Entity::new("b", "B")
                .with_cross_refs(["w1", "w2", "w2"])
                .with_tags(["Education"]),
            Entity::new("a", "A")
                .with_cross_refs(["w2", "w1", "w9"])
                .with_tags(["education", "Community"]),
        ];

        let edges = derive_edges(&entities, ORGANISATION_TIES);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source_id, "a");
        assert_eq!(edges[0].target_id, "b");
        assert!((edges[0].weight - (2.0 * 4.0 + 1.2)).abs() < 1e-6);
    }

    #[test]
    fn unrelated_pairs_produce_no_edge() {
        let entities = [
            Entity::new("a", "A").with_tags(["Environment"]),
            Entity::new("b", "B").with_tags(["Community"]),
        ];
        assert!(derive_edges(&entities, ORGANISATION_TIES).is_empty());
    }

    #[test]
    fn group_ties_link_members_of_the_same_pod() {
        let ties = TieWeights {
            shared_reference: 0.0,
            shared_tag: 0.0,
            shared_group: 1.0,
        };
        let entities = [
            Entity::new("a", "A").with_tags(["Land"]),
            Entity::new("b", "B").with_tags(["Land", "Story"]),
            Entity::new("c", "C").with_tags(["Story"]),
        ];
        let edges = derive_edges(&entities, ties);
        assert_eq!(edges.len(), 1);
        assert!(edges[0].touches("a") && edges[0].touches("b"));
        assert_eq!(pair_weight(&entities[1], &entities[2], ties), 0.0);
    }

    #[test]
    fn zero_weights_disable_a_tie_kind() {
        let entities = [
            Entity::new("a", "A").with_cross_refs(["w1"]),
            Entity::new("b", "B").with_cross_refs(["w1"]),
        ];
        let ties = TieWeights {
            shared_reference: 0.0,
            ..ORGANISATION_TIES
        };
        assert!(derive_edges(&entities, ties).is_empty());
    }

    #[test]
    fn duplicate_ids_never_create_self_edges() {
        let entities = [
            Entity::new("a", "A").with_cross_refs(["w1"]),
            Entity::new("a", "A copy").with_cross_refs(["w1"]),
        ];
        assert!(derive_edges(&entities, ORGANISATION_TIES).is_empty());
    }
}
