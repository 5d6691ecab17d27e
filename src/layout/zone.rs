use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use crate::entity::Entity;
use crate::util::normalize_tag;

/// Thematic areas the organisation network is clustered by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImpactDomain {
    Environment,
    Community,
    Education,
    FoodSystems,
    Systems,
}

impl ImpactDomain {
    pub const ALL: [Self; 5] = [
        Self::Environment,
        Self::Community,
        Self::Education,
        Self::FoodSystems,
        Self::Systems,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Environment => "Environment",
            Self::Community => "Community",
            Self::Education => "Education",
            Self::FoodSystems => "Food Systems",
            Self::Systems => "Systems",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Environment => "Restoration & Ecology",
            Self::Community => "Community & Culture",
            Self::Education => "Learning & Research",
            Self::FoodSystems => "Food & Nourishment",
            Self::Systems => "Governance & Systems",
        }
    }

    pub fn center(self) -> Vec2 {
        match self {
            Self::Environment => vec2(-180.0, -120.0),
            Self::Community => vec2(180.0, -120.0),
            Self::Education => vec2(180.0, 120.0),
            Self::FoodSystems => vec2(-180.0, 120.0),
            Self::Systems => Vec2::ZERO,
        }
    }

    pub fn color(self) -> [u8; 3] {
        match self {
            Self::Environment => [45, 79, 45],
            Self::Community => [212, 163, 115],
            Self::Education => [74, 78, 105],
            Self::FoodSystems => [142, 154, 175],
            Self::Systems => [229, 225, 221],
        }
    }

    pub fn zone(self) -> Zone {
        Zone::new(self.key(), self.label(), self.center(), self.color(), 240.0)
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|domain| domain.zone().admits(tag))
    }
}

/// Colours cycled over team clusters.
pub const CLUSTER_PALETTE: [[u8; 3]; 6] = [
    [45, 79, 45],
    [212, 163, 115],
    [74, 78, 105],
    [142, 154, 175],
    [165, 161, 157],
    [154, 91, 66],
];

/// A fixed attractor that pulls matching nodes toward its centre.
#[derive(Clone, Debug, PartialEq)]
pub struct Zone {
    pub key: String,
    pub label: String,
    pub center: Vec2,
    pub color: [u8; 3],
    pub radius: f32,
    match_keys: Vec<String>,
}

impl Zone {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        center: Vec2,
        color: [u8; 3],
        radius: f32,
    ) -> Self {
        let key = key.into();
        let label = label.into();
        let mut match_keys = vec![normalize_tag(&key)];
        let label_key = normalize_tag(&label);
        if !match_keys.contains(&label_key) {
            match_keys.push(label_key);
        }
        match_keys.retain(|candidate| !candidate.is_empty());

        Self {
            key,
            label,
            center,
            color,
            radius,
            match_keys,
        }
    }

    /// Whole-tag match against the zone key or label, ignoring case and
    /// surrounding whitespace.
    pub fn admits(&self, tag: &str) -> bool {
        let tag = normalize_tag(tag);
        !tag.is_empty() && self.match_keys.contains(&tag)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Membership {
    /// Every tag is checked; a node may belong to several zones.
    AnyTag,
    /// Only the primary tag (or the fallback group) decides the zone.
    PrimaryTag,
}

/// How the zone set is obtained for a graph.
#[derive(Clone, Debug, PartialEq)]
pub enum ZonePlan {
    Fixed {
        zones: Vec<Zone>,
        membership: Membership,
    },
    /// One zone per distinct primary tag, laid out on a centred grid.
    GroupGrid {
        spacing: [f32; 2],
        fallback_group: String,
        min_radius: f32,
        max_radius: f32,
        radius_per_member: f32,
    },
}

impl ZonePlan {
    pub fn impact_domains() -> Self {
        Self::Fixed {
            zones: ImpactDomain::ALL.into_iter().map(ImpactDomain::zone).collect(),
            membership: Membership::AnyTag,
        }
    }

    pub fn team_grid() -> Self {
        Self::GroupGrid {
            spacing: [520.0, 440.0],
            fallback_group: "General".to_owned(),
            min_radius: 150.0,
            max_radius: 220.0,
            radius_per_member: 20.0,
        }
    }

    pub fn resolve(&self, entities: &[Entity], fallback_radius: f32) -> ZoneSet {
        match self {
            Self::Fixed { zones, membership } => ZoneSet {
                zones: zones.clone(),
                membership: *membership,
                fallback_group: None,
                fallback_radius,
            },
            Self::GroupGrid {
                spacing,
                fallback_group,
                min_radius,
                max_radius,
                radius_per_member,
            } => {
                let mut groups: Vec<(String, String, usize)> = Vec::new();
                for entity in entities {
                    let name = entity.primary_tag().unwrap_or(fallback_group.as_str());
                    let key = normalize_tag(name);
                    match groups.iter_mut().find(|(existing, _, _)| *existing == key) {
                        Some((_, _, count)) => *count += 1,
                        None => groups.push((key, name.to_owned(), 1)),
                    }
                }

                let total = groups.len().max(1);
                let columns = (total as f32).sqrt().ceil() as usize;
                let rows = total.div_ceil(columns);
                let start = vec2(
                    -((columns - 1) as f32 * spacing[0]) / 2.0,
                    -((rows - 1) as f32 * spacing[1]) / 2.0,
                );

                let zones = groups
                    .into_iter()
                    .enumerate()
                    .map(|(index, (_, name, count))| {
                        let column = index % columns;
                        let row = index / columns;
                        let center =
                            start + vec2(column as f32 * spacing[0], row as f32 * spacing[1]);
                        let radius =
                            (count as f32 * radius_per_member).clamp(*min_radius, *max_radius);
                        Zone::new(
                            name.clone(),
                            name,
                            center,
                            CLUSTER_PALETTE[index % CLUSTER_PALETTE.len()],
                            radius,
                        )
                    })
                    .collect();

                ZoneSet {
                    zones,
                    membership: Membership::PrimaryTag,
                    fallback_group: Some(fallback_group.clone()),
                    fallback_radius,
                }
            }
        }
    }
}

/// The zones in effect for one loaded entity set.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneSet {
    zones: Vec<Zone>,
    membership: Membership,
    fallback_group: Option<String>,
    fallback_radius: f32,
}

impl ZoneSet {
    pub fn new(zones: Vec<Zone>, membership: Membership, fallback_radius: f32) -> Self {
        Self {
            zones,
            membership,
            fallback_group: None,
            fallback_radius,
        }
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn fallback_radius(&self) -> f32 {
        self.fallback_radius
    }

    /// Zone whose disc contains `point`; the nearest centre wins where discs
    /// overlap.
    pub fn zone_at(&self, point: Vec2) -> Option<usize> {
        self.zones
            .iter()
            .enumerate()
            .map(|(index, zone)| (index, (zone.center - point).length()))
            .filter(|&(index, distance)| distance <= self.zones[index].radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    /// Indices of every zone the entity belongs to.
    pub fn matching(&self, entity: &Entity) -> Vec<usize> {
        match self.membership {
            Membership::AnyTag => self
                .zones
                .iter()
                .enumerate()
                .filter(|(_, zone)| entity.category_tags.iter().any(|tag| zone.admits(tag)))
                .map(|(index, _)| index)
                .collect(),
            Membership::PrimaryTag => {
                let Some(tag) = entity.primary_tag().or(self.fallback_group.as_deref()) else {
                    return Vec::new();
                };
                self.zones
                    .iter()
                    .position(|zone| zone.admits(tag))
                    .into_iter()
                    .collect()
            }
        }
    }

    /// Attraction target for every entity, in input order.
    pub fn anchors(&self, entities: &[Entity]) -> Vec<Anchor> {
        let matches = entities
            .iter()
            .map(|entity| self.matching(entity))
            .collect::<Vec<_>>();
        let unmatched = matches.iter().filter(|zones| zones.is_empty()).count();

        let mut slot = 0usize;
        matches
            .into_iter()
            .map(|zones| {
                if zones.is_empty() {
                    let anchor = self.fallback_anchor(slot, unmatched);
                    slot += 1;
                    anchor
                } else {
                    let sum = zones
                        .iter()
                        .fold(Vec2::ZERO, |sum, &index| sum + self.zones[index].center);
                    let target = sum / zones.len() as f32;
                    Anchor::Zones { zones, target }
                }
            })
            .collect()
    }

    fn fallback_anchor(&self, slot: usize, count: usize) -> Anchor {
        let angle = (slot as f32 / count.max(1) as f32) * TAU;
        let seed = vec2(angle.cos(), angle.sin()) * self.fallback_radius;
        let target = if count > 1 { seed } else { Vec2::ZERO };
        Anchor::Fallback {
            slot,
            count,
            seed,
            target,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Anchor {
    /// Centroid of all matching zone centres.
    Zones { zones: Vec<usize>, target: Vec2 },
    /// Even spread around the origin for nodes that match no zone.
    Fallback {
        slot: usize,
        count: usize,
        seed: Vec2,
        target: Vec2,
    },
}

impl Anchor {
    pub fn target(&self) -> Vec2 {
        match self {
            Self::Zones { target, .. } | Self::Fallback { target, .. } => *target,
        }
    }

    /// First matching zone; `None` for unmatched nodes.
    pub fn primary_zone(&self) -> Option<usize> {
        match self {
            Self::Zones { zones, .. } => zones.first().copied(),
            Self::Fallback { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn organisation_zones() -> ZoneSet {
        ZonePlan::impact_domains().resolve(&[], 150.0)
    }

    #[test]
    fn membership_is_whole_tag_not_substring() {
        let zones = organisation_zones();
        let entity = Entity::new("a", "A").with_tags(["Food Systems"]);
        let matched = zones.matching(&entity);
        assert_eq!(matched.len(), 1);
        assert_eq!(zones.zones()[matched[0]].key, "Food Systems");
    }

    #[test]
    fn labels_and_case_also_match() {
        assert_eq!(
            ImpactDomain::from_tag("  restoration & ecology "),
            Some(ImpactDomain::Environment)
        );
        assert_eq!(ImpactDomain::from_tag("EDUCATION"), Some(ImpactDomain::Education));
        assert_eq!(ImpactDomain::from_tag("Educational outreach"), None);
    }

    #[test]
    fn multi_zone_nodes_target_the_centroid() {
        let zones = organisation_zones();
        let entity = Entity::new("a", "A").with_tags(["Environment", "Community"]);
        let anchors = zones.anchors(&[entity]);
        assert_eq!(anchors[0].target(), vec2(0.0, -120.0));
        assert_eq!(anchors[0].primary_zone(), Some(0));
    }

    #[test]
    fn unmatched_nodes_spread_on_a_circle() {
        let zones = organisation_zones();
        let entities = (0..4)
            .map(|index| Entity::new(format!("u{index}"), "U"))
            .collect::<Vec<_>>();
        let anchors = zones.anchors(&entities);
        let targets = anchors.iter().map(Anchor::target).collect::<Vec<_>>();

        for target in &targets {
            assert!((target.length() - 150.0).abs() < 1e-3);
        }
        assert!((targets[0] - vec2(150.0, 0.0)).length() < 1e-3);
        assert!((targets[1] - vec2(0.0, 150.0)).length() < 1e-3);
    }

    #[test]
    fn single_unmatched_node_targets_the_origin() {
        let zones = organisation_zones();
        let anchors = zones.anchors(&[Entity::new("solo", "Solo")]);
        assert_eq!(anchors[0].target(), Vec2::ZERO);
        let Anchor::Fallback { seed, .. } = &anchors[0] else {
            panic!("expected fallback anchor");
        };
        assert!((seed.length() - 150.0).abs() < 1e-3);
    }

    #[test]
    fn team_groups_form_a_centred_grid() {
        let entities = [
            Entity::new("a", "A").with_tags(["Land"]),
            Entity::new("b", "B").with_tags(["Story"]),
            Entity::new("c", "C").with_tags(["Community"]),
            Entity::new("d", "D").with_tags(["Education"]),
            Entity::new("e", "E").with_tags(["land"]),
        ];
        let zones = ZonePlan::team_grid().resolve(&entities, 150.0);

        let centers = zones.zones().iter().map(|zone| zone.center).collect::<Vec<_>>();
        assert_eq!(
            centers,
            vec![
                vec2(-260.0, -220.0),
                vec2(260.0, -220.0),
                vec2(-260.0, 220.0),
                vec2(260.0, 220.0),
            ]
        );
        assert_eq!(zones.zones()[0].radius, 150.0);
        assert_eq!(zones.matching(&entities[4]), vec![0]);
    }

    #[test]
    fn untagged_team_members_join_the_general_group() {
        let entities = [
            Entity::new("a", "A"),
            Entity::new("b", "B").with_tags(["Story"]),
        ];
        let zones = ZonePlan::team_grid().resolve(&entities, 150.0);
        assert_eq!(zones.zones()[0].key, "General");
        assert_eq!(zones.matching(&entities[0]), vec![0]);
    }

    #[test]
    fn team_membership_ignores_secondary_tags() {
        let entities = [
            Entity::new("a", "A").with_tags(["Land"]),
            Entity::new("b", "B").with_tags(["Story", "Land"]),
        ];
        let zones = ZonePlan::team_grid().resolve(&entities, 150.0);
        assert_eq!(zones.matching(&entities[1]), vec![1]);
    }

    #[test]
    fn zone_at_prefers_the_nearest_containing_disc() {
        let zones = organisation_zones();
        assert_eq!(zones.zone_at(vec2(-170.0, -110.0)), Some(0));
        assert_eq!(zones.zone_at(Vec2::ZERO), Some(4));
        assert_eq!(zones.zone_at(vec2(2_000.0, 0.0)), None);
    }
}
