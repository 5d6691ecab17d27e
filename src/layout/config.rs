//! Named tuning constants for both network visualisations.
//!
//! The two graphs were tuned by eye, independently, so each keeps its own
//! profile instead of sharing one set of "correct" numbers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{Vec2, vec2};
use serde::Deserialize;

use super::relations::TieWeights;
use super::viewport::Viewport;
use super::zone::ZonePlan;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GraphKind {
    Organisations,
    Team,
}

impl GraphKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Organisations => "Organisations",
            Self::Team => "Team",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    pub repulsion: f32,
    /// Visual radius of a node; also the hover/click hit radius.
    pub node_radius: f32,
    pub collision_padding: f32,
    pub collision_strength: f32,
    pub link_distance: f32,
    pub link_strength: f32,
    pub zone_strength: f32,
    pub center_strength: f32,
    pub damping: f32,
    pub alpha_decay: f32,
    pub alpha_min: f32,
}

impl ForceConfig {
    pub const ORGANISATIONS: Self = Self {
        repulsion: 1500.0,
        node_radius: 30.0,
        collision_padding: 25.0,
        collision_strength: 0.2,
        link_distance: 140.0,
        link_strength: 0.01,
        zone_strength: 0.012,
        center_strength: 0.003,
        damping: 0.82,
        alpha_decay: 0.98,
        alpha_min: 0.005,
    };

    pub const TEAM: Self = Self {
        repulsion: 1800.0,
        node_radius: 44.0,
        collision_padding: 32.0,
        collision_strength: 0.25,
        link_distance: 120.0,
        link_strength: 0.01,
        zone_strength: 0.016,
        center_strength: 0.003,
        damping: 0.82,
        alpha_decay: 0.98,
        alpha_min: 0.005,
    };

    /// Closest two node centres may sit before the collision pass pushes them apart.
    pub fn min_separation(&self) -> f32 {
        self.node_radius * 2.0 + self.collision_padding
    }

    /// Number of steps a fresh run (alpha = 1) takes to settle.
    pub fn settle_steps(&self) -> usize {
        if !(self.alpha_decay > 0.0 && self.alpha_decay < 1.0) || !(self.alpha_min > 0.0) {
            return 0;
        }
        if self.alpha_min >= 1.0 {
            return 0;
        }
        (self.alpha_min.ln() / self.alpha_decay.ln()).ceil() as usize
    }
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self::ORGANISATIONS
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum Seeding {
    /// Zone centroid plus hashed jitter in `±jitter`.
    Scatter { jitter: f32 },
    /// Rings inside each zone, `per_ring` members per ring.
    Ring {
        per_ring: usize,
        inset: f32,
        ring_gap: f32,
        jitter: f32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Half-extent added around every node centre, per axis.
    pub node_padding: [f32; 2],
    pub include_zones: bool,
    /// Extra room around each zone disc when zones are included.
    pub zone_padding: [f32; 2],
    /// Fraction of the container left empty around the content.
    pub margin: f32,
    /// Floor for logical-units-per-pixel; keeps tiny graphs from being blown up.
    pub min_scale: f32,
    pub fallback_container: [f32; 2],
}

impl FitConfig {
    pub fn node_padding(&self) -> Vec2 {
        vec2(self.node_padding[0], self.node_padding[1])
    }

    pub fn zone_padding(&self) -> Vec2 {
        vec2(self.zone_padding[0], self.zone_padding[1])
    }

    pub fn fallback_container(&self) -> Vec2 {
        vec2(self.fallback_container[0], self.fallback_container[1])
    }
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            node_padding: [60.0, 60.0],
            include_zones: false,
            zone_padding: [0.0, 0.0],
            margin: 0.2,
            min_scale: 1.0,
            fallback_container: [900.0, 700.0],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub zoom_out_factor: f32,
    pub zoom_in_factor: f32,
    pub min_size: [f32; 2],
    pub max_size: [f32; 2],
    pub initial: [f32; 4],
}

impl ZoomConfig {
    pub fn min_size(&self) -> Vec2 {
        vec2(self.min_size[0], self.min_size[1])
    }

    pub fn max_size(&self) -> Vec2 {
        vec2(self.max_size[0], self.max_size[1])
    }

    pub fn initial_viewport(&self) -> Viewport {
        let [x, y, width, height] = self.initial;
        Viewport::new(x, y, width, height)
    }
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            zoom_out_factor: 1.05,
            zoom_in_factor: 0.95,
            min_size: [300.0, 250.0],
            max_size: [4000.0, 3000.0],
            initial: [-450.0, -350.0, 900.0, 700.0],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub offset: f32,
    pub width: f32,
    pub height: f32,
    pub padding: f32,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            offset: 48.0,
            width: 120.0,
            height: 20.0,
            padding: 6.0,
        }
    }
}

/// Everything that differs between the organisation graph and the team graph.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutProfile {
    pub kind: GraphKind,
    pub zones: ZonePlan,
    pub ties: TieWeights,
    pub forces: ForceConfig,
    pub seeding: Seeding,
    /// Radius of the circle unmatched nodes are spread on.
    pub fallback_radius: f32,
    pub fit: FitConfig,
    pub zoom: ZoomConfig,
    pub labels: LabelConfig,
}

impl LayoutProfile {
    pub fn organisations() -> Self {
        Self {
            kind: GraphKind::Organisations,
            zones: ZonePlan::impact_domains(),
            ties: TieWeights {
                shared_reference: 4.0,
                shared_tag: 1.2,
                shared_group: 0.0,
            },
            forces: ForceConfig::ORGANISATIONS,
            seeding: Seeding::Scatter { jitter: 25.0 },
            fallback_radius: 150.0,
            fit: FitConfig::default(),
            zoom: ZoomConfig::default(),
            labels: LabelConfig::default(),
        }
    }

    pub fn team() -> Self {
        Self {
            kind: GraphKind::Team,
            zones: ZonePlan::team_grid(),
            ties: TieWeights {
                shared_reference: 0.0,
                shared_tag: 0.0,
                shared_group: 1.0,
            },
            forces: ForceConfig::TEAM,
            seeding: Seeding::Ring {
                per_ring: 7,
                inset: 40.0,
                ring_gap: 55.0,
                jitter: 9.0,
            },
            fallback_radius: 150.0,
            fit: FitConfig {
                node_padding: [90.0, 110.0],
                include_zones: true,
                zone_padding: [120.0, 140.0],
                margin: 0.1,
                ..FitConfig::default()
            },
            zoom: ZoomConfig::default(),
            labels: LabelConfig {
                offset: 70.0,
                width: 140.0,
                height: 22.0,
                padding: 10.0,
            },
        }
    }

    pub fn for_kind(kind: GraphKind) -> Self {
        match kind {
            GraphKind::Organisations => Self::organisations(),
            GraphKind::Team => Self::team(),
        }
    }
}

/// Partial force settings; only the fields present replace profile values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForceOverrides {
    pub repulsion: Option<f32>,
    pub node_radius: Option<f32>,
    pub collision_padding: Option<f32>,
    pub collision_strength: Option<f32>,
    pub link_distance: Option<f32>,
    pub link_strength: Option<f32>,
    pub zone_strength: Option<f32>,
    pub center_strength: Option<f32>,
    pub damping: Option<f32>,
    pub alpha_decay: Option<f32>,
    pub alpha_min: Option<f32>,
}

impl ForceOverrides {
    pub fn apply_to(&self, forces: &mut ForceConfig) {
        let fields = [
            (self.repulsion, &mut forces.repulsion),
            (self.node_radius, &mut forces.node_radius),
            (self.collision_padding, &mut forces.collision_padding),
            (self.collision_strength, &mut forces.collision_strength),
            (self.link_distance, &mut forces.link_distance),
            (self.link_strength, &mut forces.link_strength),
            (self.zone_strength, &mut forces.zone_strength),
            (self.center_strength, &mut forces.center_strength),
            (self.damping, &mut forces.damping),
            (self.alpha_decay, &mut forces.alpha_decay),
            (self.alpha_min, &mut forces.alpha_min),
        ];
        for (value, slot) in fields {
            if let Some(value) = value.filter(|value| value.is_finite()) {
                *slot = value;
            }
        }
        forces.node_radius = forces.node_radius.max(0.0);
        forces.collision_padding = forces.collision_padding.max(0.0);
        forces.damping = forces.damping.clamp(0.0, 0.999);
        forces.alpha_decay = forces.alpha_decay.clamp(0.5, 0.9999);
        forces.alpha_min = forces.alpha_min.clamp(1e-5, 0.5);
    }
}

/// Contents of a `--tuning` file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TuningOverrides {
    pub organisations: ForceOverrides,
    pub team: ForceOverrides,
}

impl TuningOverrides {
    pub fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read tuning file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse tuning file {}", path.display()))
    }

    pub fn profile(&self, kind: GraphKind) -> LayoutProfile {
        let mut profile = LayoutProfile::for_kind(kind);
        match kind {
            GraphKind::Organisations => self.organisations.apply_to(&mut profile.forces),
            GraphKind::Team => self.team.apply_to(&mut profile.forces),
        }
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_decay_settles_in_about_262_steps() {
        assert_eq!(ForceConfig::ORGANISATIONS.settle_steps(), 263);
    }

    #[test]
    fn min_separation_is_twice_radius_plus_padding() {
        assert_eq!(ForceConfig::ORGANISATIONS.min_separation(), 85.0);
        assert_eq!(ForceConfig::TEAM.min_separation(), 120.0);
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let overrides: TuningOverrides =
            serde_json::from_str(r#"{"team": {"repulsion": 900.0, "damping": 2.0}}"#)
                .expect("valid tuning json");

        let team = overrides.profile(GraphKind::Team);
        assert_eq!(team.forces.repulsion, 900.0);
        assert_eq!(team.forces.link_distance, ForceConfig::TEAM.link_distance);
        assert!(team.forces.damping < 1.0);

        let organisations = overrides.profile(GraphKind::Organisations);
        assert_eq!(organisations.forces, ForceConfig::ORGANISATIONS);
    }

    #[test]
    fn negative_sizes_cannot_disable_collision() {
        let overrides: TuningOverrides = serde_json::from_str(
            r#"{"organisations": {"node_radius": -30.0, "collision_padding": -100.0}}"#,
        )
        .expect("valid tuning json");

        let forces = overrides.profile(GraphKind::Organisations).forces;
        assert_eq!(forces.node_radius, 0.0);
        assert_eq!(forces.collision_padding, 0.0);
        assert!(forces.min_separation() >= 0.0);
    }

    #[test]
    fn unknown_tuning_fields_are_rejected() {
        let parsed = serde_json::from_str::<TuningOverrides>(r#"{"team": {"gravity": 1.0}}"#);
        assert!(parsed.is_err());
    }
}
