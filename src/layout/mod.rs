//! Force-directed layout for the organisation and team networks.

pub mod config;
pub mod controller;
pub mod fit;
pub mod highlight;
pub mod labels;
pub mod physics;
pub mod relations;
pub mod scheduler;
pub mod seed;
pub mod viewport;
pub mod zone;

pub use config::{
    FitConfig, ForceConfig, ForceOverrides, GraphKind, LabelConfig, LayoutProfile, Seeding,
    TuningOverrides, ZoomConfig,
};
pub use controller::{FrameOutcome, GraphController};
pub use highlight::Emphasis;
pub use physics::{LayoutNode, Link, Simulation};
pub use relations::{Edge, TieWeights, derive_edges};
pub use scheduler::{CancelToken, FixedStepClock, FrameLoop, FrameScheduler, ManualScheduler};
pub use viewport::{Viewport, ViewportController};
pub use zone::{Anchor, ImpactDomain, Zone, ZonePlan, ZoneSet};
