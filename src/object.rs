//! Celestial object model.
//!
//! A [`CelestialObject`] carries the geometry every kind shares (position,
//! radius, rotation, hue, name) and an [`ObjectParams`] payload with the
//! kind-specific procedural parameters. Parameters are sampled once when the
//! object is generated and only change through the cycling commands in
//! [`crate::cycle`], so repeated redraws keep the same overall shape.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// The six kinds of object that can live on the canvas.
///
/// [`ObjectKind::ALL`] lists them in hit-test priority order, which is also
/// the order the compositor rasterizes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectKind {
    Nebula,
    Galaxy,
    BlackHole,
    StarCluster,
    Pulsar,
    Quasar,
}

/// Radius bounds for one kind, as fractions of `min(viewport_w, viewport_h)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeProfile {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl SizeProfile {
    /// Scale the fractional bounds to pixels for a viewport.
    pub fn scaled(&self, min_dim: f32) -> SizeProfile {
        SizeProfile {
            min: self.min * min_dim,
            max: self.max * min_dim,
            step: self.step * min_dim,
        }
    }

    /// Whether `radius` lies within the bounds, with a small tolerance for
    /// float accumulation.
    pub fn contains(&self, radius: f32) -> bool {
        let tol = self.step * 1e-3;
        radius >= self.min - tol && radius <= self.max + tol
    }
}

impl ObjectKind {
    /// All kinds in hit-test priority order.
    pub const ALL: [ObjectKind; 6] = [
        ObjectKind::Nebula,
        ObjectKind::Galaxy,
        ObjectKind::BlackHole,
        ObjectKind::StarCluster,
        ObjectKind::Pulsar,
        ObjectKind::Quasar,
    ];

    /// Human-readable class label.
    pub fn label(self) -> &'static str {
        match self {
            ObjectKind::Nebula => "Nebula",
            ObjectKind::Galaxy => "Galaxy",
            ObjectKind::BlackHole => "Black Hole",
            ObjectKind::StarCluster => "Star Cluster",
            ObjectKind::Pulsar => "Pulsar",
            ObjectKind::Quasar => "Quasar",
        }
    }

    /// Multiplier from stored radius to on-screen selection box side.
    ///
    /// Small kinds get a generous box so they can be clicked at all, the
    /// nebula box is tighter because its layers spill well past `radius`.
    pub fn border_scale(self) -> f32 {
        match self {
            ObjectKind::Nebula => 0.5,
            ObjectKind::Galaxy | ObjectKind::StarCluster => 1.0,
            ObjectKind::Quasar => 4.0,
            ObjectKind::BlackHole | ObjectKind::Pulsar => 6.0,
        }
    }

    /// Radius table shared by generation and size cycling.
    pub fn size_profile(self) -> SizeProfile {
        let (min, max, step) = match self {
            ObjectKind::BlackHole => (0.012, 0.022, 0.002),
            ObjectKind::Pulsar => (0.014, 0.024, 0.002),
            ObjectKind::Quasar => (0.030, 0.060, 0.005),
            ObjectKind::StarCluster => (0.065, 0.105, 0.008),
            ObjectKind::Nebula => (0.110, 0.200, 0.015),
            ObjectKind::Galaxy => (0.220, 0.440, 0.040),
        };
        SizeProfile { min, max, step }
    }

    /// Position in [`ObjectKind::ALL`].
    pub fn index(self) -> usize {
        match self {
            ObjectKind::Nebula => 0,
            ObjectKind::Galaxy => 1,
            ObjectKind::BlackHole => 2,
            ObjectKind::StarCluster => 3,
            ObjectKind::Pulsar => 4,
            ObjectKind::Quasar => 5,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Stable handle to an object, unique within a [`crate::World`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

/// Bounds of a density cycle. Stepping past either bound clamps to it and
/// reverses direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DensityRange {
    pub min: u32,
    pub max: u32,
}

pub const NEBULA_LAYERS: DensityRange = DensityRange { min: 2, max: 24 };
pub const GALAXY_ARMS: DensityRange = DensityRange { min: 2, max: 18 };
pub const CLUSTER_STARS: DensityRange = DensityRange { min: 40, max: 600 };

/// One translucent layer of a nebula.
#[derive(Debug, Clone, PartialEq)]
pub struct NebulaLayer {
    pub seed: f32,
    /// Layer extent in world pixels.
    pub radius: f32,
    /// Base opacity the cloud alpha curve scales from.
    pub alpha: f32,
    /// Number of filament strands.
    pub arm_count: u32,
    /// Lateral jitter of filaments.
    pub arm_spread: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NebulaParams {
    pub layers: Vec<NebulaLayer>,
    pub hue_spread: f32,
    pub shape_factor: f32,
    pub density_dir: i8,
}

/// One spiral arm of a galaxy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalaxyArm {
    pub seed: f32,
    pub angle: f32,
    pub clump_seed: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalaxyParams {
    pub arms: Vec<GalaxyArm>,
    /// Total points per redraw; `bulge_factors` and `dust_factors` have this length.
    pub point_count: usize,
    pub bulge_factors: Vec<f32>,
    pub dust_factors: Vec<f32>,
    /// Logarithmic spiral `r = a * e^(b * theta)`.
    pub spiral_a: f32,
    pub spiral_b: f32,
    pub density_dir: i8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackHoleParams {
    pub disk_tilt: f32,
    pub disk_eccentricity: f32,
    pub core_point_count: u32,
    pub ring_point_count: u32,
    pub ring_eccentricity: f32,
    pub jet_length: f32,
    pub jet_point_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarClusterParams {
    pub star_count: u32,
    pub density_dir: i8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuasarParams {
    pub density_dir: i8,
}

/// Kind-specific procedural parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectParams {
    Nebula(NebulaParams),
    Galaxy(GalaxyParams),
    BlackHole(BlackHoleParams),
    StarCluster(StarClusterParams),
    Pulsar,
    Quasar(QuasarParams),
}

impl ObjectParams {
    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectParams::Nebula(_) => ObjectKind::Nebula,
            ObjectParams::Galaxy(_) => ObjectKind::Galaxy,
            ObjectParams::BlackHole(_) => ObjectKind::BlackHole,
            ObjectParams::StarCluster(_) => ObjectKind::StarCluster,
            ObjectParams::Pulsar => ObjectKind::Pulsar,
            ObjectParams::Quasar(_) => ObjectKind::Quasar,
        }
    }
}

/// A placed celestial object.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialObject {
    id: ObjectId,
    name: String,
    /// World-space centre.
    pub position: Vec2,
    pub radius: f32,
    /// Static orientation in radians, applied at draw time.
    pub rotation: f32,
    /// Primary hue in degrees `[0, 360)`.
    pub base_hue: Option<f32>,
    pub params: ObjectParams,
}

impl CelestialObject {
    pub fn new(
        id: ObjectId,
        name: String,
        position: Vec2,
        radius: f32,
        rotation: f32,
        base_hue: Option<f32>,
        params: ObjectParams,
    ) -> Self {
        Self {
            id,
            name,
            position,
            radius,
            rotation,
            base_hue,
            params,
        }
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Generated once at creation and never changed.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> ObjectKind {
        self.params.kind()
    }

    /// Hue used by the rasterizers, `0` when the object has none.
    #[inline]
    pub fn hue_or_default(&self) -> f32 {
        self.base_hue.unwrap_or(0.0)
    }

    /// The count field density cycling drives, if the kind has one.
    pub fn density(&self) -> Option<u32> {
        match &self.params {
            ObjectParams::Nebula(p) => Some(p.layers.len() as u32),
            ObjectParams::Galaxy(p) => Some(p.arms.len() as u32),
            ObjectParams::StarCluster(p) => Some(p.star_count),
            _ => None,
        }
    }

    /// Side of the square selection box in screen pixels at `zoom`.
    pub fn screen_box_side(&self, zoom: f32) -> f32 {
        self.radius * zoom * self.kind().border_scale()
    }
}
