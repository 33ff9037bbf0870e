//! Cosmetic name generation.
//!
//! Each kind has 20 prefixes and 20 suffixes; a name is one of each joined
//! by a space. Names are not unique.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::object::ObjectKind;

const NEBULA_PREFIXES: [&str; 20] = [
    "Zeta", "Orion", "Vega", "Cygnus", "Nova", "Astra", "Nebul", "Luma", "Pyra", "Xylo",
    "Epsilon", "Delta", "Theta", "Lyra", "Sirius", "Altair", "Draco", "Hydra", "Aurora", "Celest",
];
const NEBULA_SUFFIXES: [&str; 20] = [
    "Cloud", "Mist", "Veil", "Field", "Cluster", "Wisp", "Shroud", "Echo", "Spire", "Arc",
    "Wave", "Glow", "Stream", "Pulse", "Flare", "Drift", "Halo", "Dawn", "Shade", "Ray",
];

const GALAXY_PREFIXES: [&str; 20] = [
    "Andromeda", "Sagitta", "Cassiopeia", "Perseus", "Phoenix", "Helios", "Aquila", "Gemini",
    "Taurus", "Leo", "Scorpius", "Pegasus", "Corona", "Vulpecula", "Eridanus", "Carina",
    "Centauri", "Lynx", "Pavo", "Volans",
];
const GALAXY_SUFFIXES: [&str; 20] = [
    "Spiral", "Cluster", "Core", "Arm", "Wheel", "Ring", "Crown", "Disk", "Swirl", "Web",
    "Array", "Bridge", "Stream", "Burst", "Loop", "Shell", "Belt", "Zone", "Field", "Nexus",
];

const BLACK_HOLE_PREFIXES: [&str; 20] = [
    "Cygnus", "Sagittarius", "Vortex", "Event", "Shadow", "Abyss", "Oblivion", "Null",
    "Singularity", "Phantom", "Umbra", "Eclipse", "Void", "Nadir", "Tenebris", "Hollow",
    "Maw", "Erebus", "Silent", "Obsidian",
];
const BLACK_HOLE_SUFFIXES: [&str; 20] = [
    "Hole", "Core", "Point", "Well", "Gate", "Eye", "Zone", "Rift", "Pit", "Collapse",
    "Horizon", "Sink", "Throat", "Funnel", "Deep", "Chasm", "Vault", "Drain", "Knot", "Grave",
];

const STAR_CLUSTER_PREFIXES: [&str; 20] = [
    "Omega", "Sigma", "Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Tau", "Pi", "Rho",
    "Kappa", "Iota", "Zeta", "Theta", "Lambda", "Mu", "Nu", "Xi", "Omicron", "Upsilon",
];
const STAR_CLUSTER_SUFFIXES: [&str; 20] = [
    "Cluster", "Group", "Pack", "Swarm", "Nest", "Ring", "Field", "Core", "Belt", "Zone",
    "Array", "Shell", "Crown", "Bridge", "Stream", "Burst", "Loop", "Web", "Nexus", "Cloud",
];

const PULSAR_PREFIXES: [&str; 20] = [
    "PSR", "Pulse", "Spin", "Magnet", "Radiant", "Beacon", "Flash", "Nova", "Vibe", "Echo",
    "Blitz", "Spark", "Quake", "Volt", "Wave", "Ray", "Flicker", "Glint", "Twist", "Jolt",
];
const PULSAR_SUFFIXES: [&str; 20] = [
    "Star", "Pulse", "Source", "Emitter", "Beacon", "Node", "Point", "Core", "Axis", "Focus",
    "Ray", "Burst", "Flash", "Spin", "Drift", "Glow", "Stream", "Flare", "Drift", "Halo",
];

const QUASAR_PREFIXES: [&str; 20] = [
    "QSO", "Quanta", "Quark", "Quantum", "Radiant", "Blazar", "Flash", "Nova", "Pulse", "Echo",
    "Spark", "Volt", "Wave", "Ray", "Flicker", "Glint", "Twist", "Jolt", "Blitz", "Quasar",
];
const QUASAR_SUFFIXES: [&str; 20] = [
    "Source", "Core", "Point", "Emitter", "Node", "Focus", "Ray", "Burst", "Flash", "Spin",
    "Drift", "Glow", "Stream", "Flare", "Drift", "Halo", "Jet", "Axis", "Zone", "Nexus",
];

/// Prefix and suffix tables for a kind.
pub fn word_lists(kind: ObjectKind) -> (&'static [&'static str], &'static [&'static str]) {
    match kind {
        ObjectKind::Nebula => (&NEBULA_PREFIXES, &NEBULA_SUFFIXES),
        ObjectKind::Galaxy => (&GALAXY_PREFIXES, &GALAXY_SUFFIXES),
        ObjectKind::BlackHole => (&BLACK_HOLE_PREFIXES, &BLACK_HOLE_SUFFIXES),
        ObjectKind::StarCluster => (&STAR_CLUSTER_PREFIXES, &STAR_CLUSTER_SUFFIXES),
        ObjectKind::Pulsar => (&PULSAR_PREFIXES, &PULSAR_SUFFIXES),
        ObjectKind::Quasar => (&QUASAR_PREFIXES, &QUASAR_SUFFIXES),
    }
}

/// Pick a random `"Prefix Suffix"` name for `kind`.
pub fn generate_name<R: Rng + ?Sized>(kind: ObjectKind, rng: &mut R) -> String {
    let (prefixes, suffixes) = word_lists(kind);
    let prefix = prefixes.choose(rng).copied().unwrap_or("Unnamed");
    let suffix = suffixes.choose(rng).copied().unwrap_or("Object");
    format!("{} {}", prefix, suffix)
}
