use serde::{Deserialize, Serialize};

use crate::audio::Urgency;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

const EARTH_RADIUS_M: f64 = 6_371_000.0;

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance in meters (haversine).
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();
        let a = (dlat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoadClass {
    Highway,
    City,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManeuverKind {
    TurnLeft,
    TurnRight,
    Merge,
    Exit,
    Continue,
    Arrive,
}

impl ManeuverKind {
    /// Spoken verb phrase, emphasized by the markup renderer.
    pub fn verb(&self) -> &'static str {
        match self {
            ManeuverKind::TurnLeft => "turn left",
            ManeuverKind::TurnRight => "turn right",
            ManeuverKind::Merge => "merge",
            ManeuverKind::Exit => "take the exit",
            ManeuverKind::Continue => "continue straight",
            ManeuverKind::Arrive => "arrive at your destination",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Maneuver {
    pub id: u32,
    pub kind: ManeuverKind,
    pub at: GeoPoint,
    pub road: RoadClass,
    pub street: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Route {
    pub maneuvers: Vec<Maneuver>,
}

/// One telemetry sample from the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    pub position: GeoPoint,
    pub speed_mps: f64,
    pub heading_deg: f64,
    pub timestamp_ms: u64,
}

/// Announcement stages for one maneuver, in emission order. The generator
/// never regresses: once a class is announced for a maneuver, that class and
/// everything before it are spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InstructionClass {
    Initial,
    Reminder,
    Prepare,
    Immediate,
    Confirmation,
}

impl InstructionClass {
    pub fn urgency(&self) -> Urgency {
        match self {
            InstructionClass::Initial | InstructionClass::Reminder => Urgency::Medium,
            InstructionClass::Prepare => Urgency::High,
            InstructionClass::Immediate => Urgency::Critical,
            InstructionClass::Confirmation => Urgency::Low,
        }
    }
}

/// Announcement distance in meters for a class on a road, or None where the
/// class is not distance-triggered (CONFIRMATION fires post-maneuver).
pub fn threshold_m(road: RoadClass, class: InstructionClass) -> Option<f64> {
    let m = match (road, class) {
        (RoadClass::Highway, InstructionClass::Initial) => 3200.0,
        (RoadClass::Highway, InstructionClass::Reminder) => 1600.0,
        (RoadClass::Highway, InstructionClass::Prepare) => 800.0,
        (RoadClass::Highway, InstructionClass::Immediate) => 200.0,
        (RoadClass::City, InstructionClass::Initial) => 800.0,
        (RoadClass::City, InstructionClass::Reminder) => 400.0,
        (RoadClass::City, InstructionClass::Prepare) => 150.0,
        (RoadClass::City, InstructionClass::Immediate) => 50.0,
        (_, InstructionClass::Confirmation) => return None,
    };
    Some(m)
}

/// Immutable once emitted. A later class for the same maneuver supersedes
/// this one; nothing ever mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationInstruction {
    pub maneuver_id: u32,
    pub maneuver: ManeuverKind,
    pub street: Option<String>,
    pub distance_remaining_m: f64,
    pub eta_s: f64,
    pub class: InstructionClass,
    pub is_highway: bool,
}
