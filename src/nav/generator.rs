use tracing::debug;

use super::types::{
    threshold_m, GeoPoint, InstructionClass, NavigationInstruction, RoadClass, Route, Telemetry,
};
use crate::error::WayfarerError;

/// Within this distance of a maneuver point the maneuver counts as taken.
const ARRIVAL_RADIUS_M: f64 = 25.0;
/// Fastest displacement we accept between samples before calling the fix bad.
const MAX_PLAUSIBLE_MPS: f64 = 90.0;
/// ETA divisor floor so a standstill does not blow the estimate up.
const MIN_ETA_SPEED_MPS: f64 = 1.0;

/// Turns route geometry plus live telemetry into a deterministic, idempotent
/// stream of instructions. Each class fires at most once per maneuver,
/// strictly in INITIAL < REMINDER < PREPARE < IMMEDIATE order; GPS jitter
/// can delay a class but never repeat or regress one.
#[derive(Debug)]
pub struct InstructionGenerator {
    route: Route,
    current: usize,
    announced: Option<InstructionClass>,
    last_timestamp_ms: Option<u64>,
    last_position: Option<GeoPoint>,
}

impl InstructionGenerator {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            current: 0,
            announced: None,
            last_timestamp_ms: None,
            last_position: None,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Index of the maneuver currently being announced.
    pub fn current_maneuver(&self) -> Option<u32> {
        self.route.maneuvers.get(self.current).map(|m| m.id)
    }

    pub fn finished(&self) -> bool {
        self.current >= self.route.maneuvers.len()
    }

    /// Feed one telemetry sample. Returns at most one instruction for the
    /// active maneuver, plus possibly a CONFIRMATION when the maneuver
    /// completes on this sample.
    pub fn on_telemetry(&mut self, sample: &Telemetry) -> Vec<NavigationInstruction> {
        if self.finished() {
            return Vec::new();
        }
        if let Some(reason) = self.anomaly(sample) {
            // Bad fix: skip this sample, keep maneuver progress untouched.
            let err = WayfarerError::Telemetry(reason);
            debug!(timestamp_ms = sample.timestamp_ms, "{err}, sample suppressed");
            return Vec::new();
        }
        self.last_timestamp_ms = Some(sample.timestamp_ms);
        self.last_position = Some(sample.position);

        let maneuver = &self.route.maneuvers[self.current];
        let distance = sample.position.distance_m(&maneuver.at);

        if distance <= ARRIVAL_RADIUS_M {
            let confirmation = NavigationInstruction {
                maneuver_id: maneuver.id,
                maneuver: maneuver.kind,
                street: maneuver.street.clone(),
                distance_remaining_m: distance,
                eta_s: 0.0,
                class: InstructionClass::Confirmation,
                is_highway: maneuver.road == RoadClass::Highway,
            };
            self.current += 1;
            self.announced = None;
            return vec![confirmation];
        }

        let Some(class) = self.eligible_class(maneuver.road, distance) else {
            return Vec::new();
        };
        self.announced = Some(class);

        let eta_s = distance / sample.speed_mps.max(MIN_ETA_SPEED_MPS);
        vec![NavigationInstruction {
            maneuver_id: maneuver.id,
            maneuver: maneuver.kind,
            street: maneuver.street.clone(),
            distance_remaining_m: distance,
            eta_s,
            class,
            is_highway: maneuver.road == RoadClass::Highway,
        }]
    }

    /// Most urgent distance-triggered class the sample has crossed into that
    /// has not been announced yet. Crossing several thresholds at once emits
    /// only the most urgent; the skipped ones are spent by the Ord check.
    fn eligible_class(&self, road: RoadClass, distance: f64) -> Option<InstructionClass> {
        use InstructionClass::*;
        for class in [Immediate, Prepare, Reminder, Initial] {
            let within = threshold_m(road, class).map(|t| distance <= t).unwrap_or(false);
            if within {
                return match self.announced {
                    Some(done) if class <= done => None,
                    _ => Some(class),
                };
            }
        }
        None
    }

    fn anomaly(&self, sample: &Telemetry) -> Option<&'static str> {
        if let Some(last) = self.last_timestamp_ms {
            if sample.timestamp_ms <= last {
                return Some("non-monotonic timestamp");
            }
            if let Some(pos) = self.last_position {
                let dt_s = (sample.timestamp_ms - last) as f64 / 1000.0;
                let moved = pos.distance_m(&sample.position);
                if moved > MAX_PLAUSIBLE_MPS * dt_s.max(0.001) {
                    return Some("implausible displacement");
                }
            }
        }
        None
    }
}
