pub mod generator;
pub mod render;
pub mod types;
pub mod voice;

pub use generator::InstructionGenerator;
pub use types::{
    threshold_m, GeoPoint, InstructionClass, Maneuver, ManeuverKind, NavigationInstruction,
    RoadClass, Route, Telemetry,
};
pub use voice::NavigationVoice;
