use super::types::{InstructionClass, NavigationInstruction};

/// Markup-annotated speech text: the maneuver verb carries emphasis and a
/// short break lands before every embedded number so TTS does not slur the
/// distance into the verb.
pub fn render(instruction: &NavigationInstruction) -> String {
    let verb = format!("<emphasis>{}</emphasis>", instruction.maneuver.verb());
    let onto = instruction
        .street
        .as_deref()
        .map(|s| format!(" onto {s}"))
        .unwrap_or_default();

    match instruction.class {
        InstructionClass::Initial | InstructionClass::Reminder => {
            format!(
                "In {} {verb}{onto}.",
                spell_distance(instruction.distance_remaining_m)
            )
        }
        InstructionClass::Prepare => {
            format!(
                "Prepare to {verb}{onto} in {}.",
                spell_distance(instruction.distance_remaining_m)
            )
        }
        InstructionClass::Immediate => format!("{verb}{onto} now."),
        InstructionClass::Confirmation => {
            format!("That's done. You can {} ahead.", "<emphasis>continue</emphasis>")
        }
    }
}

/// Distances round to something speakable, with the pause marker in front of
/// the number itself.
fn spell_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        let km = (meters / 100.0).round() / 10.0;
        if (km - km.round()).abs() < f64::EPSILON {
            format!("<break time=\"200ms\"/>{} kilometers", km.round() as u64)
        } else {
            format!("<break time=\"200ms\"/>{km:.1} kilometers")
        }
    } else {
        let m = ((meters / 10.0).round() * 10.0) as u64;
        format!("<break time=\"200ms\"/>{m} meters")
    }
}
