//! Option vocabulary offered by the generator form.

use serde::Serialize;

pub const LOCATIONS: [&str; 12] = [
    "Convenience Store",
    "Apartment Hallway",
    "Office Space (After Hours)",
    "Parking Garage",
    "Street Corner",
    "Elevator",
    "ATM Vestibule",
    "Gas Station Pump",
    "Warehouse",
    "Home Living Room",
    "Retail Store",
    "Public Park",
];

pub const TIMES_OF_DAY: [&str; 5] =
    ["Daytime (Noon)", "Afternoon (3 PM)", "Evening (7 PM)", "Late Night (2 AM)", "Dawn (5 AM)"];

pub const EFFECTS: [&str; 8] = [
    "Infrared / Night Vision",
    "Slightly Grainy",
    "Heavy Compression Artifacts",
    "Flickering Lights",
    "Lens Distortion (Fisheye)",
    "Occasional Frame Skips",
    "Static Glitch",
    "Dust on Lens",
];

pub const DEFAULT_SCENE: &str = "A person nervously looking around before trying to open a locked door.";

/// Pre-filled form values.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefaults {
    pub scene: &'static str,
    pub location: &'static str,
    pub time_of_day: &'static str,
    pub effects: [&'static str; 2],
}

/// Everything the form needs to render, served as `GET /api/options`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub locations: &'static [&'static str],
    pub times_of_day: &'static [&'static str],
    pub effects: &'static [&'static str],
    pub defaults: FormDefaults,
}

#[must_use]
pub fn catalog() -> Catalog {
    Catalog {
        locations: &LOCATIONS,
        times_of_day: &TIMES_OF_DAY,
        effects: &EFFECTS,
        defaults: FormDefaults {
            scene: DEFAULT_SCENE,
            location: LOCATIONS[1],
            time_of_day: TIMES_OF_DAY[3],
            effects: [EFFECTS[0], EFFECTS[5]],
        },
    }
}

/// Checkbox behavior: remove `effect` if selected, append it otherwise.
pub fn toggle_effect(effects: &mut Vec<String>, effect: &str) {
    if let Some(pos) = effects.iter().position(|e| e == effect) {
        effects.remove(pos);
    } else {
        effects.push(effect.to_owned());
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
