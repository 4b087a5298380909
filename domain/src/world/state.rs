//! World state record

use super::update::WorldUpdate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The shared narrative environment of a session.
///
/// There is exactly one per session and no history is kept: a
/// [`WorldUpdate`] overwrites the named fields in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldState {
    pub location: String,
    pub time_of_day: String,
    pub weather: String,
    pub mood: String,
    pub active_events: Vec<String>,
    /// Topic name → description.
    pub lore: BTreeMap<String, String>,
    pub rules: Vec<String>,
}

impl WorldState {
    /// Merge a partial update: `Some` fields overwrite, `None` fields are kept.
    pub fn apply_update(&mut self, update: WorldUpdate) {
        let WorldUpdate {
            location,
            time_of_day,
            weather,
            mood,
            active_events,
            lore,
            rules,
        } = update;

        if let Some(v) = location {
            self.location = v;
        }
        if let Some(v) = time_of_day {
            self.time_of_day = v;
        }
        if let Some(v) = weather {
            self.weather = v;
        }
        if let Some(v) = mood {
            self.mood = v;
        }
        if let Some(v) = active_events {
            self.active_events = v;
        }
        if let Some(v) = lore {
            self.lore = v;
        }
        if let Some(v) = rules {
            self.rules = v;
        }
    }

    /// Labeled header lines prepended to every model context.
    pub fn context_header(&self) -> Vec<String> {
        vec![
            format!("Current Location: {}", self.location),
            format!("Time: {}", self.time_of_day),
            format!("Mood: {}", self.mood),
            format!("Active Events: {}", self.active_events.join(", ")),
        ]
    }

    /// Display lines for the world panel, including weather.
    pub fn summary_lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Location", self.location.clone()),
            ("Time", self.time_of_day.clone()),
            ("Weather", self.weather.clone()),
            ("Mood", self.mood.clone()),
            ("Active Events", self.active_events.join(", ")),
        ]
    }
}
