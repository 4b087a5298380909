//! Partial world updates
//!
//! A [`WorldUpdate`] is a typed patch with one optional member per
//! [`WorldState`](super::WorldState) attribute. Name-keyed input (from config,
//! JSON payloads, or director directives) is funneled through the closed
//! [`WorldField`] enumeration, so unknown names can be dropped explicitly
//! instead of being set reflectively.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The closed set of world attributes that can be updated by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WorldField {
    Location,
    TimeOfDay,
    Weather,
    Mood,
    ActiveEvents,
    Lore,
    Rules,
}

impl WorldField {
    pub const ALL: [WorldField; 7] = [
        WorldField::Location,
        WorldField::TimeOfDay,
        WorldField::Weather,
        WorldField::Mood,
        WorldField::ActiveEvents,
        WorldField::Lore,
        WorldField::Rules,
    ];

    /// Free-text fields that a director directive may set.
    pub const SCALAR: [WorldField; 4] = [
        WorldField::Location,
        WorldField::TimeOfDay,
        WorldField::Weather,
        WorldField::Mood,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorldField::Location => "location",
            WorldField::TimeOfDay => "time_of_day",
            WorldField::Weather => "weather",
            WorldField::Mood => "mood",
            WorldField::ActiveEvents => "active_events",
            WorldField::Lore => "lore",
            WorldField::Rules => "rules",
        }
    }

    /// Human-readable label used in world-change notices.
    pub fn label(&self) -> &'static str {
        match self {
            WorldField::Location => "Location",
            WorldField::TimeOfDay => "Time of day",
            WorldField::Weather => "Weather",
            WorldField::Mood => "Mood",
            WorldField::ActiveEvents => "Active events",
            WorldField::Lore => "Lore",
            WorldField::Rules => "Rules",
        }
    }
}

impl std::fmt::Display for WorldField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WorldField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorldField::ALL
            .into_iter()
            .find(|f| f.as_str() == s.trim())
            .ok_or_else(|| format!("unknown world field: {}", s))
    }
}

/// Partial update over [`WorldState`](super::WorldState).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldUpdate {
    pub location: Option<String>,
    pub time_of_day: Option<String>,
    pub weather: Option<String>,
    pub mood: Option<String>,
    pub active_events: Option<Vec<String>>,
    pub lore: Option<BTreeMap<String, String>>,
    pub rules: Option<Vec<String>>,
}

impl WorldUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(mut self, value: impl Into<String>) -> Self {
        self.location = Some(value.into());
        self
    }

    pub fn time_of_day(mut self, value: impl Into<String>) -> Self {
        self.time_of_day = Some(value.into());
        self
    }

    pub fn weather(mut self, value: impl Into<String>) -> Self {
        self.weather = Some(value.into());
        self
    }

    pub fn mood(mut self, value: impl Into<String>) -> Self {
        self.mood = Some(value.into());
        self
    }

    /// Replace the active events with `current` plus `event` appended.
    pub fn with_event(mut self, current: &[String], event: impl Into<String>) -> Self {
        let mut events = current.to_vec();
        events.push(event.into());
        self.active_events = Some(events);
        self
    }

    /// Replace the lore with `current` plus one entry inserted or overwritten.
    pub fn with_lore_entry(
        mut self,
        current: &BTreeMap<String, String>,
        topic: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let mut lore = current.clone();
        lore.insert(topic.into(), description.into());
        self.lore = Some(lore);
        self
    }

    /// Build an update from name-keyed values.
    ///
    /// Unrecognized names and values of the wrong shape are skipped.
    pub fn from_fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut update = Self::default();
        for (name, value) in fields {
            if let Ok(field) = name.as_ref().parse::<WorldField>() {
                update.set(field, value);
            }
        }
        update
    }

    /// Set one field from a JSON value. Returns `false` if the shape is wrong.
    pub fn set(&mut self, field: WorldField, value: Value) -> bool {
        match field {
            WorldField::Location => set_text(&mut self.location, value),
            WorldField::TimeOfDay => set_text(&mut self.time_of_day, value),
            WorldField::Weather => set_text(&mut self.weather, value),
            WorldField::Mood => set_text(&mut self.mood, value),
            WorldField::ActiveEvents => set_list(&mut self.active_events, value),
            WorldField::Rules => set_list(&mut self.rules, value),
            WorldField::Lore => match serde_json::from_value::<BTreeMap<String, String>>(value) {
                Ok(lore) => {
                    self.lore = Some(lore);
                    true
                }
                Err(_) => false,
            },
        }
    }

    /// Parse director directives such as `location: The Deep Catacombs`.
    ///
    /// Keys are the free-text field names followed by a colon and match
    /// case-insensitively. The last occurrence of a key wins and its value
    /// runs until the next recognized key. Returns `None` when nothing was
    /// recognized.
    pub fn parse_directive(text: &str) -> Option<Self> {
        let lowered = text.to_ascii_lowercase();

        let mut positions: Vec<(usize, usize, WorldField)> = WorldField::SCALAR
            .into_iter()
            .filter_map(|field| {
                let key = format!("{}:", field.as_str());
                lowered.rfind(&key).map(|pos| (pos, key.len(), field))
            })
            .collect();
        positions.sort_by_key(|(pos, _, _)| *pos);

        let mut update = Self::default();
        for (i, (pos, key_len, field)) in positions.iter().enumerate() {
            let end = positions.get(i + 1).map_or(text.len(), |(next, _, _)| *next);
            let value = text[pos + key_len..end].trim();
            if !value.is_empty() {
                update.set(*field, Value::String(value.to_string()));
            }
        }

        (!update.is_empty()).then_some(update)
    }

    /// Fields carrying a value, in declaration order.
    pub fn changed_fields(&self) -> Vec<WorldField> {
        let mut fields = Vec::new();
        if self.location.is_some() {
            fields.push(WorldField::Location);
        }
        if self.time_of_day.is_some() {
            fields.push(WorldField::TimeOfDay);
        }
        if self.weather.is_some() {
            fields.push(WorldField::Weather);
        }
        if self.mood.is_some() {
            fields.push(WorldField::Mood);
        }
        if self.active_events.is_some() {
            fields.push(WorldField::ActiveEvents);
        }
        if self.lore.is_some() {
            fields.push(WorldField::Lore);
        }
        if self.rules.is_some() {
            fields.push(WorldField::Rules);
        }
        fields
    }

    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }

    /// One notice per changed field, e.g. `Location changed to: The Deep Catacombs`.
    pub fn describe(&self) -> Vec<String> {
        self.changed_fields()
            .into_iter()
            .map(|field| match field {
                WorldField::Location => scalar_notice(field, &self.location),
                WorldField::TimeOfDay => scalar_notice(field, &self.time_of_day),
                WorldField::Weather => scalar_notice(field, &self.weather),
                WorldField::Mood => scalar_notice(field, &self.mood),
                WorldField::ActiveEvents | WorldField::Lore | WorldField::Rules => {
                    format!("{} updated.", field.label())
                }
            })
            .collect()
    }
}

fn scalar_notice(field: WorldField, value: &Option<String>) -> String {
    format!(
        "{} changed to: {}",
        field.label(),
        value.as_deref().unwrap_or_default()
    )
}

fn set_text(slot: &mut Option<String>, value: Value) -> bool {
    match value {
        Value::String(s) => {
            *slot = Some(s);
            true
        }
        _ => false,
    }
}

fn set_list(slot: &mut Option<Vec<String>>, value: Value) -> bool {
    match serde_json::from_value::<Vec<String>>(value) {
        Ok(items) => {
            *slot = Some(items);
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_roundtrip() {
        for field in WorldField::ALL {
            assert_eq!(field.as_str().parse::<WorldField>().unwrap(), field);
        }
        assert!("locaton".parse::<WorldField>().is_err());
    }

    #[test]
    fn test_from_fields_ignores_unknown_names() {
        let update = WorldUpdate::from_fields([
            ("mood", json!("joyful")),
            ("locaton", json!("typo")),
            ("dragons", json!(true)),
        ]);
        assert_eq!(update, WorldUpdate::new().mood("joyful"));
    }

    #[test]
    fn test_from_fields_ignores_wrong_shape() {
        let update = WorldUpdate::from_fields([
            ("location", json!(42)),
            ("rules", json!(["No magic"])),
            ("active_events", json!("not a list")),
        ]);
        assert_eq!(update.location, None);
        assert_eq!(update.rules, Some(vec!["No magic".to_string()]));
        assert_eq!(update.active_events, None);
    }

    #[test]
    fn test_from_fields_lore_object() {
        let update =
            WorldUpdate::from_fields([("lore", json!({"The Temple": "Houses an artifact"}))]);
        let lore = update.lore.unwrap();
        assert_eq!(lore.get("The Temple").unwrap(), "Houses an artifact");
    }

    #[test]
    fn test_parse_directive_location() {
        let update = WorldUpdate::parse_directive("location: The Deep Catacombs").unwrap();
        assert_eq!(update, WorldUpdate::new().location("The Deep Catacombs"));
    }

    #[test]
    fn test_parse_directive_is_case_insensitive() {
        let update = WorldUpdate::parse_directive("Mood: Grim").unwrap();
        assert_eq!(update.mood.as_deref(), Some("Grim"));
    }

    #[test]
    fn test_parse_directive_multiple_keys_split_values() {
        let update =
            WorldUpdate::parse_directive("location: Sunken Hall mood: uneasy").unwrap();
        assert_eq!(update.location.as_deref(), Some("Sunken Hall"));
        assert_eq!(update.mood.as_deref(), Some("uneasy"));
    }

    #[test]
    fn test_parse_directive_nothing_recognized() {
        assert!(WorldUpdate::parse_directive("A figure emerges").is_none());
        assert!(WorldUpdate::parse_directive("location:   ").is_none());
    }

    #[test]
    fn test_with_event_appends() {
        let current = vec!["Shadows moving".to_string()];
        let update = WorldUpdate::new().with_event(&current, "Bells toll");
        assert_eq!(
            update.active_events.unwrap(),
            vec!["Shadows moving".to_string(), "Bells toll".to_string()]
        );
    }

    #[test]
    fn test_describe() {
        let update = WorldUpdate::new()
            .location("The Deep Catacombs")
            .with_event(&[], "Bells toll");
        assert_eq!(
            update.describe(),
            vec![
                "Location changed to: The Deep Catacombs".to_string(),
                "Active events updated.".to_string(),
            ]
        );
    }
}
