use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-supplied description of the replayed journey.
///
/// The playback driver never looks inside; the summary dialog shows the
/// entries in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JourneyInformation(Map<String, Value>);

impl JourneyInformation {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries as display text, strings shown without quotes
    pub fn entries(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Null => "-".to_string(),
                    other => other.to_string(),
                };
                (key.clone(), text)
            })
            .collect()
    }
}

/// Pass-through counters shown on the HUD
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HudCounters {
    /// The viewer itself has no write source; stays at zero unless the host sets it
    pub write_count: u64,
    pub read_count: u64,
}
