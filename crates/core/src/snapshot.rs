//! One atomic update from the live feed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::metric::MetricKind;

/// Current raw values for the monitored metrics, as delivered by one feed
/// update.
///
/// Values are kept in their textual form. Any field may be absent; a field
/// that is present may still be an empty string.
///
/// On the wire a snapshot is a JSON object keyed by feed key
/// (`{"ecg": "72", "hr": 98, "fall": "2.1"}`). Numbers are accepted and kept
/// as text. `null` is kept as a present but empty value. Unknown keys are
/// dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "serde_json::Map<String, serde_json::Value>",
    into = "BTreeMap<String, String>"
)]
pub struct Snapshot {
    values: BTreeMap<MetricKind, String>,
}

impl Snapshot {
    /// An empty snapshot (no metrics present).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, mostly for tests and replay tooling.
    pub fn with(mut self, kind: MetricKind, value: impl Into<String>) -> Self {
        self.values.insert(kind, value.into());
        self
    }

    /// Raw value for `kind`, if the field was present.
    pub fn get(&self, kind: MetricKind) -> Option<&str> {
        self.values.get(&kind).map(String::as_str)
    }

    /// Whether the field for `kind` was present (possibly empty).
    pub fn contains(&self, kind: MetricKind) -> bool {
        self.values.contains_key(&kind)
    }

    /// Present metrics in [`MetricKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (MetricKind, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Snapshot {
    fn from(raw: serde_json::Map<String, serde_json::Value>) -> Self {
        let mut values = BTreeMap::new();
        for (key, value) in raw {
            let Some(kind) = MetricKind::from_feed_key(&key) else {
                continue;
            };
            let text = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Null => String::new(),
                _ => continue,
            };
            values.insert(kind, text);
        }
        Self { values }
    }
}

impl From<Snapshot> for BTreeMap<String, String> {
    fn from(snapshot: Snapshot) -> Self {
        snapshot
            .values
            .into_iter()
            .map(|(k, v)| (k.feed_key().to_string(), v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_strings_and_numbers() {
        let snap: Snapshot =
            serde_json::from_value(json!({"ecg": "72", "hr": 98, "fall": 2.5})).unwrap();
        assert_eq!(snap.get(MetricKind::Ecg), Some("72"));
        assert_eq!(snap.get(MetricKind::HeartRateOrOxygen), Some("98"));
        assert_eq!(snap.get(MetricKind::Fall), Some("2.5"));
    }

    #[test]
    fn keeps_nulls_as_empty_and_drops_unknown_keys() {
        let snap: Snapshot =
            serde_json::from_value(json!({"ecg": null, "temp": "37", "hr": ""})).unwrap();
        assert_eq!(snap.get(MetricKind::Ecg), Some(""));
        assert_eq!(snap.get(MetricKind::HeartRateOrOxygen), Some(""));
        assert!(!snap.contains(MetricKind::Fall));
        assert_eq!(snap.iter().count(), 2);
    }

    #[test]
    fn nested_values_are_dropped() {
        let snap: Snapshot =
            serde_json::from_value(json!({"ecg": {"bpm": 72}, "fall": [1]})).unwrap();
        assert!(snap.is_empty());
    }

    #[test]
    fn serializes_by_feed_key() {
        let snap = Snapshot::new()
            .with(MetricKind::Fall, "1.0")
            .with(MetricKind::Ecg, "61");
        let value = serde_json::to_value(&snap).unwrap();
        assert_eq!(value, json!({"ecg": "61", "fall": "1.0"}));
    }

    #[test]
    fn iterates_in_display_order() {
        let snap = Snapshot::new()
            .with(MetricKind::Fall, "1")
            .with(MetricKind::Ecg, "2")
            .with(MetricKind::HeartRateOrOxygen, "3");
        let kinds: Vec<_> = snap.iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, MetricKind::ALL.to_vec());
    }
}
