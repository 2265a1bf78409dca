//! Attribute-level provenance

use serde::{Deserialize, Serialize};
use serde_json::Value;

closed_vocabulary! {
    /// Catalog field named in a provenance record
    pub enum AttributeName {
        // Hypocentre location
        Depth => "depth",
        Time => "time",
        Lat => "lat",
        Lon => "lon",
        FixDepth => "fix_depth",
        FreeDepth => "free_depth",
        FixDepthDefault => "fix_depth_default",
        FixDepthMedian => "fix_depth_median",
        FixLocation => "fix_location",
        FixTime => "fix_time",
        Nass => "nass",
        Ndef => "ndef",
        Sdobs => "sdobs",
        Prime => "prime",
        Agency => "agency",
        // Phase readings
        Phase => "phase",
        Nondef => "nondef",
        Timedef => "timedef",
        Azimdef => "azimdef",
        Slowdef => "slowdef",
        Putative => "putative",
        Amplitude => "amplitude",
        Period => "period",
        // Magnitudes
        Magnitude => "magnitude",
        Magtype => "magtype",
        // Identity moves
        Evid => "evid",
        Hypid => "hypid",
        // Analyst notes
        Reason => "reason",
        Comment => "comment",
        /// Summary recorded on merged batches
        AnalystReadableCommand => "analystReadableCommand",
    }
}

/// One field change: attribute name plus optional old and new values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRecord {
    pub name: AttributeName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

impl AttributeRecord {
    pub fn new(name: AttributeName, new_value: Option<Value>, old_value: Option<Value>) -> Self {
        Self {
            name,
            old_value,
            new_value,
        }
    }
}

/// Text form of an attribute value as analysts see it
///
/// Strings are shown without quotes; everything else uses its JSON form.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_values_are_omitted() {
        let record = AttributeRecord::new(AttributeName::Depth, Some(json!(33)), None);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json, json!({"name": "depth", "newValue": 33}));
    }

    #[test]
    fn test_reads_old_and_new_values() {
        let record: AttributeRecord =
            serde_json::from_str(r#"{"name":"lat","oldValue":1.5,"newValue":"2.25"}"#).unwrap();

        assert_eq!(record.name, AttributeName::Lat);
        assert_eq!(record.old_value, Some(json!(1.5)));
        assert_eq!(record.new_value, Some(json!("2.25")));
    }

    #[test]
    fn test_display_value_strips_string_quotes() {
        assert_eq!(display_value(&json!("ISC")), "ISC");
        assert_eq!(display_value(&json!(33)), "33");
        assert_eq!(display_value(&json!(true)), "true");
    }

    #[test]
    fn test_merge_summary_attribute_is_recognized() {
        assert!(AttributeName::parse("analystReadableCommand").is_recognized());
        assert!(!AttributeName::parse("magnitude_type").is_recognized());
    }
}
