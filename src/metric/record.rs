use metric::TagMap;
use serde::de::{Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde_json;
use std::collections::BTreeMap;
use std::fmt;
use std::sync;

/// A single telegraf measurement
///
/// Telegraf's JSON serializer writes one of these per line: a metric name, a
/// set of tags, any number of named fields and a single timestamp in seconds
/// that every field shares. A `MetricRecord` is never modified once decoded.
///
/// Only a JSON object decodes to a record. Absent and `null` members take
/// their zero value, unknown members are ignored and a repeated member keeps
/// its last value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricRecord {
    /// The metric family, for instance `cpu` or `mem`. Not yet sanitized.
    pub name: String,
    /// Tags attached to the record. Shared with every point expanded from it.
    pub tags: sync::Arc<TagMap>,
    /// Field name to field value. Names are not yet sanitized.
    pub fields: BTreeMap<String, FieldValue>,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
}

/// The value of one telegraf field
///
/// Telegraf does not restrict what a field may hold. Only numbers can be
/// forwarded; everything else is carried as `Other` so it can be reported and
/// skipped.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// A number with a fractional part, an exponent or outside `i64`.
    Float(f64),
    /// A number that fits in an `i64`.
    Int(i64),
    /// Strings, booleans, null, arrays and objects.
    Other(serde_json::Value),
}

impl FieldValue {
    /// The JSON type of this value, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match *self {
            FieldValue::Float(_) => "float",
            FieldValue::Int(_) => "integer",
            FieldValue::Other(ref v) => match *v {
                serde_json::Value::Null => "null",
                serde_json::Value::Bool(_) => "boolean",
                serde_json::Value::Number(_) => "number",
                serde_json::Value::String(_) => "string",
                serde_json::Value::Array(_) => "array",
                serde_json::Value::Object(_) => "object",
            },
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> FieldValue {
        match value {
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Int(i)
                } else if let Some(f) = n.as_f64() {
                    FieldValue::Float(f)
                } else {
                    FieldValue::Other(serde_json::Value::Number(n))
                }
            }
            other => FieldValue::Other(other),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(FieldValue::from)
    }
}

struct MetricRecordVisitor;

impl<'de> Visitor<'de> for MetricRecordVisitor {
    type Value = MetricRecord;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a telegraf metric object")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut record = MetricRecord::default();
        while let Some(key) = access.next_key::<String>()? {
            match key.as_str() {
                "name" => {
                    record.name = access.next_value::<Option<String>>()?.unwrap_or_default();
                }
                "tags" => {
                    let tags = access.next_value::<Option<TagMap>>()?;
                    record.tags = sync::Arc::new(tags.unwrap_or_default());
                }
                "fields" => {
                    record.fields = access
                        .next_value::<Option<BTreeMap<String, FieldValue>>>()?
                        .unwrap_or_default();
                }
                "timestamp" => {
                    record.timestamp = access.next_value::<Option<i64>>()?.unwrap_or_default();
                }
                _ => {
                    access.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for MetricRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(MetricRecordVisitor)
    }
}
