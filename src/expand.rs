//! Flatten telegraf records into SignalFx points
//!
//! A telegraf record carries many fields under one name. SignalFx wants one
//! name per time series, so every numeric field becomes its own `Point`:
//!
//!   - the record name is sanitized and becomes the base name
//!   - a field called `value` keeps the base name as-is
//!   - any other field is appended as `<base>.<field>`, itself sanitized
//!
//! Fields that are not numbers are logged and dropped.

use metric::{FieldValue, MetricRecord, Point, Value};

/// The field name that maps onto the bare metric name.
const DEFAULT_FIELD: &str = "value";

/// Replace every character outside `[A-Za-z0-9_]` with `_`.
///
/// One replacement is made per character, not per byte, so multi-byte
/// characters collapse to a single underscore.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' => c,
            _ => '_',
        })
        .collect()
}

/// Expand one record, appending its points to `res`. Returns the number of
/// points appended.
fn expand_record(record: &MetricRecord, res: &mut Vec<Point>) -> usize {
    let base = sanitize(&record.name);
    let start = res.len();
    for (field, value) in &record.fields {
        let value = match *value {
            FieldValue::Float(f) => Value::Float(f),
            FieldValue::Int(i) => Value::Int(i),
            ref other => {
                warn!(
                    "skipping field {:?} of metric {:?}: unsupported {} value",
                    field,
                    record.name,
                    other.type_name()
                );
                continue;
            }
        };
        let field = sanitize(field);
        let name = if field == DEFAULT_FIELD {
            base.clone()
        } else {
            format!("{}.{}", base, field)
        };
        res.push(
            Point::new(name, value)
                .tags(record.tags.clone())
                .timestamp(record.timestamp),
        );
    }
    res.len() - start
}

/// Expand a batch of records into points.
///
/// Records are expanded in order; all points of one record come before any
/// point of the next.
pub fn expand(records: &[MetricRecord]) -> Vec<Point> {
    let mut res = Vec::with_capacity(records.iter().map(|r| r.fields.len()).sum());
    for record in records {
        let produced = expand_record(record, &mut res);
        trace!("metric {:?} expanded into {} points", record.name, produced);
    }
    debug!("expanded {} records into {} points", records.len(), res.len());
    res
}
