//! Telegraf's JSON output format
//!
//! Telegraf, configured with `data_format = "json"`, writes one measurement per
//! line:
//!
//! ```text
//! {"fields":{"usage_idle":99.5},"name":"cpu","tags":{"host":"a"},"timestamp":1000}
//! ```
//!
//! Missing members decode to their zero value and a repeated member keeps its
//! last value. Anything that is not a JSON object of the right shape is an
//! error.

use metric::MetricRecord;
use serde_json;
use std::error;
use std::fmt;

/// A line that could not be decoded into a `MetricRecord`.
#[derive(Debug)]
pub struct Error {
    /// The offending line, verbatim.
    pub line: String,
    /// What serde_json made of it.
    pub cause: serde_json::Error,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "could not decode line {:?}: {}", self.line, self.cause)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(error::Error + 'static)> {
        Some(&self.cause)
    }
}

/// Decode one line of telegraf JSON.
pub fn decode(line: &str) -> Result<MetricRecord, Error> {
    serde_json::from_str(line).map_err(|e| Error {
        line: line.to_string(),
        cause: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use metric::FieldValue;

    #[test]
    fn test_decode_telegraf() {
        let line = r#"{"fields":{"used":7,"percent":3.2,"state":"ok"},"name":"mem","tags":{"host":"a","dc":"b"},"timestamp":2000}"#;
        let rec = decode(line).unwrap();

        assert_eq!(rec.name, "mem");
        assert_eq!(rec.timestamp, 2000);
        assert_eq!(rec.tags.len(), 2);
        assert_eq!(rec.tags.get(&"host".to_string()), Some(&"a".to_string()));
        assert_eq!(rec.tags.get(&"dc".to_string()), Some(&"b".to_string()));
        assert_eq!(rec.fields.len(), 3);
        assert_eq!(rec.fields["used"], FieldValue::Int(7));
        assert_eq!(rec.fields["percent"], FieldValue::Float(3.2));
        assert_eq!(rec.fields["state"].type_name(), "string");
    }

    #[test]
    fn test_decode_missing_members_default() {
        let rec = decode("{}").unwrap();
        assert_eq!(rec.name, "");
        assert!(rec.tags.is_empty());
        assert!(rec.fields.is_empty());
        assert_eq!(rec.timestamp, 0);

        let rec = decode(r#"{"name":"cpu","extra":[1,2,3]}"#).unwrap();
        assert_eq!(rec.name, "cpu");
        assert_eq!(rec.timestamp, 0);
    }

    #[test]
    fn test_decode_keeps_tags_verbatim() {
        let rec = decode(r#"{"name":"x","tags":{"host name":"a.b-c"}}"#).unwrap();
        assert_eq!(
            rec.tags.get(&"host name".to_string()),
            Some(&"a.b-c".to_string())
        );
    }

    #[test]
    fn test_decode_malformed() {
        for line in &[
            "",
            "   ",
            "not json",
            r#"{"name":"cpu""#,
            "[]",
            "42",
            "null",
            r#"{"tags":["host","a"]}"#,
            r#"{"tags":{"host":1}}"#,
            r#"{"name":12}"#,
            r#"{"timestamp":"1000"}"#,
            r#"{"timestamp":1000.5}"#,
            r#"{"fields":[1,2]}"#,
        ] {
            let err = decode(line).unwrap_err();
            assert_eq!(&err.line, line);
        }
    }

    #[test]
    fn test_decode_rejects_positional_array() {
        let line = r#"["cpu",{"host":"a"},{"value":1.5},1000]"#;
        let err = decode(line).unwrap_err();
        assert_eq!(err.line, line);
    }

    #[test]
    fn test_decode_repeated_member_last_wins() {
        let rec = decode(r#"{"name":"a","name":"b","fields":{"value":1}}"#).unwrap();
        assert_eq!(rec.name, "b");
        assert_eq!(rec.fields["value"], FieldValue::Int(1));
    }

    #[test]
    fn test_error_display_names_line() {
        let err = decode("nope").unwrap_err();
        let msg = format!("{}", err);
        assert!(msg.contains("\"nope\""));
    }
}
