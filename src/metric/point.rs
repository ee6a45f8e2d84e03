use metric::TagMap;
use std::sync;

/// The kind of a `Point` as SignalFx understands it. Everything sfxpipe emits
/// is a gauge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetricKind {
    /// A point-in-time reading.
    Gauge,
}

impl MetricKind {
    /// The name SignalFx uses for this kind in its datapoint API.
    pub fn as_str(&self) -> &'static str {
        match *self {
            MetricKind::Gauge => "gauge",
        }
    }
}

/// The scalar carried by a `Point`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// A floating point reading.
    Float(f64),
    /// An integer reading.
    Int(i64),
}

/// One flattened time series value
///
/// A `Point` is produced for a single numeric field of a `MetricRecord` and is
/// what gets shipped to SignalFx.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    /// The sanitized, possibly suffixed, metric name.
    pub name: String,
    /// The owning record's tags.
    pub tags: sync::Arc<TagMap>,
    /// The reading.
    pub value: Value,
    /// Always `MetricKind::Gauge`.
    pub kind: MetricKind,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
}

impl Point {
    /// Make a gauge point
    ///
    /// The point starts out with no tags and a timestamp of zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use sfxpipe::metric::{MetricKind, Point, Value};
    ///
    /// let p = Point::new("cpu.usage_idle", Value::Float(99.5)).timestamp(1000);
    ///
    /// assert_eq!(p.kind, MetricKind::Gauge);
    /// assert_eq!(p.name, "cpu.usage_idle");
    /// assert_eq!(p.timestamp, 1000);
    /// assert!(p.tags.is_empty());
    /// ```
    pub fn new<S>(name: S, value: Value) -> Point
    where
        S: Into<String>,
    {
        Point {
            name: name.into(),
            tags: sync::Arc::new(TagMap::default()),
            value: value,
            kind: MetricKind::Gauge,
            timestamp: 0,
        }
    }

    /// Set the tags of the Point. The `Arc` is stored as given, not copied.
    pub fn tags(mut self, tags: sync::Arc<TagMap>) -> Point {
        self.tags = tags;
        self
    }

    /// Set the timestamp of the Point, in seconds.
    pub fn timestamp(mut self, ts: i64) -> Point {
        self.timestamp = ts;
        self
    }

    /// The timestamp in milliseconds, as SignalFx expects it.
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp.saturating_mul(1000)
    }
}
