//! The data that moves through sfxpipe: telegraf records on the way in,
//! SignalFx points on the way out.

mod point;
mod record;
mod tagmap;

pub use self::point::{MetricKind, Point, Value};
pub use self::record::{FieldValue, MetricRecord};

/// Tags, keyed and valued by strings.
pub type TagMap = self::tagmap::TagMap<String, String>;
