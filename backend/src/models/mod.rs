//! Typed views over raw form values.

pub mod duration;
pub mod error;
pub mod fields;
pub mod macros;
pub mod timestamp;

pub use duration::{format_hms, DurationParts, RideDuration};
pub use error::{parse_number, ParseError, ParseResult};
pub use fields::{EquipmentId, FieldName, FormValues, RideId};
pub use timestamp::{
    format_service_timestamp, parse_datetime, parse_timestamp, seconds_between,
    SERVICE_TIMESTAMP_FORMAT,
};
