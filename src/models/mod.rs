//! Resource models for the Personio API.
//!
//! The API wraps every attribute as `{"label": .., "value": ..}` and sends
//! custom fields under `dynamic_<id>` keys. A resource type declares an
//! ordered table of [`FieldMapping`]s; [`Record`] uses that table to decode
//! payloads into values and to encode them back, and the typed structs in
//! [`resources`] convert to and from records.

pub mod dynamic;
pub mod mapping;
pub mod record;
pub mod resource;
pub mod resources;
pub mod schema;
pub mod value;
pub mod writable;

pub use dynamic::{DYNAMIC_PREFIX, DynamicAttr, DynamicAttrs};
pub use mapping::{FieldKind, FieldMapping, NumericType, PlainType, ResourceRef};
pub use record::{Payload, Record, unexpected_field_key};
pub use resource::Resource;
pub use resources::{
    Absence, AbsenceEntitlement, AbsenceType, Attendance, Certificate, CostCenter, Department,
    Employee, HolidayCalendar, Office, ShortEmployee, Team, WorkSchedule,
};
pub use schema::{ResourceSchema, schema};
pub use value::{FromValue, IntoValue, Value};
pub use writable::{
    Capabilities, LifecycleHooks, LifecycleState, Transport, Verb, Writable, WritableResource,
    execute,
};
