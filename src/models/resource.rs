use serde_json::Value as JsonValue;

use crate::error::{PersonioError, Result};
use crate::models::mapping::FieldMapping;
use crate::models::record::{Payload, Record};
use crate::models::schema::{ResourceSchema, schema};

/// A typed Personio record backed by a declarative mapping table.
///
/// Implementations are normally generated with [`resource!`](crate::resource),
/// which also derives equality, ordering and hashing from [`Record`].
pub trait Resource: Sized + 'static {
    /// Type tag, part of the equality projection.
    const KIND: &'static str;

    /// Mapping table in declaration order.
    fn field_mappings() -> Vec<FieldMapping>;

    /// Build the typed resource from a decoded record.
    fn from_record(record: Record) -> Result<Self>;

    /// Type-erased view of the current field values.
    fn to_record(&self) -> Record;

    /// Registered schema of this type.
    fn schema() -> &'static ResourceSchema {
        schema::<Self>()
    }

    /// Decode a label-wrapped payload.
    fn from_payload(payload: &Payload) -> Result<Self> {
        Self::from_record(Record::decode(Self::schema(), payload)?)
    }

    /// Decode a JSON value that must be an object.
    fn from_json(json: &JsonValue) -> Result<Self> {
        let payload = json
            .as_object()
            .ok_or_else(|| PersonioError::invalid_value(Self::KIND, "object", json))?;
        Self::from_payload(payload)
    }

    /// Encode into a label-wrapped payload.
    fn to_payload(&self) -> Result<Payload> {
        self.to_record().to_payload()
    }

    /// Last label the API sent for `api_field`.
    fn label(api_field: &str) -> Option<String> {
        Self::schema().label(api_field)
    }
}

/// Declare a resource struct together with its mapping table.
///
/// Every field becomes `pub name: Option<Type>` and maps to one API field with
/// the given [`FieldKind`](crate::models::FieldKind). A `dynamic` member holds
/// the custom fields. The generated type implements [`Resource`], conversion
/// to and from [`Value`](crate::models::Value), and equality, ordering and
/// hashing over its record.
///
/// ```ignore
/// resource! {
///     /// Cost center share of an employee.
///     pub struct CostCenter as "CostCenter" {
///         id_: i64 = "id" => FieldKind::integer(),
///         name: String = "name" => FieldKind::text(),
///         percentage: f64 = "percentage" => FieldKind::float(),
///     }
/// }
/// ```
#[macro_export]
macro_rules! resource {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident as $kind:literal {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ty = $api:literal => $mapping:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field: ::core::option::Option<$ty>,
            )*
            /// Custom fields keyed by their numeric id.
            pub dynamic: $crate::models::DynamicAttrs,
        }

        impl $crate::models::Resource for $name {
            const KIND: &'static str = $kind;

            fn field_mappings() -> ::std::vec::Vec<$crate::models::FieldMapping> {
                ::std::vec![
                    $($crate::models::FieldMapping::new($api, stringify!($field), $mapping)),*
                ]
            }

            fn from_record(
                mut record: $crate::models::Record,
            ) -> $crate::error::Result<Self> {
                ::core::result::Result::Ok($name {
                    $($field: record.take(stringify!($field))?,)*
                    dynamic: record.take_dynamic(),
                })
            }

            fn to_record(&self) -> $crate::models::Record {
                let mut record = $crate::models::Record::new(
                    <Self as $crate::models::Resource>::schema(),
                );
                $(
                    record.put(
                        stringify!($field),
                        self.$field.clone().map($crate::models::IntoValue::into_value),
                    );
                )*
                record.set_dynamic(self.dynamic.clone());
                record
            }
        }

        impl $crate::models::FromValue for $name {
            fn from_value(
                value: $crate::models::Value,
                field: &str,
            ) -> $crate::error::Result<Self> {
                match value {
                    $crate::models::Value::Object(record)
                        if record.kind() == <Self as $crate::models::Resource>::KIND =>
                    {
                        <Self as $crate::models::Resource>::from_record(record)
                    }
                    other => ::core::result::Result::Err(
                        $crate::error::PersonioError::InvalidFieldValue {
                            field: field.to_string(),
                            expected: $kind,
                            found: other.type_name().to_string(),
                        },
                    ),
                }
            }
        }

        impl $crate::models::IntoValue for $name {
            fn into_value(self) -> $crate::models::Value {
                $crate::models::Value::Object($crate::models::Resource::to_record(&self))
            }
        }

        impl ::core::cmp::PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                $crate::models::Resource::to_record(self)
                    == $crate::models::Resource::to_record(other)
            }
        }

        impl ::core::cmp::Eq for $name {}

        impl ::core::cmp::PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> ::core::option::Option<::core::cmp::Ordering> {
                ::core::option::Option::Some(::core::cmp::Ord::cmp(self, other))
            }
        }

        impl ::core::cmp::Ord for $name {
            fn cmp(&self, other: &Self) -> ::core::cmp::Ordering {
                $crate::models::Resource::to_record(self)
                    .cmp(&$crate::models::Resource::to_record(other))
            }
        }

        impl ::core::hash::Hash for $name {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                ::core::hash::Hash::hash(&$crate::models::Resource::to_record(self), state);
            }
        }
    };
}
