use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, Once, PoisonError};

use log::{Level, LevelFilter, Log, Metadata, Record as LogRecord};
use serde_json::{Value as JsonValue, json};

use personio_client::logging::was_logged;
use personio_client::models::{
    CostCenter, DynamicAttr, Employee, FieldKind, Office, Record, Resource, ShortEmployee, Team,
    Value, unexpected_field_key,
};
use personio_client::{PersonioError, resource};

struct CapturingLogger {
    warnings: Mutex<Vec<String>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &LogRecord) {
        if self.enabled(record.metadata()) {
            self.warnings
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger {
    warnings: Mutex::new(Vec::new()),
};
static INIT: Once = Once::new();

fn init_logger() {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(LevelFilter::Warn);
    });
}

fn warnings_matching(needle: &str) -> usize {
    LOGGER
        .warnings
        .lock()
        .unwrap()
        .iter()
        .filter(|message| message.contains(needle))
        .count()
}

resource! {
    /// Only used by the unexpected field tests.
    struct Gadget as "Gadget" {
        id_: i64 = "id" => FieldKind::integer(),
        name: String = "name" => FieldKind::text(),
    }
}

resource! {
    /// Only used by the label cache tests.
    struct Badge as "Badge" {
        code: String = "code" => FieldKind::text(),
        issued: chrono::DateTime<chrono::FixedOffset> = "issued" => FieldKind::date(),
    }
}

fn payload(json: JsonValue) -> serde_json::Map<String, JsonValue> {
    match json {
        JsonValue::Object(map) => map,
        other => panic!("not an object: {}", other),
    }
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn decodes_employee_with_coerced_id_and_custom_field() {
    let employee = Employee::from_payload(&payload(json!({
        "id": {"label": "ID", "value": "7"},
        "first_name": {"label": "First name", "value": "Ada"},
        "dynamic_3": {"label": "Shirt size", "value": "M"}
    })))
    .unwrap();

    assert_eq!(employee.id_, Some(7));
    assert_eq!(employee.first_name.as_deref(), Some("Ada"));
    assert_eq!(employee.dynamic.len(), 1);
    assert_eq!(
        employee.dynamic.get(3),
        Some(&DynamicAttr::new(3, "Shirt size", "M"))
    );
    assert_eq!(employee.last_name, None);
}

#[test]
fn known_fields_survive_a_round_trip() {
    let wire = payload(json!({
        "id": {"label": "ID", "value": 11},
        "email": {"label": "Email", "value": "grace@example.org"},
        "fix_salary": {"label": "Fix salary", "value": 5200.5},
        "hire_date": {"label": "Hire date", "value": "2019-04-01T00:00:00+02:00"},
        "office": {"label": "Office", "value": {"type": "Office", "attributes": {"id": 2, "name": "Munich"}}},
        "cost_centers": {"label": "Cost center", "value": [
            {"type": "CostCenter", "attributes": {"id": 1, "name": "R&D", "percentage": 60}},
            {"type": "CostCenter", "attributes": {"id": 2, "name": "Ops", "percentage": 40}}
        ]}
    }));

    let employee = Employee::from_payload(&wire).unwrap();
    let encoded = employee.to_payload().unwrap();

    let mut keys: Vec<_> = encoded.keys().cloned().collect();
    keys.sort();
    assert_eq!(
        keys,
        vec!["cost_centers", "email", "fix_salary", "hire_date", "id", "office"]
    );
    assert_eq!(encoded["id"]["value"], json!(11));
    assert_eq!(encoded["email"]["value"], json!("grace@example.org"));
    assert_eq!(encoded["fix_salary"]["value"], json!(5200.5));
    assert_eq!(encoded["hire_date"]["value"], json!("2019-04-01"));
    assert_eq!(encoded["office"]["value"]["name"]["value"], json!("Munich"));
    assert_eq!(encoded["cost_centers"]["value"][1]["name"]["value"], json!("Ops"));

    let decoded_again = Employee::from_payload(&encoded).unwrap();
    assert_eq!(decoded_again.office, employee.office);
    assert_eq!(decoded_again.cost_centers, employee.cost_centers);
    assert_eq!(decoded_again.fix_salary, employee.fix_salary);
    assert_ne!(decoded_again, employee);
    assert_eq!(
        decoded_again.hire_date.map(|date| date.to_rfc3339()),
        Some("2019-04-01T00:00:00+00:00".to_string())
    );
}

#[test]
fn absent_fields_are_never_encoded() {
    let employee = Employee {
        first_name: Some("Ada".to_string()),
        ..Employee::default()
    };
    let encoded = employee.to_payload().unwrap();
    assert_eq!(encoded.len(), 1);
    assert!(encoded.contains_key("first_name"));
}

#[test]
fn null_wire_values_decode_as_absent() {
    let office = Office::from_payload(&payload(json!({
        "id": {"label": "ID", "value": null},
        "name": {"label": "Name", "value": "Berlin"}
    })))
    .unwrap();
    assert_eq!(office.id_, None);
    assert_eq!(office.name.as_deref(), Some("Berlin"));
}

#[test]
fn unexpected_field_is_dropped_and_warned_once() {
    init_logger();
    let key = unexpected_field_key("foo");
    assert!(!was_logged(&key));

    let first = Gadget::from_payload(&payload(json!({
        "id": {"label": "ID", "value": 1},
        "foo": {"label": "Foo", "value": "bar"}
    })))
    .unwrap();
    assert_eq!(first.id_, Some(1));
    assert_eq!(first.to_payload().unwrap().get("foo"), None);
    assert_eq!(warnings_matching("unexpected field 'foo'"), 1);

    let second = Gadget::from_payload(&payload(json!({
        "name": {"label": "Name", "value": "Widget"},
        "foo": {"label": "Foo", "value": "baz"}
    })))
    .unwrap();
    assert_eq!(second.name.as_deref(), Some("Widget"));
    assert_eq!(warnings_matching("unexpected field 'foo'"), 1);
    assert!(was_logged(&key));
}

#[test]
fn unexpected_field_warns_once_across_resource_types() {
    init_logger();
    let stray = json!({
        "id": {"label": "ID", "value": 8},
        "legacy_code": {"label": "Legacy code", "value": "X-1"}
    });

    let office = Office::from_json(&stray).unwrap();
    let team = Team::from_json(&stray).unwrap();
    assert_eq!(office.id_, Some(8));
    assert_eq!(team.id_, Some(8));

    assert_eq!(warnings_matching("unexpected field 'legacy_code'"), 1);
    assert!(was_logged(&unexpected_field_key("legacy_code")));
}

#[test]
fn custom_fields_are_encoded_under_their_keys() {
    let employee = Employee::from_payload(&payload(json!({
        "id": {"label": "ID", "value": "7"},
        "first_name": {"label": "First name", "value": "Ada"},
        "dynamic_3": {"label": "Shirt size", "value": "M"}
    })))
    .unwrap();

    let encoded = employee.to_payload().unwrap();
    assert_eq!(encoded.len(), 3);
    assert_eq!(encoded["dynamic_3"], json!({"label": "Shirt size", "value": "M"}));
    assert_eq!(encoded["id"]["value"], json!(7));
    assert_eq!(encoded["first_name"]["value"], json!("Ada"));
    assert!(encoded["first_name"]["label"].is_string());
}

#[test]
fn custom_field_order_does_not_affect_identity() {
    let a = Employee::from_json(&json!({
        "id": {"label": "ID", "value": 5},
        "dynamic_1": {"label": "Shirt size", "value": "M"},
        "dynamic_2": {"label": "Team colour", "value": "blue"}
    }))
    .unwrap();
    let b = Employee::from_json(&json!({
        "dynamic_2": {"label": "Team colour", "value": "blue"},
        "id": {"label": "ID", "value": "5"},
        "dynamic_1": {"label": "Shirt size", "value": "M"}
    }))
    .unwrap();

    assert_eq!(a, b);
    assert_eq!(a.cmp(&b), std::cmp::Ordering::Equal);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn ordering_follows_declaration_order() {
    let low = Employee {
        id_: Some(1),
        first_name: Some("Zed".to_string()),
        ..Employee::default()
    };
    let high = Employee {
        id_: Some(2),
        first_name: Some("Abe".to_string()),
        ..Employee::default()
    };
    assert!(low < high);

    let unset = Employee::default();
    assert!(unset < low);
}

#[test]
fn custom_fields_break_ties() {
    let mut a = Employee {
        id_: Some(1),
        ..Employee::default()
    };
    let mut b = a.clone();
    a.dynamic.insert(DynamicAttr::new(1, "Size", "L"));
    b.dynamic.insert(DynamicAttr::new(1, "Size", "M"));
    assert_ne!(a, b);
    assert!(a < b);
}

#[test]
fn different_kinds_are_never_equal() {
    let office = Office {
        id_: Some(1),
        name: Some("HQ".to_string()),
        ..Office::default()
    };
    let team = Team {
        id_: Some(1),
        name: Some("HQ".to_string()),
        ..Default::default()
    };

    let office_record = office.to_record();
    let team_record = team.to_record();
    assert_ne!(office_record, team_record);
    assert_ne!(office_record.canonical_text(), team_record.canonical_text());
}

#[test]
fn records_are_unordered_against_plain_values() {
    let record = Office {
        id_: Some(3),
        ..Office::default()
    }
    .to_record();

    assert!(record != Value::Int(3));
    assert_eq!(record.partial_cmp(&Value::String("3".to_string())), None);
    assert!(!(record < Value::Int(3)));

    let same = Value::Object(record.clone());
    assert!(record == same);
    assert_eq!(record.partial_cmp(&same), Some(std::cmp::Ordering::Equal));
}

#[test]
fn labels_are_cached_and_last_writer_wins() {
    assert_eq!(Badge::label("code"), None);

    Badge::from_payload(&payload(json!({
        "code": {"label": "Badge code", "value": "A-1"}
    })))
    .unwrap();
    assert_eq!(Badge::label("code").as_deref(), Some("Badge code"));
    assert_eq!(Badge::label("issued"), None);

    Badge::from_payload(&payload(json!({
        "code": {"label": "Code", "value": "A-2"},
        "issued": {"label": "Issued on", "value": "2021-02-03T10:00:00Z"}
    })))
    .unwrap();
    assert_eq!(Badge::label("code").as_deref(), Some("Code"));

    let badge = Badge {
        code: Some("B-7".to_string()),
        issued: Some(
            chrono::DateTime::parse_from_rfc3339("2022-12-24T18:30:00+01:00").unwrap(),
        ),
        ..Badge::default()
    };
    let encoded = badge.to_payload().unwrap();
    assert_eq!(
        encoded["code"],
        json!({"label": "Code", "value": "B-7"})
    );
    assert_eq!(
        encoded["issued"],
        json!({"label": "Issued on", "value": "2022-12-24"})
    );
}

#[test]
fn nested_records_decode_into_typed_members() {
    let employee = Employee::from_json(&json!({
        "type": "Employee",
        "attributes": {
            "supervisor": {"label": "Supervisor", "value": {
                "type": "Employee",
                "attributes": {
                    "id": {"label": "ID", "value": 99},
                    "first_name": {"label": "First name", "value": "Grace"}
                }
            }},
            "absence_entitlement": {"label": "Absence entitlement", "value": [
                {"type": "TimeOffType", "attributes": {"id": 1, "name": "Vacation", "entitlement": 28}}
            ]}
        }
    }))
    .unwrap();

    let supervisor = employee.supervisor.as_ref().unwrap();
    assert_eq!(
        supervisor,
        &ShortEmployee {
            id_: Some(99),
            first_name: Some("Grace".to_string()),
            ..ShortEmployee::default()
        }
    );
    let entitlements = employee.absence_entitlement.as_ref().unwrap();
    assert_eq!(entitlements.len(), 1);
    assert_eq!(entitlements[0].entitlement, Some(28.0));
}

#[test]
fn record_exposes_values_by_local_name() {
    let cost_center = CostCenter::from_json(&json!({
        "id": 4,
        "name": "Sales",
        "percentage": "12.5"
    }))
    .unwrap();
    let record: Record = cost_center.to_record();

    assert_eq!(record.kind(), "CostCenter");
    assert_eq!(record.get("id_"), Some(&Value::Int(4)));
    assert_eq!(record.get("percentage"), Some(&Value::Float(12.5)));
    assert_eq!(record.get("id"), None);
    assert_eq!(record.fields().count(), 3);
}

#[test]
fn numeric_strings_and_numbers_decode_to_equal_records() {
    let from_number = CostCenter::from_json(&json!({"id": 5, "percentage": 60})).unwrap();
    let from_string = CostCenter::from_json(&json!({"id": "5", "percentage": "60"})).unwrap();

    assert_eq!(from_number.to_record().get("percentage"), Some(&Value::Float(60.0)));
    assert_eq!(from_number, from_string);
    assert_eq!(from_number.to_record(), from_string.to_record());
    assert_eq!(hash_of(&from_number), hash_of(&from_string));
}

#[test]
fn malformed_values_are_rejected() {
    let err = Employee::from_json(&json!({
        "id": {"label": "ID", "value": "seven"}
    }))
    .unwrap_err();
    assert!(matches!(err, PersonioError::InvalidFieldValue { ref field, .. } if field == "id"));

    let err = Employee::from_json(&json!({
        "dynamic_x": {"label": "Broken", "value": "1"}
    }))
    .unwrap_err();
    assert!(matches!(err, PersonioError::MalformedFieldKey(ref key) if key == "dynamic_x"));

    let err = Employee::from_json(&json!(["not", "an", "object"])).unwrap_err();
    assert!(matches!(err, PersonioError::InvalidFieldValue { .. }));
}
