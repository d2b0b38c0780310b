use serde_json::Value;

use crate::error::{PersonioError, Result};
use crate::models::Resource;

/// Return the `data` member of a Personio response, surfacing `success: false`.
pub(crate) fn response_data(json: &Value) -> Result<&Value> {
    let response = json
        .as_object()
        .ok_or_else(|| PersonioError::UnexpectedResponse("response is not an object".to_string()))?;

    if response.get("success").and_then(Value::as_bool) == Some(false) {
        let message = response
            .get("error")
            .and_then(|error| error.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("request was not successful");
        return Err(PersonioError::UnexpectedResponse(message.to_string()));
    }

    response
        .get("data")
        .ok_or_else(|| PersonioError::UnexpectedResponse("response has no data".to_string()))
}

/// Decode a single resource from a response.
pub(crate) fn parse_resource<T: Resource>(json: &Value) -> Result<T> {
    T::from_json(response_data(json)?)
}

/// Decode every resource of a list response.
pub(crate) fn parse_resources<T: Resource>(json: &Value) -> Result<Vec<T>> {
    response_data(json)?
        .as_array()
        .ok_or_else(|| PersonioError::UnexpectedResponse("data is not a list".to_string()))?
        .iter()
        .map(T::from_json)
        .collect()
}

/// Id of a created resource, from `data.id` or `data.attributes.id`.
pub(crate) fn parse_created_id(json: &Value) -> Result<i64> {
    let data = response_data(json)?;
    data.get("id")
        .or_else(|| data.get("attributes").and_then(|attributes| attributes.get("id")))
        .and_then(id_value)
        .ok_or_else(|| PersonioError::UnexpectedResponse("no id in response".to_string()))
}

/// Ids of created resources from `data.id`, which is a list for batch calls.
pub(crate) fn parse_created_ids(json: &Value) -> Result<Vec<i64>> {
    let data = response_data(json)?;
    match data.get("id") {
        Some(Value::Array(ids)) => ids
            .iter()
            .map(|id| {
                id_value(id).ok_or_else(|| {
                    PersonioError::UnexpectedResponse(format!("invalid id in response: {}", id))
                })
            })
            .collect(),
        Some(id) => id_value(id)
            .map(|id| vec![id])
            .ok_or_else(|| PersonioError::UnexpectedResponse(format!("invalid id in response: {}", id))),
        None => Err(PersonioError::UnexpectedResponse("no id in response".to_string())),
    }
}

/// Ids arrive as numbers or as numeric strings.
fn id_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::{Department, Employee};

    #[test]
    fn failed_response_reports_api_message() {
        let json = json!({"success": false, "error": {"code": 0, "message": "Invalid employee"}});
        let err = response_data(&json).unwrap_err();
        assert!(matches!(err, PersonioError::UnexpectedResponse(ref m) if m == "Invalid employee"));
    }

    #[test]
    fn parses_enveloped_list() {
        let json = json!({
            "success": true,
            "data": [
                {"type": "Department", "attributes": {"id": 1, "name": "Engineering"}},
                {"type": "Department", "attributes": {"id": 2, "name": "Sales"}}
            ]
        });
        let departments: Vec<Department> = parse_resources(&json).unwrap();
        let names: Vec<_> = departments.iter().filter_map(|d| d.name.as_deref()).collect();
        assert_eq!(names, vec!["Engineering", "Sales"]);
    }

    #[test]
    fn parses_single_employee() {
        let json = json!({
            "success": true,
            "data": {
                "type": "Employee",
                "attributes": {
                    "id": {"label": "ID", "value": 11},
                    "email": {"label": "Email", "value": "grace@example.org"}
                }
            }
        });
        let employee: Employee = parse_resource(&json).unwrap();
        assert_eq!(employee.id_, Some(11));
        assert_eq!(employee.email.as_deref(), Some("grace@example.org"));
    }

    #[test]
    fn reads_created_ids() {
        assert_eq!(
            parse_created_id(&json!({"success": true, "data": {"id": 5, "message": "ok"}})).unwrap(),
            5
        );
        assert_eq!(
            parse_created_id(&json!({"success": true, "data": {"type": "TimeOffPeriod", "attributes": {"id": "77"}}}))
                .unwrap(),
            77
        );
        assert_eq!(
            parse_created_ids(&json!({"success": true, "data": {"id": [3, 4]}})).unwrap(),
            vec![3, 4]
        );
        assert!(parse_created_ids(&json!({"success": true, "data": {}})).is_err());
    }
}
