use std::sync::{Mutex, PoisonError};

use reqwest::Method;
use reqwest::blocking::Client;
use serde_json::{Map, Value, json};

use crate::LogLevel;
use crate::client::api::PersonioApi;
use crate::client::auth::{fetch_token, rotated_token};
use crate::client::parse::{parse_created_id, parse_created_ids, parse_resource, parse_resources};
use crate::config::PersonioConfig;
use crate::error::{PersonioError, Result};
use crate::models::{Absence, Attendance, Employee, Resource, Transport};

/// Production endpoint of the Personio API.
pub const DEFAULT_BASE_URL: &str = "https://api.personio.de/v1";

/// Blocking HTTP client for the Personio API.
///
/// Every response carries a fresh token in its `Authorization` header; the
/// client swaps it in before the next request.
pub struct Personio {
    http: Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<String>>,
    log_level: LogLevel,
}

impl Personio {
    /// Create an unauthenticated client.
    pub fn new(config: &PersonioConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token: Mutex::new(None),
            log_level: config.log_level,
        }
    }

    /// Fetch one employee by id.
    pub fn get_employee(&self, id: i64) -> Result<Employee> {
        let json = self.request(Method::GET, &format!("company/employees/{}", id), None)?;
        parse_resource(&json)
    }

    /// Fetch the first page of employees.
    pub fn get_employees(&self) -> Result<Vec<Employee>> {
        let json = self.request(Method::GET, "company/employees", None)?;
        parse_resources(&json)
    }

    fn current_token(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store_token(&self, token: String) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        if !self.authenticated() {
            self.authenticate()?;
        }
        let token = self.current_token().ok_or_else(|| {
            PersonioError::Authentication("no token after authentication".to_string())
        })?;

        let url = format!("{}/{}", self.base_url, path);
        log::debug!("{} {}", method, url);
        if let (Some(body), LogLevel::Debug) = (body, self.log_level) {
            log::debug!("Body: {}", body);
        }

        let mut request = self
            .http
            .request(method, &url)
            .bearer_auth(token)
            .header("Accept", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request.send()?;
        if let Some(token) = rotated_token(resp.headers()) {
            self.store_token(token);
        }

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(PersonioError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text()?;
        if text.trim().is_empty() {
            return Ok(json!({ "success": true, "data": {} }));
        }
        Ok(serde_json::from_str(&text)?)
    }
}

impl Transport for Personio {
    fn authenticated(&self) -> bool {
        self.current_token().is_some()
    }

    fn authenticate(&self) -> Result<()> {
        let token = fetch_token(
            &self.http,
            &self.base_url,
            &self.client_id,
            &self.client_secret,
        )?;
        self.store_token(token);
        log::info!("authenticated against {}", self.base_url);
        Ok(())
    }
}

impl PersonioApi for Personio {
    fn create_employee(&self, employee: &Employee) -> Result<i64> {
        let body = json!({ "employee": employee_body(employee) });
        let json = self.request(Method::POST, "company/employees", Some(&body))?;
        parse_created_id(&json)
    }

    fn update_employee(&self, employee: &Employee) -> Result<()> {
        let id = employee.id_.ok_or(PersonioError::MissingField {
            kind: Employee::KIND,
            field: "id_",
        })?;
        let body = json!({ "employee": employee_body(employee) });
        self.request(
            Method::PATCH,
            &format!("company/employees/{}", id),
            Some(&body),
        )?;
        Ok(())
    }

    fn create_absence(&self, absence: &Absence) -> Result<i64> {
        let body = absence_body(absence)?;
        let json = self.request(Method::POST, "company/time-offs", Some(&body))?;
        parse_created_id(&json)
    }

    fn delete_absence(&self, id: i64) -> Result<()> {
        self.request(Method::DELETE, &format!("company/time-offs/{}", id), None)?;
        Ok(())
    }

    fn create_attendances(&self, attendances: &[Attendance]) -> Result<Vec<i64>> {
        let entries = attendances
            .iter()
            .map(attendance_body)
            .collect::<Result<Vec<_>>>()?;
        let body = json!({ "attendances": entries });
        let json = self.request(Method::POST, "company/attendances", Some(&body))?;
        parse_created_ids(&json)
    }

    fn update_attendance(&self, attendance: &Attendance) -> Result<()> {
        let id = attendance.id_.ok_or(PersonioError::MissingField {
            kind: Attendance::KIND,
            field: "id_",
        })?;
        let body = attendance_body(attendance)?;
        self.request(
            Method::PATCH,
            &format!("company/attendances/{}", id),
            Some(&body),
        )?;
        Ok(())
    }

    fn delete_attendance(&self, id: i64) -> Result<()> {
        self.request(Method::DELETE, &format!("company/attendances/{}", id), None)?;
        Ok(())
    }
}

fn date_only(date: &chrono::DateTime<chrono::FixedOffset>) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn insert_some(body: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        body.insert(key.to_string(), value);
    }
}

fn employee_body(employee: &Employee) -> Value {
    let mut body = Map::new();
    insert_some(&mut body, "email", employee.email.clone().map(Value::from));
    insert_some(&mut body, "first_name", employee.first_name.clone().map(Value::from));
    insert_some(&mut body, "last_name", employee.last_name.clone().map(Value::from));
    insert_some(&mut body, "gender", employee.gender.clone().map(Value::from));
    insert_some(&mut body, "position", employee.position.clone().map(Value::from));
    insert_some(&mut body, "status", employee.status.clone().map(Value::from));
    insert_some(
        &mut body,
        "weekly_hours",
        employee.weekly_working_hours.clone().map(Value::from),
    );
    insert_some(
        &mut body,
        "hire_date",
        employee.hire_date.as_ref().map(|date| Value::from(date_only(date))),
    );
    insert_some(
        &mut body,
        "department",
        employee
            .department
            .as_ref()
            .and_then(|department| department.name.clone())
            .map(Value::from),
    );
    insert_some(
        &mut body,
        "supervisor_id",
        employee
            .supervisor
            .as_ref()
            .and_then(|supervisor| supervisor.id_)
            .map(Value::from),
    );
    Value::Object(body)
}

fn required<T: Clone>(value: &Option<T>, kind: &'static str, field: &'static str) -> Result<T> {
    value
        .clone()
        .ok_or(PersonioError::MissingField { kind, field })
}

fn absence_body(absence: &Absence) -> Result<Value> {
    let employee_id = absence
        .employee
        .as_ref()
        .and_then(|employee| employee.id_)
        .ok_or(PersonioError::MissingField {
            kind: Absence::KIND,
            field: "employee",
        })?;
    let time_off_type_id = absence
        .time_off_type
        .as_ref()
        .and_then(|time_off_type| time_off_type.id_)
        .ok_or(PersonioError::MissingField {
            kind: Absence::KIND,
            field: "time_off_type",
        })?;
    let start_date = required(&absence.start_date, Absence::KIND, "start_date")?;
    let end_date = required(&absence.end_date, Absence::KIND, "end_date")?;

    let mut body = Map::new();
    body.insert("employee_id".to_string(), Value::from(employee_id));
    body.insert("time_off_type_id".to_string(), Value::from(time_off_type_id));
    body.insert("start_date".to_string(), Value::from(date_only(&start_date)));
    body.insert("end_date".to_string(), Value::from(date_only(&end_date)));
    body.insert(
        "half_day_start".to_string(),
        Value::from(absence.half_day_start.is_some_and(|half| half != 0.0)),
    );
    body.insert(
        "half_day_end".to_string(),
        Value::from(absence.half_day_end.is_some_and(|half| half != 0.0)),
    );
    insert_some(&mut body, "comment", absence.comment.clone().map(Value::from));
    Ok(Value::Object(body))
}

fn attendance_body(attendance: &Attendance) -> Result<Value> {
    let employee = required(&attendance.employee_id, Attendance::KIND, "employee_id")?;
    let date = required(&attendance.date, Attendance::KIND, "date")?;
    let start_time = required(&attendance.start_time, Attendance::KIND, "start_time")?;
    let end_time = required(&attendance.end_time, Attendance::KIND, "end_time")?;

    Ok(json!({
        "employee": employee,
        "date": date_only(&date),
        "start_time": start_time,
        "end_time": end_time,
        "break": attendance.break_duration.unwrap_or(0),
        "comment": attendance.comment.clone().unwrap_or_default(),
    }))
}
