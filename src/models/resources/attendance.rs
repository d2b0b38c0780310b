use chrono::{DateTime, FixedOffset};

use crate::client::PersonioApi;
use crate::error::{PersonioError, Result};
use crate::models::{FieldKind, LifecycleHooks, Resource, Writable};
use crate::resource;

resource! {
    /// Working time of one employee on one day.
    pub struct Attendance as "Attendance" {
        id_: i64 = "id" => FieldKind::integer(),
        employee_id: i64 = "employee" => FieldKind::integer(),
        date: DateTime<FixedOffset> = "date" => FieldKind::date(),
        /// `HH:MM`
        start_time: String = "start_time" => FieldKind::text(),
        /// `HH:MM`
        end_time: String = "end_time" => FieldKind::text(),
        /// Break length in minutes.
        break_duration: i64 = "break" => FieldKind::integer(),
        comment: String = "comment" => FieldKind::text(),
        is_holiday: bool = "is_holiday" => FieldKind::boolean(),
        is_on_time_off: bool = "is_on_time_off" => FieldKind::boolean(),
    }
}

impl Attendance {
    fn require_id(&self) -> Result<i64> {
        self.id_.ok_or(PersonioError::MissingField {
            kind: Self::KIND,
            field: "id_",
        })
    }
}

impl Writable for Attendance {}

impl<C: PersonioApi + ?Sized> LifecycleHooks<C> for Attendance {
    fn try_create(&mut self, client: &C) -> Result<()> {
        let ids = client.create_attendances(std::slice::from_ref(self))?;
        let id = ids.first().copied().ok_or_else(|| {
            PersonioError::UnexpectedResponse("no id returned for created attendance".to_string())
        })?;
        self.id_ = Some(id);
        Ok(())
    }

    fn try_update(&mut self, client: &C) -> Result<()> {
        self.require_id()?;
        client.update_attendance(self)
    }

    fn try_delete(&mut self, client: &C) -> Result<()> {
        client.delete_attendance(self.require_id()?)
    }
}
