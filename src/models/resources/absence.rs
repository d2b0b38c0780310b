use chrono::{DateTime, FixedOffset};

use crate::client::PersonioApi;
use crate::error::{PersonioError, Result};
use crate::models::resources::reference::{AbsenceType, Certificate, ShortEmployee};
use crate::models::{Capabilities, FieldKind, LifecycleHooks, Resource, Verb, Writable};
use crate::resource;

resource! {
    /// A time-off period of one employee.
    pub struct Absence as "Absence" {
        id_: i64 = "id" => FieldKind::integer(),
        status: String = "status" => FieldKind::text(),
        comment: String = "comment" => FieldKind::text(),
        start_date: DateTime<FixedOffset> = "start_date" => FieldKind::date(),
        end_date: DateTime<FixedOffset> = "end_date" => FieldKind::date(),
        days_count: f64 = "days_count" => FieldKind::float(),
        /// `1` when the first day is a half day.
        half_day_start: f64 = "half_day_start" => FieldKind::float(),
        /// `1` when the last day is a half day.
        half_day_end: f64 = "half_day_end" => FieldKind::float(),
        time_off_type: AbsenceType = "time_off_type" => FieldKind::object::<AbsenceType>(),
        employee: ShortEmployee = "employee" => FieldKind::object::<ShortEmployee>(),
        created_by: String = "created_by" => FieldKind::text(),
        certificate: Certificate = "certificate" => FieldKind::object::<Certificate>(),
        created_at: DateTime<FixedOffset> = "created_at" => FieldKind::date(),
    }
}

/// Absences are replaced, never updated in place.
impl Writable for Absence {
    const CAPABILITIES: Capabilities = Capabilities::ALL.without(Verb::Update);
}

impl<C: PersonioApi + ?Sized> LifecycleHooks<C> for Absence {
    fn try_create(&mut self, client: &C) -> Result<()> {
        let id = client.create_absence(self)?;
        self.id_ = Some(id);
        Ok(())
    }

    fn try_delete(&mut self, client: &C) -> Result<()> {
        let id = self.id_.ok_or(PersonioError::MissingField {
            kind: Self::KIND,
            field: "id_",
        })?;
        client.delete_absence(id)
    }
}
