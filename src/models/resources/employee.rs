use chrono::{DateTime, FixedOffset};

use crate::client::PersonioApi;
use crate::error::Result;
use crate::models::resources::reference::{
    AbsenceEntitlement, CostCenter, Department, HolidayCalendar, Office, ShortEmployee, Team,
    WorkSchedule,
};
use crate::models::{Capabilities, FieldKind, LifecycleHooks, Verb, Writable};
use crate::resource;

resource! {
    /// A Personio employee with its organisational references.
    pub struct Employee as "Employee" {
        id_: i64 = "id" => FieldKind::integer(),
        first_name: String = "first_name" => FieldKind::text(),
        last_name: String = "last_name" => FieldKind::text(),
        email: String = "email" => FieldKind::text(),
        gender: String = "gender" => FieldKind::text(),
        status: String = "status" => FieldKind::text(),
        position: String = "position" => FieldKind::text(),
        supervisor: ShortEmployee = "supervisor" => FieldKind::object::<ShortEmployee>(),
        employment_type: String = "employment_type" => FieldKind::text(),
        /// Sent by the API as free text, e.g. `"40"`.
        weekly_working_hours: String = "weekly_working_hours" => FieldKind::text(),
        hire_date: DateTime<FixedOffset> = "hire_date" => FieldKind::date(),
        contract_end_date: DateTime<FixedOffset> = "contract_end_date" => FieldKind::date(),
        termination_date: DateTime<FixedOffset> = "termination_date" => FieldKind::date(),
        termination_type: String = "termination_type" => FieldKind::text(),
        termination_reason: String = "termination_reason" => FieldKind::text(),
        probation_period_end: DateTime<FixedOffset> = "probation_period_end" => FieldKind::date(),
        created_at: DateTime<FixedOffset> = "created_at" => FieldKind::date(),
        last_modified_at: DateTime<FixedOffset> = "last_modified_at" => FieldKind::date(),
        office: Office = "office" => FieldKind::object::<Office>(),
        department: Department = "department" => FieldKind::object::<Department>(),
        cost_centers: Vec<CostCenter> = "cost_centers" =>
            FieldKind::list_of(FieldKind::object::<CostCenter>()),
        fix_salary: f64 = "fix_salary" => FieldKind::float(),
        hourly_salary: f64 = "hourly_salary" => FieldKind::float(),
        vacation_day_balance: f64 = "vacation_day_balance" => FieldKind::float(),
        last_working_day: DateTime<FixedOffset> = "last_working_day" => FieldKind::date(),
        holiday_calendar: HolidayCalendar = "holiday_calendar" =>
            FieldKind::object::<HolidayCalendar>(),
        work_schedule: WorkSchedule = "work_schedule" => FieldKind::object::<WorkSchedule>(),
        absence_entitlement: Vec<AbsenceEntitlement> = "absence_entitlement" =>
            FieldKind::list_of(FieldKind::object::<AbsenceEntitlement>()),
        profile_picture: String = "profile_picture" => FieldKind::text(),
        team: Team = "team" => FieldKind::object::<Team>(),
    }
}

impl Employee {
    /// `first_name last_name`, skipping whichever part is missing.
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Employees cannot be deleted through the API.
impl Writable for Employee {
    const CAPABILITIES: Capabilities = Capabilities::ALL.without(Verb::Delete);
}

impl<C: PersonioApi + ?Sized> LifecycleHooks<C> for Employee {
    fn try_create(&mut self, client: &C) -> Result<()> {
        let id = client.create_employee(self)?;
        self.id_ = Some(id);
        Ok(())
    }

    fn try_update(&mut self, client: &C) -> Result<()> {
        client.update_employee(self)
    }
}
