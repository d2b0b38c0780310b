//! Read-only reference data embedded in employees and absences.

use crate::models::FieldKind;
use crate::resource;

resource! {
    /// Time-off entitlement of an employee for one absence type.
    pub struct AbsenceEntitlement as "AbsenceEntitlement" {
        id_: i64 = "id" => FieldKind::integer(),
        name: String = "name" => FieldKind::text(),
        entitlement: f64 = "entitlement" => FieldKind::float(),
    }
}

resource! {
    /// Kind of absence, e.g. vacation or sick leave.
    pub struct AbsenceType as "AbsenceType" {
        id_: i64 = "id" => FieldKind::integer(),
        name: String = "name" => FieldKind::text(),
        category: String = "category" => FieldKind::text(),
    }
}

resource! {
    /// Medical certificate state of an absence.
    pub struct Certificate as "Certificate" {
        status: String = "status" => FieldKind::text(),
    }
}

resource! {
    /// Share of an employee's cost assigned to a cost center.
    pub struct CostCenter as "CostCenter" {
        id_: i64 = "id" => FieldKind::integer(),
        name: String = "name" => FieldKind::text(),
        percentage: f64 = "percentage" => FieldKind::float(),
    }
}

resource! {
    pub struct Department as "Department" {
        id_: i64 = "id" => FieldKind::integer(),
        name: String = "name" => FieldKind::text(),
    }
}

resource! {
    /// Public holiday calendar of a region.
    pub struct HolidayCalendar as "HolidayCalendar" {
        id_: i64 = "id" => FieldKind::integer(),
        name: String = "name" => FieldKind::text(),
        country: String = "country" => FieldKind::text(),
        state: String = "state" => FieldKind::text(),
    }
}

resource! {
    pub struct Office as "Office" {
        id_: i64 = "id" => FieldKind::integer(),
        name: String = "name" => FieldKind::text(),
    }
}

resource! {
    /// Employee reference as embedded in other resources.
    pub struct ShortEmployee as "ShortEmployee" {
        id_: i64 = "id" => FieldKind::integer(),
        first_name: String = "first_name" => FieldKind::text(),
        last_name: String = "last_name" => FieldKind::text(),
        email: String = "email" => FieldKind::text(),
    }
}

resource! {
    pub struct Team as "Team" {
        id_: i64 = "id" => FieldKind::integer(),
        name: String = "name" => FieldKind::text(),
    }
}

resource! {
    /// Weekly working schedule; each day holds working hours as `HH:MM`.
    pub struct WorkSchedule as "WorkSchedule" {
        id_: i64 = "id" => FieldKind::integer(),
        name: String = "name" => FieldKind::text(),
        monday: String = "monday" => FieldKind::text(),
        tuesday: String = "tuesday" => FieldKind::text(),
        wednesday: String = "wednesday" => FieldKind::text(),
        thursday: String = "thursday" => FieldKind::text(),
        friday: String = "friday" => FieldKind::text(),
        saturday: String = "saturday" => FieldKind::text(),
        sunday: String = "sunday" => FieldKind::text(),
    }
}
