//! Concrete Personio resources.

mod absence;
mod attendance;
mod employee;
mod reference;

pub use absence::Absence;
pub use attendance::Attendance;
pub use employee::Employee;
pub use reference::{
    AbsenceEntitlement, AbsenceType, Certificate, CostCenter, Department, HolidayCalendar, Office,
    ShortEmployee, Team, WorkSchedule,
};
