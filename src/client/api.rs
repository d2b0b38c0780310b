use crate::error::Result;
use crate::models::{Absence, Attendance, Employee, Transport};

/// Network operations behind the lifecycle hooks of the writable resources.
pub trait PersonioApi: Transport {
    /// Create an employee and return its new id.
    fn create_employee(&self, employee: &Employee) -> Result<i64>;

    /// Update an existing employee.
    fn update_employee(&self, employee: &Employee) -> Result<()>;

    /// Create a time-off period and return its new id.
    fn create_absence(&self, absence: &Absence) -> Result<i64>;

    /// Delete a time-off period by id.
    fn delete_absence(&self, id: i64) -> Result<()>;

    /// Create attendances and return their ids in request order.
    fn create_attendances(&self, attendances: &[Attendance]) -> Result<Vec<i64>>;

    /// Update an existing attendance.
    fn update_attendance(&self, attendance: &Attendance) -> Result<()>;

    /// Delete an attendance by id.
    fn delete_attendance(&self, id: i64) -> Result<()>;
}
