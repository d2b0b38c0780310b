use std::sync::Arc;

use chrono::Utc;
use personio_client::Result;
use personio_client::client::Personio;
use personio_client::models::{Attendance, WritableResource};

/// Record a short attendance for the first employee, then remove it again.
pub fn run(client: &Arc<Personio>) -> Result<()> {
    let Some(employee_id) = client.get_employees()?.first().and_then(|e| e.id_) else {
        log::warn!("no employees, skipping attendance scenario");
        return Ok(());
    };

    let attendance = Attendance {
        employee_id: Some(employee_id),
        date: Some(Utc::now().fixed_offset()),
        start_time: Some("09:00".to_string()),
        end_time: Some("09:30".to_string()),
        comment: Some("created by hello-personio".to_string()),
        ..Attendance::default()
    };

    let mut attendance: WritableResource<Attendance, Personio> =
        WritableResource::new(attendance).with_client(client);
    attendance.create(None)?;
    println!("created attendance {:?} ({})", attendance.id_, attendance.state());

    attendance.delete(None)?;
    println!("deleted attendance ({})", attendance.state());
    Ok(())
}
