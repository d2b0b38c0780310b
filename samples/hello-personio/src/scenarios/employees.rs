use std::sync::Arc;

use personio_client::Result;
use personio_client::client::Personio;
use personio_client::models::{Employee, Resource};

/// List employees and print their custom fields with the labels the API sent.
pub fn run(client: &Arc<Personio>) -> Result<()> {
    let employees = client.get_employees()?;
    log::info!("fetched {} employees", employees.len());

    for employee in employees.iter().take(5) {
        println!("{} <{}>", employee.full_name(), employee.email.as_deref().unwrap_or("-"));
        for attr in employee.dynamic.iter() {
            println!("  {} ({}) = {}", attr.label, attr.key(), attr.value);
        }
    }

    if let Some(label) = Employee::label("hire_date") {
        println!("hire_date is labelled '{}'", label);
    }
    Ok(())
}
