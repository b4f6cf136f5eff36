use async_trait::async_trait;

use crate::error::PayrollResult;
use crate::model::employee::{Employee, NewEmployee, UpsertOutcome};
use crate::model::payroll::{NewPayrollEntry, PayrollEntryWithEmployee};

pub mod employee;
#[cfg(test)]
pub mod memory;
pub mod payroll;

pub use employee::MySqlEmployeeRepository;
pub use payroll::MySqlPayrollRepository;

/// Owns the `empleados` table.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Inserts by external id, or updates name, salary and position of the
    /// existing row. The returned internal id is valid in both cases.
    async fn upsert(&self, employee: &NewEmployee) -> PayrollResult<UpsertOutcome>;

    async fn find_by_external_id(&self, external_id: &str) -> PayrollResult<Option<Employee>>;

    /// Deletes the row whose surrogate key or external id equals `id`.
    /// Returns the number of rows removed; payroll rows go with it.
    async fn delete_by_id(&self, id: &str) -> PayrollResult<u64>;

    /// Newest first.
    async fn list_all(&self) -> PayrollResult<Vec<Employee>>;
}

/// Owns the `Nominas` table.
#[async_trait]
pub trait PayrollRepository: Send + Sync {
    /// Fails with `Referential` when the employee does not exist.
    async fn insert(&self, entry: &NewPayrollEntry) -> PayrollResult<u64>;

    /// Newest first, joined with the employee's name and position.
    async fn list_all_with_employee_info(&self) -> PayrollResult<Vec<PayrollEntryWithEmployee>>;
}
