//! In-process stand-in for the MySQL tables, used by tests. It enforces the
//! same unique key, foreign key and cascade the schema declares.

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::collections::HashSet;
use std::sync::Mutex;

use super::employee::resolve_upsert;
use super::{EmployeeRepository, PayrollRepository};
use crate::error::{PayrollError, PayrollResult};
use crate::model::employee::{Employee, NewEmployee, UpsertOutcome};
use crate::model::payroll::{NewPayrollEntry, PayrollEntry, PayrollEntryWithEmployee};

#[derive(Default)]
struct Tables {
    employees: Vec<Employee>,
    payrolls: Vec<PayrollEntry>,
    next_employee_id: u64,
    next_payroll_id: u64,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    rejected_external_ids: HashSet<String>,
    fail_payroll_inserts: bool,
    lose_upserted_rows: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts for these external ids fail as if the engine rejected the row.
    pub fn rejecting(external_ids: &[&str]) -> Self {
        Self {
            rejected_external_ids: external_ids.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Every payroll insert fails with a storage error.
    pub fn failing_payrolls() -> Self {
        Self {
            fail_payroll_inserts: true,
            ..Self::default()
        }
    }

    /// Upserts store nothing and the follow-up lookup comes back empty.
    pub fn losing_upserted_rows() -> Self {
        Self {
            lose_upserted_rows: true,
            ..Self::default()
        }
    }

    pub fn employees(&self) -> Vec<Employee> {
        self.tables.lock().unwrap().employees.clone()
    }

    pub fn payrolls(&self) -> Vec<PayrollEntry> {
        self.tables.lock().unwrap().payrolls.clone()
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryStore {
    async fn upsert(&self, employee: &NewEmployee) -> PayrollResult<UpsertOutcome> {
        if self.rejected_external_ids.contains(&employee.external_id) {
            return Err(PayrollError::Database(format!(
                "rejected row for {}",
                employee.external_id
            )));
        }

        if self.lose_upserted_rows {
            return resolve_upsert(&employee.external_id, false, None, None);
        }

        let mut tables = self.tables.lock().unwrap();
        if let Some(existing) = tables
            .employees
            .iter_mut()
            .find(|e| e.external_id == employee.external_id)
        {
            existing.name = employee.name.clone();
            existing.base_salary = employee.base_salary;
            existing.position = employee.position.clone();
            return Ok(UpsertOutcome {
                internal_id: existing.id,
                was_inserted: false,
            });
        }

        tables.next_employee_id += 1;
        let id = tables.next_employee_id;
        tables.employees.push(Employee {
            id,
            name: employee.name.clone(),
            external_id: employee.external_id.clone(),
            tax_id: employee.tax_id.clone(),
            social_security_id: employee.social_security_id.clone(),
            position: employee.position.clone(),
            hire_date: employee.hire_date,
            base_salary: employee.base_salary,
            monthly_hours: employee.monthly_hours,
        });
        Ok(UpsertOutcome {
            internal_id: id,
            was_inserted: true,
        })
    }

    async fn find_by_external_id(&self, external_id: &str) -> PayrollResult<Option<Employee>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .employees
            .iter()
            .find(|e| e.external_id == external_id)
            .cloned())
    }

    async fn delete_by_id(&self, id: &str) -> PayrollResult<u64> {
        let internal_id = id.parse::<u64>().ok();
        let mut tables = self.tables.lock().unwrap();

        let doomed: Vec<u64> = tables
            .employees
            .iter()
            .filter(|e| Some(e.id) == internal_id || e.external_id == id)
            .map(|e| e.id)
            .collect();

        tables.employees.retain(|e| !doomed.contains(&e.id));
        tables
            .payrolls
            .retain(|p| !doomed.contains(&p.employee_internal_id));

        Ok(doomed.len() as u64)
    }

    async fn list_all(&self) -> PayrollResult<Vec<Employee>> {
        let mut employees = self.employees();
        employees.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(employees)
    }
}

#[async_trait]
impl PayrollRepository for InMemoryStore {
    async fn insert(&self, entry: &NewPayrollEntry) -> PayrollResult<u64> {
        if self.fail_payroll_inserts {
            return Err(PayrollError::StorageUnavailable(
                "payroll table unavailable".to_string(),
            ));
        }

        let mut tables = self.tables.lock().unwrap();
        if !tables
            .employees
            .iter()
            .any(|e| e.id == entry.employee_internal_id)
        {
            return Err(PayrollError::Referential(format!(
                "employee {} does not exist",
                entry.employee_internal_id
            )));
        }

        tables.next_payroll_id += 1;
        let id = tables.next_payroll_id;
        // strictly increasing timestamps keep "newest first" unambiguous
        let created_at = Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(id as i64);
        tables.payrolls.push(PayrollEntry {
            id,
            employee_internal_id: entry.employee_internal_id,
            employee_external_id: Some(entry.employee_external_id.clone()),
            department_code: entry.department_code.clone(),
            supervisor_name: entry.supervisor_name.clone(),
            days_worked: entry.days_worked,
            gross_pay: entry.gross_pay,
            total_deductions: entry.total_deductions,
            net_pay: entry.net_pay,
            created_at,
            period_start: entry.period_start,
            period_end: entry.period_end,
        });
        Ok(id)
    }

    async fn list_all_with_employee_info(&self) -> PayrollResult<Vec<PayrollEntryWithEmployee>> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<PayrollEntryWithEmployee> = tables
            .payrolls
            .iter()
            .filter_map(|p| {
                let employee = tables
                    .employees
                    .iter()
                    .find(|e| e.id == p.employee_internal_id)?;
                Some(PayrollEntryWithEmployee {
                    entry: p.clone(),
                    employee_name: employee.name.clone(),
                    employee_position: employee.position.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| b.entry.id.cmp(&a.entry.id));
        Ok(rows)
    }
}
