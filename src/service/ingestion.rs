//! Batch employee ingestion with cascading payroll generation.
//!
//! Each record is upserted, its surrogate key resolved, a payroll entry derived
//! and inserted. Records are visited in input order, one at a time, and a
//! failure on one record never stops the rest of the batch. A payroll insert
//! that fails after a successful upsert is logged and counted separately; the
//! employee row is kept.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{PayrollError, PayrollResult};
use crate::model::employee::{EmployeeInput, NewEmployee};
use crate::repository::{EmployeeRepository, PayrollRepository};
use crate::service::calculator;

/// A per-item failure, tagged with the employee's name or external id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ItemError {
    #[serde(rename = "empleado")]
    #[schema(example = "Ana López")]
    pub identifier: String,
    #[serde(rename = "error")]
    #[schema(example = "rfc excede 13 caracteres")]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Saved { payroll_created: bool },
    Skipped(ItemError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub payrolls_created: usize,
    pub skipped: usize,
    pub errors: Vec<ItemError>,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = ItemOutcome>) -> Self {
        outcomes
            .into_iter()
            .fold(BatchSummary::default(), |mut summary, outcome| {
                match outcome {
                    ItemOutcome::Saved { payroll_created } => {
                        summary.succeeded += 1;
                        if payroll_created {
                            summary.payrolls_created += 1;
                        }
                    }
                    ItemOutcome::Skipped(err) => {
                        summary.skipped += 1;
                        summary.errors.push(err);
                    }
                }
                summary
            })
    }
}

/// `EMP-<unix millis>-<9 hex chars>`. Collisions are unlikely but not ruled out.
pub fn generate_external_id() -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("EMP-{}-{}", Utc::now().timestamp_millis(), suffix)
}

#[derive(Clone)]
pub struct BatchIngestion {
    employees: Arc<dyn EmployeeRepository>,
    payrolls: Arc<dyn PayrollRepository>,
}

impl BatchIngestion {
    pub fn new(employees: Arc<dyn EmployeeRepository>, payrolls: Arc<dyn PayrollRepository>) -> Self {
        Self {
            employees,
            payrolls,
        }
    }

    /// Processes raw JSON records; elements that are not objects are skipped
    /// with a validation error.
    pub async fn ingest(&self, records: Vec<Value>, today: NaiveDate) -> BatchSummary {
        info!(total = records.len(), "Ingesting employee batch");

        let mut outcomes = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let outcome = match serde_json::from_value::<EmployeeInput>(record) {
                Ok(input) => self.process(input, today).await,
                Err(e) => {
                    warn!(index, error = %e, "Unreadable employee record");
                    ItemOutcome::Skipped(ItemError {
                        identifier: format!("#{}", index + 1),
                        message: format!("registro inválido: {}", e),
                    })
                }
            };
            outcomes.push(outcome);
        }

        let summary = BatchSummary::from_outcomes(outcomes);
        info!(
            procesados = summary.succeeded,
            nominas_creadas = summary.payrolls_created,
            omitidos = summary.skipped,
            "Employee batch finished"
        );
        if !summary.errors.is_empty() {
            error!(errors = ?summary.errors, "Employee batch had failures");
        }
        summary
    }

    pub async fn process(&self, mut input: EmployeeInput, today: NaiveDate) -> ItemOutcome {
        if input.external_id.is_none() {
            let generated = generate_external_id();
            info!(external_id = %generated, name = ?input.name, "Employee without IdEmpleado, generated one");
            input.external_id = Some(generated);
        }
        let label = input.label();

        let employee = match NewEmployee::try_from(input) {
            Ok(employee) => employee,
            Err(e) => return skip(label, e),
        };

        let internal_id = match self.employees.upsert(&employee).await {
            Ok(outcome) => {
                info!(
                    external_id = %employee.external_id,
                    internal_id = outcome.internal_id,
                    inserted = outcome.was_inserted,
                    "Employee saved"
                );
                outcome.internal_id
            }
            Err(e) => return skip(label, e),
        };

        let payroll_created = match self.create_payroll(&employee, internal_id, today).await {
            Ok(payroll_id) => {
                info!(external_id = %employee.external_id, internal_id, payroll_id, "Payroll generated");
                true
            }
            Err(e) => {
                // the employee row stays; the lost payroll is only logged
                error!(
                    error = %e,
                    external_id = %employee.external_id,
                    internal_id,
                    "Failed to generate payroll"
                );
                false
            }
        };

        ItemOutcome::Saved { payroll_created }
    }

    async fn create_payroll(
        &self,
        employee: &NewEmployee,
        internal_id: u64,
        today: NaiveDate,
    ) -> PayrollResult<u64> {
        let entry = calculator::compute(employee, today).into_entry(internal_id, &employee.external_id);
        self.payrolls.insert(&entry).await
    }
}

fn skip(label: String, err: PayrollError) -> ItemOutcome {
    error!(employee = %label, error = %err, "Employee skipped");
    ItemOutcome::Skipped(ItemError {
        identifier: label,
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::InMemoryStore;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn workflow(store: &Arc<InMemoryStore>) -> BatchIngestion {
        BatchIngestion::new(store.clone(), store.clone())
    }

    #[actix_web::test]
    async fn saves_employee_and_generates_payroll() {
        let store = Arc::new(InMemoryStore::new());
        let summary = workflow(&store)
            .ingest(
                vec![json!({
                    "IdEmpleado": "EMP001",
                    "nombre": "Ana",
                    "sueldo": 10000,
                    "horas": 160,
                    "puesto": "Senior Dev"
                })],
                today(),
            )
            .await;

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.payrolls_created, 1);
        assert_eq!(summary.skipped, 0);

        let payrolls = store.payrolls();
        assert_eq!(payrolls.len(), 1);
        let entry = &payrolls[0];
        assert_eq!(entry.employee_internal_id, store.employees()[0].id);
        assert_eq!(entry.employee_external_id.as_deref(), Some("EMP001"));
        assert_eq!(entry.net_pay, Some(Decimal::from(6200)));
        assert_eq!(entry.days_worked, Some(Decimal::from(20)));
        assert_eq!(entry.department_code.as_deref(), Some("DEP-SEN"));
        assert_eq!(entry.period_start, NaiveDate::from_ymd_opt(2026, 10, 1));
        assert_eq!(entry.period_end, NaiveDate::from_ymd_opt(2026, 10, 31));
    }

    #[actix_web::test]
    async fn generates_missing_external_ids() {
        let store = Arc::new(InMemoryStore::new());
        let summary = workflow(&store)
            .ingest(vec![json!({ "nombre": "Ana" }), json!({ "nombre": "Luis" })], today())
            .await;

        assert_eq!(summary.succeeded, 2);
        let employees = store.employees();
        assert!(employees.iter().all(|e| e.external_id.starts_with("EMP-")));
        assert_ne!(employees[0].external_id, employees[1].external_id);
    }

    #[actix_web::test]
    async fn upsert_keeps_internal_id_and_takes_latest_salary() {
        let store = Arc::new(InMemoryStore::new());
        let wf = workflow(&store);
        wf.ingest(vec![json!({ "IdEmpleado": "E1", "sueldo": 1000 })], today())
            .await;
        let first_id = store.employees()[0].id;

        wf.ingest(vec![json!({ "IdEmpleado": "E1", "sueldo": 2500 })], today())
            .await;

        let employees = store.employees();
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].id, first_id);
        assert_eq!(employees[0].base_salary, Decimal::from(2500));
        // each upsert appends its own payroll entry
        assert_eq!(store.payrolls().len(), 2);
        assert!(store.payrolls().iter().all(|p| p.employee_internal_id == first_id));
    }

    #[actix_web::test]
    async fn failed_items_do_not_abort_the_batch() {
        let store = Arc::new(InMemoryStore::rejecting(&["BAD"]));
        let summary = workflow(&store)
            .ingest(
                vec![
                    json!({ "IdEmpleado": "E1", "nombre": "Ana" }),
                    json!({ "IdEmpleado": "BAD", "nombre": "Rechazado" }),
                    json!({ "IdEmpleado": "E2", "rfc": "DEMASIADO-LARGO-RFC" }),
                    "no soy un objeto".into(),
                    json!({ "IdEmpleado": "E3", "nombre": "Luis" }),
                ],
                today(),
            )
            .await;

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.skipped, 3);
        assert_eq!(summary.errors.len(), 3);
        assert_eq!(summary.errors[0].identifier, "Rechazado");
        assert_eq!(summary.errors[1].identifier, "E2");
        assert_eq!(summary.errors[2].identifier, "#4");
        assert_eq!(store.employees().len(), 2);
    }

    #[actix_web::test]
    async fn payroll_failure_keeps_the_employee() {
        let store = Arc::new(InMemoryStore::failing_payrolls());
        let summary = workflow(&store)
            .ingest(vec![json!({ "IdEmpleado": "E1", "sueldo": 500 })], today())
            .await;

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.payrolls_created, 0);
        assert_eq!(summary.skipped, 0);
        assert!(summary.errors.is_empty());
        assert_eq!(store.employees().len(), 1);
    }

    #[actix_web::test]
    async fn unresolvable_internal_id_skips_the_item() {
        let store = Arc::new(InMemoryStore::losing_upserted_rows());
        let summary = workflow(&store)
            .ingest(vec![json!({ "IdEmpleado": "E1", "nombre": "Ana" })], today())
            .await;

        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.payrolls_created, 0);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errors[0].identifier, "Ana");
        assert!(summary.errors[0].message.starts_with("integrity failure"));
        assert!(store.payrolls().is_empty());
    }

    #[actix_web::test]
    async fn empty_batch_is_a_noop() {
        let store = Arc::new(InMemoryStore::new());
        let summary = workflow(&store).ingest(Vec::new(), today()).await;
        assert_eq!(summary, BatchSummary::default());
    }

    #[test]
    fn summary_counts_each_outcome() {
        let err = ItemError {
            identifier: "x".into(),
            message: "boom".into(),
        };
        let summary = BatchSummary::from_outcomes(vec![
            ItemOutcome::Saved { payroll_created: true },
            ItemOutcome::Saved { payroll_created: false },
            ItemOutcome::Skipped(err.clone()),
        ]);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.payrolls_created, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errors, vec![err]);
    }

    #[test]
    fn generated_ids_have_expected_shape() {
        let id = generate_external_id();
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "EMP");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert!(id.len() <= 50);
    }
}
