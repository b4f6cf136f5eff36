use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::{debug, error};

use super::EmployeeRepository;
use crate::error::{PayrollError, PayrollResult};
use crate::model::employee::{Employee, NewEmployee, UpsertOutcome};

pub struct MySqlEmployeeRepository {
    pool: MySqlPool,
}

impl MySqlEmployeeRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const UPSERT_SQL: &str = r#"
    INSERT INTO empleados (nombre, IdEmpleado, rfc, nss, puesto, fechaIngreso, sueldo, horas)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
    ON DUPLICATE KEY UPDATE
    nombre = VALUES(nombre), sueldo = VALUES(sueldo), puesto = VALUES(puesto)
"#;

const SELECT_COLUMNS: &str =
    "SELECT id, nombre, IdEmpleado, rfc, nss, puesto, fechaIngreso, sueldo, horas FROM empleados";

/// Auto-increment id of a fresh insert, read from `INSERT .. ON DUPLICATE KEY UPDATE`.
///
/// Only meaningful when no row held the external id beforehand. The driver
/// connects with `CLIENT_FOUND_ROWS`, so an update that changed nothing also
/// reports one affected row; callers must not read that as an insert.
fn inserted_id(rows_affected: u64, last_insert_id: u64) -> Option<u64> {
    (rows_affected == 1 && last_insert_id > 0).then_some(last_insert_id)
}

/// Outcome of an upsert. `existed` is whether a row held the external id before
/// the statement ran; `inserted` is the driver's insert id (see [`inserted_id`])
/// and is ignored for rows that already existed; `found` is the key read back by
/// a lookup. Neither key means the row vanished between upsert and lookup.
pub(crate) fn resolve_upsert(
    external_id: &str,
    existed: bool,
    inserted: Option<u64>,
    found: Option<u64>,
) -> PayrollResult<UpsertOutcome> {
    let inserted = inserted.filter(|_| !existed);
    let internal_id = inserted.or(found).ok_or_else(|| {
        error!(external_id, "Upserted employee not found on lookup");
        PayrollError::Integrity(format!(
            "No se pudo obtener el ID interno del empleado {}",
            external_id
        ))
    })?;
    Ok(UpsertOutcome {
        internal_id,
        was_inserted: !existed,
    })
}

#[async_trait]
impl EmployeeRepository for MySqlEmployeeRepository {
    async fn upsert(&self, employee: &NewEmployee) -> PayrollResult<UpsertOutcome> {
        let existed = self
            .find_by_external_id(&employee.external_id)
            .await?
            .is_some();

        let result = sqlx::query(UPSERT_SQL)
            .bind(&employee.name)
            .bind(&employee.external_id)
            .bind(&employee.tax_id)
            .bind(&employee.social_security_id)
            .bind(&employee.position)
            .bind(employee.hire_date)
            .bind(employee.base_salary)
            .bind(employee.monthly_hours)
            .execute(&self.pool)
            .await?;

        let inserted = inserted_id(result.rows_affected(), result.last_insert_id());
        let found = if existed || inserted.is_none() {
            debug!(external_id = %employee.external_id, "Upsert updated an existing row, resolving id");
            self.find_by_external_id(&employee.external_id)
                .await?
                .map(|e| e.id)
        } else {
            None
        };

        resolve_upsert(&employee.external_id, existed, inserted, found)
    }

    async fn find_by_external_id(&self, external_id: &str) -> PayrollResult<Option<Employee>> {
        let sql = format!("{} WHERE IdEmpleado = ?", SELECT_COLUMNS);
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn delete_by_id(&self, id: &str) -> PayrollResult<u64> {
        // a non-numeric id binds NULL so it can only match the credential
        let internal_id = id.parse::<u64>().ok();
        let result = sqlx::query("DELETE FROM empleados WHERE id = ? OR IdEmpleado = ?")
            .bind(internal_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn list_all(&self) -> PayrollResult<Vec<Employee>> {
        let sql = format!("{} ORDER BY id DESC", SELECT_COLUMNS);
        let employees = sqlx::query_as::<_, Employee>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(employees)
    }
}
