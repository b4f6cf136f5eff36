use async_trait::async_trait;
use sqlx::MySqlPool;

use super::PayrollRepository;
use crate::error::PayrollResult;
use crate::model::payroll::{NewPayrollEntry, PayrollEntryWithEmployee};

pub struct MySqlPayrollRepository {
    pool: MySqlPool,
}

impl MySqlPayrollRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PayrollRepository for MySqlPayrollRepository {
    async fn insert(&self, entry: &NewPayrollEntry) -> PayrollResult<u64> {
        // the FK on id_empleado_interno rejects unknown employees
        let result = sqlx::query(
            r#"
            INSERT INTO Nominas (
                id_empleado_interno, IdEmpleadoCredencial, IdDepartamento, Supervisor,
                Dias_Trabajados, TotalPercepciones, TotalDeducciones, TotalNetoPagado,
                fechaInicioPeriodo, fechaFinPeriodo
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.employee_internal_id)
        .bind(&entry.employee_external_id)
        .bind(&entry.department_code)
        .bind(&entry.supervisor_name)
        .bind(entry.days_worked)
        .bind(entry.gross_pay)
        .bind(entry.total_deductions)
        .bind(entry.net_pay)
        .bind(entry.period_start)
        .bind(entry.period_end)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id())
    }

    async fn list_all_with_employee_info(&self) -> PayrollResult<Vec<PayrollEntryWithEmployee>> {
        let rows = sqlx::query_as::<_, PayrollEntryWithEmployee>(
            r#"
            SELECT n.IdNomina, n.id_empleado_interno, n.IdEmpleadoCredencial, n.IdDepartamento,
                   n.Supervisor, n.Dias_Trabajados, n.TotalPercepciones, n.TotalDeducciones,
                   n.TotalNetoPagado, n.fechaCreacion, n.fechaInicioPeriodo, n.fechaFinPeriodo,
                   e.nombre, e.puesto
            FROM Nominas n
            JOIN empleados e ON n.id_empleado_interno = e.id
            ORDER BY n.IdNomina DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
