use sqlx::MySqlPool;
use std::sync::Arc;

use crate::repository::{
    EmployeeRepository, MySqlEmployeeRepository, MySqlPayrollRepository, PayrollRepository,
};
use crate::service::ingestion::BatchIngestion;

/// Shared by every worker; repositories hold clones of the one pool.
#[derive(Clone)]
pub struct AppState {
    pub employees: Arc<dyn EmployeeRepository>,
    pub payrolls: Arc<dyn PayrollRepository>,
    pub ingestion: BatchIngestion,
}

impl AppState {
    pub fn new(employees: Arc<dyn EmployeeRepository>, payrolls: Arc<dyn PayrollRepository>) -> Self {
        let ingestion = BatchIngestion::new(employees.clone(), payrolls.clone());
        Self {
            employees,
            payrolls,
            ingestion,
        }
    }

    pub fn mysql(pool: MySqlPool) -> Self {
        Self::new(
            Arc::new(MySqlEmployeeRepository::new(pool.clone())),
            Arc::new(MySqlPayrollRepository::new(pool)),
        )
    }
}
