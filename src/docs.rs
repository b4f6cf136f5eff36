use crate::api::employee::{SaveEmployees, SaveEmployeesResponse};
use crate::api::payroll::CreatePayroll;
use crate::model::employee::{Employee, EmployeeInput};
use crate::model::payroll::{PayrollEntry, PayrollEntryWithEmployee};
use crate::service::ingestion::ItemError;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Nómina API",
        version = "1.0.0",
        description = r#"
## Payroll service

Stores employees and the payroll entries ("nóminas") generated for them.

### Key Features
- **Batch employee upsert**
  - Employees are matched by `IdEmpleado`; one is generated when missing
  - Each saved employee gets a payroll entry for the current month
  - Failures are reported per employee and never abort the batch
- **Payroll**
  - Manual payroll entries for existing employees
  - Listing joined with employee name and position
- **Cascade delete**
  - Deleting an employee removes all of its payroll entries

### Deductions
Flat 25% income tax (ISR) plus 13% social security (IMSS) on gross pay.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::index,

        crate::api::employee::list_employees,
        crate::api::employee::save_employees,
        crate::api::employee::delete_employee,

        crate::api::payroll::create_payroll,
        crate::api::payroll::list_payrolls
    ),
    components(
        schemas(
            Employee,
            EmployeeInput,
            SaveEmployees,
            SaveEmployeesResponse,
            ItemError,
            PayrollEntry,
            PayrollEntryWithEmployee,
            CreatePayroll
        )
    ),
    tags(
        (name = "System", description = "Server information"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Payroll", description = "Payroll management APIs"),
    )
)]
pub struct ApiDoc;
