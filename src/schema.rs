use sqlx::MySqlPool;
use tracing::{error, info};

use crate::config::Config;

const EMPLOYEES_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS empleados (
        id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
        nombre VARCHAR(255),
        IdEmpleado VARCHAR(50) NOT NULL,
        rfc VARCHAR(13),
        nss VARCHAR(20),
        puesto VARCHAR(100),
        fechaIngreso DATE,
        sueldo DECIMAL(10, 2) NOT NULL DEFAULT 0,
        horas INT UNSIGNED NOT NULL DEFAULT 0,
        UNIQUE KEY unique_id_empleado (IdEmpleado)
    )
"#;

const PAYROLL_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS Nominas (
        IdNomina BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
        id_empleado_interno BIGINT UNSIGNED NOT NULL,
        IdEmpleadoCredencial VARCHAR(50),
        IdDepartamento VARCHAR(100),
        Supervisor VARCHAR(255),
        Dias_Trabajados DECIMAL(5, 2),
        TotalPercepciones DECIMAL(10, 2),
        TotalDeducciones DECIMAL(10, 2),
        TotalNetoPagado DECIMAL(10, 2),
        fechaCreacion TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        fechaInicioPeriodo DATE,
        fechaFinPeriodo DATE,
        CONSTRAINT fk_empleado_nomina
            FOREIGN KEY (id_empleado_interno) REFERENCES empleados(id)
            ON DELETE CASCADE
            ON UPDATE CASCADE
    )
"#;

/// Tables in dependency order: `Nominas` references `empleados`.
const TABLES: [(&str, &str); 2] = [("empleados", EMPLOYEES_DDL), ("Nominas", PAYROLL_DDL)];

/// Creates missing tables. Never fails: problems are logged and the server
/// keeps running, so later queries report them instead.
pub async fn ensure_schema(pool: &MySqlPool, config: &Config) {
    info!(
        host = %config.db_host,
        port = config.db_port,
        user = %config.db_user,
        database = config.db_name.as_deref().unwrap_or("NO CONFIGURADO"),
        "Connecting to MySQL"
    );

    match pool.acquire().await {
        Ok(_conn) => info!("Connected to MySQL"),
        Err(e) => {
            error!(error = %e, "Database connection failed");
            error!(
                "Check that MySQL is running on the configured port, that .env exists, \
                 that the credentials are correct and that the database exists"
            );
            return;
        }
    }

    for (table, ddl) in TABLES {
        match sqlx::query(ddl).execute(pool).await {
            Ok(_) => info!(table, "Table verified"),
            Err(e) => error!(table, error = %e, "Failed to create table"),
        }
    }
}
