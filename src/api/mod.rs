use actix_web::{HttpResponse, Responder};
use serde_json::json;

pub mod employee;
pub mod payroll;
pub mod state;

pub use state::AppState;

/// Server banner with the available endpoints.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Server information", body = Object)
    ),
    tag = "System"
)]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Servidor de Nóminas funcionando correctamente",
        "endpoints": [
            "GET /api/employees - Listar empleados",
            "POST /api/employees - Guardar empleados",
            "DELETE /api/employees/:id - Eliminar empleado",
            "GET /api/nominas - Listar nóminas",
            "POST /api/nominas - Guardar nómina"
        ],
        "frontend": "Abre index.html desde la carpeta frontend o accede directamente al archivo"
    }))
}
