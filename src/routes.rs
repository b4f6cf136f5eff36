use crate::api::{self, employee, payroll};
use crate::error::PayrollError;
use actix_cors::Cors;
use actix_web::web;

// large batches arrive in one body
const JSON_LIMIT: usize = 10 * 1024 * 1024;

/// Any origin may call the API; the frontend is served from elsewhere.
pub fn cors() -> Cors {
    Cors::permissive()
}

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT)
            .error_handler(|err, _req| PayrollError::Validation(err.to_string()).into()),
    );

    cfg.service(web::resource("/").route(web::get().to(api::index)));

    cfg.service(
        web::scope(api_prefix)
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::get().to(employee::list_employees))
                            .route(web::post().to(employee::save_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}").route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/nominas").service(
                    web::resource("")
                        .route(web::get().to(payroll::list_payrolls))
                        .route(web::post().to(payroll::create_payroll)),
                ),
            ),
    );
}
