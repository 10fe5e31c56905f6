use crate::{
    api::{advance, attendance, payment, payroll, stats, worker},
    config::Config,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/workers")
                    // /workers
                    .service(
                        web::resource("")
                            .route(web::post().to(worker::create_worker))
                            .route(web::get().to(worker::list_workers)),
                    )
                    // /workers/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(worker::get_worker))
                            .route(web::put().to(worker::update_worker))
                            .route(web::delete().to(worker::delete_worker)),
                    )
                    // /workers/{id}/attendance
                    .service(
                        web::resource("/{id}/attendance")
                            .route(web::get().to(attendance::get_attendance_history)),
                    )
                    // /workers/{id}/advances
                    .service(
                        web::resource("/{id}/advances")
                            .route(web::post().to(advance::record_advance))
                            .route(web::get().to(advance::list_advances)),
                    )
                    // /workers/{id}/advances/balance
                    .service(
                        web::resource("/{id}/advances/balance")
                            .route(web::get().to(advance::get_advance_balance)),
                    )
                    // /workers/{id}/salary
                    .service(
                        web::resource("/{id}/salary")
                            .route(web::get().to(payroll::get_worker_salary)),
                    )
                    // /workers/{id}/payments
                    .service(
                        web::resource("/{id}/payments")
                            .route(web::get().to(payment::list_payments)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // GET is the roster for a day, POST submits the filled sheet
                    .service(
                        web::resource("")
                            .route(web::get().to(attendance::get_daily_roster))
                            .route(web::post().to(attendance::submit_daily_sheet)),
                    ),
            )
            .service(
                web::scope("/payroll")
                    // /payroll?month=YYYY-MM
                    .service(
                        web::resource("").route(web::get().to(payroll::get_monthly_payroll)),
                    ),
            )
            .service(
                web::scope("/payments").service(
                    web::resource("").route(web::post().to(payment::record_payment)),
                ),
            )
            .service(web::resource("/stats").route(web::get().to(stats::get_stats))),
    );
}
