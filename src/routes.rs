use actix_web::web;

use crate::error::AppError;
use crate::handlers;

/// Route table. Ids in paths that fail to parse as integers answer with the
/// same not-found page as unknown routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(
      web::PathConfig::default()
        .error_handler(|_, req| AppError::NoRoute(req.path().to_string()).into()),
    )
    .service(handlers::health)
    .service(web::resource("/").route(web::get().to(handlers::list)))
    .service(
      web::resource("/create")
        .route(web::get().to(handlers::create_form))
        .route(web::post().to(handlers::create)),
    )
    .service(
      web::resource("/edit/{id}")
        .route(web::get().to(handlers::edit_form))
        .route(web::post().to(handlers::edit)),
    )
    .service(web::resource("/toggle/{id}").route(web::post().to(handlers::toggle)))
    .service(
      web::resource("/delete/{id}")
        .route(web::get().to(handlers::delete_form))
        .route(web::post().to(handlers::delete)),
    )
    .default_service(web::to(handlers::not_found));
}
