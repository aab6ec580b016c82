//! Utilities for services building

use actix_web::web::{Data, ServiceConfig};
use actix_web::{HttpResponse, middleware, web};

#[cfg(test)]
mod tests;

mod api;
mod pages;
mod session;

use crate::model::Model;
use crate::model::auth::SessionAuth;

/// Wraps a rendered screen into an HTML response
fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// Returns configuration function for the ActixWeb services
///
/// The login endpoints stay public; everything else lives in a scope wrapped
/// with the session guard, so no protected handler runs without a verified
/// session.
pub async fn configure(
    model: Model,
    session_auth: SessionAuth,
) -> color_eyre::Result<impl Fn(&mut ServiceConfig) + Clone> {
    let cfg = move |cfg: &mut ServiceConfig| {
        let guarded = web::scope("")
            .wrap(middleware::from_fn(session::guard))
            .service(pages::dashboard)
            .service(pages::clients)
            .service(pages::boats)
            .service(pages::reservations)
            .service(pages::invoices)
            .service(pages::cash)
            .service(pages::reports)
            .service(pages::maintenance)
            .service(api::create_client)
            .service(api::create_boat)
            .service(api::create_reservation)
            .service(api::create_invoice)
            .service(api::create_cash_transaction)
            .service(api::create_maintenance);

        cfg.app_data(Data::new(model.clone()))
            .app_data(Data::new(session_auth.clone()))
            .service(session::login_page)
            .service(session::login)
            .service(session::logout)
            .service(guarded);
    };

    Ok(cfg)
}
