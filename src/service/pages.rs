//! Protected HTML screens

use actix_web::error::ErrorInternalServerError;
use actix_web::web::{Data, ReqData};
use actix_web::{HttpResponse, Result, get};

use crate::model::Model;
use crate::model::auth::Session;
use crate::model::boats::Boat;
use crate::model::cash::CashTransaction;
use crate::model::clients::Client;
use crate::model::invoices::Invoice;
use crate::model::maintenance::Maintenance;
use crate::model::reports::{BoatOccupancy, DashboardStats, MonthlyIncome};
use crate::model::reservations::Reservation;
use crate::service::html;
use crate::views;

#[get("/")]
pub(super) async fn dashboard(
    model: Data<Model>,
    session: ReqData<Session>,
) -> Result<HttpResponse> {
    let stats = DashboardStats::fetch(model.db())
        .await
        .map_err(ErrorInternalServerError)?;

    // Token identities outliving their user record still render, just without a name
    let username = session
        .user_id
        .fetch(model.db())
        .await
        .map_err(ErrorInternalServerError)?
        .map(|user| user.username)
        .unwrap_or_else(|| format!("user #{}", session.user_id));

    Ok(html(views::dashboard(&username, &stats)))
}

#[get("/clients")]
pub(super) async fn clients(model: Data<Model>) -> Result<HttpResponse> {
    let clients = Client::list(model.db())
        .await
        .map_err(ErrorInternalServerError)?;
    Ok(html(views::clients(&clients)))
}

#[get("/boats")]
pub(super) async fn boats(model: Data<Model>) -> Result<HttpResponse> {
    let boats = Boat::list(model.db())
        .await
        .map_err(ErrorInternalServerError)?;
    Ok(html(views::boats(&boats)))
}

#[get("/reservations")]
pub(super) async fn reservations(model: Data<Model>) -> Result<HttpResponse> {
    let reservations = Reservation::list(model.db())
        .await
        .map_err(ErrorInternalServerError)?;
    Ok(html(views::reservations(&reservations)))
}

#[get("/invoices")]
pub(super) async fn invoices(model: Data<Model>) -> Result<HttpResponse> {
    let invoices = Invoice::list(model.db())
        .await
        .map_err(ErrorInternalServerError)?;
    Ok(html(views::invoices(&invoices)))
}

#[get("/cash")]
pub(super) async fn cash(model: Data<Model>) -> Result<HttpResponse> {
    let transactions = CashTransaction::list(model.db())
        .await
        .map_err(ErrorInternalServerError)?;
    Ok(html(views::cash(&transactions)))
}

#[get("/reports")]
pub(super) async fn reports(model: Data<Model>) -> Result<HttpResponse> {
    let income = MonthlyIncome::report(model.db())
        .await
        .map_err(ErrorInternalServerError)?;
    let occupancy = BoatOccupancy::report(model.db())
        .await
        .map_err(ErrorInternalServerError)?;
    Ok(html(views::reports(&income, &occupancy)))
}

#[get("/maintenance")]
pub(super) async fn maintenance(model: Data<Model>) -> Result<HttpResponse> {
    let records = Maintenance::list(model.db())
        .await
        .map_err(ErrorInternalServerError)?;
    Ok(html(views::maintenance(&records)))
}
