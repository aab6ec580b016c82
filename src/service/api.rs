//! Protected form endpoints backing the add forms
//!
//! Each endpoint coerces and checks its form fields, performs a single insert
//! and redirects back to the listing screen it came from.

use actix_web::error::{ErrorBadRequest, ErrorInternalServerError};
use actix_web::http::header;
use actix_web::web::{Data, Form};
use actix_web::{HttpResponse, Result, post};
use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::model::Model;
use crate::model::boats::{BoatId, NewBoat};
use crate::model::cash::NewCashTransaction;
use crate::model::clients::{ClientId, NewClient};
use crate::model::invoices::{InvoiceId, NewInvoice};
use crate::model::maintenance::NewMaintenance;
use crate::model::reservations::{NewReservation, ReservationId};

/// Input format for reservation start/end fields
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

fn redirect(target: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, target))
        .finish()
}

fn require(value: String, field: &str) -> Result<String> {
    let value = value.trim().to_owned();
    if value.is_empty() {
        Err(ErrorBadRequest(format!("{field} is required")))
    } else {
        Ok(value)
    }
}

/// Optional form fields come in as empty strings when left blank
fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ErrorBadRequest(format!("{field} must use YYYY-MM-DD HH:MM")))
}

fn positive_amount(value: f64) -> Result<f64> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ErrorBadRequest("amount must be positive"))
    }
}

#[derive(Debug, Deserialize)]
struct ClientForm {
    name: String,
    email: Option<String>,
    phone: Option<String>,
}

#[post("/api/clients")]
pub(super) async fn create_client(
    model: Data<Model>,
    form: Form<ClientForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();

    NewClient {
        name: require(form.name, "name")?,
        email: blank_to_none(form.email),
        phone: blank_to_none(form.phone),
    }
    .create(model.db())
    .await
    .map_err(ErrorInternalServerError)?;

    Ok(redirect("/clients"))
}

#[derive(Debug, Deserialize)]
struct BoatForm {
    name: String,
    kind: String,
    capacity: i64,
    /// Checkbox, present as `on` when ticked
    available: Option<String>,
}

#[post("/api/boats")]
pub(super) async fn create_boat(model: Data<Model>, form: Form<BoatForm>) -> Result<HttpResponse> {
    let form = form.into_inner();
    if form.capacity <= 0 {
        return Err(ErrorBadRequest("capacity must be positive"));
    }

    NewBoat {
        name: require(form.name, "name")?,
        kind: require(form.kind, "kind")?,
        capacity: form.capacity,
        available: form.available.is_some(),
    }
    .create(model.db())
    .await
    .map_err(ErrorInternalServerError)?;

    Ok(redirect("/boats"))
}

#[derive(Debug, Deserialize)]
struct ReservationForm {
    client_id: ClientId,
    boat_id: BoatId,
    start_date: String,
    end_date: String,
}

#[post("/api/reservations")]
pub(super) async fn create_reservation(
    model: Data<Model>,
    form: Form<ReservationForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();

    NewReservation {
        client_id: form.client_id,
        boat_id: form.boat_id,
        start_date: parse_date(&form.start_date, "start_date")?,
        end_date: parse_date(&form.end_date, "end_date")?,
    }
    .create(model.db())
    .await
    .map_err(ErrorInternalServerError)?;

    Ok(redirect("/reservations"))
}

#[derive(Debug, Deserialize)]
struct InvoiceForm {
    reservation_id: ReservationId,
    amount: f64,
}

#[post("/api/invoices")]
pub(super) async fn create_invoice(
    model: Data<Model>,
    form: Form<InvoiceForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();

    NewInvoice {
        reservation_id: form.reservation_id,
        amount: positive_amount(form.amount)?,
    }
    .create(model.db())
    .await
    .map_err(ErrorInternalServerError)?;

    Ok(redirect("/invoices"))
}

#[derive(Debug, Deserialize)]
struct CashForm {
    invoice_id: InvoiceId,
    amount: f64,
    method: String,
}

#[post("/api/cash")]
pub(super) async fn create_cash_transaction(
    model: Data<Model>,
    form: Form<CashForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();

    NewCashTransaction {
        invoice_id: form.invoice_id,
        amount: positive_amount(form.amount)?,
        method: require(form.method, "method")?,
    }
    .create(model.db())
    .await
    .map_err(ErrorInternalServerError)?;

    Ok(redirect("/cash"))
}

#[derive(Debug, Deserialize)]
struct MaintenanceForm {
    boat_id: BoatId,
    description: String,
    /// Checkbox, present as `on` when ticked
    completed: Option<String>,
}

#[post("/api/maintenance")]
pub(super) async fn create_maintenance(
    model: Data<Model>,
    form: Form<MaintenanceForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();

    NewMaintenance {
        boat_id: form.boat_id,
        description: require(form.description, "description")?,
        completed: form.completed.is_some(),
    }
    .create(model.db())
    .await
    .map_err(ErrorInternalServerError)?;

    Ok(redirect("/maintenance"))
}
