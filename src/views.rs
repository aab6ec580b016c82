//! Server-rendered HTML screens
//!
//! Plain string templates, no client-side scripting. Every interpolated value
//! goes through [`escape`].

use crate::model::boats::Boat;
use crate::model::cash::CashTransaction;
use crate::model::clients::Client;
use crate::model::invoices::Invoice;
use crate::model::maintenance::Maintenance;
use crate::model::reports::{BoatOccupancy, DashboardStats, MonthlyIncome};
use crate::model::reservations::Reservation;

const STYLE: &str = "body { background: #0d1117; color: #c9d1d9; }";
const BOOTSTRAP: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";

/// Escapes text for interpolation into HTML
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Wraps page content into the common document with the top navigation bar
fn layout(title: &str, content: &str) -> String {
    format!(
        r#"<!doctype html>
<html data-bs-theme="dark" lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <link href="{BOOTSTRAP}" rel="stylesheet">
  <style>{STYLE}</style>
</head>
<body>
  <nav class="navbar navbar-expand-lg bg-dark border-bottom border-secondary fixed-top">
    <div class="container-fluid">
      <a class="navbar-brand text-white" href="/">Marina Admin</a>
      <div class="collapse navbar-collapse show">
        <ul class="navbar-nav ms-auto">
          <li class="nav-item"><a class="nav-link" href="/clients">Clients</a></li>
          <li class="nav-item"><a class="nav-link" href="/boats">Boats</a></li>
          <li class="nav-item"><a class="nav-link" href="/reservations">Reservations</a></li>
          <li class="nav-item"><a class="nav-link" href="/invoices">Invoices</a></li>
          <li class="nav-item"><a class="nav-link" href="/cash">Cash</a></li>
          <li class="nav-item"><a class="nav-link" href="/reports">Reports</a></li>
          <li class="nav-item"><a class="nav-link" href="/maintenance">Maintenance</a></li>
          <li class="nav-item"><a class="nav-link" href="/logout">Log out</a></li>
        </ul>
      </div>
    </div>
  </nav>
  <div class="container mt-5 pt-5">
{content}
  </div>
</body>
</html>
"#,
        title = escape(title),
    )
}

fn table(headers: &[&str], rows: &str) -> String {
    let headers: String = headers
        .iter()
        .map(|header| format!("<th>{header}</th>"))
        .collect();

    format!(
        r#"<div class="card shadow mt-4">
  <div class="card-body">
    <table class="table table-dark table-hover">
      <thead><tr>{headers}</tr></thead>
      <tbody>{rows}</tbody>
    </table>
  </div>
</div>"#
    )
}

fn add_form(heading: &str, action: &str, fields: &str) -> String {
    format!(
        r#"<div class="card shadow mt-5">
  <div class="card-body">
    <h3>{heading}</h3>
    <form action="{action}" method="post">
{fields}
      <button type="submit" class="btn btn-primary">Add</button>
    </form>
  </div>
</div>"#
    )
}

fn text_input(name: &str, placeholder: &str, required: bool) -> String {
    let required = if required { " required" } else { "" };
    format!(
        r#"      <div class="mb-3">
        <input name="{name}" class="form-control bg-dark text-white border-secondary" placeholder="{placeholder}"{required}>
      </div>
"#
    )
}

fn number_input(name: &str, placeholder: &str, step: Option<&str>) -> String {
    let step = step
        .map(|step| format!(r#" step="{step}""#))
        .unwrap_or_default();
    format!(
        r#"      <div class="mb-3">
        <input name="{name}" type="number"{step} class="form-control bg-dark text-white border-secondary" placeholder="{placeholder}" required>
      </div>
"#
    )
}

fn checkbox(name: &str, label: &str, checked: bool) -> String {
    let checked = if checked { " checked" } else { "" };
    format!(
        r#"      <div class="form-check mb-3">
        <input name="{name}" type="checkbox" class="form-check-input" id="{name}"{checked}>
        <label class="form-check-label" for="{name}">{label}</label>
      </div>
"#
    )
}

/// Login screen, standalone without the navigation bar
pub fn login(error: Option<&str>) -> String {
    let alert = error
        .map(|error| {
            format!(
                r#"<div class="alert alert-danger">{}</div>
"#,
                escape(error)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!doctype html>
<html data-bs-theme="dark" lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Login - Marina Admin</title>
  <link href="{BOOTSTRAP}" rel="stylesheet">
  <style>{STYLE}</style>
</head>
<body class="d-flex align-items-center min-vh-100">
  <div class="container">
    <div class="row justify-content-center">
      <div class="col-md-4">
        <div class="card shadow-lg border-0">
          <div class="card-body p-5">
            <h2 class="text-center mb-4">Sign In</h2>
            {alert}<form action="/api/login" method="post">
              <div class="mb-3">
                <input name="username" class="form-control bg-dark text-white border-secondary" placeholder="Username" required autofocus>
              </div>
              <div class="mb-3">
                <input name="password" type="password" class="form-control bg-dark text-white border-secondary" placeholder="Password" required>
              </div>
              <button type="submit" class="btn btn-primary w-100">Sign in</button>
            </form>
          </div>
        </div>
      </div>
    </div>
  </div>
</body>
</html>
"#
    )
}

pub fn dashboard(username: &str, stats: &DashboardStats) -> String {
    let content = format!(
        r#"    <h1 class="mb-4 text-center">Dashboard</h1>
    <p class="text-center text-secondary">Signed in as {username}</p>
    <div class="row g-4">
      <div class="col-md-4">
        <div class="card shadow text-center">
          <div class="card-body">
            <h5 class="card-title">Total Reservations</h5>
            <p class="display-4 fw-bold">{reservations}</p>
          </div>
        </div>
      </div>
      <div class="col-md-4">
        <div class="card shadow text-center">
          <div class="card-body">
            <h5 class="card-title">Income (Paid)</h5>
            <p class="display-4 fw-bold">{income}</p>
          </div>
        </div>
      </div>
      <div class="col-md-4">
        <div class="card shadow text-center">
          <div class="card-body">
            <h5 class="card-title">Available Boats</h5>
            <p class="display-4 fw-bold">{boats}</p>
          </div>
        </div>
      </div>
    </div>"#,
        username = escape(username),
        reservations = stats.total_reservations,
        income = money(stats.paid_income),
        boats = stats.available_boats,
    );

    layout("Dashboard", &content)
}

pub fn clients(clients: &[Client]) -> String {
    let rows: String = clients
        .iter()
        .map(|client| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                client.id,
                escape(&client.name),
                escape(client.email.as_deref().unwrap_or("-")),
                escape(client.phone.as_deref().unwrap_or("-")),
            )
        })
        .collect();

    let fields = [
        text_input("name", "Full name", true),
        text_input("email", "Email", false),
        text_input("phone", "Phone", false),
    ]
    .concat();

    let content = format!(
        "    <h1 class=\"mb-4\">Client Management</h1>\n{}\n{}",
        table(&["ID", "Name", "Email", "Phone"], &rows),
        add_form("Add Client", "/api/clients", &fields),
    );

    layout("Clients", &content)
}

pub fn boats(boats: &[Boat]) -> String {
    let rows: String = boats
        .iter()
        .map(|boat| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                boat.id,
                escape(&boat.name),
                escape(&boat.kind),
                boat.capacity,
                yes_no(boat.available),
            )
        })
        .collect();

    let fields = [
        text_input("name", "Name", true),
        text_input("kind", "Kind (Boat or Jetski)", true),
        number_input("capacity", "Capacity (people)", None),
        checkbox("available", "Available", true),
    ]
    .concat();

    let content = format!(
        "    <h1 class=\"mb-4\">Boat & Jetski Management</h1>\n{}\n{}",
        table(&["ID", "Name", "Kind", "Capacity", "Available"], &rows),
        add_form("Add Boat / Jetski", "/api/boats", &fields),
    );

    layout("Boats", &content)
}

pub fn reservations(reservations: &[Reservation]) -> String {
    let rows: String = reservations
        .iter()
        .map(|reservation| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                reservation.id,
                reservation.client_id,
                reservation.boat_id,
                reservation.start_date.format("%Y-%m-%d %H:%M"),
                reservation.end_date.format("%Y-%m-%d %H:%M"),
                escape(&reservation.status),
            )
        })
        .collect();

    let fields = [
        number_input("client_id", "Client ID", None),
        number_input("boat_id", "Boat ID", None),
        text_input("start_date", "Start (YYYY-MM-DD HH:MM)", true),
        text_input("end_date", "End (YYYY-MM-DD HH:MM)", true),
    ]
    .concat();

    let content = format!(
        "    <h1 class=\"mb-4\">Reservation Management</h1>\n{}\n{}",
        table(&["ID", "Client ID", "Boat ID", "Start", "End", "Status"], &rows),
        add_form("Create Reservation", "/api/reservations", &fields),
    );

    layout("Reservations", &content)
}

pub fn invoices(invoices: &[Invoice]) -> String {
    let rows: String = invoices
        .iter()
        .map(|invoice| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                invoice.id,
                invoice.reservation_id,
                money(invoice.amount),
                yes_no(invoice.paid),
                invoice.date.format("%Y-%m-%d %H:%M"),
            )
        })
        .collect();

    let fields = [
        number_input("reservation_id", "Reservation ID", None),
        number_input("amount", "Total amount", Some("0.01")),
    ]
    .concat();

    let content = format!(
        "    <h1 class=\"mb-4\">Invoice Management</h1>\n{}\n{}",
        table(&["ID", "Reservation ID", "Amount", "Paid", "Date"], &rows),
        add_form("Generate Invoice", "/api/invoices", &fields),
    );

    layout("Invoices", &content)
}

pub fn cash(transactions: &[CashTransaction]) -> String {
    let rows: String = transactions
        .iter()
        .map(|transaction| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                transaction.id,
                transaction.invoice_id,
                money(transaction.amount),
                escape(&transaction.method),
                transaction.date.format("%Y-%m-%d %H:%M"),
            )
        })
        .collect();

    let method_select = r#"      <div class="mb-3">
        <select name="method" class="form-select bg-dark text-white border-secondary">
          <option>Cash</option>
          <option>Card</option>
          <option>Transfer</option>
          <option>Other</option>
        </select>
      </div>
"#;

    let fields = format!(
        "{}{}{}",
        number_input("invoice_id", "Invoice ID", None),
        number_input("amount", "Amount paid", Some("0.01")),
        method_select,
    );

    let content = format!(
        "    <h1 class=\"mb-4\">Cash Management (Payments)</h1>\n{}\n{}",
        table(&["ID", "Invoice ID", "Amount", "Method", "Date"], &rows),
        add_form("Record Payment", "/api/cash", &fields),
    );

    layout("Cash", &content)
}

pub fn maintenance(records: &[Maintenance]) -> String {
    let rows: String = records
        .iter()
        .map(|record| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                record.id,
                record.boat_id,
                escape(&record.description),
                record.date.format("%Y-%m-%d %H:%M"),
                yes_no(record.completed),
            )
        })
        .collect();

    let fields = [
        number_input("boat_id", "Boat ID", None),
        text_input("description", "Maintenance description", true),
        checkbox("completed", "Completed", false),
    ]
    .concat();

    let content = format!(
        "    <h1 class=\"mb-4\">Maintenance Management</h1>\n{}\n{}",
        table(
            &["ID", "Boat ID", "Description", "Date", "Completed"],
            &rows
        ),
        add_form("Record Maintenance", "/api/maintenance", &fields),
    );

    layout("Maintenance", &content)
}

pub fn reports(income: &[MonthlyIncome], occupancy: &[BoatOccupancy]) -> String {
    let income_rows: String = income
        .iter()
        .map(|row| {
            format!(
                "<tr><td>{}</td><td>{}</td></tr>",
                escape(&row.month),
                money(row.total),
            )
        })
        .collect();

    let occupancy_rows: String = occupancy
        .iter()
        .map(|row| {
            format!(
                "<tr><td>{}</td><td>{}</td></tr>",
                escape(&row.boat),
                row.reservations,
            )
        })
        .collect();

    let content = format!(
        r#"    <h1 class="mb-4">Reports</h1>
    <div class="card shadow mt-4">
      <div class="card-header">Income by Month</div>
      {income}
    </div>
    <div class="card shadow mt-4">
      <div class="card-header">Boat Occupancy</div>
      {occupancy}
    </div>"#,
        income = table(&["Month", "Total"], &income_rows),
        occupancy = table(&["Boat", "Reservations"], &occupancy_rows),
    );

    layout("Reports", &content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaping_markup() {
        assert_eq!(
            escape(r#"<b>"O'Brien" & sons</b>"#),
            "&lt;b&gt;&quot;O&#39;Brien&quot; &amp; sons&lt;/b&gt;"
        );
    }

    #[test]
    fn login_error_is_escaped() {
        let page = login(Some("<script>alert(1)</script>"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>alert"));
    }
}
