//! Session management
//!
//! One guard for every protected route. The token transport is a deployment
//! choice: browser deployments use an HTTP-only cookie and get redirects on
//! rejection, API deployments use a bearer header and get 401 responses.

use actix_web::body::{EitherBody, MessageBody};
use actix_web::cookie::{Cookie, SameSite, time};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::error::ErrorInternalServerError;
use actix_web::http::header;
use actix_web::middleware::Next;
use actix_web::web::{Data, Form, Query};
use actix_web::{Error, HttpMessage, HttpResponse, Result, get, post};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::Transport;
use crate::model::Model;
use crate::model::auth::{self, Session, SessionAuth};
use crate::service::html;
use crate::views;

/// Cookie holding the session token for the cookie transport
const SESSION_COOKIE: &str = "session";

/// Guard middleware for protected routes
///
/// Missing, malformed, expired and wrongly-signed tokens are rejected the same
/// way; the wrapped handler is only ever invoked with a verified [`Session`]
/// available in the request extensions.
pub async fn guard<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error>
where
    B: MessageBody + 'static,
{
    let session_auth: Data<SessionAuth> = req
        .app_data()
        .cloned()
        .ok_or_else(|| ErrorInternalServerError("Missing session state"))?;

    let token = extract_token(&req, session_auth.transport());
    let session = token.and_then(|token| match session_auth.verify(&token) {
        Ok(session) => Some(session),
        Err(err) => {
            debug!("Rejecting session token: {err}");
            None
        }
    });

    match session {
        Some(session) => {
            req.extensions_mut().insert(session);
            next.call(req)
                .await
                .map(|res| res.map_into_left_body())
        }
        None => {
            let response = rejection(session_auth.transport());
            Ok(req.into_response(response).map_into_right_body())
        }
    }
}

/// Pulls the candidate token out of the transport picked for this deployment
fn extract_token(req: &ServiceRequest, transport: Transport) -> Option<String> {
    match transport {
        Transport::Header => {
            let header = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
            let (scheme, token) = header.split_once(' ')?;
            (scheme == "Bearer").then(|| token.to_owned())
        }
        Transport::Cookie => req
            .request()
            .cookie(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_owned()),
    }
}

/// Short-circuit response for rejected requests
///
/// Cookie deployments also get the stale cookie discarded.
fn rejection(transport: Transport) -> HttpResponse {
    match transport {
        Transport::Header => {
            HttpResponse::Unauthorized().json(json!({ "error": "authentication required" }))
        }
        Transport::Cookie => HttpResponse::SeeOther()
            .insert_header((header::LOCATION, "/login"))
            .cookie(removal_cookie())
            .finish(),
    }
}

fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .max_age(time::Duration::ZERO)
        .finish()
}

fn session_cookie(session: &Session, ttl: std::time::Duration) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, session.token.to_string())
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(time::Duration::seconds(ttl.as_secs() as i64))
        .finish()
}

#[derive(Debug, Deserialize)]
struct LoginQuery {
    error: Option<String>,
}

/// Login form page
#[get("/login")]
pub(super) async fn login_page(query: Query<LoginQuery>) -> HttpResponse {
    html(views::login(query.error.as_deref()))
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

/// Credential submission endpoint
///
/// Unknown usernames and wrong passwords produce the same response, so the two
/// cannot be told apart from the outside. Store failures surface as 500.
#[post("/api/login")]
pub(super) async fn login(
    model: Data<Model>,
    session_auth: Data<SessionAuth>,
    form: Form<LoginForm>,
) -> Result<HttpResponse> {
    let LoginForm { username, password } = form.into_inner();

    let user_id = match auth::verify_credentials(model.db(), &username, &password).await {
        Ok(user_id) => user_id,
        Err(report) => {
            let credential_failure = report
                .downcast_ref::<auth::Error>()
                .is_some_and(auth::Error::is_credential_failure);
            return if credential_failure {
                Ok(invalid_credentials(session_auth.transport()))
            } else {
                Err(ErrorInternalServerError(report))
            };
        }
    };

    let session = session_auth
        .issue(user_id)
        .map_err(ErrorInternalServerError)?;

    let response = match session_auth.transport() {
        Transport::Header => HttpResponse::Ok().json(json!({ "token": session.token })),
        Transport::Cookie => HttpResponse::SeeOther()
            .insert_header((header::LOCATION, "/"))
            .cookie(session_cookie(&session, session_auth.session_ttl()))
            .finish(),
    };
    Ok(response)
}

fn invalid_credentials(transport: Transport) -> HttpResponse {
    match transport {
        Transport::Header => {
            HttpResponse::Unauthorized().json(json!({ "error": "invalid credentials" }))
        }
        Transport::Cookie => HttpResponse::SeeOther()
            .insert_header((header::LOCATION, "/login?error=invalid+credentials"))
            .finish(),
    }
}

/// Discards the client-held session and returns to the login screen
///
/// Issued tokens stay valid until they expire; logout only clears the client
/// side of the session.
#[get("/logout")]
pub(super) async fn logout(session_auth: Data<SessionAuth>) -> HttpResponse {
    match session_auth.transport() {
        Transport::Header => HttpResponse::NoContent().finish(),
        Transport::Cookie => HttpResponse::SeeOther()
            .insert_header((header::LOCATION, "/login"))
            .cookie(removal_cookie())
            .finish(),
    }
}
