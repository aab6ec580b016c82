//! Login, logout and session guard tests

use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test};
use assert_json_diff::assert_json_include;
use serde_json::{Value, json};

use crate::config::Transport;
use crate::model::Model;
use crate::model::auth::SessionAuth;
use crate::model::clients::Client;
use crate::model::users::User;
use crate::service;
use crate::service::tests::auth_config;

#[actix_web::test]
async fn cookie_login_grants_dashboard_access() {
    let model = Model::test().await.unwrap();
    User::new("admin")
        .create(model.db(), "secret")
        .await
        .unwrap();
    let session_auth = SessionAuth::new(&auth_config(Transport::Cookie)).unwrap();
    let config = service::configure(model.clone(), session_auth).await.unwrap();
    let app = test::init_service(App::new().configure(config)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/login")
            .set_form([("username", "admin"), ("password", "secret")])
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
    let cookie = resp
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .unwrap()
        .into_owned();
    assert!(!cookie.value().is_empty());
    assert!(cookie.http_only().unwrap_or(false));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let body = std::str::from_utf8(&body).unwrap();
    assert!(body.contains("Signed in as admin"));
}

#[actix_web::test]
async fn bad_credentials_are_indistinguishable() {
    let model = Model::test().await.unwrap();
    User::new("admin")
        .create(model.db(), "secret")
        .await
        .unwrap();
    let session_auth = SessionAuth::new(&auth_config(Transport::Cookie)).unwrap();
    let config = service::configure(model.clone(), session_auth).await.unwrap();
    let app = test::init_service(App::new().configure(config)).await;

    let mut locations = vec![];
    for (username, password) in [("admin", "nope"), ("ghost", "secret")] {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/login")
                .set_form([("username", username), ("password", password)])
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        locations.push(
            resp.headers()
                .get(header::LOCATION)
                .unwrap()
                .to_str()
                .unwrap()
                .to_owned(),
        );
    }

    assert_eq!(locations[0], locations[1]);
    assert_eq!(locations[0], "/login?error=invalid+credentials");
}

#[actix_web::test]
async fn missing_token_skips_protected_handler() {
    let model = Model::test().await.unwrap();
    let session_auth = SessionAuth::new(&auth_config(Transport::Cookie)).unwrap();
    let config = service::configure(model.clone(), session_auth).await.unwrap();
    let app = test::init_service(App::new().configure(config)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");

    // A guarded insert must not leave any trace when rejected
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/clients")
            .set_form([("name", "Ann")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    assert!(Client::list(model.db()).await.unwrap().is_empty());
}

#[actix_web::test]
async fn invalid_token_clears_stale_cookie() {
    let model = Model::test().await.unwrap();
    let session_auth = SessionAuth::new(&auth_config(Transport::Cookie)).unwrap();
    let config = service::configure(model.clone(), session_auth).await.unwrap();
    let app = test::init_service(App::new().configure(config)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/")
            .cookie(Cookie::new("session", "fake_token"))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");

    let removal = resp
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .unwrap();
    assert!(removal.value().is_empty());
}

#[actix_web::test]
async fn logout_clears_session_transport() {
    let model = Model::test().await.unwrap();
    User::new("admin")
        .create(model.db(), "secret")
        .await
        .unwrap();
    let session_auth = SessionAuth::new(&auth_config(Transport::Cookie)).unwrap();
    let config = service::configure(model.clone(), session_auth).await.unwrap();
    let app = test::init_service(App::new().configure(config)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/login")
            .set_form([("username", "admin"), ("password", "secret")])
            .to_request(),
    )
    .await;
    let cookie = resp
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .unwrap()
        .into_owned();

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");
    let removal = resp
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .unwrap();
    assert!(removal.value().is_empty());

    // The cleared cookie jar behaves exactly like "no token present"
    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");
}

#[actix_web::test]
async fn header_login_returns_bearer_token() {
    let model = Model::test().await.unwrap();
    User::new("admin")
        .create(model.db(), "secret")
        .await
        .unwrap();
    let session_auth = SessionAuth::new(&auth_config(Transport::Header)).unwrap();
    let config = service::configure(model.clone(), session_auth).await.unwrap();
    let app = test::init_service(App::new().configure(config)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/login")
            .set_form([("username", "admin"), ("password", "secret")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().unwrap().to_owned();
    assert!(!token.is_empty());

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/clients")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/clients").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn header_login_rejects_bad_credentials_as_json() {
    let model = Model::test().await.unwrap();
    User::new("admin")
        .create(model.db(), "secret")
        .await
        .unwrap();
    let session_auth = SessionAuth::new(&auth_config(Transport::Header)).unwrap();
    let config = service::configure(model.clone(), session_auth).await.unwrap();
    let app = test::init_service(App::new().configure(config)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/login")
            .set_form([("username", "admin"), ("password", "nope")])
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_json_include!(actual: body, expected: json!({ "error": "invalid credentials" }));
}
