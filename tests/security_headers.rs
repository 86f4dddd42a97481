#![cfg(feature = "inmem-store")]

use std::sync::Arc;

use actix_web::{test, web, App, HttpResponse};

use folio::store::inmem::{InMemStore, PortfolioData};
use folio::{config, AppState, Portfolio, SecurityHeaders};

fn state() -> AppState {
    AppState {
        portfolio: Portfolio::new(Arc::new(InMemStore::with_data(PortfolioData::default()))),
    }
}

#[actix_web::test]
#[serial_test::serial]
async fn security_headers_present() {
    std::env::remove_var("ENABLE_HSTS");
    let app = test::init_service(
        App::new()
            .wrap(SecurityHeaders::from_env())
            .app_data(actix_web::web::Data::new(state()))
            .configure(config),
    )
    .await;
    let req = test::TestRequest::get().uri("/api/v1/projects").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let headers = resp.headers();
    assert!(headers.get("content-security-policy").is_some());
    assert_eq!(headers.get("referrer-policy").unwrap(), "no-referrer");
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert!(headers.get("strict-transport-security").is_none()); // not enabled
}

#[actix_web::test]
#[serial_test::serial]
async fn hsts_enabled_via_builder() {
    let app = test::init_service(
        App::new()
            .wrap(SecurityHeaders::from_env().with_hsts(true))
            .app_data(actix_web::web::Data::new(state()))
            .configure(config),
    )
    .await;
    let req = test::TestRequest::get().uri("/api/v1/projects").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert!(
        resp.headers().get("strict-transport-security").is_some(),
        "HSTS header missing"
    );
}

#[actix_web::test]
#[serial_test::serial]
async fn env_var_enables_hsts() {
    std::env::set_var("ENABLE_HSTS", "1");
    let app = test::init_service(
        App::new()
            .wrap(SecurityHeaders::from_env())
            .app_data(actix_web::web::Data::new(state()))
            .configure(config),
    )
    .await;
    let req = test::TestRequest::get().uri("/api/v1/projects").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert!(resp.headers().get("strict-transport-security").is_some());
    std::env::remove_var("ENABLE_HSTS");
}

// an existing CSP header set by a handler must not be overwritten
#[actix_web::test]
#[serial_test::serial]
async fn existing_csp_header_preserved() {
    let app = test::init_service(
        App::new()
            .wrap(SecurityHeaders::from_env())
            .route(
                "/custom",
                web::get().to(|| async {
                    HttpResponse::Ok()
                        .insert_header((
                            actix_web::http::header::CONTENT_SECURITY_POLICY,
                            "custom-src 'none'",
                        ))
                        .finish()
                }),
            ),
    )
    .await;
    let req = test::TestRequest::get().uri("/custom").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let csp = resp
        .headers()
        .get("content-security-policy")
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(csp, "custom-src 'none'");
}
