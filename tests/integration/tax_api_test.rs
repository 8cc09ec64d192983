// HTTP tests for the tax obligation endpoints

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{http::StatusCode, test, App};
use chrono::NaiveDate;
use helpers::TestContext;
use mei_ledger::taxes::TaxObligation;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

#[actix_web::test]
async fn test_upsert_and_fetch_obligation() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(|cfg| ctx.services.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/companies/company-1/tax-obligations")
        .set_json(json!({"period": "2024-12", "gross_revenue": "2000.00"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let created: TaxObligation = test::read_body_json(resp).await;
    assert_eq!(created.tax_amount, dec!(120.00));
    assert_eq!(created.due_date, NaiveDate::from_ymd_opt(2025, 1, 20).unwrap());
    assert!(!created.paid);

    let req = test::TestRequest::get()
        .uri(&format!("/api/tax-obligations/{}", created.id))
        .to_request();
    let fetched: TaxObligation = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched.id, created.id);

    let req = test::TestRequest::get()
        .uri("/api/companies/company-1/tax-obligations?year=2024")
        .to_request();
    let listed: Vec<TaxObligation> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.len(), 1);
}

#[actix_web::test]
async fn test_pay_twice_conflicts_and_pending_reopens() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(|cfg| ctx.services.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/companies/company-1/tax-obligations")
        .set_json(json!({"period": "2024-06", "gross_revenue": "1000"}))
        .to_request();
    let created: TaxObligation = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/tax-obligations/{}/pay", created.id))
        .set_json(json!({"payment_date": "2024-07-15"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let paid: TaxObligation = test::read_body_json(resp).await;
    assert!(paid.paid);
    assert!(paid.paid_at.is_some());

    // No body: defaults to now
    let req = test::TestRequest::post()
        .uri(&format!("/api/tax-obligations/{}/pay", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], 409);

    let req = test::TestRequest::post()
        .uri(&format!("/api/tax-obligations/{}/pending", created.id))
        .to_request();
    let pending: TaxObligation = test::call_and_read_body_json(&app, req).await;
    assert!(!pending.paid);
    assert!(pending.paid_at.is_none());
}

#[actix_web::test]
async fn test_future_payment_date_rejected() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(|cfg| ctx.services.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/companies/company-1/tax-obligations")
        .set_json(json!({"period": "2024-06", "gross_revenue": "1000"}))
        .to_request();
    let created: TaxObligation = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/tax-obligations/{}/pay", created.id))
        .set_json(json!({"payment_date": "2999-01-01"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri(&format!("/api/tax-obligations/{}", created.id))
        .to_request();
    let stored: TaxObligation = test::call_and_read_body_json(&app, req).await;
    assert!(!stored.paid);
}

#[actix_web::test]
async fn test_invalid_requests_return_400() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(|cfg| ctx.services.configure(cfg))).await;

    for body in [
        json!({"period": "2024-13", "gross_revenue": "1000"}),
        json!({"period": "2024-05", "gross_revenue": "-1"}),
        json!({"period": "May 2024", "gross_revenue": "1000"}),
        json!({"gross_revenue": "1000"}),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/companies/company-1/tax-obligations")
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {}", body);

        let error: Value = test::read_body_json(resp).await;
        assert_eq!(error["error"]["code"], 400);
    }

    assert!(ctx.obligations.is_empty().await);
}

#[actix_web::test]
async fn test_missing_obligation_returns_404() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(|cfg| ctx.services.configure(cfg))).await;

    for (method, uri) in [
        ("GET", "/api/tax-obligations/nope"),
        ("POST", "/api/tax-obligations/nope/pay"),
        ("POST", "/api/tax-obligations/nope/pending"),
    ] {
        let req = if method == "GET" {
            test::TestRequest::get().uri(uri).to_request()
        } else {
            test::TestRequest::post().uri(uri).to_request()
        };
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{} {}", method, uri);
    }
}

#[actix_web::test]
async fn test_preview_does_not_persist() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(|cfg| ctx.services.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/tax/preview")
        .set_json(json!({"period": "2024-12", "gross_revenue": "1000"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["period"], "2024-12");
    assert_eq!(body["due_date"], "2025-01-20");
    assert!(ctx.obligations.is_empty().await);
}

#[actix_web::test]
async fn test_unparseable_payment_date_rejected_before_settling() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(|cfg| ctx.services.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/companies/company-1/tax-obligations")
        .set_json(json!({"period": "2024-06", "gross_revenue": "1000"}))
        .to_request();
    let created: TaxObligation = test::call_and_read_body_json(&app, req).await;

    for body in [
        json!({"payment_date": "15/07/2024"}),
        json!({"payment_date": 20240715}),
    ] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/tax-obligations/{}/pay", created.id))
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {}", body);

        let error: Value = test::read_body_json(resp).await;
        assert_eq!(error["error"]["code"], 400);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/tax-obligations/{}", created.id))
        .to_request();
    let stored: TaxObligation = test::call_and_read_body_json(&app, req).await;
    assert!(!stored.paid);
    assert!(stored.paid_at.is_none());
}

#[actix_web::test]
async fn test_revenue_beyond_storage_range_rejected() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(|cfg| ctx.services.configure(cfg))).await;

    for gross_revenue in ["10000000000000", "1000.005"] {
        let req = test::TestRequest::post()
            .uri("/api/companies/company-1/tax-obligations")
            .set_json(json!({"period": "2024-06", "gross_revenue": gross_revenue}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "revenue: {}", gross_revenue);
    }

    assert!(ctx.obligations.is_empty().await);
}
