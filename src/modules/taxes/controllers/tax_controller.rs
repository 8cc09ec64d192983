//! Tax obligation endpoints
//!
//! Entry point for the revenue collector (upsert) and the company's DAS
//! history page (list, settle, reverse).

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::error::AppError;
use crate::core::timezone::{brasilia_start_of_day, brasilia_today};
use crate::core::TaxPeriod;
use crate::modules::taxes::services::TaxService;

/// Request body for creating or recomputing an obligation
#[derive(Debug, Deserialize)]
pub struct UpsertObligationRequest {
    /// Calendar month, format: YYYY-MM
    pub period: TaxPeriod,
    pub gross_revenue: Decimal,
}

/// Request body for settling an obligation
#[derive(Debug, Default, Deserialize)]
pub struct MarkPaidRequest {
    /// Date the DAS was paid (format: YYYY-MM-DD); defaults to now
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
}

impl MarkPaidRequest {
    /// Parse an optional JSON body; an empty body means "paid now"
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        serde_json::from_slice(body)
            .map_err(|e| AppError::invalid_input(format!("Invalid JSON body: {}", e)))
    }
}

/// Query parameters for listing obligations
#[derive(Debug, Deserialize)]
pub struct ListObligationsQuery {
    #[serde(default)]
    pub year: Option<i32>,
}

/// Response for an unsaved computation
#[derive(Debug, Serialize)]
pub struct TaxPreviewResponse {
    pub period: TaxPeriod,
    pub gross_revenue: Decimal,
    pub tax_amount: Decimal,
    pub due_date: NaiveDate,
}

/// Create or recompute the obligation for a company and month
/// POST /companies/{company_id}/tax-obligations
pub async fn upsert_obligation(
    service: web::Data<TaxService>,
    path: web::Path<String>,
    request: web::Json<UpsertObligationRequest>,
) -> Result<HttpResponse, AppError> {
    let company_id = path.into_inner();
    let request = request.into_inner();

    let obligation = service
        .upsert_obligation(&company_id, request.period, request.gross_revenue)
        .await?;

    Ok(HttpResponse::Ok().json(obligation))
}

/// List a company's obligations
/// GET /companies/{company_id}/tax-obligations?year=
pub async fn list_obligations(
    service: web::Data<TaxService>,
    path: web::Path<String>,
    query: web::Query<ListObligationsQuery>,
) -> Result<HttpResponse, AppError> {
    let obligations = service
        .list_obligations(&path.into_inner(), query.year)
        .await?;

    Ok(HttpResponse::Ok().json(obligations))
}

/// Get obligation by ID
/// GET /tax-obligations/{id}
pub async fn get_obligation(
    service: web::Data<TaxService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let obligation = service.get_obligation(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(obligation))
}

/// Settle an obligation
/// POST /tax-obligations/{id}/pay
pub async fn mark_paid(
    service: web::Data<TaxService>,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let request = MarkPaidRequest::from_body(&body)?;

    if let Some(date) = request.payment_date {
        if date > brasilia_today() {
            return Err(AppError::invalid_input(format!(
                "Payment date {} is in the future",
                date
            )));
        }
    }

    let obligation = service
        .mark_paid(
            &path.into_inner(),
            request.payment_date.map(brasilia_start_of_day),
        )
        .await?;

    Ok(HttpResponse::Ok().json(obligation))
}

/// Move an obligation back to pending
/// POST /tax-obligations/{id}/pending
pub async fn mark_pending(
    service: web::Data<TaxService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let obligation = service.mark_pending(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(obligation))
}

/// Compute amount and due date without saving
/// POST /tax/preview
pub async fn preview_tax(
    service: web::Data<TaxService>,
    request: web::Json<UpsertObligationRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let assessment = service.preview(request.period, request.gross_revenue)?;

    Ok(HttpResponse::Ok().json(TaxPreviewResponse {
        period: request.period,
        gross_revenue: request.gross_revenue,
        tax_amount: assessment.tax_amount,
        due_date: assessment.due_date,
    }))
}

/// Configure tax routes
pub fn configure_tax_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/companies/{company_id}/tax-obligations")
            .route(web::post().to(upsert_obligation))
            .route(web::get().to(list_obligations)),
    )
    .service(
        web::scope("/tax-obligations")
            .route("/{id}", web::get().to(get_obligation))
            .route("/{id}/pay", web::post().to(mark_paid))
            .route("/{id}/pending", web::post().to(mark_pending)),
    )
    .route("/tax/preview", web::post().to(preview_tax));
}
