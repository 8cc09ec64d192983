use actix_web::{web, HttpRequest, HttpResponse};
use tracing::{info, warn};

use crate::core::{AppError, Result};
use crate::modules::subscriptions::services::signature::SIGNATURE_HEADER;
use crate::modules::subscriptions::services::{SignatureVerifier, SubscriptionReconciler};

/// Receive a payment gateway event
///
/// POST /webhooks/payments
///
/// # Headers
/// * `X-Signature` - hex HMAC-SHA256 of the raw body
///
/// # Returns
/// * `200 OK` - `{"received": true}` for every correctly signed delivery,
///   whether or not processing succeeded
/// * `401 Unauthorized` - signature missing or invalid
pub async fn receive_payment_event(
    req: HttpRequest,
    body: web::Bytes,
    verifier: web::Data<SignatureVerifier>,
    reconciler: web::Data<SubscriptionReconciler>,
) -> Result<HttpResponse> {
    let signature = extract_signature(&req)?;

    if let Err(e) = verifier.verify(&body, &signature) {
        warn!(error = %e, "Rejected payment webhook with bad signature");
        return Err(e);
    }

    info!(bytes = body.len(), "Received payment webhook");

    let ack = reconciler.acknowledge(&body).await;

    Ok(HttpResponse::Ok().json(ack))
}

/// Extract webhook signature from request headers
fn extract_signature(req: &HttpRequest) -> Result<String> {
    req.headers()
        .get(SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(String::from)
        .ok_or_else(|| AppError::unauthorized(format!("Missing {} header", SIGNATURE_HEADER)))
}

/// Configure webhook routes
pub fn configure_webhook_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/webhooks/payments", web::post().to(receive_payment_event));
}
