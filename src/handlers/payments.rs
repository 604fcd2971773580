use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::checkout::CheckoutService;
use crate::application::confirmation::ConfirmationWorkflow;
use crate::db::DbPool;
use crate::domain::booking::BookingView;
use crate::domain::errors::DomainError;
use crate::domain::payment::{
    ConfirmationOutcome, GatewayCallback, GatewayRequest, ReceiptView, TransactionView,
};
use crate::domain::ports::{BookingRepository, PaymentRepository};
use crate::errors::AppError;
use crate::infrastructure::booking_repo::DieselBookingRepository;
use crate::infrastructure::payment_repo::DieselPaymentRepository;
use crate::infrastructure::paystack::{GatewayConfig, PaystackVerifier};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct InitializePaymentRequest {
    pub booking_id: Uuid,
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GatewayRequestResponse {
    pub reference: String,
    pub email: String,
    /// Minor currency units (kobo).
    pub amount: i64,
    pub public_key: String,
    pub metadata: serde_json::Value,
}

impl From<GatewayRequest> for GatewayRequestResponse {
    fn from(request: GatewayRequest) -> Self {
        GatewayRequestResponse {
            reference: request.reference,
            email: request.email,
            amount: request.amount,
            public_key: request.public_key,
            metadata: request.metadata,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfirmPaymentRequest {
    pub booking_id: Uuid,
    pub reference: String,
    /// Client-reported gateway status. Advisory only; the server-side
    /// verification result decides the outcome.
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub booking_id: Uuid,
    /// Decimal naira as a string, e.g. "63825.00"
    pub amount: String,
    pub status: String,
    pub reference: String,
    pub created_at: String,
}

impl From<TransactionView> for TransactionResponse {
    fn from(transaction: TransactionView) -> Self {
        TransactionResponse {
            id: transaction.id,
            booking_id: transaction.booking_id,
            amount: transaction.amount.to_string(),
            status: transaction.status.as_str().to_string(),
            reference: transaction.reference,
            created_at: transaction.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReceiptResponse {
    pub receipt_number: String,
    pub transaction_id: Uuid,
    pub booking_id: Uuid,
    pub subtotal: i64,
    pub fees: i64,
    pub taxes: i64,
    pub total: i64,
    pub issued_at: String,
}

impl From<ReceiptView> for ReceiptResponse {
    fn from(receipt: ReceiptView) -> Self {
        ReceiptResponse {
            receipt_number: receipt.receipt_number,
            transaction_id: receipt.transaction_id,
            booking_id: receipt.booking_id,
            subtotal: receipt.subtotal,
            fees: receipt.fees,
            taxes: receipt.taxes,
            total: receipt.total,
            issued_at: receipt.issued_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmPaymentResponse {
    /// Terminal outcome of this attempt: "success" or "failed".
    pub status: String,
    pub transaction: TransactionResponse,
    pub receipt: Option<ReceiptResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingStayResponse {
    pub check_in: String,
    pub check_out: String,
    pub guest_count: i32,
}

/// Display model for the receipt page: the persisted receipt together with
/// the stay it pays for.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReceiptDetailResponse {
    pub receipt: ReceiptResponse,
    pub booking: BookingStayResponse,
}

impl ReceiptDetailResponse {
    fn present(receipt: ReceiptView, booking: BookingView) -> Self {
        ReceiptDetailResponse {
            receipt: receipt.into(),
            booking: BookingStayResponse {
                check_in: booking.check_in.to_string(),
                check_out: booking.check_out.to_string(),
                guest_count: booking.guest_count,
            },
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /payments/initialize
///
/// Rebuilds the checkout request from the persisted booking and mints a
/// fresh payment reference. Nothing is written; the client opens the
/// gateway widget with the returned request.
#[utoipa::path(
    post,
    path = "/payments/initialize",
    request_body = InitializePaymentRequest,
    responses(
        (status = 200, description = "Gateway checkout request", body = GatewayRequestResponse),
        (status = 400, description = "Booking is already paid"),
        (status = 404, description = "Booking not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "payments"
)]
pub async fn initialize_payment(
    pool: web::Data<DbPool>,
    gateway: web::Data<GatewayConfig>,
    body: web::Json<InitializePaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let request = web::block(move || {
        let service = CheckoutService::new(
            DieselBookingRepository::new(pool.get_ref().clone()),
            gateway.public_key.clone(),
        );
        service.initialize(body.booking_id, &body.email)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(GatewayRequestResponse::from(request)))
}

/// POST /payments/confirm
///
/// Runs the confirmation workflow for a gateway callback: verify the
/// reference with the gateway, then atomically persist the transaction,
/// update the booking, and issue the receipt. Re-posting an already-settled
/// reference replays the stored outcome.
#[utoipa::path(
    post,
    path = "/payments/confirm",
    request_body = ConfirmPaymentRequest,
    responses(
        (status = 200, description = "Terminal outcome of the attempt", body = ConfirmPaymentResponse),
        (status = 404, description = "Booking not found"),
        (status = 422, description = "Payment could not be confirmed"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "payments"
)]
pub async fn confirm_payment(
    pool: web::Data<DbPool>,
    gateway: web::Data<GatewayConfig>,
    body: web::Json<ConfirmPaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let outcome = web::block(move || {
        let workflow = ConfirmationWorkflow::new(
            PaystackVerifier::new(gateway.get_ref().clone()),
            DieselBookingRepository::new(pool.get_ref().clone()),
            DieselPaymentRepository::new(pool.get_ref().clone()),
        );
        workflow.confirm(&GatewayCallback {
            booking_id: body.booking_id,
            reference: body.reference,
            status: body.status,
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let response = match outcome {
        ConfirmationOutcome::Confirmed {
            transaction,
            receipt,
        } => ConfirmPaymentResponse {
            status: "success".to_string(),
            transaction: transaction.into(),
            receipt: Some(receipt.into()),
        },
        ConfirmationOutcome::Declined { transaction } => ConfirmPaymentResponse {
            status: "failed".to_string(),
            transaction: transaction.into(),
            receipt: None,
        },
    };

    Ok(HttpResponse::Ok().json(response))
}

/// GET /bookings/{id}/receipt
#[utoipa::path(
    get,
    path = "/bookings/{id}/receipt",
    params(
        ("id" = Uuid, Path, description = "Booking UUID"),
    ),
    responses(
        (status = 200, description = "Receipt for the booking", body = ReceiptDetailResponse),
        (status = 404, description = "Booking or receipt not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "payments"
)]
pub async fn get_receipt(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let booking_id = path.into_inner();

    let (receipt, booking) = web::block(move || {
        let bookings = DieselBookingRepository::new(pool.get_ref().clone());
        let payments = DieselPaymentRepository::new(pool.get_ref().clone());
        let booking = bookings
            .find_by_id(booking_id)?
            .ok_or(DomainError::NotFound)?;
        let receipt = payments
            .find_receipt(booking_id)?
            .ok_or(DomainError::NotFound)?;
        Ok::<_, DomainError>((receipt, booking))
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ReceiptDetailResponse::present(receipt, booking)))
}
