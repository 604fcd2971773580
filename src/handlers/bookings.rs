use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::bookings::{BookingService, NewBookingCommand};
use crate::db::DbPool;
use crate::domain::booking::BookingView;
use crate::errors::AppError;
use crate::infrastructure::booking_repo::DieselBookingRepository;
use crate::infrastructure::listing_repo::DieselListingRepository;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    pub listing_id: Uuid,
    pub guest_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_count: i32,
    pub refund_policy_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingResponse {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub guest_id: Uuid,
    pub check_in: String,
    pub check_out: String,
    pub guest_count: i32,
    pub refund_policy_id: Option<Uuid>,
    pub subtotal: i64,
    pub service_fee: i64,
    pub tax: i64,
    pub total: i64,
    pub payment_status: String,
    pub status: String,
    pub created_at: String,
}

impl From<BookingView> for BookingResponse {
    fn from(booking: BookingView) -> Self {
        BookingResponse {
            id: booking.id,
            listing_id: booking.listing_id,
            guest_id: booking.guest_id,
            check_in: booking.check_in.to_string(),
            check_out: booking.check_out.to_string(),
            guest_count: booking.guest_count,
            refund_policy_id: booking.refund_policy_id,
            subtotal: booking.subtotal,
            service_fee: booking.service_fee,
            tax: booking.tax,
            total: booking.total,
            payment_status: booking.payment_status.as_str().to_string(),
            status: booking.status.as_str().to_string(),
            created_at: booking.created_at.to_rfc3339(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /bookings
///
/// Validates the stay against the listing, prices it server-side, and
/// persists the booking with the quote frozen onto the row. The booking
/// starts `pending`/`unpaid` until a payment is confirmed.
#[utoipa::path(
    post,
    path = "/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Invalid dates or guest count"),
        (status = 404, description = "Listing not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "bookings"
)]
pub async fn create_booking(
    pool: web::Data<DbPool>,
    body: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let booking = web::block(move || {
        let service = BookingService::new(
            DieselListingRepository::new(pool.get_ref().clone()),
            DieselBookingRepository::new(pool.get_ref().clone()),
        );
        service.create_booking(&NewBookingCommand {
            listing_id: body.listing_id,
            guest_id: body.guest_id,
            check_in: body.check_in,
            check_out: body.check_out,
            guest_count: body.guest_count,
            refund_policy_id: body.refund_policy_id,
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(BookingResponse::from(booking)))
}

/// GET /bookings/{id}
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    params(
        ("id" = Uuid, Path, description = "Booking UUID"),
    ),
    responses(
        (status = 200, description = "Booking found", body = BookingResponse),
        (status = 404, description = "Booking not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "bookings"
)]
pub async fn get_booking(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let booking_id = path.into_inner();

    let booking = web::block(move || {
        let service = BookingService::new(
            DieselListingRepository::new(pool.get_ref().clone()),
            DieselBookingRepository::new(pool.get_ref().clone()),
        );
        service.get_booking(booking_id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(BookingResponse::from(booking)))
}
