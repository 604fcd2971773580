use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::bookings::BookingService;
use crate::application::listings::ListingService;
use crate::db::DbPool;
use crate::domain::listing::{ListingView, NewListing, RefundPolicyView};
use crate::domain::pricing::PriceQuote;
use crate::errors::AppError;
use crate::infrastructure::booking_repo::DieselBookingRepository;
use crate::infrastructure::listing_repo::DieselListingRepository;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateListingRequest {
    pub host_id: Uuid,
    pub title: String,
    pub location: String,
    /// Whole naira per night.
    pub nightly_rate: i64,
    pub max_guests: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListingResponse {
    pub id: Uuid,
    pub host_id: Uuid,
    pub title: String,
    pub location: String,
    pub nightly_rate: i64,
    pub max_guests: i32,
    pub created_at: String,
}

impl From<ListingView> for ListingResponse {
    fn from(listing: ListingView) -> Self {
        ListingResponse {
            id: listing.id,
            host_id: listing.host_id,
            title: listing.title,
            location: listing.location,
            nightly_rate: listing.nightly_rate,
            max_guests: listing.max_guests,
            created_at: listing.created_at.to_rfc3339(),
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListListingsParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListListingsResponse {
    pub items: Vec<ListingResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct QuoteParams {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteResponse {
    pub nights: i64,
    pub subtotal: i64,
    pub service_fee: i64,
    pub tax: i64,
    pub total: i64,
}

impl From<PriceQuote> for QuoteResponse {
    fn from(quote: PriceQuote) -> Self {
        QuoteResponse {
            nights: quote.nights,
            subtotal: quote.subtotal,
            service_fee: quote.service_fee,
            tax: quote.tax,
            total: quote.total,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefundPolicyResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub cancellation_deadline_hours: i32,
}

impl From<RefundPolicyView> for RefundPolicyResponse {
    fn from(policy: RefundPolicyView) -> Self {
        RefundPolicyResponse {
            id: policy.id,
            name: policy.name,
            description: policy.description,
            cancellation_deadline_hours: policy.cancellation_deadline_hours,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /listings
#[utoipa::path(
    post,
    path = "/listings",
    request_body = CreateListingRequest,
    responses(
        (status = 201, description = "Listing created", body = ListingResponse),
        (status = 400, description = "Invalid listing"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "listings"
)]
pub async fn create_listing(
    pool: web::Data<DbPool>,
    body: web::Json<CreateListingRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let listing = web::block(move || {
        let service = ListingService::new(DieselListingRepository::new(pool.get_ref().clone()));
        service.create_listing(&NewListing {
            host_id: body.host_id,
            title: body.title,
            location: body.location,
            nightly_rate: body.nightly_rate,
            max_guests: body.max_guests,
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(ListingResponse::from(listing)))
}

/// GET /listings
///
/// Returns a paginated list of listings, newest first.
#[utoipa::path(
    get,
    path = "/listings",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated list of listings", body = ListListingsResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "listings"
)]
pub async fn list_listings(
    pool: web::Data<DbPool>,
    query: web::Query<ListListingsParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);

    let result = web::block(move || {
        let service = ListingService::new(DieselListingRepository::new(pool.get_ref().clone()));
        service.list_listings(page, limit)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListListingsResponse {
        items: result.items.into_iter().map(Into::into).collect(),
        total: result.total,
        page,
        limit,
    }))
}

/// GET /listings/{id}
#[utoipa::path(
    get,
    path = "/listings/{id}",
    params(
        ("id" = Uuid, Path, description = "Listing UUID"),
    ),
    responses(
        (status = 200, description = "Listing found", body = ListingResponse),
        (status = 404, description = "Listing not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "listings"
)]
pub async fn get_listing(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let listing_id = path.into_inner();

    let listing = web::block(move || {
        let service = ListingService::new(DieselListingRepository::new(pool.get_ref().clone()));
        service.get_listing(listing_id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListingResponse::from(listing)))
}

/// GET /listings/{id}/quote
///
/// Prices a prospective stay. Backs the live price breakdown shown while a
/// guest adjusts dates and party size; nothing is persisted.
#[utoipa::path(
    get,
    path = "/listings/{id}/quote",
    params(
        ("id" = Uuid, Path, description = "Listing UUID"),
        ("check_in" = String, Query, description = "Check-in date (YYYY-MM-DD)"),
        ("check_out" = String, Query, description = "Check-out date (YYYY-MM-DD)"),
        ("guests" = i32, Query, description = "Guest count"),
    ),
    responses(
        (status = 200, description = "Price quote", body = QuoteResponse),
        (status = 400, description = "Invalid dates or guest count"),
        (status = 404, description = "Listing not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "listings"
)]
pub async fn quote_listing(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<QuoteParams>,
) -> Result<HttpResponse, AppError> {
    let listing_id = path.into_inner();
    let params = query.into_inner();

    let quote = web::block(move || {
        let service = BookingService::new(
            DieselListingRepository::new(pool.get_ref().clone()),
            DieselBookingRepository::new(pool.get_ref().clone()),
        );
        service.preview_quote(listing_id, params.check_in, params.check_out, params.guests)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(QuoteResponse::from(quote)))
}

/// GET /refund-policies
#[utoipa::path(
    get,
    path = "/refund-policies",
    responses(
        (status = 200, description = "Available refund policies", body = [RefundPolicyResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "listings"
)]
pub async fn list_refund_policies(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let policies = web::block(move || {
        let service = ListingService::new(DieselListingRepository::new(pool.get_ref().clone()));
        service.refund_policies()
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let policies: Vec<RefundPolicyResponse> = policies.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(policies))
}
