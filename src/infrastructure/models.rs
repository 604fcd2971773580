use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::booking::BookingView;
use crate::domain::errors::DomainError;
use crate::domain::listing::{ListingView, RefundPolicyView};
use crate::domain::payment::{ReceiptView, TransactionView};
use crate::schema::{bookings, listings, payment_receipts, refund_policies, transactions};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = listings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ListingRow {
    pub id: Uuid,
    pub host_id: Uuid,
    pub title: String,
    pub location: String,
    pub nightly_rate: i64,
    pub max_guests: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = listings)]
pub struct NewListingRow {
    pub id: Uuid,
    pub host_id: Uuid,
    pub title: String,
    pub location: String,
    pub nightly_rate: i64,
    pub max_guests: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = refund_policies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RefundPolicyRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub cancellation_deadline_hours: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = bookings)]
#[diesel(belongs_to(ListingRow, foreign_key = listing_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BookingRow {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub guest_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_count: i32,
    pub refund_policy_id: Option<Uuid>,
    pub subtotal: i64,
    pub service_fee: i64,
    pub tax: i64,
    pub total: i64,
    pub payment_status: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = bookings)]
pub struct NewBookingRow {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub guest_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_count: i32,
    pub refund_policy_id: Option<Uuid>,
    pub subtotal: i64,
    pub service_fee: i64,
    pub tax: i64,
    pub total: i64,
    pub payment_status: String,
    pub status: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = transactions)]
#[diesel(belongs_to(BookingRow, foreign_key = booking_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TransactionRow {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub amount: BigDecimal,
    pub status: String,
    pub reference: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = transactions)]
pub struct NewTransactionRow {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub amount: BigDecimal,
    pub status: String,
    pub reference: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = payment_receipts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReceiptRow {
    pub id: Uuid,
    pub receipt_number: String,
    pub transaction_id: Uuid,
    pub booking_id: Uuid,
    pub subtotal: i64,
    pub fees: i64,
    pub taxes: i64,
    pub total: i64,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = payment_receipts)]
pub struct NewReceiptRow {
    pub id: Uuid,
    pub receipt_number: String,
    pub transaction_id: Uuid,
    pub booking_id: Uuid,
    pub subtotal: i64,
    pub fees: i64,
    pub taxes: i64,
    pub total: i64,
}

// ── Row → view mappings ──────────────────────────────────────────────────────

impl From<ListingRow> for ListingView {
    fn from(row: ListingRow) -> Self {
        ListingView {
            id: row.id,
            host_id: row.host_id,
            title: row.title,
            location: row.location,
            nightly_rate: row.nightly_rate,
            max_guests: row.max_guests,
            created_at: row.created_at,
        }
    }
}

impl From<RefundPolicyRow> for RefundPolicyView {
    fn from(row: RefundPolicyRow) -> Self {
        RefundPolicyView {
            id: row.id,
            name: row.name,
            description: row.description,
            cancellation_deadline_hours: row.cancellation_deadline_hours,
        }
    }
}

impl TryFrom<BookingRow> for BookingView {
    type Error = DomainError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(BookingView {
            id: row.id,
            listing_id: row.listing_id,
            guest_id: row.guest_id,
            check_in: row.check_in,
            check_out: row.check_out,
            guest_count: row.guest_count,
            refund_policy_id: row.refund_policy_id,
            subtotal: row.subtotal,
            service_fee: row.service_fee,
            tax: row.tax,
            total: row.total,
            payment_status: row.payment_status.parse()?,
            status: row.status.parse()?,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<TransactionRow> for TransactionView {
    type Error = DomainError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        Ok(TransactionView {
            id: row.id,
            booking_id: row.booking_id,
            amount: row.amount,
            status: row.status.parse()?,
            reference: row.reference,
            created_at: row.created_at,
        })
    }
}

impl From<ReceiptRow> for ReceiptView {
    fn from(row: ReceiptRow) -> Self {
        ReceiptView {
            id: row.id,
            receipt_number: row.receipt_number,
            transaction_id: row.transaction_id,
            booking_id: row.booking_id,
            subtotal: row.subtotal,
            fees: row.fees,
            taxes: row.taxes,
            total: row.total,
            issued_at: row.issued_at,
        }
    }
}
