use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::booking::{BookingStatus, BookingView, PaymentStatus};
use crate::domain::draft::BookingDraft;
use crate::domain::errors::DomainError;
use crate::domain::ports::BookingRepository;
use crate::domain::pricing::PriceQuote;
use crate::schema::bookings;

use super::models::{BookingRow, NewBookingRow};

pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl BookingRepository for DieselBookingRepository {
    fn create(
        &self,
        draft: &BookingDraft,
        guest_id: Uuid,
        quote: &PriceQuote,
    ) -> Result<BookingView, DomainError> {
        let (check_in, check_out) = match (draft.check_in, draft.check_out) {
            (Some(check_in), Some(check_out)) => (check_in, check_out),
            _ => return Err(DomainError::InvalidRange),
        };
        let mut conn = self.pool.get()?;

        let row = NewBookingRow {
            id: Uuid::new_v4(),
            listing_id: draft.listing_id,
            guest_id,
            check_in,
            check_out,
            guest_count: draft.guest_count,
            refund_policy_id: draft.refund_policy_id,
            subtotal: quote.subtotal,
            service_fee: quote.service_fee,
            tax: quote.tax,
            total: quote.total,
            payment_status: PaymentStatus::Unpaid.as_str().to_string(),
            status: BookingStatus::Pending.as_str().to_string(),
        };
        let inserted: BookingRow = diesel::insert_into(bookings::table)
            .values(&row)
            .returning(BookingRow::as_returning())
            .get_result(&mut conn)?;

        inserted.try_into()
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<BookingView>, DomainError> {
        let mut conn = self.pool.get()?;

        let booking = bookings::table
            .filter(bookings::id.eq(id))
            .select(BookingRow::as_select())
            .first(&mut conn)
            .optional()?;

        booking.map(TryInto::try_into).transpose()
    }
}
