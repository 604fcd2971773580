use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::booking::BookingView;
use crate::domain::draft::BookingDraft;
use crate::domain::errors::DomainError;
use crate::domain::ports::{BookingRepository, ListingRepository};
use crate::domain::pricing::PriceQuote;

#[derive(Debug, Clone)]
pub struct NewBookingCommand {
    pub listing_id: Uuid,
    pub guest_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_count: i32,
    pub refund_policy_id: Option<Uuid>,
}

pub struct BookingService<L, B> {
    listings: L,
    bookings: B,
}

impl<L: ListingRepository, B: BookingRepository> BookingService<L, B> {
    pub fn new(listings: L, bookings: B) -> Self {
        Self { listings, bookings }
    }

    /// Price a prospective stay without creating anything. Backs the
    /// booking widget's live price breakdown.
    pub fn preview_quote(
        &self,
        listing_id: Uuid,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guest_count: i32,
    ) -> Result<PriceQuote, DomainError> {
        let listing = self
            .listings
            .find_by_id(listing_id)?
            .ok_or(DomainError::NotFound)?;
        BookingDraft::for_listing(&listing)
            .with_dates(check_in, check_out)
            .with_guests(guest_count)
            .quote()
    }

    /// Validate the draft against the listing, quote it, and persist the
    /// booking with the quote frozen onto the row.
    pub fn create_booking(&self, cmd: &NewBookingCommand) -> Result<BookingView, DomainError> {
        let listing = self
            .listings
            .find_by_id(cmd.listing_id)?
            .ok_or(DomainError::NotFound)?;

        let mut draft = BookingDraft::for_listing(&listing)
            .with_dates(cmd.check_in, cmd.check_out)
            .with_guests(cmd.guest_count);
        if let Some(policy) = cmd.refund_policy_id {
            draft = draft.with_policy(policy);
        }

        let quote = draft.quote()?;
        self.bookings.create(&draft, cmd.guest_id, &quote)
    }

    pub fn get_booking(&self, id: Uuid) -> Result<BookingView, DomainError> {
        self.bookings.find_by_id(id)?.ok_or(DomainError::NotFound)
    }
}
