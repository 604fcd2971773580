//! Client-held booking selection prior to payment.
//!
//! The draft is an immutable value: every mutation returns a new draft, so
//! a previously computed quote can never survive a change unnoticed. Drafts
//! are never persisted; `POST /bookings` rebuilds one server-side from the
//! request and freezes its quote onto the booking row.

use chrono::NaiveDate;
use uuid::Uuid;

use super::errors::DomainError;
use super::listing::ListingView;
use super::pricing::{self, PriceQuote};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub listing_id: Uuid,
    pub nightly_rate: i64,
    pub max_guests: i32,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guest_count: i32,
    pub refund_policy_id: Option<Uuid>,
}

impl BookingDraft {
    pub fn for_listing(listing: &ListingView) -> Self {
        Self {
            listing_id: listing.id,
            nightly_rate: listing.nightly_rate,
            max_guests: listing.max_guests,
            check_in: None,
            check_out: None,
            guest_count: 1,
            refund_policy_id: None,
        }
    }

    pub fn with_dates(self, check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Self {
            check_in: Some(check_in),
            check_out: Some(check_out),
            ..self
        }
    }

    pub fn with_guests(self, guest_count: i32) -> Self {
        Self {
            guest_count,
            ..self
        }
    }

    pub fn with_policy(self, refund_policy_id: Uuid) -> Self {
        Self {
            refund_policy_id: Some(refund_policy_id),
            ..self
        }
    }

    /// Recompute the quote from the current draft state. A draft without a
    /// complete date range cannot be priced.
    pub fn quote(&self) -> Result<PriceQuote, DomainError> {
        let (check_in, check_out) = match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => (check_in, check_out),
            _ => return Err(DomainError::InvalidRange),
        };
        pricing::quote(
            self.nightly_rate,
            check_in,
            check_out,
            self.guest_count,
            self.max_guests,
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn listing() -> ListingView {
        ListingView {
            id: Uuid::new_v4(),
            host_id: Uuid::new_v4(),
            title: "Lekki waterfront flat".to_string(),
            location: "Lagos".to_string(),
            nightly_rate: 18_500,
            max_guests: 8,
            created_at: Utc::now(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid date")
    }

    #[test]
    fn mutations_produce_new_drafts() {
        let base = BookingDraft::for_listing(&listing());
        let dated = base
            .clone()
            .with_dates(date("2024-06-01"), date("2024-06-04"));

        assert_eq!(base.check_in, None);
        assert_eq!(dated.check_in, Some(date("2024-06-01")));
        assert_eq!(dated.guest_count, 1);

        let with_guests = dated.clone().with_guests(2);
        assert_eq!(dated.guest_count, 1);
        assert_eq!(with_guests.guest_count, 2);
    }

    #[test]
    fn quote_delegates_to_the_calculator() {
        let draft = BookingDraft::for_listing(&listing())
            .with_dates(date("2024-06-01"), date("2024-06-04"))
            .with_guests(2);

        let q = draft.quote().expect("quote failed");
        assert_eq!(q.nights, 3);
        assert_eq!(q.total, 63_825);
    }

    #[test]
    fn draft_without_dates_cannot_be_quoted() {
        let draft = BookingDraft::for_listing(&listing()).with_guests(2);
        assert!(matches!(draft.quote(), Err(DomainError::InvalidRange)));
    }

    #[test]
    fn policy_selection_is_carried_through() {
        let policy = Uuid::new_v4();
        let draft = BookingDraft::for_listing(&listing())
            .with_dates(date("2024-06-01"), date("2024-06-04"))
            .with_policy(policy);
        assert_eq!(draft.refund_policy_id, Some(policy));
    }
}
