use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::listing::{ListingPage, ListingView, NewListing, RefundPolicyView};
use crate::domain::ports::{ListingRepository, RefundPolicyRepository};

pub struct ListingService<L> {
    listings: L,
}

impl<L: ListingRepository> ListingService<L> {
    pub fn new(listings: L) -> Self {
        Self { listings }
    }

    pub fn create_listing(&self, listing: &NewListing) -> Result<ListingView, DomainError> {
        if listing.title.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "title must not be empty".to_string(),
            ));
        }
        if listing.nightly_rate <= 0 {
            return Err(DomainError::InvalidInput(
                "nightly rate must be positive".to_string(),
            ));
        }
        if listing.max_guests < 1 {
            return Err(DomainError::InvalidInput(
                "listing must accommodate at least one guest".to_string(),
            ));
        }
        self.listings.create(listing)
    }

    pub fn get_listing(&self, id: Uuid) -> Result<ListingView, DomainError> {
        self.listings.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    pub fn list_listings(&self, page: i64, limit: i64) -> Result<ListingPage, DomainError> {
        self.listings.list(page, limit)
    }
}

impl<L: RefundPolicyRepository> ListingService<L> {
    pub fn refund_policies(&self) -> Result<Vec<RefundPolicyView>, DomainError> {
        self.listings.list_refund_policies()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;

    #[derive(Default)]
    struct InMemoryListings {
        rows: Mutex<Vec<ListingView>>,
    }

    impl ListingRepository for InMemoryListings {
        fn create(&self, listing: &NewListing) -> Result<ListingView, DomainError> {
            let view = ListingView {
                id: Uuid::new_v4(),
                host_id: listing.host_id,
                title: listing.title.clone(),
                location: listing.location.clone(),
                nightly_rate: listing.nightly_rate,
                max_guests: listing.max_guests,
                created_at: Utc::now(),
            };
            self.rows.lock().unwrap().push(view.clone());
            Ok(view)
        }

        fn find_by_id(&self, id: Uuid) -> Result<Option<ListingView>, DomainError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|l| l.id == id)
                .cloned())
        }

        fn list(&self, page: i64, limit: i64) -> Result<ListingPage, DomainError> {
            let rows = self.rows.lock().unwrap();
            let offset = ((page - 1) * limit) as usize;
            Ok(ListingPage {
                items: rows.iter().skip(offset).take(limit as usize).cloned().collect(),
                total: rows.len() as i64,
            })
        }
    }

    fn new_listing(rate: i64, max_guests: i32) -> NewListing {
        NewListing {
            host_id: Uuid::new_v4(),
            title: "Ikoyi studio".to_string(),
            location: "Lagos".to_string(),
            nightly_rate: rate,
            max_guests,
        }
    }

    #[test]
    fn create_and_fetch_roundtrip() {
        let service = ListingService::new(InMemoryListings::default());
        let created = service
            .create_listing(&new_listing(18_500, 8))
            .expect("create failed");
        let fetched = service.get_listing(created.id).expect("fetch failed");
        assert_eq!(fetched.nightly_rate, 18_500);
        assert_eq!(fetched.max_guests, 8);
    }

    #[test]
    fn non_positive_rate_is_rejected() {
        let service = ListingService::new(InMemoryListings::default());
        let err = service.create_listing(&new_listing(0, 8)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn empty_title_is_rejected() {
        let service = ListingService::new(InMemoryListings::default());
        let mut listing = new_listing(18_500, 8);
        listing.title = "  ".to_string();
        let err = service.create_listing(&listing).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn unknown_listing_is_not_found() {
        let service = ListingService::new(InMemoryListings::default());
        let err = service.get_listing(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
    }
}
