use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::listing::{ListingPage, ListingView, NewListing, RefundPolicyView};
use crate::domain::ports::{ListingRepository, RefundPolicyRepository};
use crate::schema::{listings, refund_policies};

use super::models::{ListingRow, NewListingRow, RefundPolicyRow};

pub struct DieselListingRepository {
    pool: DbPool,
}

impl DieselListingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ListingRepository for DieselListingRepository {
    fn create(&self, listing: &NewListing) -> Result<ListingView, DomainError> {
        let mut conn = self.pool.get()?;

        let row = NewListingRow {
            id: Uuid::new_v4(),
            host_id: listing.host_id,
            title: listing.title.clone(),
            location: listing.location.clone(),
            nightly_rate: listing.nightly_rate,
            max_guests: listing.max_guests,
        };
        let inserted: ListingRow = diesel::insert_into(listings::table)
            .values(&row)
            .returning(ListingRow::as_returning())
            .get_result(&mut conn)?;

        Ok(inserted.into())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<ListingView>, DomainError> {
        let mut conn = self.pool.get()?;

        let listing = listings::table
            .filter(listings::id.eq(id))
            .select(ListingRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(listing.map(Into::into))
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListingPage, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = (page - 1) * limit;
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = listings::table.count().get_result(conn)?;

            let rows = listings::table
                .select(ListingRow::as_select())
                .order(listings::created_at.desc())
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            Ok(ListingPage {
                items: rows.into_iter().map(Into::into).collect(),
                total,
            })
        })
    }
}

impl RefundPolicyRepository for DieselListingRepository {
    fn list_refund_policies(&self) -> Result<Vec<RefundPolicyView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = refund_policies::table
            .select(RefundPolicyRow::as_select())
            .order(refund_policies::cancellation_deadline_hours.asc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::infrastructure::test_support::setup_db;

    fn make_listing(repo: &DieselListingRepository, title: &str) -> ListingView {
        repo.create(&NewListing {
            host_id: Uuid::new_v4(),
            title: title.to_string(),
            location: "Lagos".to_string(),
            nightly_rate: 20_000,
            max_guests: 4,
        })
        .expect("create failed")
    }

    #[tokio::test]
    async fn create_and_find_by_id_roundtrip() {
        let (_container, pool) = setup_db().await;
        let repo = DieselListingRepository::new(pool);

        let created = make_listing(&repo, "Yaba studio");
        let found = repo
            .find_by_id(created.id)
            .expect("find failed")
            .expect("listing should exist");

        assert_eq!(found.title, "Yaba studio");
        assert_eq!(found.nightly_rate, 20_000);
        assert_eq!(found.max_guests, 4);
    }

    #[tokio::test]
    async fn find_by_id_returns_none_for_unknown_id() {
        let (_container, pool) = setup_db().await;
        let repo = DieselListingRepository::new(pool);

        let result = repo
            .find_by_id(Uuid::new_v4())
            .expect("find should not error");

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn list_paginates_correctly() {
        let (_container, pool) = setup_db().await;
        let repo = DieselListingRepository::new(pool);

        for i in 0..5 {
            make_listing(&repo, &format!("Listing {i}"));
        }

        let page1 = repo.list(1, 3).expect("list page 1 failed");
        assert_eq!(page1.total, 5);
        assert_eq!(page1.items.len(), 3);

        let page2 = repo.list(2, 3).expect("list page 2 failed");
        assert_eq!(page2.total, 5);
        assert_eq!(page2.items.len(), 2);
    }

    #[tokio::test]
    async fn refund_policies_are_seeded() {
        let (_container, pool) = setup_db().await;
        let repo = DieselListingRepository::new(pool);

        let policies = repo.list_refund_policies().expect("list failed");

        let names: Vec<&str> = policies.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Flexible", "Moderate", "Strict"]);
    }
}
