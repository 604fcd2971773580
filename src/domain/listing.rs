use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ListingView {
    pub id: Uuid,
    pub host_id: Uuid,
    pub title: String,
    pub location: String,
    /// Whole naira per night.
    pub nightly_rate: i64,
    pub max_guests: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewListing {
    pub host_id: Uuid,
    pub title: String,
    pub location: String,
    pub nightly_rate: i64,
    pub max_guests: i32,
}

#[derive(Debug, Clone)]
pub struct ListingPage {
    pub items: Vec<ListingView>,
    pub total: i64,
}

#[derive(Debug, Clone)]
pub struct RefundPolicyView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub cancellation_deadline_hours: i32,
}
