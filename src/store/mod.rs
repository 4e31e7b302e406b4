//! Persistence seam. Handlers only ever see `Arc<dyn Store>`.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;

use crate::{
    auth::repo_types::{NewUser, User},
    bookings::repo_types::Booking,
    classes::repo_types::{FitnessClass, NewClass},
    error::AppResult,
};

#[async_trait]
pub trait Store: Send + Sync {
    /// Exact, case-sensitive lookup.
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Fails with `DuplicateEmail` when the email is already taken.
    async fn insert_user(&self, user: NewUser) -> AppResult<User>;

    async fn insert_class(&self, class: NewClass) -> AppResult<FitnessClass>;

    /// All classes, insertion order.
    async fn list_classes(&self) -> AppResult<Vec<FitnessClass>>;

    /// Check capacity, decrement it and record the booking as one atomic unit.
    /// On `ClassNotFound` or `NoSlotsAvailable` nothing is written.
    async fn book_slot(&self, user_id: i64, class_id: i64) -> AppResult<Booking>;

    /// Bookings owned by `user_id`, insertion order.
    async fn list_bookings_for_user(&self, user_id: i64) -> AppResult<Vec<Booking>>;
}
