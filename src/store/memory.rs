use async_trait::async_trait;
use tokio::sync::RwLock;

use super::Store;
use crate::{
    auth::repo_types::{NewUser, User},
    bookings::repo_types::Booking,
    classes::repo_types::{FitnessClass, NewClass},
    error::{AppError, AppResult},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    classes: Vec<FitnessClass>,
    bookings: Vec<Booking>,
}

/// Process-local store. Every mutation happens under one write lock, which is
/// what makes `book_slot` atomic here.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id(len: usize) -> i64 {
    len as i64 + 1
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::DuplicateEmail);
        }
        let row = User {
            id: next_id(tables.users.len()),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn insert_class(&self, class: NewClass) -> AppResult<FitnessClass> {
        let mut tables = self.tables.write().await;
        let row = FitnessClass {
            id: next_id(tables.classes.len()),
            name: class.name,
            date_time: class.date_time,
            instructor: class.instructor,
            available_slots: class.available_slots,
        };
        tables.classes.push(row.clone());
        Ok(row)
    }

    async fn list_classes(&self) -> AppResult<Vec<FitnessClass>> {
        Ok(self.tables.read().await.classes.clone())
    }

    async fn book_slot(&self, user_id: i64, class_id: i64) -> AppResult<Booking> {
        let mut tables = self.tables.write().await;
        let class = tables
            .classes
            .iter_mut()
            .find(|c| c.id == class_id)
            .ok_or(AppError::ClassNotFound)?;
        if class.available_slots <= 0 {
            return Err(AppError::NoSlotsAvailable);
        }
        class.available_slots -= 1;

        let booking = Booking {
            id: next_id(tables.bookings.len()),
            user_id,
            class_id,
        };
        tables.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn list_bookings_for_user(&self, user_id: i64) -> AppResult<Vec<Booking>> {
        let tables = self.tables.read().await;
        Ok(tables
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use time::macros::datetime;

    use super::*;

    fn new_class(slots: i32) -> NewClass {
        NewClass {
            name: "Yoga".into(),
            date_time: datetime!(2026-11-02 07:00 +5:30),
            instructor: "Asha".into(),
            available_slots: slots,
        }
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Alice".into(),
            email: email.into(),
            password_hash: "$argon2id$fake".into(),
        }
    }

    #[tokio::test]
    async fn ids_follow_insertion_order() {
        let store = MemoryStore::new();
        let a = store.insert_class(new_class(1)).await.unwrap();
        let b = store.insert_class(new_class(1)).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        let listed: Vec<i64> = store.list_classes().await.unwrap().iter().map(|c| c.id).collect();
        assert_eq!(listed, vec![1, 2]);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_case_sensitively() {
        let store = MemoryStore::new();
        store.insert_user(new_user("a@x.com")).await.unwrap();
        let err = store.insert_user(new_user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
        // different case is a different email
        store.insert_user(new_user("A@x.com")).await.unwrap();
        assert!(store.find_user_by_email("A@x.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn booking_missing_class_mutates_nothing() {
        let store = MemoryStore::new();
        store.insert_class(new_class(3)).await.unwrap();
        let err = store.book_slot(1, 99).await.unwrap_err();
        assert!(matches!(err, AppError::ClassNotFound));
        assert_eq!(store.list_classes().await.unwrap()[0].available_slots, 3);
        assert!(store.list_bookings_for_user(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn booking_stops_at_zero() {
        let store = MemoryStore::new();
        store.insert_class(new_class(1)).await.unwrap();
        store.book_slot(1, 1).await.unwrap();
        let err = store.book_slot(2, 1).await.unwrap_err();
        assert!(matches!(err, AppError::NoSlotsAvailable));
        assert_eq!(store.list_classes().await.unwrap()[0].available_slots, 0);
    }

    #[tokio::test]
    async fn same_user_can_book_twice() {
        let store = MemoryStore::new();
        store.insert_class(new_class(2)).await.unwrap();
        store.book_slot(7, 1).await.unwrap();
        store.book_slot(7, 1).await.unwrap();
        assert_eq!(store.list_bookings_for_user(7).await.unwrap().len(), 2);
        assert_eq!(store.list_classes().await.unwrap()[0].available_slots, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_bookings_never_overbook() {
        let store = Arc::new(MemoryStore::new());
        store.insert_class(new_class(1)).await.unwrap();

        let handles: Vec<_> = (1..=8)
            .map(|user_id| {
                let store = store.clone();
                tokio::spawn(async move { store.book_slot(user_id, 1).await })
            })
            .collect();

        let mut booked = 0;
        let mut full = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(_) => booked += 1,
                Err(AppError::NoSlotsAvailable) => full += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!((booked, full), (1, 7));
        assert_eq!(store.list_classes().await.unwrap()[0].available_slots, 0);
    }
}
