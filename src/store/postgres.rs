use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use time::UtcOffset;
use tracing::debug;

use super::Store;
use crate::{
    auth::repo_types::{NewUser, User},
    bookings::repo_types::Booking,
    classes::repo_types::{FitnessClass, NewClass},
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    class_offset: UtcOffset,
}

impl PgStore {
    pub async fn connect(database_url: &str, class_offset: UtcOffset) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self::from_pool(pool, class_offset))
    }

    pub fn from_pool(pool: PgPool, class_offset: UtcOffset) -> Self {
        Self { pool, class_offset }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::DuplicateEmail,
            other => AppError::Database(other),
        })
    }

    async fn insert_class(&self, class: NewClass) -> AppResult<FitnessClass> {
        let row = sqlx::query_as::<_, FitnessClass>(
            r#"
            INSERT INTO classes (name, date_time, instructor, available_slots)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, date_time, instructor, available_slots
            "#,
        )
        .bind(&class.name)
        .bind(class.date_time)
        .bind(&class.instructor)
        .bind(class.available_slots)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.in_offset(self.class_offset))
    }

    async fn list_classes(&self) -> AppResult<Vec<FitnessClass>> {
        let rows = sqlx::query_as::<_, FitnessClass>(
            r#"
            SELECT id, name, date_time, instructor, available_slots
            FROM classes
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|c| c.in_offset(self.class_offset))
            .collect())
    }

    async fn book_slot(&self, user_id: i64, class_id: i64) -> AppResult<Booking> {
        // Dropping `tx` on any early return rolls it back.
        let mut tx = self.pool.begin().await?;

        let slots: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT available_slots
            FROM classes
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(class_id)
        .fetch_optional(&mut *tx)
        .await?;

        match slots {
            None => return Err(AppError::ClassNotFound),
            Some(n) if n <= 0 => return Err(AppError::NoSlotsAvailable),
            Some(_) => {}
        }

        sqlx::query("UPDATE classes SET available_slots = available_slots - 1 WHERE id = $1")
            .bind(class_id)
            .execute(&mut *tx)
            .await?;

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (user_id, class_id)
            VALUES ($1, $2)
            RETURNING id, user_id, class_id
            "#,
        )
        .bind(user_id)
        .bind(class_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(booking_id = booking.id, class_id, user_id, "booking committed");
        Ok(booking)
    }

    async fn list_bookings_for_user(&self, user_id: i64) -> AppResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, user_id, class_id
            FROM bookings
            WHERE user_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

/// Run with `DATABASE_URL=postgres://... cargo test -- --ignored`.
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use time::{macros::datetime, OffsetDateTime};

    use super::*;
    use crate::config::default_class_offset;

    async fn store() -> PgStore {
        let url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a test database");
        let store = PgStore::connect(&url, default_class_offset())
            .await
            .expect("connect");
        store.migrate().await.expect("migrate");
        store
    }

    fn unique_email(tag: &str) -> String {
        format!("{tag}-{}@test.local", OffsetDateTime::now_utc().unix_timestamp_nanos())
    }

    async fn user(store: &PgStore, tag: &str) -> User {
        store
            .insert_user(NewUser {
                name: tag.into(),
                email: unique_email(tag),
                password_hash: "$argon2id$fake".into(),
            })
            .await
            .expect("insert user")
    }

    async fn class(store: &PgStore, slots: i32) -> FitnessClass {
        store
            .insert_class(NewClass {
                name: "Yoga".into(),
                date_time: datetime!(2026-11-02 07:00 +5:30),
                instructor: "Asha".into(),
                available_slots: slots,
            })
            .await
            .expect("insert class")
    }

    async fn slots_left(store: &PgStore, class_id: i64) -> i32 {
        sqlx::query_scalar("SELECT available_slots FROM classes WHERE id = $1")
            .bind(class_id)
            .fetch_one(&store.pool)
            .await
            .expect("read slots")
    }

    async fn bookings_for_class(store: &PgStore, class_id: i64) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE class_id = $1")
            .bind(class_id)
            .fetch_one(&store.pool)
            .await
            .expect("count bookings")
    }

    #[tokio::test]
    #[ignore = "needs DATABASE_URL"]
    async fn duplicate_insert_maps_unique_violation() {
        let store = store().await;
        let first = user(&store, "dup").await;
        let err = store
            .insert_user(NewUser {
                name: "again".into(),
                email: first.email.clone(),
                password_hash: "$argon2id$fake".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
    }

    #[tokio::test]
    #[ignore = "needs DATABASE_URL"]
    async fn class_time_round_trips_in_zone() {
        let store = store().await;
        let created = class(&store, 1).await;
        assert_eq!(created.date_time.offset(), default_class_offset());
        let listed = store.list_classes().await.unwrap();
        let found = listed.iter().find(|c| c.id == created.id).unwrap();
        assert_eq!(found.date_time, datetime!(2026-11-02 07:00 +5:30));
        assert_eq!(found.date_time.offset(), default_class_offset());
    }

    #[tokio::test]
    #[ignore = "needs DATABASE_URL"]
    async fn missing_class_rolls_back_without_rows() {
        let store = store().await;
        let u = user(&store, "missing").await;
        let err = store.book_slot(u.id, i64::MAX).await.unwrap_err();
        assert!(matches!(err, AppError::ClassNotFound));
        assert!(store.list_bookings_for_user(u.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "needs DATABASE_URL"]
    async fn full_class_rolls_back_without_rows() {
        let store = store().await;
        let u = user(&store, "full").await;
        let c = class(&store, 0).await;
        let err = store.book_slot(u.id, c.id).await.unwrap_err();
        assert!(matches!(err, AppError::NoSlotsAvailable));
        assert_eq!(slots_left(&store, c.id).await, 0);
        assert_eq!(bookings_for_class(&store, c.id).await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[ignore = "needs DATABASE_URL"]
    async fn concurrent_bookings_for_last_slot() {
        let store = Arc::new(store().await);
        let class_id = class(&store, 1).await.id;
        let a = user(&store, "racer-a").await.id;
        let b = user(&store, "racer-b").await.id;

        let (s1, s2) = (store.clone(), store.clone());
        let (r1, r2) = tokio::join!(
            tokio::spawn(async move { s1.book_slot(a, class_id).await }),
            tokio::spawn(async move { s2.book_slot(b, class_id).await }),
        );
        let results = [r1.unwrap(), r2.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(AppError::NoSlotsAvailable)))
                .count(),
            1
        );
        assert_eq!(slots_left(&store, class_id).await, 0);
        assert_eq!(bookings_for_class(&store, class_id).await, 1);
    }
}
