//! Repository for the `venues` table.

use sqlx::PgPool;
use touchgrass_core::types::EntityId;
use touchgrass_core::validation::NewVenue;

use crate::models::venue::Venue;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, name, address, city, zip_code, description, capacity, \
     rental_rate_per_hour, is_active, email, phone, website, media_urls, created_at";

/// Provides create/read/update operations for venues.
pub struct VenueRepo;

impl VenueRepo {
    /// Insert a validated venue, returning the full row with generated id and timestamp.
    pub async fn create(pool: &PgPool, input: &NewVenue) -> Result<Venue, sqlx::Error> {
        let query = format!(
            "INSERT INTO venues
                (name, address, city, zip_code, description, capacity,
                 rental_rate_per_hour, is_active, email, phone, website)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Venue>(&query)
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.zip_code)
            .bind(&input.description)
            .bind(input.capacity)
            .bind(input.rental_rate_per_hour)
            .bind(input.is_active)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.website)
            .fetch_one(pool)
            .await
    }

    /// Find a venue by id.
    pub async fn find_by_id(pool: &PgPool, id: EntityId) -> Result<Option<Venue>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM venues WHERE id = $1");
        sqlx::query_as::<_, Venue>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find every venue whose id is in `ids`.
    pub async fn find_by_ids(pool: &PgPool, ids: &[EntityId]) -> Result<Vec<Venue>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM venues WHERE id = ANY($1)");
        sqlx::query_as::<_, Venue>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List all venues ordered by name, case-insensitively.
    ///
    /// Names compare bytewise after lowercasing (`COLLATE "C"`), so the order
    /// does not depend on the database locale. Exact name, then id, break
    /// ties.
    pub async fn list(pool: &PgPool) -> Result<Vec<Venue>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM venues \
             ORDER BY lower(name) COLLATE \"C\" ASC, name COLLATE \"C\" ASC, id ASC"
        );
        sqlx::query_as::<_, Venue>(&query).fetch_all(pool).await
    }

    /// Replace the media URL list of a venue.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_media_urls(
        pool: &PgPool,
        id: EntityId,
        media_urls: &[String],
    ) -> Result<Option<Venue>, sqlx::Error> {
        let query = format!(
            "UPDATE venues SET media_urls = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Venue>(&query)
            .bind(id)
            .bind(media_urls)
            .fetch_optional(pool)
            .await
    }
}
