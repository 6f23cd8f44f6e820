use sqlx::FromRow;
use time::PrimitiveDateTime;

/// Row of the `movie` table.
#[derive(Debug, Clone, FromRow)]
pub struct Movie {
    pub movie_id: i64,
    pub movie_title: String,
    pub plot: String,
    pub created: PrimitiveDateTime, // UTC
    pub added_by: i64,
}

/// A movie joined with the username of whoever added it.
#[derive(Debug, Clone, FromRow)]
pub struct MovieListing {
    pub movie_id: i64,
    pub movie_title: String,
    pub plot: String,
    pub created: PrimitiveDateTime,
    pub added_by: i64,
    pub username: String,
}
