use anyhow::Context;
use sqlx::SqlitePool;

use super::repo_types::{Movie, MovieListing};

// TODO: page through this with LIMIT/OFFSET once the catalogue outgrows a single page.
pub async fn list_all(db: &SqlitePool) -> anyhow::Result<Vec<MovieListing>> {
    let rows = sqlx::query_as::<_, MovieListing>(
        r#"
        SELECT m.movie_id, m.movie_title, m.plot, m.created, m.added_by, u.username
          FROM movie m
          JOIN user u ON m.added_by = u.user_id
         ORDER BY m.created DESC, m.movie_id DESC
        "#,
    )
    .fetch_all(db)
    .await
    .context("list movies")?;
    Ok(rows)
}

pub async fn find_by_id(db: &SqlitePool, movie_id: i64) -> anyhow::Result<Option<MovieListing>> {
    let row = sqlx::query_as::<_, MovieListing>(
        r#"
        SELECT m.movie_id, m.movie_title, m.plot, m.created, m.added_by, u.username
          FROM movie m
          JOIN user u ON m.added_by = u.user_id
         WHERE m.movie_id = ?
        "#,
    )
    .bind(movie_id)
    .fetch_optional(db)
    .await
    .context("find movie by id")?;
    Ok(row)
}

pub async fn insert(
    db: &SqlitePool,
    movie_title: &str,
    plot: &str,
    added_by: i64,
) -> anyhow::Result<Movie> {
    let movie = sqlx::query_as::<_, Movie>(
        r#"
        INSERT INTO movie (movie_title, plot, added_by)
        VALUES (?, ?, ?)
        RETURNING movie_id, movie_title, plot, created, added_by
        "#,
    )
    .bind(movie_title)
    .bind(plot)
    .bind(added_by)
    .fetch_one(db)
    .await
    .context("insert movie")?;
    Ok(movie)
}

/// Only title and plot change; owner and creation time stay put.
pub async fn update(
    db: &SqlitePool,
    movie_id: i64,
    movie_title: &str,
    plot: &str,
) -> anyhow::Result<u64> {
    let res = sqlx::query("UPDATE movie SET movie_title = ?, plot = ? WHERE movie_id = ?")
        .bind(movie_title)
        .bind(plot)
        .bind(movie_id)
        .execute(db)
        .await
        .context("update movie")?;
    Ok(res.rows_affected())
}

pub async fn delete(db: &SqlitePool, movie_id: i64) -> anyhow::Result<u64> {
    let res = sqlx::query("DELETE FROM movie WHERE movie_id = ?")
        .bind(movie_id)
        .execute(db)
        .await
        .context("delete movie")?;
    Ok(res.rows_affected())
}
