use sqlx::SqlitePool;
use tracing::{info, warn};

use super::{
    dto::MovieForm,
    repo,
    repo_types::{Movie, MovieListing},
};
use crate::{
    auth::repo_types::User,
    error::{AppError, ValidationError},
    forms::present,
};

/// Movie input that passed validation.
#[derive(Debug, PartialEq, Eq)]
pub struct MovieDraft<'a> {
    pub movie_title: &'a str,
    pub plot: &'a str,
}

/// Title is checked before plot.
pub fn validate_movie(form: &MovieForm) -> Result<MovieDraft<'_>, ValidationError> {
    let movie_title = present(&form.movie_title).ok_or(ValidationError("Movie title is required"))?;
    let plot = present(&form.plot).ok_or(ValidationError("Movie plot is required"))?;
    Ok(MovieDraft { movie_title, plot })
}

/// Newest first.
pub async fn list(db: &SqlitePool) -> Result<Vec<MovieListing>, AppError> {
    Ok(repo::list_all(db).await?)
}

pub async fn get(db: &SqlitePool, movie_id: i64) -> Result<MovieListing, AppError> {
    repo::find_by_id(db, movie_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Movie {movie_id} does not exist.")))
}

pub async fn create(db: &SqlitePool, user: &User, form: &MovieForm) -> Result<Movie, AppError> {
    let draft = validate_movie(form)?;
    let movie = repo::insert(db, draft.movie_title, draft.plot, user.user_id).await?;
    info!(movie_id = movie.movie_id, user_id = user.user_id, "movie added");
    Ok(movie)
}

/// Any authenticated user may edit any movie.
pub async fn update(
    db: &SqlitePool,
    user: &User,
    movie_id: i64,
    form: &MovieForm,
) -> Result<(), AppError> {
    get(db, movie_id).await?;
    let draft = validate_movie(form)?;
    repo::update(db, movie_id, draft.movie_title, draft.plot).await?;
    info!(movie_id, user_id = user.user_id, "movie updated");
    Ok(())
}

pub async fn delete(db: &SqlitePool, user: &User, movie_id: i64) -> Result<(), AppError> {
    get(db, movie_id).await?;
    if !user.is_admin {
        warn!(movie_id, user_id = user.user_id, "delete refused for non-admin");
        return Err(AppError::Forbidden);
    }
    repo::delete(db, movie_id).await?;
    info!(movie_id, user_id = user.user_id, "movie deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seeded_db, TestDb};

    fn form(title: Option<&str>, plot: Option<&str>) -> MovieForm {
        MovieForm {
            movie_title: title.map(Into::into),
            plot: plot.map(Into::into),
        }
    }

    async fn user(t: &TestDb, username: &str) -> User {
        User::find_by_username(&t.db, username).await.unwrap().unwrap()
    }

    async fn movie_count(t: &TestDb) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM movie")
            .fetch_one(&t.db)
            .await
            .unwrap()
    }

    #[test]
    fn title_is_required_first() {
        assert_eq!(
            validate_movie(&form(None, None)),
            Err(ValidationError("Movie title is required"))
        );
        assert_eq!(
            validate_movie(&form(Some("  "), Some("A fake plot"))),
            Err(ValidationError("Movie title is required"))
        );
    }

    #[test]
    fn plot_is_required() {
        assert_eq!(
            validate_movie(&form(Some("A Test Title"), None)),
            Err(ValidationError("Movie plot is required"))
        );
    }

    #[test]
    fn valid_movie_passes() {
        assert_eq!(
            validate_movie(&form(Some("A Test Title"), Some("A fake plot"))),
            Ok(MovieDraft {
                movie_title: "A Test Title",
                plot: "A fake plot",
            })
        );
    }

    #[tokio::test]
    async fn create_is_owned_by_the_actor() {
        let t = seeded_db().await;
        let other = user(&t, "other").await;

        let movie = create(&t.db, &other, &form(Some("Heat"), Some("Cops and robbers")))
            .await
            .unwrap();
        assert_eq!(movie.added_by, other.user_id);
        assert_eq!(movie_count(&t).await, 2);
    }

    #[tokio::test]
    async fn invalid_create_leaves_store_unchanged() {
        let t = seeded_db().await;
        let test = user(&t, "test").await;

        let err = create(&t.db, &test, &form(Some("Heat"), None)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(movie_count(&t).await, 1);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let t = seeded_db().await;
        let test = user(&t, "test").await;
        create(&t.db, &test, &form(Some("Second"), Some("p"))).await.unwrap();
        create(&t.db, &test, &form(Some("Third"), Some("p"))).await.unwrap();

        let titles: Vec<String> = list(&t.db)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.movie_title)
            .collect();
        assert_eq!(titles, vec!["Third", "Second", "test title"]);
    }

    #[tokio::test]
    async fn update_touches_only_title_and_plot() {
        let t = seeded_db().await;
        let other = user(&t, "other").await;
        let before = get(&t.db, 1).await.unwrap();

        update(&t.db, &other, 1, &form(Some("New title"), Some("New plot")))
            .await
            .unwrap();

        let after = get(&t.db, 1).await.unwrap();
        assert_eq!(after.movie_title, "New title");
        assert_eq!(after.plot, "New plot");
        assert_eq!(after.movie_id, before.movie_id);
        assert_eq!(after.created, before.created);
        assert_eq!(after.added_by, before.added_by);
    }

    #[tokio::test]
    async fn update_missing_movie_is_not_found() {
        let t = seeded_db().await;
        let test = user(&t, "test").await;
        let err = update(&t.db, &test, 99, &form(Some("x"), Some("y")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Movie 99 does not exist."));
    }

    #[tokio::test]
    async fn invalid_update_leaves_movie_unchanged() {
        let t = seeded_db().await;
        let test = user(&t, "test").await;

        let err = update(&t.db, &test, 1, &form(None, Some("p"))).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError("Movie title is required"))));

        let movie = get(&t.db, 1).await.unwrap();
        assert_eq!(movie.movie_title, "test title");
        assert_eq!(movie.plot, "test plot");
    }

    #[tokio::test]
    async fn update_checks_existence_before_validation() {
        let t = seeded_db().await;
        let test = user(&t, "test").await;
        let err = update(&t.db, &test, 99, &form(None, None)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_requires_admin() {
        let t = seeded_db().await;
        let test = user(&t, "test").await;
        let other = user(&t, "other").await;

        let err = delete(&t.db, &test, 1).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
        assert_eq!(movie_count(&t).await, 1);

        delete(&t.db, &other, 1).await.unwrap();
        assert_eq!(movie_count(&t).await, 0);
    }

    #[tokio::test]
    async fn delete_checks_existence_before_admin() {
        let t = seeded_db().await;
        let test = user(&t, "test").await;
        let err = delete(&t.db, &test, 42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
