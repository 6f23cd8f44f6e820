use axum::{
    extract::{rejection::PathRejection, Path, State},
    response::Response,
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, instrument};

use super::{dto::MovieForm, services};
use crate::{
    auth::{extractors::Authenticated, session::Flash},
    error::AppError,
    state::AppState,
    views,
};

const INDEX_PATH: &str = "/";

/// Ids that are not integers name no route, so they read as a missing page.
fn movie_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    path.map(|Path(id)| id).map_err(|rejection| {
        debug!(error = %rejection, "unparseable movie id");
        AppError::NotFound("The page you were looking for does not exist.".into())
    })
}

pub fn movie_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/add", get(add_form).post(add))
        .route("/:movie_id/update", get(update_form).post(update))
        .route("/:movie_id/delete", post(delete))
}

#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    Authenticated { user, ctx }: Authenticated,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let movies = services::list(&state.db).await?;
    ctx.render(jar, "Movies", views::movie_list(&movies, &user), None)
}

pub async fn add_form(
    Authenticated { ctx, .. }: Authenticated,
    jar: CookieJar,
) -> Result<Response, AppError> {
    ctx.render(jar, "Add Movie", views::add_movie_form(&MovieForm::default()), None)
}

#[instrument(skip(state, user, ctx, jar, form), fields(user_id = user.user_id))]
pub async fn add(
    State(state): State<AppState>,
    Authenticated { user, ctx }: Authenticated,
    jar: CookieJar,
    Form(form): Form<MovieForm>,
) -> Result<Response, AppError> {
    match services::create(&state.db, &user, &form).await {
        Ok(_) => ctx.redirect(jar, INDEX_PATH),
        Err(e) if e.is_form_error() => {
            let notice = Flash::error(e.to_string());
            ctx.render(jar, "Add Movie", views::add_movie_form(&form), Some(notice))
        }
        Err(e) => Err(e),
    }
}

pub async fn update_form(
    State(state): State<AppState>,
    Authenticated { ctx, .. }: Authenticated,
    jar: CookieJar,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Response, AppError> {
    let movie_id = movie_id(path)?;
    let movie = services::get(&state.db, movie_id).await?;
    let form = MovieForm {
        movie_title: Some(movie.movie_title),
        plot: Some(movie.plot),
    };
    ctx.render(jar, "Edit Movie", views::update_movie_form(movie_id, &form), None)
}

#[instrument(skip(state, user, ctx, jar, path, form), fields(user_id = user.user_id))]
pub async fn update(
    State(state): State<AppState>,
    Authenticated { user, ctx }: Authenticated,
    jar: CookieJar,
    path: Result<Path<i64>, PathRejection>,
    Form(form): Form<MovieForm>,
) -> Result<Response, AppError> {
    let movie_id = movie_id(path)?;
    match services::update(&state.db, &user, movie_id, &form).await {
        Ok(()) => ctx.redirect(jar, INDEX_PATH),
        Err(e) if e.is_form_error() => {
            let notice = Flash::error(e.to_string());
            ctx.render(jar, "Edit Movie", views::update_movie_form(movie_id, &form), Some(notice))
        }
        Err(e) => Err(e),
    }
}

#[instrument(skip(state, user, ctx, jar, path), fields(user_id = user.user_id))]
pub async fn delete(
    State(state): State<AppState>,
    Authenticated { user, ctx }: Authenticated,
    jar: CookieJar,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Response, AppError> {
    let movie_id = movie_id(path)?;
    services::delete(&state.db, &user, movie_id).await?;
    ctx.redirect(jar, INDEX_PATH)
}
