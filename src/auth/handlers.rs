use axum::{
    extract::State,
    response::Response,
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginForm, RegisterForm},
        extractors::{RequestContext, LOGIN_PATH},
        services,
        session::Flash,
    },
    error::AppError,
    state::AppState,
    views,
};

const HOME_PATH: &str = "/";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", get(register_form).post(register))
        .route("/auth/login", get(login_form).post(login))
        .route("/auth/logout", get(logout))
}

pub async fn register_form(ctx: RequestContext, jar: CookieJar) -> Result<Response, AppError> {
    ctx.render(jar, "Register", views::register_form(&RegisterForm::default()), None)
}

#[instrument(skip(state, ctx, jar, form))]
pub async fn register(
    State(state): State<AppState>,
    mut ctx: RequestContext,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    match services::register(&state.db, &form).await {
        Ok(_) => {
            ctx.session.flash(Flash::info("Sign up successful, please log in"));
            ctx.redirect(jar, LOGIN_PATH)
        }
        Err(e) if e.is_form_error() => {
            let notice = Flash::error(e.to_string());
            ctx.render(jar, "Register", views::register_form(&form), Some(notice))
        }
        Err(e) => Err(e),
    }
}

pub async fn login_form(ctx: RequestContext, jar: CookieJar) -> Result<Response, AppError> {
    ctx.render(jar, "Log In", views::login_form(&LoginForm::default()), None)
}

#[instrument(skip(state, ctx, jar, form))]
pub async fn login(
    State(state): State<AppState>,
    mut ctx: RequestContext,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match services::login(&state.db, &form).await {
        Ok(user) => {
            // fresh session on every login
            ctx.session.clear();
            ctx.session.user_id = Some(user.user_id);
            ctx.session.flash(Flash::info("Login successful"));
            ctx.redirect(jar, HOME_PATH)
        }
        Err(e) if e.is_form_error() => {
            let notice = Flash::error(e.to_string());
            let form = LoginForm {
                password: None,
                ..form
            };
            ctx.render(jar, "Log In", views::login_form(&form), Some(notice))
        }
        Err(e) => Err(e),
    }
}

#[instrument(skip(ctx, jar))]
pub async fn logout(mut ctx: RequestContext, jar: CookieJar) -> Result<Response, AppError> {
    if let Some(user_id) = ctx.session.user_id {
        tracing::info!(user_id, "user logged out");
    }
    ctx.session.clear();
    ctx.redirect(jar, HOME_PATH)
}
