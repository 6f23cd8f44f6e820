use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::{
    auth::{
        repo_types::User,
        session::{Flash, Session, SessionKeys},
    },
    error::AppError,
    state::AppState,
    views,
};

pub const LOGIN_PATH: &str = "/auth/login";

/// Everything a handler knows about the caller, resolved once per request.
#[derive(Clone)]
pub struct RequestContext {
    pub user: Option<User>,
    pub session: Session,
    keys: SessionKeys,
}

/// Runs before every handler: loads the session cookie and the user it names.
/// A session pointing at a user that no longer exists is treated as anonymous.
pub async fn resolve_current_user(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let keys = SessionKeys::from_ref(&state);
    let session = keys.load(&jar);
    let user = match session.user_id {
        Some(user_id) => {
            let user = User::find_by_id(&state.db, user_id).await?;
            if user.is_none() {
                debug!(user_id, "session refers to an unknown user");
            }
            user
        }
        None => None,
    };

    req.extensions_mut()
        .insert(RequestContext { user, session, keys });
    Ok(next.run(req).await)
}

impl RequestContext {
    /// Render `body` inside the layout, consuming pending flashes and adding
    /// `notice` inline. The session cookie is written back with the response.
    pub fn render(
        mut self,
        jar: CookieJar,
        title: &str,
        body: String,
        notice: Option<Flash>,
    ) -> Result<Response, AppError> {
        let mut flashes = self.session.take_flashes();
        flashes.extend(notice);
        let page = views::layout(title, self.user.as_ref(), &flashes, &body);
        let jar = self.keys.store(jar, &self.session)?;
        Ok((jar, Html(page)).into_response())
    }

    /// Redirect, persisting any change made to the session.
    pub fn redirect(self, jar: CookieJar, to: &str) -> Result<Response, AppError> {
        let jar = self.keys.store(jar, &self.session)?;
        Ok((jar, Redirect::to(to)).into_response())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.remove::<RequestContext>().ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "request context missing; resolve_current_user is not layered"
            ))
        })
    }
}

/// Guard for protected routes: anonymous callers are sent to the login page.
pub struct Authenticated {
    pub user: User,
    pub ctx: RequestContext,
}

#[async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = RequestContext::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        match ctx.user.clone() {
            Some(user) => Ok(Authenticated { user, ctx }),
            None => Err(Redirect::to(LOGIN_PATH).into_response()),
        }
    }
}
