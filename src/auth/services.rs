use lazy_static::lazy_static;
use regex::Regex;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{LoginForm, RegisterForm},
        password::{hash_password, verify_password},
        repo_types::User,
    },
    error::{AppError, ValidationError},
    forms::{present, present_raw},
};

/// Accounts registered with this email suffix are administrators.
pub const TRUSTED_DOMAIN: &str = "@imdb.com";

pub const MIN_PASSWORD_LEN: usize = 8;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("valid email regex");
}

/// Registration input that passed validation.
#[derive(Debug, PartialEq, Eq)]
pub struct Registration<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

pub fn validate_username(username: Option<&str>) -> Result<&str, ValidationError> {
    username.ok_or(ValidationError("Username is required"))
}

pub fn validate_email(email: Option<&str>) -> Result<&str, ValidationError> {
    let email = email.ok_or(ValidationError("Email is required"))?;
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError("Invalid email"));
    }
    Ok(email)
}

pub fn validate_password(password: Option<&str>) -> Result<&str, ValidationError> {
    let password = password.ok_or(ValidationError("Password is required"))?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError("Password must be longer than 8 characters"));
    }
    Ok(password)
}

/// Checks run in order; the first failure wins.
pub fn validate_registration(form: &RegisterForm) -> Result<Registration<'_>, ValidationError> {
    Ok(Registration {
        username: validate_username(present_raw(&form.username))?,
        email: validate_email(present(&form.email))?,
        password: validate_password(present_raw(&form.password))?,
    })
}

pub fn is_admin_email(email: &str) -> bool {
    email.ends_with(TRUSTED_DOMAIN)
}

pub async fn register(db: &SqlitePool, form: &RegisterForm) -> Result<User, AppError> {
    let reg = validate_registration(form)?;
    let is_admin = is_admin_email(reg.email);
    let hash = hash_password(reg.password)?;

    match User::create(db, reg.username, reg.email, &hash, is_admin).await {
        Ok(user) => {
            info!(user_id = user.user_id, username = %user.username, is_admin, "user registered");
            Ok(user)
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            warn!(username = %reg.username, "username already registered");
            Err(AppError::DuplicateUser(reg.username.to_string()))
        }
        Err(e) => Err(anyhow::Error::new(e).context("insert user").into()),
    }
}

/// Unknown usernames and wrong passwords fail identically.
pub async fn login(db: &SqlitePool, form: &LoginForm) -> Result<User, AppError> {
    let (Some(username), Some(password)) = (present_raw(&form.username), present_raw(&form.password))
    else {
        return Err(AppError::InvalidCredentials);
    };

    let Some(user) = User::find_by_username(db, username).await? else {
        warn!(%username, "login unknown username");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &user.password)? {
        warn!(user_id = user.user_id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    info!(user_id = user.user_id, "user logged in");
    Ok(user)
}
