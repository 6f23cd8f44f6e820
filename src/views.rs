//! Server-rendered HTML pages. Every user-supplied value goes through [`escape`].

use std::fmt::Write as _;

use axum::http::StatusCode;
use time::macros::format_description;

use crate::{
    auth::{
        dto::{LoginForm, RegisterForm},
        repo_types::User,
        session::{Flash, FlashKind},
    },
    movies::{dto::MovieForm, repo_types::MovieListing},
};

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn field(value: &Option<String>) -> String {
    escape(value.as_deref().unwrap_or_default())
}

pub fn layout(title: &str, user: Option<&User>, flashes: &[Flash], body: &str) -> String {
    let nav = match user {
        Some(user) => format!(
            r#"<span>{}</span> <a href="/auth/logout">Log Out</a>"#,
            escape(&user.username)
        ),
        None => r#"<a href="/auth/register">Register</a> <a href="/auth/login">Log In</a>"#.into(),
    };

    let mut notices = String::new();
    for flash in flashes {
        let class = match flash.kind {
            FlashKind::Info => "flash info",
            FlashKind::Error => "flash error",
        };
        let _ = write!(notices, r#"<div class="{class}">{}</div>"#, escape(&flash.message));
    }

    format!(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>{title} - Movie Contribution</title></head>
<body>
<nav><h1><a href="/">Movie Contribution</a></h1>{nav}</nav>
<section class="content">
<header><h1>{title}</h1></header>
{notices}
{body}
</section>
</body>
</html>
"#,
        title = escape(title),
    )
}

pub fn register_form(form: &RegisterForm) -> String {
    format!(
        r#"<form method="post" action="/auth/register">
<label for="username">Username</label>
<input name="username" id="username" value="{}" required>
<label for="email">Email</label>
<input name="email" id="email" type="email" value="{}" required>
<label for="password">Password</label>
<input type="password" name="password" id="password" minlength="8" required>
<input type="submit" value="Register">
</form>"#,
        field(&form.username),
        field(&form.email),
    )
}

pub fn login_form(form: &LoginForm) -> String {
    format!(
        r#"<form method="post" action="/auth/login">
<label for="username">Username</label>
<input name="username" id="username" value="{}" required>
<label for="password">Password</label>
<input type="password" name="password" id="password" required>
<input type="submit" value="Log In">
</form>"#,
        field(&form.username),
    )
}

fn movie_form(action: &str, submit: &str, form: &MovieForm) -> String {
    format!(
        r#"<form method="post" action="{action}">
<label for="movie_title">Title</label>
<input name="movie_title" id="movie_title" value="{}" required>
<label for="plot">Plot</label>
<textarea name="plot" id="plot" required>{}</textarea>
<input type="submit" value="{submit}">
</form>"#,
        field(&form.movie_title),
        field(&form.plot),
    )
}

pub fn add_movie_form(form: &MovieForm) -> String {
    movie_form("/add", "Save", form)
}

pub fn update_movie_form(movie_id: i64, form: &MovieForm) -> String {
    movie_form(&format!("/{movie_id}/update"), "Save", form)
}

pub fn movie_list(movies: &[MovieListing], user: &User) -> String {
    let created_format = format_description!("[year]-[month]-[day] [hour]:[minute]");

    let mut out = String::from(r#"<a class="action" href="/add">New</a>"#);
    if movies.is_empty() {
        out.push_str("<p>No movies yet.</p>");
    }
    for movie in movies {
        let created = movie.created.format(created_format).unwrap_or_default();
        let delete = if user.is_admin {
            format!(
                r#"<form method="post" action="/{}/delete"><input type="submit" value="Delete" onclick="return confirm('Are you sure?');"></form>"#,
                movie.movie_id
            )
        } else {
            String::new()
        };
        let _ = write!(
            out,
            r#"
<article class="movie">
<header><h2>{title}</h2><div class="about">added by {username} on {created}</div>
<a class="action" href="/{id}/update">Edit</a>{delete}</header>
<p class="plot">{plot}</p>
</article>"#,
            title = escape(&movie.movie_title),
            username = escape(&movie.username),
            id = movie.movie_id,
            plot = escape(&movie.plot),
        );
    }
    out
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    format!(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>{code} {reason}</title></head>
<body>
<h1>{code} {reason}</h1>
<p>{}</p>
<p><a href="/">Back to the movie list</a></p>
</body>
</html>
"#,
        escape(message),
        code = status.as_u16(),
    )
}
