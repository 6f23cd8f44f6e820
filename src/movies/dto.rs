use serde::Deserialize;

/// Add/update form. Both fields are optional so that a missing one is
/// reported as a validation notice.
#[derive(Debug, Default, Deserialize)]
pub struct MovieForm {
    pub movie_title: Option<String>,
    pub plot: Option<String>,
}
