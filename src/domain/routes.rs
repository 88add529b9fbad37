//! Navigable views of the console and their protection level.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Categories,
    Blogs,
    BlogCreate,
    BlogEdit(String),
    Comments,
}

impl Route {
    /// Resolve a path; anything unrecognised lands on the dashboard.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["login"] => Self::Login,
            ["categories"] => Self::Categories,
            ["blogs"] => Self::Blogs,
            ["blogs", "create"] => Self::BlogCreate,
            ["blogs", id, "edit"] => Self::BlogEdit((*id).to_string()),
            ["comments"] => Self::Comments,
            _ => Self::Dashboard,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".into(),
            Self::Dashboard => "/".into(),
            Self::Categories => "/categories".into(),
            Self::Blogs => "/blogs".into(),
            Self::BlogCreate => "/blogs/create".into(),
            Self::BlogEdit(id) => format!("/blogs/{id}/edit"),
            Self::Comments => "/comments".into(),
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/"), Route::Dashboard);
        assert_eq!(Route::parse("/blogs/create"), Route::BlogCreate);
        assert_eq!(
            Route::parse("/blogs/65ab/edit"),
            Route::BlogEdit("65ab".into())
        );
        assert_eq!(Route::parse("/comments?status=pending"), Route::Comments);
    }

    #[test]
    fn unknown_paths_fall_back_to_dashboard() {
        assert_eq!(Route::parse("/nope/deeper"), Route::Dashboard);
        assert_eq!(Route::parse(""), Route::Dashboard);
    }

    #[test]
    fn only_login_is_public() {
        assert!(!Route::Login.is_protected());
        assert!(Route::Comments.is_protected());
        assert!(Route::BlogEdit("x".into()).is_protected());
    }

    #[test]
    fn path_round_trips_through_parse() {
        let route = Route::BlogEdit("abc".into());
        assert_eq!(Route::parse(&route.path()), route);
    }
}
