//! Path routing for the three screens.

/// Screen selected by a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    List,
    /// `/repo/{name}`
    Detail(String),
    /// Anything else
    NotFound,
}

impl Route {
    /// Resolve `path`. Query strings and fragments carry no state and are ignored.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.strip_suffix('/').unwrap_or(path);

        if trimmed.is_empty() {
            return if path == "/" || path.is_empty() { Route::List } else { Route::NotFound };
        }

        let mut segments = trimmed.strip_prefix('/').unwrap_or(trimmed).split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some("repo"), Some(name), None) if !name.is_empty() => Route::Detail(name.to_string()),
            _ => Route::NotFound,
        }
    }

    /// Path that resolves back to this route. `NotFound` has none.
    pub fn path(&self) -> Option<String> {
        match self {
            Route::List => Some("/".to_string()),
            Route::Detail(name) => Some(format!("/repo/{name}")),
            Route::NotFound => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_paths() {
        assert_eq!(Route::parse("/"), Route::List);
        assert_eq!(Route::parse(""), Route::List);
        assert_eq!(Route::parse("/?page=2"), Route::List);
        assert_eq!(Route::parse("/repo/my-api"), Route::Detail("my-api".to_string()));
        assert_eq!(Route::parse("/repo/my-api/"), Route::Detail("my-api".to_string()));
        assert_eq!(Route::parse("/repo/my-api#readme"), Route::Detail("my-api".to_string()));
    }

    #[test]
    fn everything_else_is_not_found() {
        assert_eq!(Route::parse("/repo"), Route::NotFound);
        assert_eq!(Route::parse("/repo/"), Route::NotFound);
        assert_eq!(Route::parse("/repo/a/b"), Route::NotFound);
        assert_eq!(Route::parse("/settings"), Route::NotFound);
        assert_eq!(Route::parse("//"), Route::NotFound);
    }

    #[test]
    fn path_round_trips() {
        assert_eq!(Route::Detail("x".into()).path().as_deref(), Some("/repo/x"));
        assert_eq!(Route::List.path().as_deref(), Some("/"));
        assert_eq!(Route::NotFound.path(), None);
    }
}
