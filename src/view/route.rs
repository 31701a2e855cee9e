use std::fmt;

use log::debug;

use crate::forum::PostId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Auth,
    Posts,
    PostDetail(PostId),
    Profile,
}

impl Route {
    /// Anything that is not a known route redirects to [`Route::Auth`]
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path
            .trim()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            ["auth"] => Self::Auth,
            ["posts"] => Self::Posts,
            ["posts", id] => match id.parse() {
                Ok(id) => Self::PostDetail(id),
                Err(_) => Self::redirect(path),
            },
            ["profile"] => Self::Profile,
            _ => Self::redirect(path),
        }
    }

    fn redirect(path: &str) -> Self {
        debug!("No route for `{}`, redirecting to {}", path, Self::Auth);
        Self::Auth
    }

    /// Whether the view is shown under the shared header
    pub fn has_layout(&self) -> bool {
        !matches!(self, Self::Auth)
    }

    /// Same view, possibly different parameter
    pub fn same_view(&self, other: &Route) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Auth => write!(f, "/auth"),
            Self::Posts => write!(f, "/posts"),
            Self::PostDetail(id) => write!(f, "/posts/{}", id),
            Self::Profile => write!(f, "/profile"),
        }
    }
}
