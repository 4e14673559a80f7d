//! User-facing surface contracts.
//!
//! The session store surfaces outcomes through two narrow, fire-and-forget
//! interfaces: a [`Notifier`] for transient messages and a [`Navigator`]
//! for screen changes. Neither returns a value the store consumes; both
//! are invoked only after the store has settled its own state.

/// Screens the session store can move the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Landing screen after a successful sign-in or registration.
    Home,
    /// Sign-in screen, the destination after logout.
    Login,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Transient message display (toast, banner, console).
pub trait Notifier: Send + Sync {
    fn notify_success(&self, message: &str);
    fn notify_error(&self, message: &str);
}

/// Screen navigation.
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, route: Route);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_paths() {
        assert_eq!(Route::Home.path(), "/");
        assert_eq!(Route::Login.path(), "/login");
        assert_eq!(Route::Login.to_string(), "/login");
    }
}
