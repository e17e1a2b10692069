//! View navigation port.

/// Port for forcing the active view somewhere else.
pub trait Navigator: Send + Sync {
    /// Point the active view at the login screen, optionally carrying an
    /// error indicator in the URL.
    fn to_login(&self, error: Option<&str>);

    /// Point the active view at the landing/search screen.
    fn to_search(&self);
}
