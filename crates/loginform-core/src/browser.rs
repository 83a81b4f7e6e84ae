//! Host-facing side effects of the login page: blocking notifications and
//! navigation of the current browsing context.

/// Path the page navigates to after a successful login
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Shows a blocking notification to the user.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Moves the current browsing context to a new location.
pub trait Navigator: Send + Sync {
    /// `href` is resolved against the page origin by the implementation.
    fn navigate(&self, href: &str);
}
