//! Terminal renditions of the page's alert and navigation.

use loginform_core::{Navigator, Notifier};
use reqwest::Url;
use tracing::{debug, warn};

pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn alert(&self, message: &str) {
        println!("{}", message);
    }
}

/// Reports the resolved navigation target
pub struct TerminalNavigator {
    origin: Url,
}

impl TerminalNavigator {
    pub fn new(origin: Url) -> Self {
        Self { origin }
    }

    fn resolve(&self, href: &str) -> String {
        match self.origin.join(href) {
            Ok(url) => url.to_string(),
            Err(e) => {
                warn!(href, error = %e, "Could not resolve navigation target");
                href.to_string()
            }
        }
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, href: &str) {
        let target = self.resolve(href);
        debug!(target = %target, "Navigating");
        println!("Redirecting to {}", target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_dashboard() {
        let nav = TerminalNavigator::new(Url::parse("http://localhost:8080/login.html").unwrap());
        assert_eq!(nav.resolve("/dashboard"), "http://localhost:8080/dashboard");
    }
}
