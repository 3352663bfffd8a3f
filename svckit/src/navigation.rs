// svckit/src/navigation.rs
//
// Current route shared between the HTTP wrapper (forced logout) and views
//

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
    ListingDetail(i64),
    Dashboard { tab: Option<String> },
    Profile,
    Contact,
}

impl Route {
    pub fn is_login(&self) -> bool {
        matches!(self, Route::Login)
    }
}

#[derive(Clone)]
pub struct Navigator {
    current: Arc<RwLock<Route>>,
    notify: Arc<watch::Sender<Route>>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        let (notify, _) = watch::channel(initial.clone());
        Self {
            current: Arc::new(RwLock::new(initial)),
            notify: Arc::new(notify),
        }
    }

    pub fn current(&self) -> Route {
        self.current.read().clone()
    }

    pub fn navigate(&self, route: Route) {
        *self.current.write() = route.clone();
        self.notify.send_replace(route);
    }

    /// Send the user to the login screen unless already there.
    /// Returns whether a navigation happened.
    pub fn redirect_to_login(&self) -> bool {
        let mut current = self.current.write();
        if current.is_login() {
            return false;
        }
        info!("Redirecting to login from {:?}", *current);
        *current = Route::Login;
        drop(current);
        self.notify.send_replace(Route::Login);
        true
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.notify.subscribe()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_skipped_when_on_login() {
        let nav = Navigator::new(Route::Login);
        assert!(!nav.redirect_to_login());

        nav.navigate(Route::ListingDetail(4));
        assert!(nav.redirect_to_login());
        assert_eq!(nav.current(), Route::Login);
    }

    #[tokio::test]
    async fn test_subscribers_see_navigation() {
        let nav = Navigator::new(Route::Home);
        let mut rx = nav.subscribe();
        nav.navigate(Route::Profile);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Route::Profile);
    }
}
