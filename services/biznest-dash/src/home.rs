// services/biznest-dash/src/home.rs
//
// Public browse view: approved listings of the current page, narrowed by a
// category multi-select and a text query
//

use std::collections::BTreeSet;
use tracing::{debug, info};

use svckit::images::ImageCache;
use svckit::navigation::Route;
use svckit::types::Listing;
use svckit::BizNest;

pub const ALL_CATEGORIES: &str = "All";

fn all_selected() -> BTreeSet<String> {
    BTreeSet::from([ALL_CATEGORIES.to_string()])
}

/// Browse predicate: approved, in a selected category (or "All"), and the
/// query found in name or description ignoring case
pub fn filter_listings(listings: &[Listing], selected: &BTreeSet<String>, query: &str) -> Vec<Listing> {
    let query = query.trim().to_lowercase();
    let any_category = selected.is_empty() || selected.contains(ALL_CATEGORIES);

    listings
        .iter()
        .filter(|l| l.status.is_public())
        .filter(|l| any_category || l.category_name().map_or(false, |c| selected.contains(c)))
        .filter(|l| {
            query.is_empty()
                || l.name.to_lowercase().contains(&query)
                || l.description.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}

/// Picking "All" resets the selection; picking a category toggles it.
/// An emptied selection falls back to "All".
pub fn toggle_selection(selected: &mut BTreeSet<String>, name: &str) {
    if name == ALL_CATEGORIES {
        *selected = all_selected();
        return;
    }
    selected.remove(ALL_CATEGORIES);
    if !selected.remove(name) {
        selected.insert(name.to_string());
    }
    if selected.is_empty() {
        *selected = all_selected();
    }
}

pub struct HomeView {
    app: BizNest,
    selected: BTreeSet<String>,
    query: String,
    images: ImageCache,
}

impl HomeView {
    /// Consumes a pending category handoff from storage
    pub fn mount(app: BizNest) -> Self {
        let selected = match app.session.take_selected_category() {
            Some(category) => {
                info!("Home opened with category {}", category);
                BTreeSet::from([category])
            }
            None => all_selected(),
        };
        let images = app.image_cache();
        Self {
            app,
            selected,
            query: String::new(),
            images,
        }
    }

    pub fn selected_categories(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn toggle_category(&mut self, name: &str) {
        toggle_selection(&mut self.selected, name);
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub async fn visible_listings(&self) -> Vec<Listing> {
        let state = self.app.listings.snapshot().await;
        filter_listings(&state.listings, &self.selected, &self.query)
    }

    /// Category names for the filter bar, "All" first
    pub async fn category_options(&self) -> Vec<String> {
        let state = self.app.listings.snapshot().await;
        std::iter::once(ALL_CATEGORIES.to_string())
            .chain(state.categories.into_iter().map(|c| c.name))
            .collect()
    }

    /// Rebuild object URLs if the listing set changed since the last sync
    pub async fn sync_images(&mut self) -> bool {
        let state = self.app.listings.snapshot().await;
        let rebuilt = self.images.sync(state.listings_version, &state.listings).await;
        if rebuilt {
            debug!("Home images rebuilt: {}", self.images.len());
        }
        rebuilt
    }

    pub fn image_url(&self, listing_id: i64) -> Option<&str> {
        self.images.url_for(listing_id)
    }

    pub fn open_listing(&self, listing_id: i64) {
        self.app.navigator.navigate(Route::ListingDetail(listing_id));
    }

    /// Revokes every object URL this view created
    pub fn unmount(mut self) {
        self.images.clear();
    }
}
