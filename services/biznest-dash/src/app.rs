// services/biznest-dash/src/app.rs
//
// Terminal application state: the mounted screen, the line editor and
// the activity log
//

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use std::path::PathBuf;

use biznest_dash::dashboard::{DateWindow, Modal, PendingDelete};
use biznest_dash::detail::ReviewFormMode;
use biznest_dash::login::LoginMode;
use biznest_dash::{ContactView, Dashboard, DetailView, HomeView, LoginView, ProfileView, View};
use svckit::navigation::Route;
use svckit::stores::listings::ListingMetrics;
use svckit::types::{Category, CategoryStats, Listing, ListingStatus, Review, Role};
use svckit::BizNest;

pub enum Screen {
    Login(LoginView),
    Home(HomeView),
    Detail(DetailView),
    Dashboard(Box<Dashboard>),
    Profile(ProfileView),
    Contact(ContactView),
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Login(_) => "LOGIN",
            Screen::Home(_) => "BROWSE",
            Screen::Detail(_) => "LISTING",
            Screen::Dashboard(_) => "ADMIN",
            Screen::Profile(_) => "PROFILE",
            Screen::Contact(_) => "CONTACT",
        }
    }
}

/// Which form field the line editor writes into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Password,
    Email,
    Confirm,
    Otp,
    HomeQuery,
    ReviewComment,
    GateUsername,
    GatePassword,
    DashSearch,
    ListingName,
    ListingLocation,
    ListingDescription,
    CategoryName,
    CategoryDescription,
    ResponseText,
    DisplayName,
    ProfileEmail,
    Bio,
    CurrentPassword,
    NewPassword,
    ConfirmPassword,
    PicturePath,
    ContactName,
    ContactEmail,
    ContactMessage,
}

impl Field {
    fn secret(&self) -> bool {
        matches!(
            self,
            Field::Password
                | Field::Confirm
                | Field::GatePassword
                | Field::CurrentPassword
                | Field::NewPassword
                | Field::ConfirmPassword
        )
    }
}

pub struct Prompt {
    pub field: Field,
    pub value: String,
}

impl Prompt {
    pub fn display(&self) -> String {
        if self.field.secret() {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: String,
    pub message: String,
}

/// Store data gathered before each frame; drawing itself is synchronous
#[derive(Debug, Clone, Default)]
pub struct RenderData {
    pub listings: Vec<Listing>,
    pub categories: Vec<Category>,
    pub category_options: Vec<String>,
    pub category_stats: CategoryStats,
    pub reviews: Vec<Review>,
    pub total_listings: u64,
    pub metrics: ListingMetrics,
    pub page: u32,
    pub total_pages: u32,
    pub loading: bool,
    pub store_error: Option<String>,
}

pub struct App {
    pub ctx: BizNest,
    pub screen: Screen,
    pub prompt: Option<Prompt>,
    pub selected: usize,
    pub category_cursor: usize,
    pub gate_username: String,
    pub gate_password: String,
    pub activity_log: Vec<LogEntry>,
    pub demo: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(ctx: BizNest, demo: bool) -> Self {
        let screen = Screen::Login(LoginView::new(ctx.clone()));
        Self {
            ctx,
            screen,
            prompt: None,
            selected: 0,
            category_cursor: 0,
            gate_username: String::new(),
            gate_password: String::new(),
            activity_log: Vec::new(),
            demo,
            should_quit: false,
        }
    }

    pub fn add_log(&mut self, level: &str, message: &str) {
        self.activity_log.push(LogEntry {
            timestamp: Local::now(),
            level: level.to_string(),
            message: message.to_string(),
        });

        if self.activity_log.len() > 100 {
            self.activity_log.remove(0);
        }
    }

    pub async fn render_data(&self) -> RenderData {
        let state = self.ctx.listings.snapshot().await;
        let mut data = RenderData {
            categories: state.categories.clone(),
            category_stats: state.category_stats.clone(),
            total_listings: state.total_elements,
            metrics: state.metrics.clone(),
            page: state.page,
            total_pages: state.total_pages,
            loading: state.loading,
            store_error: state.error.clone(),
            ..RenderData::default()
        };

        match &self.screen {
            Screen::Home(home) => {
                data.listings = home.visible_listings().await;
                data.category_options = home.category_options().await;
            }
            Screen::Dashboard(dash) => match dash.view() {
                View::Listings => data.listings = dash.visible_listings().await,
                View::Reviews => data.reviews = dash.filtered_reviews(Local::now().naive_local()).await,
                _ => data.reviews = self.ctx.reviews.snapshot().await.reviews,
            },
            _ => {}
        }
        data
    }

    /// Keep the row cursor inside the list on screen
    pub fn clamp_selection(&mut self, data: &RenderData) {
        let rows = match &self.screen {
            Screen::Home(_) => data.listings.len(),
            Screen::Dashboard(dash) => match dash.view() {
                View::Listings => data.listings.len(),
                View::Categories => data.categories.len(),
                View::Reviews => data.reviews.len(),
                View::Users => dash.users().len(),
                _ => 0,
            },
            Screen::Detail(detail) => detail.reviews.len(),
            _ => 0,
        };
        self.selected = self.selected.min(rows.saturating_sub(1));
        self.category_cursor = self.category_cursor.min(data.category_options.len().saturating_sub(1));
    }

    fn route_of(&self) -> Route {
        match &self.screen {
            Screen::Login(_) => Route::Login,
            Screen::Home(_) => Route::Home,
            Screen::Detail(view) => Route::ListingDetail(view.listing_id()),
            Screen::Dashboard(dash) => Route::Dashboard {
                tab: Some(dash.view().as_str().to_string()),
            },
            Screen::Profile(_) => Route::Profile,
            Screen::Contact(_) => Route::Contact,
        }
    }

    /// Periodic work between frames
    pub async fn tick(&mut self) {
        self.sync_route().await;
        match &mut self.screen {
            Screen::Home(home) => {
                home.sync_images().await;
            }
            Screen::Detail(detail) => {
                if detail.poll_load().await {
                    if let Some(err) = detail.error.clone() {
                        self.add_log("ERROR", &err);
                    }
                }
            }
            _ => {}
        }
    }

    /// Follow navigator changes made by views or the 401 handler
    pub async fn sync_route(&mut self) {
        let route = self.ctx.navigator.current();
        let same = match (&route, self.route_of()) {
            (Route::Dashboard { .. }, Route::Dashboard { .. }) => true,
            (a, b) => *a == b,
        };
        if !same {
            self.mount(route).await;
        }
    }

    async fn mount(&mut self, route: Route) {
        let placeholder = Screen::Login(LoginView::new(self.ctx.clone()));
        let previous = std::mem::replace(&mut self.screen, placeholder);
        match previous {
            Screen::Home(home) => home.unmount(),
            Screen::Detail(mut detail) => detail.unmount(),
            _ => {}
        }
        self.prompt = None;
        self.selected = 0;

        self.screen = match route {
            Route::Login => {
                self.add_log("INFO", "Login required");
                Screen::Login(LoginView::new(self.ctx.clone()))
            }
            Route::Home => {
                self.ctx.listings.fetch_listings(0, self.ctx.config.listings.page_size).await;
                self.ctx.listings.fetch_categories().await;
                let mut home = HomeView::mount(self.ctx.clone());
                home.sync_images().await;
                Screen::Home(home)
            }
            Route::ListingDetail(id) => {
                let mut detail = DetailView::new(self.ctx.clone(), id);
                detail.start_load();
                Screen::Detail(detail)
            }
            Route::Dashboard { .. } => Screen::Dashboard(Box::new(Dashboard::mount(self.ctx.clone()).await)),
            Route::Profile => {
                let mut profile = ProfileView::new(self.ctx.clone());
                profile.load().await;
                Screen::Profile(profile)
            }
            Route::Contact => Screen::Contact(ContactView::new(self.ctx.clone())),
        };
    }

    fn open_prompt(&mut self, field: Field) {
        self.prompt = Some(Prompt {
            field,
            value: self.current_value(field),
        });
    }

    fn current_value(&self, field: Field) -> String {
        match (&self.screen, field) {
            (Screen::Login(v), Field::Username) => v.form.username.clone(),
            (Screen::Login(v), Field::Email) => v.form.email.clone(),
            (Screen::Login(v), Field::Otp) => v.form.otp.clone(),
            (Screen::Home(v), Field::HomeQuery) => v.query().to_string(),
            (Screen::Detail(v), Field::ReviewComment) => v.form.comment.clone(),
            (Screen::Dashboard(_), Field::GateUsername) => self.gate_username.clone(),
            (Screen::Dashboard(d), Field::DashSearch) => d.search_query.clone(),
            (Screen::Dashboard(d), Field::ListingName) => d.listing_form.name.clone(),
            (Screen::Dashboard(d), Field::ListingLocation) => d.listing_form.location.clone(),
            (Screen::Dashboard(d), Field::ListingDescription) => d.listing_form.description.clone(),
            (Screen::Dashboard(d), Field::CategoryName) => d.category_form.name.clone(),
            (Screen::Dashboard(d), Field::CategoryDescription) => d.category_form.description.clone(),
            (Screen::Dashboard(d), Field::ResponseText) => d.response_text.clone(),
            (Screen::Profile(v), Field::DisplayName) => v.form.display_name.clone(),
            (Screen::Profile(v), Field::ProfileEmail) => v.form.email.clone(),
            (Screen::Profile(v), Field::Bio) => v.form.bio.clone(),
            (Screen::Contact(v), Field::ContactName) => v.form.full_name.clone(),
            (Screen::Contact(v), Field::ContactEmail) => v.form.email.clone(),
            (Screen::Contact(v), Field::ContactMessage) => v.form.message.clone(),
            _ => String::new(),
        }
    }

    async fn commit_prompt(&mut self, prompt: Prompt) {
        let value = prompt.value;
        match (&mut self.screen, prompt.field) {
            (Screen::Login(v), Field::Username) => v.form.username = value,
            (Screen::Login(v), Field::Password) => v.form.password = value,
            (Screen::Login(v), Field::Email) => v.form.email = value,
            (Screen::Login(v), Field::Confirm) => v.form.confirm_password = value,
            (Screen::Login(v), Field::Otp) => v.form.otp = value,
            (Screen::Home(v), Field::HomeQuery) => v.set_query(value),
            (Screen::Detail(v), Field::ReviewComment) => v.form.comment = value,
            (Screen::Dashboard(_), Field::GateUsername) => self.gate_username = value,
            (Screen::Dashboard(_), Field::GatePassword) => self.gate_password = value,
            (Screen::Dashboard(d), Field::DashSearch) => d.search_query = value,
            (Screen::Dashboard(d), Field::ListingName) => d.listing_form.name = value,
            (Screen::Dashboard(d), Field::ListingLocation) => d.listing_form.location = value,
            (Screen::Dashboard(d), Field::ListingDescription) => d.listing_form.description = value,
            (Screen::Dashboard(d), Field::CategoryName) => d.category_form.name = value,
            (Screen::Dashboard(d), Field::CategoryDescription) => d.category_form.description = value,
            (Screen::Dashboard(d), Field::ResponseText) => d.response_text = value,
            (Screen::Profile(v), Field::DisplayName) => v.form.display_name = value,
            (Screen::Profile(v), Field::ProfileEmail) => v.form.email = value,
            (Screen::Profile(v), Field::Bio) => v.form.bio = value,
            (Screen::Profile(v), Field::CurrentPassword) => v.password.current = value,
            (Screen::Profile(v), Field::NewPassword) => v.password.new = value,
            (Screen::Profile(v), Field::ConfirmPassword) => v.password.confirm = value,
            (Screen::Contact(v), Field::ContactName) => v.form.full_name = value,
            (Screen::Contact(v), Field::ContactEmail) => v.form.email = value,
            (Screen::Contact(v), Field::ContactMessage) => v.form.message = value,
            (Screen::Profile(v), Field::PicturePath) => {
                if v.upload_picture(&PathBuf::from(value.trim())).await {
                    self.add_log("INFO", "Profile picture uploaded");
                }
            }
            _ => {}
        }
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        if let Some(mut prompt) = self.prompt.take() {
            match key.code {
                KeyCode::Enter => self.commit_prompt(prompt).await,
                KeyCode::Esc => {}
                KeyCode::Backspace => {
                    prompt.value.pop();
                    self.prompt = Some(prompt);
                }
                KeyCode::Char(c) => {
                    prompt.value.push(c);
                    self.prompt = Some(prompt);
                }
                _ => self.prompt = Some(prompt),
            }
            return;
        }

        if let Screen::Dashboard(dash) = &mut self.screen {
            if dash.alert().is_some() {
                dash.dismiss_alert();
                return;
            }
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                return;
            }
            KeyCode::Down => {
                self.selected += 1;
                return;
            }
            KeyCode::F(1) => return self.go(Route::Home).await,
            KeyCode::F(2) => return self.go(Route::Dashboard { tab: None }).await,
            KeyCode::F(3) => return self.go(Route::Profile).await,
            KeyCode::F(4) => {
                if let Err(e) = self.ctx.session.set_theme(self.ctx.session.theme().toggle()) {
                    self.add_log("ERROR", &format!("Theme not saved: {}", e));
                }
                return;
            }
            KeyCode::F(5) => {
                let scheme = self.ctx.session.color_scheme().next();
                match self.ctx.session.set_color_scheme(scheme) {
                    Ok(()) => self.add_log("INFO", &format!("Color scheme: {}", scheme.as_str())),
                    Err(e) => self.add_log("ERROR", &format!("Color scheme not saved: {}", e)),
                }
                return;
            }
            KeyCode::F(6) => {
                // Reachable signed out
                self.ctx.navigator.navigate(Route::Contact);
                self.sync_route().await;
                return;
            }
            KeyCode::F(12) => {
                if let Err(e) = self.ctx.auth.logout() {
                    self.add_log("ERROR", &format!("Logout failed: {}", e));
                }
                return;
            }
            _ => {}
        }

        match self.screen {
            Screen::Login(_) => self.login_key(key.code).await,
            Screen::Home(_) => self.home_key(key.code).await,
            Screen::Detail(_) => self.detail_key(key.code).await,
            Screen::Dashboard(_) => self.dashboard_key(key.code).await,
            Screen::Profile(_) => self.profile_key(key.code).await,
            Screen::Contact(_) => self.contact_key(key.code).await,
        }
    }

    async fn go(&mut self, route: Route) {
        if !self.ctx.session.is_logged_in() {
            return;
        }
        self.ctx.navigator.navigate(route);
        self.sync_route().await;
    }

    async fn login_key(&mut self, code: KeyCode) {
        let Screen::Login(view) = &mut self.screen else {
            return;
        };
        match code {
            KeyCode::Char('u') => self.open_prompt(Field::Username),
            KeyCode::Char('w') => self.open_prompt(Field::Password),
            KeyCode::Char('e') => self.open_prompt(Field::Email),
            KeyCode::Char('c') => self.open_prompt(Field::Confirm),
            KeyCode::Char('o') => self.open_prompt(Field::Otp),
            KeyCode::Char('s') => {
                let next = if view.mode == LoginMode::Signup { LoginMode::Login } else { LoginMode::Signup };
                view.switch_mode(next);
            }
            KeyCode::Char('f') => view.switch_mode(LoginMode::ForgotPassword),
            KeyCode::Enter => {
                if view.submit().await {
                    self.add_log("INFO", "Form submitted");
                    self.sync_route().await;
                } else if let Some(err) = view.error.clone() {
                    self.add_log("WARN", &err);
                }
            }
            _ => {}
        }
    }

    async fn home_key(&mut self, code: KeyCode) {
        let Screen::Home(view) = &mut self.screen else {
            return;
        };
        match code {
            KeyCode::Char('/') => self.open_prompt(Field::HomeQuery),
            KeyCode::Left => self.category_cursor = self.category_cursor.saturating_sub(1),
            KeyCode::Right => self.category_cursor += 1,
            KeyCode::Char(' ') => {
                let options = view.category_options().await;
                if let Some(name) = options.get(self.category_cursor.min(options.len().saturating_sub(1))) {
                    view.toggle_category(name);
                }
                self.selected = 0;
            }
            KeyCode::Enter => {
                let visible = view.visible_listings().await;
                let Some(id) = visible.get(self.selected).map(|l| l.id) else {
                    return;
                };
                view.open_listing(id);
                self.sync_route().await;
            }
            _ => {}
        }
    }

    async fn detail_key(&mut self, code: KeyCode) {
        let Screen::Detail(view) = &mut self.screen else {
            return;
        };
        match code {
            KeyCode::Char(c @ '1'..='5') => view.form.rating = c as u8 - b'0',
            KeyCode::Char('c') => self.open_prompt(Field::ReviewComment),
            KeyCode::Char('z') => view.cancel_edit(),
            KeyCode::Enter => {
                let creating = view.mode() == ReviewFormMode::Create;
                if view.submit_review().await {
                    let message = if creating { "Review submitted" } else { "Review updated" };
                    self.add_log("INFO", message);
                } else if let Some(err) = view.error.clone() {
                    self.add_log("WARN", &err);
                }
            }
            KeyCode::Esc => self.go(Route::Home).await,
            _ => {}
        }
    }

    async fn dashboard_key(&mut self, code: KeyCode) {
        let Screen::Dashboard(dash) = &mut self.screen else {
            return;
        };

        if !dash.is_unlocked() {
            match code {
                KeyCode::Char('u') => self.open_prompt(Field::GateUsername),
                KeyCode::Char('w') => self.open_prompt(Field::GatePassword),
                KeyCode::Enter => {
                    let (user, pass) = (self.gate_username.clone(), self.gate_password.clone());
                    if dash.unlock(&user, &pass).await {
                        self.gate_password.clear();
                        self.add_log("INFO", "Dashboard unlocked");
                    } else {
                        self.add_log("WARN", "Admin check failed");
                    }
                }
                _ => {}
            }
            return;
        }

        match dash.modal().clone() {
            Modal::None => {}
            Modal::Confirm(_) => {
                match code {
                    KeyCode::Char('y') => {
                        if dash.confirm_delete().await {
                            self.add_log("INFO", "Deleted");
                        }
                    }
                    KeyCode::Char('n') | KeyCode::Esc => dash.close_modal(),
                    _ => {}
                }
                return;
            }
            Modal::ListingForm { .. } => {
                match code {
                    KeyCode::Char('n') => self.open_prompt(Field::ListingName),
                    KeyCode::Char('l') => self.open_prompt(Field::ListingLocation),
                    KeyCode::Char('d') => self.open_prompt(Field::ListingDescription),
                    KeyCode::Char('c') => {
                        let categories = self.ctx.listings.snapshot().await.categories;
                        let current = categories
                            .iter()
                            .position(|c| Some(c.id) == dash.listing_form.category_id);
                        let next = current.map_or(0, |i| (i + 1) % categories.len().max(1));
                        dash.listing_form.category_id = categories.get(next).map(|c| c.id);
                    }
                    KeyCode::Char('s') => {
                        let all = ListingStatus::ALL;
                        let i = all.iter().position(|s| *s == dash.listing_form.status).unwrap_or(0);
                        dash.listing_form.status = all[(i + 1) % all.len()];
                    }
                    KeyCode::Enter => {
                        if dash.submit_listing().await {
                            self.add_log("INFO", "Listing saved");
                        }
                    }
                    KeyCode::Esc => dash.close_modal(),
                    _ => {}
                }
                return;
            }
            Modal::CategoryForm { .. } => {
                match code {
                    KeyCode::Char('n') => self.open_prompt(Field::CategoryName),
                    KeyCode::Char('d') => self.open_prompt(Field::CategoryDescription),
                    KeyCode::Enter => {
                        if dash.submit_category().await {
                            self.add_log("INFO", "Category saved");
                        }
                    }
                    KeyCode::Esc => dash.close_modal(),
                    _ => {}
                }
                return;
            }
            Modal::Response { .. } => {
                match code {
                    KeyCode::Char('t') => self.open_prompt(Field::ResponseText),
                    KeyCode::Enter => {
                        if dash.submit_response().await {
                            self.add_log("INFO", "Response posted");
                        }
                    }
                    KeyCode::Esc => dash.close_modal(),
                    _ => {}
                }
                return;
            }
            Modal::Roles { .. } => {
                match code {
                    KeyCode::Char('a') => dash.toggle_role(Role::Admin),
                    KeyCode::Char('r') => dash.toggle_role(Role::User),
                    KeyCode::Enter => {
                        if dash.submit_roles().await {
                            self.add_log("INFO", "Roles updated");
                        }
                    }
                    KeyCode::Esc => dash.close_modal(),
                    _ => {}
                }
                return;
            }
        }

        if code == KeyCode::Tab {
            let i = View::ALL.iter().position(|v| *v == dash.view()).unwrap_or(0);
            dash.set_view(View::ALL[(i + 1) % View::ALL.len()]).await;
            self.selected = 0;
            return;
        }

        let selected = self.selected;
        match (dash.view(), code) {
            (View::Listings, KeyCode::Char('/')) => self.open_prompt(Field::DashSearch),
            (View::Listings, KeyCode::Char('n')) => dash.open_new_listing(),
            (View::Listings, KeyCode::Char('e')) => {
                let listings = dash.visible_listings().await;
                if let Some(listing) = listings.get(selected) {
                    dash.open_edit_listing(listing);
                }
            }
            (View::Listings, KeyCode::Char('x')) => {
                let listings = dash.visible_listings().await;
                if let Some(listing) = listings.get(selected) {
                    dash.request_delete(PendingDelete::Listing(listing.id));
                }
            }
            (View::Categories, KeyCode::Char('n')) => dash.open_new_category(),
            (View::Categories, KeyCode::Char('e')) => {
                let categories = self.ctx.listings.snapshot().await.categories;
                if let Some(category) = categories.get(selected) {
                    dash.open_edit_category(category);
                }
            }
            (View::Categories, KeyCode::Char('x')) => {
                let categories = self.ctx.listings.snapshot().await.categories;
                if let Some(category) = categories.get(selected) {
                    dash.request_delete(PendingDelete::Category(category.id));
                }
            }
            (View::Reviews, KeyCode::Char('r')) | (View::Reviews, KeyCode::Char('x')) => {
                let reviews = dash.filtered_reviews(Local::now().naive_local()).await;
                if let Some(review) = reviews.get(selected) {
                    if code == KeyCode::Char('r') {
                        dash.open_response(review.id);
                    } else {
                        dash.request_delete(PendingDelete::Review(review.id));
                    }
                }
            }
            (View::Reviews, KeyCode::Char('s')) => {
                dash.review_filters.rating = match dash.review_filters.rating {
                    None => Some(5),
                    Some(1) => None,
                    Some(n) => Some(n - 1),
                };
            }
            (View::Reviews, KeyCode::Char('t')) => {
                dash.review_filters.window = match dash.review_filters.window {
                    DateWindow::All => DateWindow::Today,
                    DateWindow::Today => DateWindow::Week,
                    DateWindow::Week => DateWindow::Month,
                    DateWindow::Month => DateWindow::All,
                };
            }
            (View::Reviews, KeyCode::Char('b')) => {
                let reviews = self.ctx.reviews.snapshot().await.reviews;
                let names = biznest_dash::dashboard::review_businesses(&reviews);
                let next = match &dash.review_filters.business {
                    None => names.first().cloned(),
                    Some(current) => names
                        .iter()
                        .position(|n| n == current)
                        .and_then(|i| names.get(i + 1).cloned()),
                };
                dash.review_filters.business = next;
            }
            (View::Users, KeyCode::Char('e')) => {
                let user = dash.users().get(selected).cloned();
                if let Some(user) = user {
                    dash.open_roles(&user);
                }
            }
            (View::Users, KeyCode::Char('x')) => {
                let user = dash.users().get(selected).cloned();
                if let Some(user) = user {
                    dash.request_delete(PendingDelete::User(user.username));
                }
            }
            (_, KeyCode::Char('g')) => dash.refresh_view().await,
            _ => {}
        }
    }

    async fn profile_key(&mut self, code: KeyCode) {
        let Screen::Profile(view) = &mut self.screen else {
            return;
        };
        match code {
            KeyCode::Char('n') => {
                view.start_editing();
                self.open_prompt(Field::DisplayName);
            }
            KeyCode::Char('m') => {
                view.start_editing();
                self.open_prompt(Field::ProfileEmail);
            }
            KeyCode::Char('b') => {
                view.start_editing();
                self.open_prompt(Field::Bio);
            }
            KeyCode::Char('s') => {
                if view.save().await {
                    self.add_log("INFO", "Profile saved");
                }
            }
            KeyCode::Char('z') => view.cancel_editing(),
            KeyCode::Char('p') => self.open_prompt(Field::CurrentPassword),
            KeyCode::Char('w') => self.open_prompt(Field::NewPassword),
            KeyCode::Char('c') => self.open_prompt(Field::ConfirmPassword),
            KeyCode::Char('x') => {
                if view.change_password().await {
                    self.add_log("INFO", "Password changed");
                } else if let Some(err) = view.password_error.clone() {
                    self.add_log("WARN", &err);
                }
            }
            KeyCode::Char('u') => self.open_prompt(Field::PicturePath),
            _ => {}
        }
    }

    async fn contact_key(&mut self, code: KeyCode) {
        let Screen::Contact(view) = &mut self.screen else {
            return;
        };
        match code {
            KeyCode::Char('n') => self.open_prompt(Field::ContactName),
            KeyCode::Char('e') => self.open_prompt(Field::ContactEmail),
            KeyCode::Char('m') => self.open_prompt(Field::ContactMessage),
            KeyCode::Char('t') => view.toggle_kind(),
            KeyCode::Enter => {
                if view.submit().await {
                    self.add_log("INFO", "Contact message sent");
                } else if let Some(err) = view.error.clone() {
                    self.add_log("WARN", &err);
                }
            }
            KeyCode::Esc => {
                let back = if self.ctx.session.is_logged_in() { Route::Home } else { Route::Login };
                self.ctx.navigator.navigate(back);
                self.sync_route().await;
            }
            _ => {}
        }
    }
}
