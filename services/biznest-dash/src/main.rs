// services/biznest-dash/src/main.rs
//
// BizNest terminal client
// Browse listings, leave reviews and run the admin dashboard from a TUI
//
// Run with: cargo run --bin biznest-dash -- --demo

use std::fs::OpenOptions;
use std::io::stdout;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{prelude::*, widgets::*};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use biznest_dash::dashboard::Modal;
use biznest_dash::detail::ReviewFormMode;
use biznest_dash::login::LoginMode;
use biznest_dash::{DemoBackend, View};
use svckit::config::{load_config, ClientConfig};
use svckit::storage::MemoryStorage;
use svckit::types::ContactKind;
use svckit::BizNest;

mod app;

use app::{App, RenderData, Screen};

#[derive(Parser, Debug)]
#[command(name = "biznest-dash")]
#[command(about = "Terminal client for the BizNest business directory")]
#[command(version = "0.1.0")]
struct Args {
    /// Client config file
    #[arg(long, default_value = "config/biznest-dash.yaml")]
    config: String,

    /// Run against an in-process seeded backend (no server required)
    #[arg(long, short)]
    demo: bool,

    /// Redraw interval in milliseconds
    #[arg(long, default_value = "250")]
    refresh_ms: u64,
}

// Color palette: Red, White, Silver, Gold
mod colors {
    use ratatui::style::Color;

    pub const RED: Color = Color::Rgb(220, 50, 47);
    pub const DARK_RED: Color = Color::Rgb(139, 0, 0);
    pub const WHITE: Color = Color::Rgb(253, 246, 227);
    pub const SILVER: Color = Color::Rgb(147, 161, 161);
    pub const GOLD: Color = Color::Rgb(255, 193, 37);
    pub const DARK_GOLD: Color = Color::Rgb(184, 134, 11);
    pub const BG_DARK: Color = Color::Rgb(0, 20, 30);
    pub const BG_PANEL: Color = Color::Rgb(7, 30, 41);
    pub const SUCCESS: Color = Color::Rgb(133, 153, 0);
    pub const ERROR: Color = Color::Rgb(220, 50, 47);

    pub fn accent(scheme: svckit::storage::ColorScheme) -> Color {
        use svckit::storage::ColorScheme;
        match scheme {
            ColorScheme::Purple => Color::Rgb(147, 112, 219),
            ColorScheme::Blue => Color::Rgb(38, 139, 210),
            ColorScheme::Green => Color::Rgb(42, 161, 152),
        }
    }
}

/// The terminal belongs to the UI, so tracing goes to a file
fn init_tracing(config: &ClientConfig) -> Result<()> {
    let Some(path) = &config.observability.log_file else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let default_filter = format!("biznest_dash={level},svckit={level}", level = config.observability.log_level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args.config)?;
    init_tracing(&config)?;

    info!("Starting biznest-dash (demo: {})", args.demo);

    // Demo backend must outlive the client
    let mut demo = None;
    let ctx = if args.demo {
        let backend = DemoBackend::start(true).await?;
        let ctx = backend.connect(config, Arc::new(MemoryStorage::new()))?;
        demo = Some(backend);
        ctx
    } else {
        BizNest::from_config(config)?
    };
    ctx.start().await;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new(ctx.clone(), args.demo);
    let result = run_app(&mut terminal, &mut app, &args).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    drop(app);
    ctx.shutdown();
    drop(demo);
    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, args: &Args) -> Result<()> {
    let tick_rate = Duration::from_millis(args.refresh_ms);
    let mut last_tick = Instant::now();

    if args.demo {
        app.add_log("INFO", "BizNest started in DEMO mode");
        app.add_log("INFO", "Sign in as demo / password123");
    } else {
        app.add_log("INFO", &format!("BizNest started - connecting to {}", app.ctx.config.api.base_url));
    }
    if let Some(error) = app.ctx.listings.snapshot().await.error {
        app.add_log("ERROR", &error);
    }
    app.sync_route().await;

    loop {
        let data = app.render_data().await;
        app.clamp_selection(&data);
        terminal.draw(|frame| draw_ui(frame, app, &data))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key).await;
                }
            }
        }
        if app.should_quit {
            return Ok(());
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick().await;
            last_tick = Instant::now();
        }
    }
}

fn draw_ui(frame: &mut Frame, app: &App, data: &RenderData) {
    let area = frame.area();

    // Background
    frame.render_widget(
        Block::default().style(Style::default().bg(colors::BG_DARK)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(5), // Stats panel
            Constraint::Min(10),   // Screen + Activity
            Constraint::Length(3), // Footer
        ])
        .split(area);

    draw_header(frame, chunks[0], app);
    draw_stats_panel(frame, chunks[1], data);
    draw_main_content(frame, chunks[2], app, data);
    draw_footer(frame, chunks[3], app);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let (mode_text, mode_color) = if app.demo {
        ("DEMO", colors::GOLD)
    } else {
        ("LIVE", colors::SUCCESS)
    };
    let user = match app.ctx.session.username() {
        Some(name) if app.ctx.session.is_admin() => format!("{} (admin)", name),
        Some(name) => name,
        None => "signed out".to_string(),
    };

    let title = Line::from(vec![
        Span::styled(
            " BIZNEST ",
            Style::default().fg(colors::WHITE).bg(colors::DARK_RED).bold(),
        ),
        Span::raw("  "),
        Span::styled(
            app.screen.name(),
            Style::default().fg(colors::accent(app.ctx.session.color_scheme())).bold(),
        ),
        Span::raw("  "),
        Span::styled(format!("[{}]", mode_text), Style::default().fg(mode_color).bold()),
        Span::raw("  "),
        Span::styled(user, Style::default().fg(colors::SILVER)),
        Span::raw("  "),
        Span::styled(
            format!(
                "theme: {:?} / {}",
                app.ctx.session.theme(),
                app.ctx.session.color_scheme().as_str()
            ),
            Style::default().fg(colors::SILVER).add_modifier(Modifier::DIM),
        ),
    ]);

    let header = Paragraph::new(title).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(colors::DARK_RED))
            .style(Style::default().bg(colors::BG_DARK)),
    );

    frame.render_widget(header, area);
}

fn draw_stats_panel(frame: &mut Frame, area: Rect, data: &RenderData) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    draw_stat_box(frame, chunks[0], "LISTINGS", &data.total_listings.to_string(), colors::WHITE);
    draw_stat_box(
        frame,
        chunks[1],
        "PENDING (PAGE)",
        &data.metrics.pending.to_string(),
        if data.metrics.pending > 0 { colors::GOLD } else { colors::SILVER },
    );
    draw_stat_box(frame, chunks[2], "CATEGORIES", &data.categories.len().to_string(), colors::SUCCESS);

    let (requests, failed) = svckit::metrics::request_totals();
    draw_stat_box(
        frame,
        chunks[3],
        "REQUESTS / FAILED",
        &format!("{} / {}", requests, failed),
        if failed > 0 { colors::RED } else { colors::SILVER },
    );
}

fn draw_stat_box(frame: &mut Frame, area: Rect, label: &str, value: &str, value_color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::SILVER))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(colors::BG_PANEL));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = vec![
        Line::from(Span::styled(
            label,
            Style::default().fg(colors::SILVER).add_modifier(Modifier::DIM),
        )),
        Line::from(Span::styled(value, Style::default().fg(value_color).bold())),
    ];

    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}

fn draw_main_content(frame: &mut Frame, area: Rect, app: &App, data: &RenderData) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    match &app.screen {
        Screen::Login(_) => draw_login(frame, chunks[0], app),
        Screen::Home(_) => draw_home(frame, chunks[0], app, data),
        Screen::Detail(_) => draw_detail(frame, chunks[0], app),
        Screen::Dashboard(_) => draw_dashboard(frame, chunks[0], app, data),
        Screen::Profile(_) => draw_profile(frame, chunks[0], app),
        Screen::Contact(_) => draw_contact(frame, chunks[0], app),
    }
    draw_activity_panel(frame, chunks[1], app);
}

fn panel(title: &str) -> Block<'static> {
    Block::default()
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(colors::WHITE).bold(),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::SILVER))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(colors::BG_PANEL))
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<18}", label), Style::default().fg(colors::SILVER)),
        Span::styled(value, Style::default().fg(colors::WHITE)),
    ])
}

fn masked(value: &str) -> String {
    "*".repeat(value.chars().count())
}

fn message_lines<'a>(error: Option<&'a str>, notice: Option<&'a str>) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    if let Some(error) = error {
        lines.push(Line::from(Span::styled(error, Style::default().fg(colors::ERROR).bold())));
    }
    if let Some(notice) = notice {
        lines.push(Line::from(Span::styled(notice, Style::default().fg(colors::SUCCESS))));
    }
    lines
}

fn header_row<'a>(labels: &[&'a str]) -> Row<'a> {
    Row::new(
        labels
            .iter()
            .map(|l| Cell::from(Span::styled(*l, Style::default().fg(colors::GOLD).bold())))
            .collect::<Vec<_>>(),
    )
    .bottom_margin(1)
}

fn selectable<'a>(cells: Vec<String>, selected: bool) -> Row<'a> {
    let style = if selected {
        Style::default().fg(colors::BG_DARK).bg(colors::GOLD)
    } else {
        Style::default().fg(colors::WHITE)
    };
    Row::new(cells).style(style)
}

fn draw_login(frame: &mut Frame, area: Rect, app: &App) {
    let Screen::Login(view) = &app.screen else {
        return;
    };
    let title = match view.mode {
        LoginMode::Login => "SIGN IN",
        LoginMode::Signup => "CREATE ACCOUNT",
        LoginMode::ForgotPassword => "FORGOT PASSWORD",
        LoginMode::ResetPassword => "RESET PASSWORD",
    };

    let mut lines = Vec::new();
    if matches!(view.mode, LoginMode::Login | LoginMode::Signup) {
        lines.push(field("[u] Username", view.form.username.clone()));
    }
    if view.mode != LoginMode::Login {
        lines.push(field("[e] Email", view.form.email.clone()));
    }
    if view.mode == LoginMode::ResetPassword {
        lines.push(field("[o] Code", view.form.otp.clone()));
    }
    if view.mode != LoginMode::ForgotPassword {
        lines.push(field("[w] Password", masked(&view.form.password)));
    }
    if view.mode == LoginMode::Signup {
        lines.push(field("[c] Confirm", masked(&view.form.confirm_password)));
    }
    lines.push(Line::from(""));
    lines.extend(message_lines(view.error.as_deref(), view.notice.as_deref()));

    frame.render_widget(Paragraph::new(lines).block(panel(title)).wrap(Wrap { trim: true }), area);
}

fn draw_home(frame: &mut Frame, area: Rect, app: &App, data: &RenderData) {
    let Screen::Home(view) = &app.screen else {
        return;
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    let chips: Vec<Span> = data
        .category_options
        .iter()
        .enumerate()
        .flat_map(|(i, name)| {
            let chosen = view.selected_categories().contains(name);
            let mut style = if chosen {
                Style::default().fg(colors::BG_DARK).bg(colors::GOLD)
            } else {
                Style::default().fg(colors::SILVER)
            };
            if i == app.category_cursor {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            [Span::styled(format!(" {} ", name), style), Span::raw(" ")]
        })
        .collect();
    let title = format!("CATEGORIES  search: \"{}\"", view.query());
    frame.render_widget(Paragraph::new(Line::from(chips)).block(panel(&title)), chunks[0]);

    let rows: Vec<Row> = data
        .listings
        .iter()
        .enumerate()
        .map(|(i, l)| {
            selectable(
                vec![
                    l.name.clone(),
                    l.category.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
                    l.location.clone(),
                    l.rating.map(|r| format!("{:.1}", r)).unwrap_or_default(),
                    if view.image_url(l.id).is_some() { "yes" } else { "" }.to_string(),
                ],
                i == app.selected,
            )
        })
        .collect();

    let mut block_title = format!("LISTINGS  page {}/{}", data.page + 1, data.total_pages.max(1));
    if data.loading {
        block_title.push_str("  loading...");
    }
    if let Some(error) = &data.store_error {
        block_title = format!("{}  {}", block_title, error);
    }
    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Length(7),
            Constraint::Length(6),
        ],
    )
    .header(header_row(&["NAME", "CATEGORY", "LOCATION", "RATING", "IMAGE"]))
    .block(panel(&block_title));

    frame.render_widget(table, chunks[1]);
}

fn draw_detail(frame: &mut Frame, area: Rect, app: &App) {
    let Screen::Detail(view) = &app.screen else {
        return;
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(5), Constraint::Length(7)])
        .split(area);

    let mut info = Vec::new();
    match &view.listing {
        Some(l) => {
            info.push(Line::from(Span::styled(l.name.clone(), Style::default().fg(colors::GOLD).bold())));
            info.push(field("Category", l.category.as_ref().map(|c| c.name.clone()).unwrap_or_default()));
            info.push(field("Address", format!("{}, {}", l.address, l.location)));
            info.push(field("Phone", l.phone.clone()));
            info.push(field("Hours", l.business_hours.clone()));
            info.push(field("Average rating", view.average.clone()));
            info.push(field("Image", view.image_url().unwrap_or("none").to_string()));
        }
        None if view.loading => info.push(Line::from("Loading...")),
        None => {}
    }
    info.extend(message_lines(view.error.as_deref(), None));
    frame.render_widget(Paragraph::new(info).block(panel("LISTING")).wrap(Wrap { trim: true }), chunks[0]);

    let rows: Vec<Row> = view
        .reviews
        .iter()
        .enumerate()
        .map(|(i, r)| {
            selectable(
                vec![
                    "*".repeat(r.rating as usize),
                    r.username.clone(),
                    r.comment.clone(),
                    r.business_response.clone().unwrap_or_default(),
                ],
                i == app.selected,
            )
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(14),
            Constraint::Min(20),
            Constraint::Min(14),
        ],
    )
    .header(header_row(&["RATING", "USER", "COMMENT", "RESPONSE"]))
    .block(panel(&format!("REVIEWS ({})", view.reviews.len())));
    frame.render_widget(table, chunks[1]);

    let title = match view.mode() {
        ReviewFormMode::Create => "WRITE A REVIEW",
        ReviewFormMode::Edit { .. } => "EDIT YOUR REVIEW",
    };
    let mut form = vec![
        field("[1-5] Rating", "*".repeat(view.form.rating as usize)),
        field("[c] Comment", view.form.comment.clone()),
    ];
    form.extend(message_lines(None, view.notice.as_deref()));
    frame.render_widget(Paragraph::new(form).block(panel(title)).wrap(Wrap { trim: true }), chunks[2]);
}

fn draw_dashboard(frame: &mut Frame, area: Rect, app: &App, data: &RenderData) {
    let Screen::Dashboard(dash) = &app.screen else {
        return;
    };

    if !dash.is_unlocked() {
        let mut lines = vec![
            Line::from(Span::styled(
                format!("Admin check ({:?})", dash.gate().mode()),
                Style::default().fg(colors::GOLD),
            )),
            Line::from(""),
            field("[u] Username", app.gate_username.clone()),
            field("[w] Password", masked(&app.gate_password)),
            Line::from(""),
        ];
        lines.extend(message_lines(dash.gate().error(), None));
        frame.render_widget(Paragraph::new(lines).block(panel("ADMIN LOGIN")), area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    let tabs = Tabs::new(View::ALL.iter().map(|v| v.as_str().to_uppercase()).collect::<Vec<_>>())
        .select(View::ALL.iter().position(|v| *v == dash.view()).unwrap_or(0))
        .style(Style::default().fg(colors::SILVER))
        .highlight_style(Style::default().fg(colors::GOLD).bold())
        .block(panel("ADMIN"));
    frame.render_widget(tabs, chunks[0]);

    match dash.view() {
        View::Dashboard | View::Analytics => draw_analytics(frame, chunks[1], app, data),
        View::Listings => {
            let rows: Vec<Row> = data
                .listings
                .iter()
                .enumerate()
                .map(|(i, l)| {
                    selectable(
                        vec![
                            l.id.to_string(),
                            l.name.clone(),
                            l.category.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
                            l.location.clone(),
                            l.status.as_str().to_string(),
                        ],
                        i == app.selected,
                    )
                })
                .collect();
            let table = Table::new(
                rows,
                [
                    Constraint::Length(5),
                    Constraint::Min(20),
                    Constraint::Length(16),
                    Constraint::Length(14),
                    Constraint::Length(10),
                ],
            )
            .header(header_row(&["ID", "NAME", "CATEGORY", "LOCATION", "STATUS"]))
            .block(panel(&format!("LISTINGS  search: \"{}\"", dash.search_query)));
            frame.render_widget(table, chunks[1]);
        }
        View::Categories => {
            let rows: Vec<Row> = data
                .categories
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    let count = data.category_stats.get(&c.name).copied().unwrap_or(0);
                    selectable(
                        vec![c.id.to_string(), c.name.clone(), c.description.clone(), count.to_string()],
                        i == app.selected,
                    )
                })
                .collect();
            let table = Table::new(
                rows,
                [
                    Constraint::Length(5),
                    Constraint::Length(18),
                    Constraint::Min(20),
                    Constraint::Length(9),
                ],
            )
            .header(header_row(&["ID", "NAME", "DESCRIPTION", "LISTINGS"]))
            .block(panel("CATEGORIES"));
            frame.render_widget(table, chunks[1]);
        }
        View::Reviews => {
            let filters = &dash.review_filters;
            let title = format!(
                "REVIEWS  business: {}  rating: {}  date: {:?}",
                filters.business.as_deref().unwrap_or("all"),
                filters.rating.map(|r| r.to_string()).unwrap_or_else(|| "all".into()),
                filters.window,
            );
            let rows: Vec<Row> = data
                .reviews
                .iter()
                .enumerate()
                .map(|(i, r)| {
                    selectable(
                        vec![
                            r.business_name.clone().unwrap_or_default(),
                            r.username.clone(),
                            r.rating.to_string(),
                            r.comment.clone(),
                            if r.business_response.is_some() { "answered" } else { "pending" }.to_string(),
                        ],
                        i == app.selected,
                    )
                })
                .collect();
            let table = Table::new(
                rows,
                [
                    Constraint::Length(18),
                    Constraint::Length(12),
                    Constraint::Length(6),
                    Constraint::Min(20),
                    Constraint::Length(9),
                ],
            )
            .header(header_row(&["BUSINESS", "USER", "RATING", "COMMENT", "STATUS"]))
            .block(panel(&title));
            frame.render_widget(table, chunks[1]);
        }
        View::Users => {
            let rows: Vec<Row> = dash
                .users()
                .iter()
                .enumerate()
                .map(|(i, u)| {
                    let roles: Vec<&str> = u.roles.iter().map(|r| r.as_str()).collect();
                    selectable(
                        vec![u.username.clone(), u.email.clone().unwrap_or_default(), roles.join(", ")],
                        i == app.selected,
                    )
                })
                .collect();
            let table = Table::new(
                rows,
                [Constraint::Length(18), Constraint::Min(20), Constraint::Length(24)],
            )
            .header(header_row(&["USERNAME", "EMAIL", "ROLES"]))
            .block(panel("USERS"));
            frame.render_widget(table, chunks[1]);
        }
    }

    draw_modal(frame, area, app, data);
    if let Some(alert) = dash.alert() {
        let popup = centered(area, 60, 5);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(Span::styled(alert, Style::default().fg(colors::ERROR).bold()))
                .wrap(Wrap { trim: true })
                .block(panel("ALERT  (any key)")),
            popup,
        );
    }
}

fn draw_analytics(frame: &mut Frame, area: Rect, app: &App, data: &RenderData) {
    let Screen::Dashboard(dash) = &app.screen else {
        return;
    };
    let mut lines = Vec::new();
    match dash.analytics() {
        Some(a) => {
            lines.push(field("Total listings", format!("{}  ({})", a.total_listings, a.listings_trend)));
            lines.push(field("Active listings", a.active_listings.to_string()));
            lines.push(field("Pending listings", a.pending_listings.to_string()));
            lines.push(field("Users", format!("{}  ({})", a.total_users, a.users_trend)));
            lines.push(field("Reviews", format!("{}  ({})", a.total_reviews, a.reviews_trend)));
            lines.push(field("Awaiting response", a.pending_reviews.to_string()));
            lines.push(field("Average rating", format!("{:.1}  ({})", a.average_rating, a.rating_trend)));
        }
        None => lines.push(Line::from("Press [g] to load analytics")),
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Listings per category", Style::default().fg(colors::GOLD))));
    for (name, count) in &data.category_stats {
        lines.push(field(name, count.to_string()));
    }
    frame.render_widget(Paragraph::new(lines).block(panel("OVERVIEW")), area);
}

fn draw_modal(frame: &mut Frame, area: Rect, app: &App, data: &RenderData) {
    let Screen::Dashboard(dash) = &app.screen else {
        return;
    };
    let (title, lines) = match dash.modal() {
        Modal::None => return,
        Modal::ListingForm { editing } => {
            let form = &dash.listing_form;
            let category = data
                .categories
                .iter()
                .find(|c| Some(c.id) == form.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| "(none)".to_string());
            (
                if editing.is_some() { "EDIT LISTING" } else { "NEW LISTING" },
                vec![
                    field("[n] Name", form.name.clone()),
                    field("[c] Category", category),
                    field("[l] Location", form.location.clone()),
                    field("[d] Description", form.description.clone()),
                    field("[s] Status", form.status.as_str().to_string()),
                    field("Rating", format!("{:.1}", form.rating)),
                ],
            )
        }
        Modal::CategoryForm { editing } => (
            if editing.is_some() { "EDIT CATEGORY" } else { "NEW CATEGORY" },
            vec![
                field("[n] Name", dash.category_form.name.clone()),
                field("[d] Description", dash.category_form.description.clone()),
            ],
        ),
        Modal::Response { .. } => ("RESPOND TO REVIEW", vec![field("[t] Response", dash.response_text.clone())]),
        Modal::Roles { username } => {
            let roles: Vec<&str> = dash.role_selection.iter().map(|r| r.as_str()).collect();
            (
                "EDIT ROLES",
                vec![
                    field("User", username.clone()),
                    field("Roles", roles.join(", ")),
                    Line::from("[a] toggle admin  [r] toggle user"),
                ],
            )
        }
        Modal::Confirm(target) => ("CONFIRM", vec![Line::from(target.prompt()), Line::from("[y] yes  [n] no")]),
    };

    let popup = centered(area, 70, lines.len() as u16 + 4);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(
            panel(title).border_style(Style::default().fg(colors::DARK_GOLD)),
        ),
        popup,
    );
}

fn draw_profile(frame: &mut Frame, area: Rect, app: &App) {
    let Screen::Profile(view) = &app.screen else {
        return;
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(7)])
        .split(area);

    let mut lines = Vec::new();
    if let Some(user) = &view.user {
        lines.push(Line::from(Span::styled(user.username.clone(), Style::default().fg(colors::GOLD).bold())));
        let roles: Vec<&str> = user.roles.iter().map(|r| r.as_str()).collect();
        lines.push(field("Roles", roles.join(", ")));
    }
    lines.push(field("[n] Display name", view.form.display_name.clone()));
    lines.push(field("[m] Email", view.form.email.clone()));
    lines.push(field("[b] Bio", view.form.bio.clone()));
    lines.push(field("Location", view.form.location.clone()));
    lines.push(field("Website", view.form.website.clone()));
    if view.editing {
        lines.push(Line::from(Span::styled("editing: [s] save  [z] cancel", Style::default().fg(colors::GOLD))));
    }
    lines.extend(message_lines(view.error.as_deref(), view.notice.as_deref()));
    frame.render_widget(Paragraph::new(lines).block(panel("PROFILE")).wrap(Wrap { trim: true }), chunks[0]);

    let mut password = vec![
        field("[p] Current", masked(&view.password.current)),
        field("[w] New", masked(&view.password.new)),
        field("[c] Confirm", masked(&view.password.confirm)),
    ];
    password.extend(message_lines(view.password_error.as_deref(), None));
    frame.render_widget(Paragraph::new(password).block(panel("PASSWORD  [x] change")), chunks[1]);
}

fn draw_contact(frame: &mut Frame, area: Rect, app: &App) {
    let Screen::Contact(view) = &app.screen else {
        return;
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(8)])
        .split(area);

    let kinds = [ContactKind::General, ContactKind::Business];
    let selected = kinds.iter().position(|k| *k == view.kind()).unwrap_or(0);
    let tabs = Tabs::new(kinds.iter().map(|k| k.label()).collect::<Vec<_>>())
        .block(panel("INBOX  [t] switch"))
        .select(selected)
        .style(Style::default().fg(colors::SILVER))
        .highlight_style(Style::default().fg(colors::GOLD).bold());
    frame.render_widget(tabs, chunks[0]);

    let mut lines = vec![
        Line::from(Span::styled("Get in Touch", Style::default().fg(colors::GOLD).bold())),
        field("[n] Full name", view.form.full_name.clone()),
        field("[e] Email", view.form.email.clone()),
        field("[m] Message", view.form.message.clone()),
    ];
    lines.extend(message_lines(view.error.as_deref(), view.notice.as_deref()));
    frame.render_widget(Paragraph::new(lines).block(panel("CONTACT")).wrap(Wrap { trim: true }), chunks[1]);
}

fn draw_activity_panel(frame: &mut Frame, area: Rect, app: &App) {
    let logs: Vec<Line> = app
        .activity_log
        .iter()
        .rev()
        .take(20)
        .map(|entry| {
            let (prefix, color) = match entry.level.as_str() {
                "ERROR" => ("[ERR]", colors::RED),
                "WARN" => ("[WRN]", colors::GOLD),
                "INFO" => ("[INF]", colors::SUCCESS),
                _ => ("[---]", colors::SILVER),
            };

            Line::from(vec![
                Span::styled(
                    format!("{} ", entry.timestamp.format("%H:%M:%S")),
                    Style::default().fg(colors::SILVER).add_modifier(Modifier::DIM),
                ),
                Span::styled(format!("{} ", prefix), Style::default().fg(color)),
                Span::styled(&entry.message, Style::default().fg(colors::WHITE)),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(logs)
        .block(panel("ACTIVITY LOG"))
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn key_hint<'a>(key: &'a str, label: &'a str, color: Color) -> [Span<'a>; 3] {
    [
        Span::styled(format!(" [{}] ", key), Style::default().fg(colors::BG_DARK).bg(color)),
        Span::styled(format!(" {} ", label), Style::default().fg(colors::SILVER)),
        Span::raw(" "),
    ]
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let line = if let Some(prompt) = &app.prompt {
        Line::from(vec![
            Span::styled(
                format!(" {:?} ", prompt.field),
                Style::default().fg(colors::BG_DARK).bg(colors::GOLD),
            ),
            Span::raw(" "),
            Span::styled(format!("{}_", prompt.display()), Style::default().fg(colors::WHITE)),
            Span::styled("   [ENTER] save  [ESC] cancel", Style::default().fg(colors::SILVER)),
        ])
    } else {
        let mut hints = Vec::new();
        hints.extend(key_hint("Q", "Quit", colors::RED));
        let screen_hints: &[(&str, &str)] = match &app.screen {
            Screen::Login(_) => &[("ENTER", "Submit"), ("S", "Sign up"), ("F", "Forgot")],
            Screen::Home(_) => &[("/", "Search"), ("SPACE", "Category"), ("ENTER", "Open")],
            Screen::Detail(_) => &[("ENTER", "Submit review"), ("Z", "Reset form"), ("ESC", "Back")],
            Screen::Dashboard(_) => &[("TAB", "View"), ("N/E/X", "New/Edit/Delete"), ("G", "Refresh")],
            Screen::Profile(_) => &[("S", "Save"), ("U", "Upload picture")],
            Screen::Contact(_) => &[("T", "Inbox"), ("ENTER", "Send"), ("ESC", "Back")],
        };
        for (key, label) in screen_hints {
            hints.extend(key_hint(key, label, colors::GOLD));
        }
        hints.extend(key_hint("F1-F3", "Home/Admin/Profile", colors::WHITE));
        hints.extend(key_hint("F4/F5", "Theme/Colors", colors::SILVER));
        hints.extend(key_hint("F6", "Contact", colors::SILVER));
        hints.extend(key_hint("F12", "Logout", colors::SILVER));
        Line::from(hints)
    };

    let footer = Paragraph::new(line).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(colors::DARK_RED))
            .style(Style::default().bg(colors::BG_DARK)),
    );

    frame.render_widget(footer, area);
}

fn centered(area: Rect, percent_x: u16, height: u16) -> Rect {
    let width = area.width * percent_x / 100;
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height: height.min(area.height),
    }
}
