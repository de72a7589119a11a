pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use chrono::Local;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use store::Route;

use crate::app::{App, ExpensesMode, Screen, SettingsMode};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();
    match app.state.screen {
        Screen::Login => screens::login::render(frame, area, app),
        Screen::Home => render_shell(frame, area, app),
    }
}

fn render_shell(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let theme = Theme::default();

    // Main layout: info bar, tabs, content, status line, bottom bar
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tab bar (label + gap)
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], app, &theme);
    components::tabs::render_tabs(frame, layout[1], app.state.route, &theme);

    match app.state.route {
        Route::Dashboard => screens::dashboard::render(frame, layout[2], app),
        Route::Pos => screens::pos::render(frame, layout[2], app),
        Route::Expenses => screens::expenses::render(frame, layout[2], app),
        Route::History => screens::history::render(frame, layout[2], app),
        Route::Settings => screens::settings::render(frame, layout[2], app),
        // The shell only renders behind the guard.
        Route::Login => {}
    }

    render_status(frame, layout[3], app, &theme);
    render_bottom_bar(frame, layout[4], app, &theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, app: &App, theme: &Theme) {
    let user = app
        .session()
        .user()
        .map(|user| user.email.as_str())
        .unwrap_or("-");
    let today = Local::now().format("%d/%m/%Y").to_string();

    let line = Line::from(vec![
        Span::styled(
            "cassa",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("User", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {user}  ")),
        Span::styled("Date", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {today}")),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_status(frame: &mut Frame<'_>, area: Rect, app: &App, theme: &Theme) {
    let Some(message) = &app.state.status else {
        return;
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            message.as_str(),
            Style::default().fg(theme.accent),
        )),
        area,
    );
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, app: &App, theme: &Theme) {
    let mut parts = components::tabs::tab_shortcuts(theme);

    let context_hints = context_hints(app, theme);
    if !context_hints.is_empty() {
        parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
        parts.extend(context_hints);
    }

    parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
    parts.push(Span::styled("q", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" quit"));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

fn hint(key: &'static str, action: &'static str, theme: &Theme) -> [Span<'static>; 2] {
    [
        Span::styled(key, Style::default().fg(theme.accent)),
        Span::raw(action),
    ]
}

fn context_hints(app: &App, theme: &Theme) -> Vec<Span<'static>> {
    let form_hints = || {
        [
            hint("Tab", " next  ", theme),
            hint("Enter", " save  ", theme),
            hint("Esc", " cancel", theme),
        ]
        .concat()
    };

    match app.state.route {
        Route::Dashboard => hint("r", " refresh", theme).to_vec(),
        Route::Pos => [
            hint("↑/↓", " select  ", theme),
            hint("Enter", " sell  ", theme),
            hint("r", " refresh", theme),
        ]
        .concat(),
        Route::Expenses => match app.state.expenses.mode {
            ExpensesMode::List => [
                hint("a", " add  ", theme),
                hint("x", " delete  ", theme),
                hint("r", " refresh", theme),
            ]
            .concat(),
            ExpensesMode::Create => form_hints(),
        },
        Route::History => [
            hint("↑/↓", " select  ", theme),
            hint("x", " delete  ", theme),
            hint("r", " refresh", theme),
        ]
        .concat(),
        Route::Settings => match app.state.settings.mode {
            SettingsMode::List => [
                hint("a", " add  ", theme),
                hint("m", " edit  ", theme),
                hint("x", " delete  ", theme),
                hint("o", " logout", theme),
            ]
            .concat(),
            SettingsMode::Create | SettingsMode::Edit => form_hints(),
        },
        Route::Login => Vec::new(),
    }
}
