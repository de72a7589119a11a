use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::Span,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{App, LoginField, LoginMode},
    ui::theme::Theme,
};

/// Calculates a centered rect for the login box
fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

pub fn render(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let theme = Theme::default();
    let login = &app.state.login;
    let register = login.mode == LoginMode::Register;

    // Borders plus one margin row, one row per field, one spacer between.
    let box_height = if register { 9 } else { 7 };
    let box_width = 36;
    let card_area = centered_box(box_width, box_height, area);

    frame.render_widget(Clear, card_area);

    let title = if register { " registrazione " } else { " login " };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    // One row per field, one spacer row between; registration adds the name
    // field on top.
    let row_count = if register { 5 } else { 3 };
    let constraints = vec![Constraint::Length(1); row_count];
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(inner);

    let mut row = 0;
    if register {
        render_input(
            frame,
            rows[row],
            &login.name,
            false,
            login.focus == LoginField::Name,
            &theme,
        );
        row += 2;
    }
    render_input(
        frame,
        rows[row],
        &login.email,
        false,
        login.focus == LoginField::Email,
        &theme,
    );
    render_input(
        frame,
        rows[row + 2],
        &login.password,
        true,
        login.focus == LoginField::Password,
        &theme,
    );

    // Mode switch hint just below the box.
    let hint = if register {
        "Ctrl+R: torna al login"
    } else {
        "Ctrl+R: crea un account"
    };
    let hint_area = Rect {
        x: card_area.x,
        y: card_area.y + card_area.height,
        width: card_area.width,
        height: 1,
    };
    frame.render_widget(
        Paragraph::new(Span::styled(hint, Style::default().fg(theme.text_muted)))
            .alignment(Alignment::Center),
        hint_area,
    );

    // Error message below the hint (only shown when there's one).
    if let Some(message) = &login.message {
        let error_area = Rect {
            x: card_area.x,
            y: card_area.y + card_area.height + 1,
            width: card_area.width,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                message.as_str(),
                Style::default().fg(theme.error),
            ))
            .alignment(Alignment::Center),
            error_area,
        );
    }
}

/// Renders a simple input field - just value and cursor, no labels
fn render_input(
    frame: &mut Frame<'_>,
    area: Rect,
    value: &str,
    is_password: bool,
    focused: bool,
    theme: &Theme,
) {
    let cursor = if focused { "│" } else { "" };

    let display = if is_password {
        format!("{}{}", "•".repeat(value.chars().count()), cursor)
    } else {
        format!("{value}{cursor}")
    };

    let style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text_muted)
    };

    frame.render_widget(Paragraph::new(Span::styled(display, style)), area);
}
