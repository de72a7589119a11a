use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
};

use crate::{
    app::{App, ServiceField, SettingsMode},
    ui::{components::money, theme::Theme},
};

use super::expenses::labeled_input;

pub fn render(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let theme = Theme::default();

    let editing = app.state.settings.mode != SettingsMode::List;
    let (form_area, list_area, footer_area) = {
        let mut constraints = vec![Constraint::Min(0), Constraint::Length(1)];
        if editing {
            constraints.insert(0, Constraint::Length(4));
        }
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);
        if editing {
            (Some(layout[0]), layout[1], layout[2])
        } else {
            (None, layout[0], layout[1])
        }
    };

    if let Some(form_area) = form_area {
        render_form(frame, form_area, app, &theme);
    }
    render_services(frame, list_area, app, &theme);
    render_footer(frame, footer_area, app, &theme);
}

fn render_form(frame: &mut Frame<'_>, area: Rect, app: &App, theme: &Theme) {
    let form = &app.state.settings;
    let title = match form.mode {
        SettingsMode::Edit => " Modifica servizio ",
        _ => " Nuovo servizio ",
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    labeled_input(
        frame,
        rows[0],
        "Nome",
        &form.name,
        form.focus == ServiceField::Name,
        theme,
    );
    labeled_input(
        frame,
        rows[1],
        "Prezzo",
        &form.price,
        form.focus == ServiceField::Price,
        theme,
    );
}

fn render_services(frame: &mut Frame<'_>, area: Rect, app: &App, theme: &Theme) {
    let block = Block::default()
        .title(" Services ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    let services = app.services();
    if services.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Nessun servizio configurato.",
                Style::default().fg(theme.text_muted),
            ))
            .block(block),
            area,
        );
        return;
    }

    let browsing = app.state.settings.mode == SettingsMode::List;
    let selected = app.state.settings.selected;
    let items: Vec<ListItem> = services
        .iter()
        .enumerate()
        .map(|(i, service)| {
            let marker = if browsing && i == selected { "▸ " } else { "  " };
            let style = if browsing && i == selected {
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{marker}{}", service.name), style),
                Span::raw("  "),
                Span::styled(
                    money::format_amount(service.default_price),
                    Style::default().fg(theme.text_muted),
                ),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, app: &App, theme: &Theme) {
    let user = app
        .session()
        .user()
        .map(|user| format!("{} <{}>", user.name, user.email))
        .unwrap_or_else(|| "-".to_string());
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Account", Style::default().fg(theme.text_muted)),
            Span::raw(format!(": {user}")),
        ])),
        area,
    );
}
