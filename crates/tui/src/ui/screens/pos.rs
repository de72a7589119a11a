use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
};

use crate::{
    app::App,
    ui::{components::money, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let theme = Theme::default();
    let block = Block::default()
        .title(" POS ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    let services = app.services();
    if services.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Nessun servizio configurato. Aggiungine uno dalle impostazioni.",
                Style::default().fg(theme.text_muted),
            ))
            .block(block),
            area,
        );
        return;
    }

    let selected = app.state.pos.selected;
    let items: Vec<ListItem> = services
        .iter()
        .enumerate()
        .map(|(i, service)| {
            let marker = if i == selected { "▸ " } else { "  " };
            let style = if i == selected {
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
