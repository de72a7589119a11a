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
        .title(" History ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    let transactions = app.transactions();
    if transactions.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Nessun movimento.",
                Style::default().fg(theme.text_muted),
            ))
            .block(block),
            area,
        );
        return;
    }

    let selected = app.state.history.selected;
    let items: Vec<ListItem> = transactions
        .iter()
        .enumerate()
        .map(|(i, tx)| {
            let marker = if i == selected { "▸ " } else { "  " };
            let style = if i == selected {
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{marker}{}", tx.date.format("%d/%m/%Y %H:%M")),
                    Style::default().fg(theme.text_muted),
                ),
                Span::raw("  "),
                Span::styled(tx.description.clone(), style),
                Span::raw("  "),
                money::styled_kind_amount(tx.amount, tx.kind, &theme),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
