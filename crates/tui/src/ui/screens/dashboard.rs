use chrono::Local;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
};
use store::stats;

use crate::{
    app::App,
    ui::{components::money, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let theme = Theme::default();
    let now = Local::now().fixed_offset();
    let transactions = app.transactions();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Day totals
            Constraint::Min(0),    // Recent activity
        ])
        .split(area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(layout[0]);

    let income = stats::income_today(transactions, &now);
    let expense = stats::expense_today(transactions, &now);
    let net = stats::net_profit_today(transactions, &now);

    stat_card(
        frame,
        cols[0],
        " Today's income ",
        Span::styled(
            format!("+{}", money::format_amount(income)),
            Style::default().fg(theme.positive),
        ),
        &theme,
    );
    stat_card(
        frame,
        cols[1],
        " Today's expenses ",
        Span::styled(
            format!("-{}", money::format_amount(expense)),
            Style::default().fg(theme.negative),
        ),
        &theme,
    );
    stat_card(frame, cols[2], " Net ", money::styled_net(net, &theme), &theme);

    render_recent(frame, layout[1], app, &theme);
}

fn stat_card(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &'static str,
    value: Span<'static>,
    theme: &Theme,
) {
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));
    frame.render_widget(
        Paragraph::new(Line::from(value))
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

fn render_recent(frame: &mut Frame<'_>, area: Rect, app: &App, theme: &Theme) {
    let block = Block::default()
        .title(" Recent activity ")
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

    let items: Vec<ListItem> = stats::recent_activity(transactions)
        .iter()
        .map(|tx| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    tx.date.format("%d/%m %H:%M").to_string(),
                    Style::default().fg(theme.text_muted),
                ),
                Span::raw("  "),
                Span::styled(tx.description.clone(), Style::default().fg(theme.text)),
                Span::raw("  "),
                money::styled_kind_amount(tx.amount, tx.kind, theme),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
