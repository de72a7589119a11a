use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
};

use crate::{
    app::{App, ExpenseField, ExpensesMode},
    ui::{components::money, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let theme = Theme::default();

    let (form_area, list_area) = if app.state.expenses.mode == ExpensesMode::Create {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);
        (Some(layout[0]), layout[1])
    } else {
        (None, area)
    };

    if let Some(form_area) = form_area {
        render_form(frame, form_area, app, &theme);
    }
    render_list(frame, list_area, app, &theme);
}

fn render_form(frame: &mut Frame<'_>, area: Rect, app: &App, theme: &Theme) {
    let form = &app.state.expenses;
    let block = Block::default()
        .title(" Nuova spesa ")
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
        "Descrizione",
        &form.description,
        form.focus == ExpenseField::Description,
        theme,
    );
    labeled_input(
        frame,
        rows[1],
        "Importo",
        &form.amount,
        form.focus == ExpenseField::Amount,
        theme,
    );
}

fn render_list(frame: &mut Frame<'_>, area: Rect, app: &App, theme: &Theme) {
    let block = Block::default()
        .title(" Expenses ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    let rows = app.expense_rows();
    if rows.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Nessuna spesa registrata.",
                Style::default().fg(theme.text_muted),
            ))
            .block(block),
            area,
        );
        return;
    }

    let browsing = app.state.expenses.mode == ExpensesMode::List;
    let selected = app.state.expenses.selected;
    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(i, tx)| {
            let marker = if browsing && i == selected { "▸ " } else { "  " };
            let style = if browsing && i == selected {
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{marker}{}", tx.date.format("%d/%m %H:%M")),
                    Style::default().fg(theme.text_muted),
                ),
                Span::raw("  "),
                Span::styled(tx.description.clone(), style),
                Span::raw("  "),
                money::styled_kind_amount(tx.amount, tx.kind, theme),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

pub(super) fn labeled_input(
    frame: &mut Frame<'_>,
    area: Rect,
    label: &'static str,
    value: &str,
    focused: bool,
    theme: &Theme,
) {
    let cursor = if focused { "│" } else { "" };
    let style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text)
    };
    let line = Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(theme.text_muted)),
        Span::styled(format!("{value}{cursor}"), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
