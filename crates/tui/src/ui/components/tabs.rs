use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use store::Route;

use crate::ui::theme::Theme;

const SECTIONS: [Route; 5] = [
    Route::Dashboard,
    Route::Pos,
    Route::Expenses,
    Route::History,
    Route::Settings,
];

pub fn section_label(route: Route) -> &'static str {
    match route {
        Route::Login => "Login",
        Route::Dashboard => "Dashboard",
        Route::Pos => "POS",
        Route::Expenses => "Expenses",
        Route::History => "History",
        Route::Settings => "Settings",
    }
}

/// Renders a horizontal tab bar for section navigation.
pub fn render_tabs(frame: &mut Frame<'_>, area: Rect, active: Route, theme: &Theme) {
    let mut spans = Vec::new();
    spans.push(Span::raw(" "));

    for (i, section) in SECTIONS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }

        let label = section_label(*section);
        if *section == active {
            spans.push(Span::styled("[", Style::default().fg(theme.accent)));
            spans.push(Span::styled(
                label,
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled("]", Style::default().fg(theme.accent)));
        } else {
            spans.push(Span::styled(label, Style::default().fg(theme.text_muted)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Returns the shortcut hint for tab navigation.
pub fn tab_shortcuts(theme: &Theme) -> Vec<Span<'static>> {
    vec![
        Span::styled("d", Style::default().fg(theme.accent)),
        Span::raw("/"),
        Span::styled("p", Style::default().fg(theme.accent)),
        Span::raw("/"),
        Span::styled("e", Style::default().fg(theme.accent)),
        Span::raw("/"),
        Span::styled("h", Style::default().fg(theme.accent)),
        Span::raw("/"),
        Span::styled("s", Style::default().fg(theme.accent)),
        Span::raw(" nav"),
    ]
}
