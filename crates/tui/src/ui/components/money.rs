use api_types::transaction::TransactionKind;
use ratatui::{style::Style, text::Span};
use rust_decimal::Decimal;

use crate::ui::theme::Theme;

/// Formats an amount as `12.34 €`.
pub fn format_amount(amount: Decimal) -> String {
    format!("{amount:.2} €")
}

/// Net result: green when positive, red when negative, muted at zero.
pub fn styled_net(amount: Decimal, theme: &Theme) -> Span<'static> {
    let style = if amount > Decimal::ZERO {
        Style::default().fg(theme.positive)
    } else if amount < Decimal::ZERO {
        Style::default().fg(theme.negative)
    } else {
        Style::default().fg(theme.text_muted)
    };
    let prefix = if amount > Decimal::ZERO { "+" } else { "" };
    Span::styled(format!("{prefix}{}", format_amount(amount)), style)
}

/// Kind-signed amount: income `+` green, expense `-` red.
pub fn styled_kind_amount(amount: Decimal, kind: TransactionKind, theme: &Theme) -> Span<'static> {
    match kind {
        TransactionKind::Income => Span::styled(
            format!("+{}", format_amount(amount)),
            Style::default().fg(theme.positive),
        ),
        TransactionKind::Expense => Span::styled(
            format!("-{}", format_amount(amount)),
            Style::default().fg(theme.negative),
        ),
    }
}
