//! Derived aggregates over the transaction mirror.
//!
//! Everything here is a pure function of the current sequence and an
//! evaluation instant; nothing is accumulated between calls, so the values
//! can never be stale with respect to the mirror.

use api_types::transaction::{Transaction, TransactionKind};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

/// How many transactions the activity feed shows.
pub const RECENT_ACTIVITY: usize = 10;

/// Same calendar day as `now`, observed in `now`'s own offset: same year,
/// month and day-of-month. 23:00 yesterday and 01:00 today are different
/// days even though they are two hours apart.
fn same_calendar_day(date: &DateTime<FixedOffset>, now: &DateTime<FixedOffset>) -> bool {
    date.with_timezone(now.offset()).date_naive() == now.date_naive()
}

/// Transactions dated on the same calendar day as `now`, in mirror order.
pub fn today_transactions<'a>(
    transactions: &'a [Transaction],
    now: &DateTime<FixedOffset>,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|tx| same_calendar_day(&tx.date, now))
        .collect()
}

fn total_today(
    transactions: &[Transaction],
    now: &DateTime<FixedOffset>,
    kind: TransactionKind,
) -> Decimal {
    transactions
        .iter()
        .filter(|tx| tx.kind == kind && same_calendar_day(&tx.date, now))
        .map(|tx| tx.amount)
        .sum()
}

pub fn income_today(transactions: &[Transaction], now: &DateTime<FixedOffset>) -> Decimal {
    total_today(transactions, now, TransactionKind::Income)
}

pub fn expense_today(transactions: &[Transaction], now: &DateTime<FixedOffset>) -> Decimal {
    total_today(transactions, now, TransactionKind::Expense)
}

/// Income minus expenses for the day; negative on a bad day.
pub fn net_profit_today(transactions: &[Transaction], now: &DateTime<FixedOffset>) -> Decimal {
    income_today(transactions, now) - expense_today(transactions, now)
}

/// The first [`RECENT_ACTIVITY`] entries in mirror order (most recent
/// first).
pub fn recent_activity(transactions: &[Transaction]) -> &[Transaction] {
    &transactions[..transactions.len().min(RECENT_ACTIVITY)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tx(id: &str, date: &str, kind: TransactionKind, amount: Decimal) -> Transaction {
        Transaction {
            id: id.to_string(),
            date: DateTime::parse_from_rfc3339(date).unwrap(),
            kind,
            amount,
            description: format!("tx {id}"),
            service_id: None,
        }
    }

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-03-14T12:00:00+01:00").unwrap()
    }

    #[test]
    fn day_totals_partition_by_kind() {
        let txs = vec![
            tx(
                "1",
                "2026-03-14T09:00:00+01:00",
                TransactionKind::Income,
                dec!(100),
            ),
            tx(
                "2",
                "2026-03-14T10:30:00+01:00",
                TransactionKind::Expense,
                dec!(40),
            ),
            tx(
                "3",
                "2026-03-13T18:00:00+01:00",
                TransactionKind::Income,
                dec!(10),
            ),
        ];

        assert_eq!(income_today(&txs, &now()), dec!(100));
        assert_eq!(expense_today(&txs, &now()), dec!(40));
        assert_eq!(net_profit_today(&txs, &now()), dec!(60));
        assert_eq!(recent_activity(&txs).len(), 3);
        assert_eq!(recent_activity(&txs)[0].id, "1");
    }

    #[test]
    fn same_day_is_calendar_day_not_24_hours() {
        // 23:00 the previous evening is closer to `now` than most of today,
        // but falls outside the calendar day.
        let txs = vec![
            tx(
                "late",
                "2026-03-13T23:00:00+01:00",
                TransactionKind::Income,
                dec!(5),
            ),
            tx(
                "early",
                "2026-03-14T01:00:00+01:00",
                TransactionKind::Income,
                dec!(7),
            ),
        ];
        let now = DateTime::parse_from_rfc3339("2026-03-14T01:30:00+01:00").unwrap();

        let today: Vec<_> = today_transactions(&txs, &now)
            .iter()
            .map(|tx| tx.id.as_str())
            .collect();
        assert_eq!(today, ["early"]);
        assert_eq!(income_today(&txs, &now), dec!(7));
    }

    #[test]
    fn dates_are_compared_in_the_observer_offset() {
        // 23:30 UTC on the 13th is already 00:30 on the 14th for a +01:00
        // observer.
        let txs = vec![tx(
            "utc",
            "2026-03-13T23:30:00+00:00",
            TransactionKind::Income,
            dec!(12),
        )];

        assert_eq!(income_today(&txs, &now()), dec!(12));

        let utc_observer = DateTime::parse_from_rfc3339("2026-03-14T12:00:00+00:00").unwrap();
        assert_eq!(income_today(&txs, &utc_observer), dec!(0));
    }

    #[test]
    fn net_profit_identity_holds_on_empty_and_one_sided_days() {
        let now = now();

        let empty: Vec<Transaction> = Vec::new();
        assert_eq!(income_today(&empty, &now), dec!(0));
        assert_eq!(expense_today(&empty, &now), dec!(0));
        assert_eq!(net_profit_today(&empty, &now), dec!(0));

        let only_expenses = vec![
            tx(
                "1",
                "2026-03-14T09:00:00+01:00",
                TransactionKind::Expense,
                dec!(19.90),
            ),
            tx(
                "2",
                "2026-03-14T11:00:00+01:00",
                TransactionKind::Expense,
                dec!(5.10),
            ),
        ];
        assert_eq!(net_profit_today(&only_expenses, &now), dec!(-25.00));
    }

    #[test]
    fn recent_activity_caps_at_ten_in_mirror_order() {
        let txs: Vec<Transaction> = (0..13)
            .map(|i| {
                tx(
                    &format!("t{i}"),
                    "2026-03-14T09:00:00+01:00",
                    TransactionKind::Income,
                    dec!(1),
                )
            })
            .collect();

        let recent = recent_activity(&txs);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].id, "t0");
        assert_eq!(recent[9].id, "t9");
    }
}
