//! Delayed-work classification.
//!
//! A node is delayed when it has an end date strictly before today's date
//! and it is neither completed nor cancelled. Only calendar dates are
//! compared. "Today" comes from a [`Clock`] so that callers and tests can
//! pin it.

use std::fmt;

use jiff::{civil::Date, Zoned};

use crate::models::{DelayedNode, Node, NodeStatus};

/// Source of the current calendar date.
pub trait Clock: Send + Sync + fmt::Debug {
    fn today(&self) -> Date;
}

/// Today's date in the system time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        Zoned::now().date()
    }
}

/// A clock stuck on one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}

/// Whether work ending on `end_date` with `status` is late on `today`.
///
/// ```rust
/// use arbor_core::{models::NodeStatus, wbs::is_delayed};
/// use jiff::civil::date;
///
/// let today = date(2026, 5, 10);
/// assert!(!is_delayed(Some(today), NodeStatus::InProgress, today));
/// assert!(is_delayed(Some(date(2026, 5, 9)), NodeStatus::InProgress, today));
/// assert!(!is_delayed(Some(date(2020, 1, 1)), NodeStatus::Completed, today));
/// assert!(!is_delayed(None, NodeStatus::Pending, today));
/// ```
pub fn is_delayed(end_date: Option<Date>, status: NodeStatus, today: Date) -> bool {
    match (end_date, status) {
        (None, _) | (_, NodeStatus::Completed | NodeStatus::Cancelled) => false,
        (Some(end), _) => end < today,
    }
}

/// Whole calendar days by which work is late on `today`, 0 if it is not
/// delayed.
pub fn delay_days(end_date: Option<Date>, status: NodeStatus, today: Date) -> i64 {
    match end_date {
        Some(end) if is_delayed(end_date, status, today) => today
            .since(end)
            .map(|span| i64::from(span.get_days()))
            .unwrap_or(0),
        _ => 0,
    }
}

/// Applies the delay rule to nodes against a single "today".
#[derive(Debug, Clone, Copy)]
pub struct DelayEvaluator {
    today: Date,
}

impl DelayEvaluator {
    pub fn new(today: Date) -> Self {
        Self { today }
    }

    pub fn from_clock(clock: &dyn Clock) -> Self {
        Self::new(clock.today())
    }

    pub fn today(&self) -> Date {
        self.today
    }

    pub fn is_delayed(&self, node: &Node) -> bool {
        is_delayed(node.end_date, node.status, self.today)
    }

    /// The node with its delay, or `None` if it is on time.
    pub fn evaluate(&self, node: &Node) -> Option<DelayedNode> {
        self.is_delayed(node).then(|| DelayedNode {
            node: node.clone(),
            delay_days: delay_days(node.end_date, node.status, self.today),
        })
    }
}

#[cfg(test)]
mod tests {
    use jiff::{civil::date, Timestamp};

    use super::*;
    use crate::models::Level;

    fn leaf(end_date: Option<Date>, status: NodeStatus) -> Node {
        Node {
            id: 1,
            project_id: 1,
            parent_id: None,
            code: "1".to_string(),
            name: "Pour foundations".to_string(),
            description: None,
            level: Level::L1,
            status,
            progress: 0,
            order: 0,
            weight: 1,
            start_date: None,
            end_date,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_due_today_is_not_delayed() {
        let today = date(2026, 10, 16);
        assert!(!is_delayed(Some(today), NodeStatus::InProgress, today));
        assert_eq!(delay_days(Some(today), NodeStatus::InProgress, today), 0);
    }

    #[test]
    fn test_due_yesterday_is_delayed() {
        let today = date(2026, 10, 16);
        let yesterday = date(2026, 10, 15);
        assert!(is_delayed(Some(yesterday), NodeStatus::InProgress, today));
        assert_eq!(delay_days(Some(yesterday), NodeStatus::InProgress, today), 1);
    }

    #[test]
    fn test_finished_work_is_never_delayed() {
        let today = date(2026, 10, 16);
        let past = date(2024, 2, 29);
        for status in [NodeStatus::Completed, NodeStatus::Cancelled] {
            assert!(!is_delayed(Some(past), status, today));
            assert_eq!(delay_days(Some(past), status, today), 0);
        }
        for status in [NodeStatus::Pending, NodeStatus::InProgress, NodeStatus::OnHold] {
            assert!(is_delayed(Some(past), status, today));
        }
    }

    #[test]
    fn test_delay_days_spans_months() {
        let today = date(2026, 3, 2);
        assert_eq!(
            delay_days(Some(date(2026, 2, 27)), NodeStatus::Pending, today),
            3
        );
        assert_eq!(
            delay_days(Some(date(2025, 3, 2)), NodeStatus::Pending, today),
            365
        );
    }

    #[test]
    fn test_future_end_date() {
        let today = date(2026, 3, 2);
        assert!(!is_delayed(Some(date(2026, 3, 3)), NodeStatus::Pending, today));
    }

    #[test]
    fn test_evaluator_uses_clock() {
        let clock = FixedClock(date(2026, 1, 10));
        let evaluator = DelayEvaluator::from_clock(&clock);

        let late = evaluator
            .evaluate(&leaf(Some(date(2026, 1, 3)), NodeStatus::InProgress))
            .unwrap();
        assert_eq!(late.delay_days, 7);
        assert!(evaluator
            .evaluate(&leaf(Some(date(2026, 1, 10)), NodeStatus::InProgress))
            .is_none());
        assert!(evaluator.evaluate(&leaf(None, NodeStatus::Pending)).is_none());
    }
}
