//! Derived task views (Inbox, Today, Upcoming, Anytime, Someday).
//!
//! Membership is computed from the task and an explicit reference time; it is
//! never stored and never mutates the task.

use std::fmt;

use chrono::{DateTime, Duration, FixedOffset};
use serde::Serialize;

use crate::model::Task;

/// Window, in days, of the Upcoming view.
pub const UPCOMING_WINDOW_DAYS: i64 = 14;

const ANYTIME_PRIORITY: &str = "Anytime";
const SOMEDAY_PRIORITY: &str = "Someday";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Inbox,
    Today,
    Upcoming,
    Anytime,
    Someday,
    /// Any unrecognised key: every task matches.
    All,
}

impl Category {
    /// Navigation order of the named views.
    pub const ALL: [Category; 5] = [
        Category::Inbox,
        Category::Today,
        Category::Upcoming,
        Category::Anytime,
        Category::Someday,
    ];

    /// Never fails: keys match exactly, anything else falls back to
    /// [`Category::All`].
    pub fn from_key(key: &str) -> Self {
        match key {
            "inbox" => Category::Inbox,
            "today" => Category::Today,
            "upcoming" => Category::Upcoming,
            "anytime" => Category::Anytime,
            "someday" => Category::Someday,
            _ => Category::All,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Category::Inbox => "inbox",
            Category::Today => "today",
            Category::Upcoming => "upcoming",
            Category::Anytime => "anytime",
            Category::Someday => "someday",
            Category::All => "all",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::Inbox => "Inbox",
            Category::Today => "Today",
            Category::Upcoming => "Upcoming",
            Category::Anytime => "Anytime",
            Category::Someday => "Someday",
            Category::All => "All Tasks",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Whether `task` shows up in `category` at reference time `now`.
///
/// Due dates without an offset are read in `now`'s offset, so the result only
/// depends on the arguments.
pub fn belongs_to_category(task: &Task, category: Category, now: DateTime<FixedOffset>) -> bool {
    match category {
        Category::Inbox => task.project_id.is_none(),
        Category::Today => task
            .due_at(now.offset())
            .map(|due| due.date_naive() == now.date_naive())
            .unwrap_or(false),
        Category::Upcoming => task
            .due_at(now.offset())
            .map(|due| due > now && due < now + Duration::days(UPCOMING_WINDOW_DAYS))
            .unwrap_or(false),
        // Anytime/Someday are carried in `priority`, not in a dedicated field.
        Category::Anytime => task.priority == ANYTIME_PRIORITY,
        Category::Someday => task.priority == SOMEDAY_PRIORITY,
        Category::All => true,
    }
}

/// Tasks of `tasks` belonging to `category`, in their original order.
pub fn filter_tasks<'a>(
    tasks: &'a [Task],
    category: Category,
    now: DateTime<FixedOffset>,
) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| belongs_to_category(task, category, now))
        .collect()
}
