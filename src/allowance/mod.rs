use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::patron::PatronStatus;

pub const NICKNAME_PLACEHOLDER: &str = "No nickname";
pub const UNKNOWN_NAME: &str = "Unknown";

/// Base allowance for homerooms in the upper grade band (names starting
/// with '3', '4' or '5'); all others get [`BASE_ALLOWANCE_LOWER`].
pub const BASE_ALLOWANCE_UPPER: u32 = 5;
pub const BASE_ALLOWANCE_LOWER: u32 = 3;

/// Minimum allowance; also forced whenever any book is overdue.
pub const MIN_ALLOWANCE: u32 = 1;

/// Per-student borrowing allowance, computed fresh per request.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceRecord {
    pub name: String,
    pub nickname: String,
    pub books_checked_out: u32,
    pub overdue_books: u32,
    pub final_allowance: u32,
}

impl AllowanceRecord {
    /// Conservative stand-in for a student whose upstream fetch failed:
    /// nothing counted against them, allowance at the minimum.
    pub fn fallback() -> Self {
        Self {
            name: UNKNOWN_NAME.to_string(),
            nickname: NICKNAME_PLACEHOLDER.to_string(),
            books_checked_out: 0,
            overdue_books: 0,
            final_allowance: MIN_ALLOWANCE,
        }
    }
}

/// Compute a student's allowance from their current checkout status.
pub fn compute_allowance(homeroom: &str, patron: &PatronStatus) -> AllowanceRecord {
    compute_allowance_at(homeroom, patron, Utc::now().date_naive())
}

/// Same as [`compute_allowance`] with an explicit "today", so overdue
/// counting is testable without the wall clock.
pub fn compute_allowance_at(homeroom: &str, patron: &PatronStatus, today: NaiveDate) -> AllowanceRecord {
    let books_checked_out = patron.items_out.len() as u32;
    let overdue_books = patron
        .items_out
        .iter()
        .filter(|item| item.due_date().is_some_and(|due| due < today))
        .count() as u32;

    let base_allowance = match homeroom.chars().next() {
        Some('3') | Some('4') | Some('5') => BASE_ALLOWANCE_UPPER,
        _ => BASE_ALLOWANCE_LOWER,
    };

    // Any overdue book forces the minimum, regardless of how many are out.
    let deficit = base_allowance as i64 - books_checked_out as i64;
    let final_allowance = if deficit < MIN_ALLOWANCE as i64 || overdue_books > 0 {
        MIN_ALLOWANCE
    } else {
        deficit as u32
    };

    AllowanceRecord {
        name: display_name(patron),
        nickname: patron
            .nick_name
            .clone()
            .unwrap_or_else(|| NICKNAME_PLACEHOLDER.to_string()),
        books_checked_out,
        overdue_books,
        final_allowance,
    }
}

fn display_name(patron: &PatronStatus) -> String {
    let first = patron.first_name.as_deref().unwrap_or(UNKNOWN_NAME);
    let last = patron.last_name.as_deref().unwrap_or("");
    format!("{} {}", first, last).trim().to_string()
}
