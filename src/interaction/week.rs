//! Gift-exchange week numbering.

use chrono::NaiveDate;

/// One-based week index since `base`; days before `base` are week 0.
pub fn week_index(today: NaiveDate, base: NaiveDate) -> u32 {
    let days = (today - base).num_days();
    if days < 0 {
        return 0;
    }

    u32::try_from(days / 7 + 1).unwrap_or(u32::MAX)
}
