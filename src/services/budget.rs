use chrono::{DateTime, Utc};

use crate::models::itinerary::{BudgetSummary, Stop};

const MS_PER_DAY: i64 = 86_400_000;

/// Whole days covered by `[from, to]`, rounding any partial day up.
pub fn day_span(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let millis = (to - from).num_milliseconds().abs();
    (millis + MS_PER_DAY - 1) / MS_PER_DAY
}

pub fn activities_cost(stop: &Stop) -> f64 {
    stop.activities.iter().map(|a| a.cost).sum()
}

/// Accommodation + daily allowance over the stay + every activity.
pub fn stop_budget(stop: &Stop) -> f64 {
    stop.accommodation.total_cost + stop.daily_budget * stop.duration as f64 + activities_cost(stop)
}

/// Stores the derived total on the stop and returns the figures callers report.
pub fn recompute_stop_budget(stop: &mut Stop) -> BudgetSummary {
    stop.total_budget = stop_budget(stop);
    summary(stop)
}

pub fn summary(stop: &Stop) -> BudgetSummary {
    BudgetSummary {
        total_budget: stop.total_budget,
        activities_cost: activities_cost(stop),
    }
}
