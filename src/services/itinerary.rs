//! Structural edits to the stops and activities embedded in a trip.
//!
//! Every function here works on an in-memory `Trip` and either applies the
//! whole change or none of it. Loading, permission checks and persistence
//! belong to `services::trips`.

use std::collections::HashSet;

use chrono::NaiveTime;
use validator::Validate;

use super::budget::{day_span, recompute_stop_budget};
use crate::error::{ApiError, FieldError};
use crate::models::itinerary::{
    Accommodation, Activity, ActivityChange, ActivityToggle, ActivityUpdate, BudgetSummary,
    NewActivity, NewStop, Stop, StopChange, StopUpdate,
};
use crate::models::trip::Trip;

/// Accepts only zero-padded 24h `HH:MM`, so plain string comparison orders times.
pub fn is_clock_time(value: &str) -> bool {
    value.len() == 5
        && value
            .bytes()
            .enumerate()
            .all(|(i, b)| if i == 2 { b == b':' } else { b.is_ascii_digit() })
        && NaiveTime::parse_from_str(value, "%H:%M").is_ok()
}

fn check_schedule(day: i64, start: &str, end: &str, stop_duration: i64) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if day < 1 || day > stop_duration {
        errors.push(FieldError::new(
            "day",
            format!("day must be between 1 and {}", stop_duration),
        ));
    }
    let start_ok = is_clock_time(start);
    let end_ok = is_clock_time(end);
    if !start_ok {
        errors.push(FieldError::new("startTime", "startTime must be HH:MM"));
    }
    if !end_ok {
        errors.push(FieldError::new("endTime", "endTime must be HH:MM"));
    }
    if start_ok && end_ok && start >= end {
        errors.push(FieldError::new("endTime", "endTime must be after startTime"));
    }
    errors
}

fn stop_index(trip: &Trip, stop_id: &str) -> Result<usize, ApiError> {
    trip.itinerary
        .stops
        .iter()
        .position(|s| s.id == stop_id)
        .ok_or(ApiError::NotFound("Stop"))
}

fn activity_index(stop: &Stop, activity_id: &str) -> Result<usize, ApiError> {
    stop.activities
        .iter()
        .position(|a| a.id == activity_id)
        .ok_or(ApiError::NotFound("Activity"))
}

fn resequence(trip: &mut Trip) {
    for (order, stop) in trip.itinerary.stops.iter_mut().enumerate() {
        stop.order = order;
    }
}

pub fn add_stop(trip: &mut Trip, input: NewStop) -> Result<StopChange, ApiError> {
    input.validate()?;
    if input.departure_date <= input.arrival_date {
        return Err(ApiError::invalid(
            "departureDate",
            "departureDate must be after arrivalDate",
        ));
    }

    let duration = day_span(input.arrival_date, input.departure_date);
    let mut stop = Stop {
        id: uuid::Uuid::new_v4().to_string(),
        city: input.city.trim().to_string(),
        country: input.country.trim().to_string(),
        coordinates: input.coordinates,
        arrival_date: input.arrival_date,
        departure_date: input.departure_date,
        duration,
        accommodation: Accommodation::spanning(input.arrival_date, input.departure_date, duration),
        activities: Vec::new(),
        daily_budget: input.daily_budget.unwrap_or(0.0),
        transportation: input.transportation,
        notes: input.notes,
        order: trip.itinerary.stops.len(),
        total_budget: 0.0,
    };
    let budget = recompute_stop_budget(&mut stop);

    trip.itinerary.stops.push(stop.clone());
    trip.touch();
    Ok(StopChange { stop, budget })
}

pub fn update_stop(
    trip: &mut Trip,
    stop_id: &str,
    update: StopUpdate,
) -> Result<StopChange, ApiError> {
    update.validate()?;
    let index = stop_index(trip, stop_id)?;
    let mut stop = trip.itinerary.stops[index].clone();

    let arrival = update.arrival_date.unwrap_or(stop.arrival_date);
    let departure = update.departure_date.unwrap_or(stop.departure_date);
    let dates_changed = arrival != stop.arrival_date || departure != stop.departure_date;

    if dates_changed {
        if departure <= arrival {
            return Err(ApiError::invalid(
                "departureDate",
                "departureDate must be after arrivalDate",
            ));
        }
        let duration = day_span(arrival, departure);
        if let Some(last_day) = stop.activities.iter().map(|a| a.day).max() {
            if last_day > duration {
                return Err(ApiError::invalid(
                    "departureDate",
                    format!(
                        "stop has activities on day {}, beyond the new duration of {} days",
                        last_day, duration
                    ),
                ));
            }
        }

        stop.arrival_date = arrival;
        stop.departure_date = departure;
        stop.duration = duration;

        let accommodation = &mut stop.accommodation;
        accommodation.check_in = arrival;
        accommodation.check_out = departure;
        accommodation.nights = duration;
        if accommodation.cost_per_night > 0.0 {
            accommodation.total_cost = accommodation.cost_per_night * duration as f64;
        }
    }

    if let Some(city) = update.city {
        stop.city = city.trim().to_string();
    }
    if let Some(country) = update.country {
        stop.country = country.trim().to_string();
    }
    if let Some(coordinates) = update.coordinates {
        stop.coordinates = Some(coordinates);
    }
    if let Some(daily_budget) = update.daily_budget {
        stop.daily_budget = daily_budget;
    }
    if let Some(transportation) = update.transportation {
        stop.transportation = Some(transportation);
    }
    if let Some(notes) = update.notes {
        stop.notes = Some(notes);
    }

    if let Some(changes) = update.accommodation {
        let accommodation = &mut stop.accommodation;
        if let Some(name) = changes.name {
            accommodation.name = Some(name);
        }
        if let Some(kind) = changes.kind {
            accommodation.kind = kind;
        }
        if let Some(address) = changes.address {
            accommodation.address = Some(address);
        }
        if let Some(reference) = changes.booking_reference {
            accommodation.booking_reference = Some(reference);
        }
        if let Some(confirmed) = changes.confirmed {
            accommodation.confirmed = confirmed;
        }
        if let Some(per_night) = changes.cost_per_night {
            accommodation.cost_per_night = per_night;
            accommodation.total_cost = per_night * accommodation.nights as f64;
        }
        if let Some(total) = changes.total_cost {
            accommodation.total_cost = total;
        }
    }

    let budget = recompute_stop_budget(&mut stop);
    trip.itinerary.stops[index] = stop.clone();
    trip.touch();
    Ok(StopChange { stop, budget })
}

pub fn delete_stop(trip: &mut Trip, stop_id: &str) -> Result<Stop, ApiError> {
    trip.itinerary.stops.sort_by_key(|s| s.order);
    let index = stop_index(trip, stop_id)?;
    let removed = trip.itinerary.stops.remove(index);
    resequence(trip);
    trip.touch();
    Ok(removed)
}

/// Applies a complete ordering of the trip's stops.
pub fn reorder_stops(trip: &mut Trip, stop_ids: &[String]) -> Result<Vec<Stop>, ApiError> {
    let stops = &trip.itinerary.stops;
    if stop_ids.len() != stops.len() {
        return Err(ApiError::invalid(
            "stopIds",
            format!("expected {} stop ids, got {}", stops.len(), stop_ids.len()),
        ));
    }

    let known: HashSet<&str> = stops.iter().map(|s| s.id.as_str()).collect();
    let mut seen = HashSet::new();
    for id in stop_ids {
        if !known.contains(id.as_str()) {
            return Err(ApiError::invalid("stopIds", format!("unknown stop id {}", id)));
        }
        if !seen.insert(id.as_str()) {
            return Err(ApiError::invalid("stopIds", format!("duplicate stop id {}", id)));
        }
    }

    for stop in trip.itinerary.stops.iter_mut() {
        stop.order = stop_ids
            .iter()
            .position(|id| *id == stop.id)
            .unwrap_or(stop.order);
    }
    trip.itinerary.stops.sort_by_key(|s| s.order);
    trip.touch();
    Ok(trip.itinerary.stops.clone())
}

pub fn add_activity(
    trip: &mut Trip,
    stop_id: &str,
    input: NewActivity,
) -> Result<ActivityChange, ApiError> {
    let index = stop_index(trip, stop_id)?;
    input.validate()?;

    let stop = &mut trip.itinerary.stops[index];
    let errors = check_schedule(input.day, &input.start_time, &input.end_time, stop.duration);
    if !errors.is_empty() {
        return Err(ApiError::ValidationFailed(errors));
    }

    let activity = Activity {
        id: uuid::Uuid::new_v4().to_string(),
        day: input.day,
        name: input.name.trim().to_string(),
        description: input.description,
        category: input.category.unwrap_or_default(),
        start_time: input.start_time,
        end_time: input.end_time,
        location: input.location,
        cost: input.cost.unwrap_or(0.0),
        booking_required: input.booking_required.unwrap_or(false),
        booking_url: input.booking_url,
        notes: input.notes,
        completed: false,
        rating: input.rating,
    };
    stop.activities.push(activity.clone());
    let budget = recompute_stop_budget(stop);
    trip.touch();
    Ok(ActivityChange { activity, budget })
}

pub fn update_activity(
    trip: &mut Trip,
    stop_id: &str,
    activity_id: &str,
    update: ActivityUpdate,
) -> Result<ActivityChange, ApiError> {
    let index = stop_index(trip, stop_id)?;
    update.validate()?;

    let stop = &mut trip.itinerary.stops[index];
    let position = activity_index(stop, activity_id)?;
    let mut activity = stop.activities[position].clone();

    let day = update.day.unwrap_or(activity.day);
    let start = update.start_time.unwrap_or_else(|| activity.start_time.clone());
    let end = update.end_time.unwrap_or_else(|| activity.end_time.clone());
    let errors = check_schedule(day, &start, &end, stop.duration);
    if !errors.is_empty() {
        return Err(ApiError::ValidationFailed(errors));
    }

    activity.day = day;
    activity.start_time = start;
    activity.end_time = end;
    if let Some(name) = update.name {
        activity.name = name.trim().to_string();
    }
    if let Some(description) = update.description {
        activity.description = Some(description);
    }
    if let Some(category) = update.category {
        activity.category = category;
    }
    if let Some(location) = update.location {
        activity.location = Some(location);
    }
    if let Some(cost) = update.cost {
        activity.cost = cost;
    }
    if let Some(required) = update.booking_required {
        activity.booking_required = required;
    }
    if let Some(url) = update.booking_url {
        activity.booking_url = Some(url);
    }
    if let Some(notes) = update.notes {
        activity.notes = Some(notes);
    }
    if let Some(rating) = update.rating {
        activity.rating = Some(rating);
    }

    stop.activities[position] = activity.clone();
    let budget = recompute_stop_budget(stop);
    trip.touch();
    Ok(ActivityChange { activity, budget })
}

pub fn delete_activity(
    trip: &mut Trip,
    stop_id: &str,
    activity_id: &str,
) -> Result<BudgetSummary, ApiError> {
    let index = stop_index(trip, stop_id)?;
    let stop = &mut trip.itinerary.stops[index];
    let position = activity_index(stop, activity_id)?;
    stop.activities.remove(position);
    let budget = recompute_stop_budget(stop);
    trip.touch();
    Ok(budget)
}

pub fn toggle_activity(
    trip: &mut Trip,
    stop_id: &str,
    activity_id: &str,
    toggle: ActivityToggle,
) -> Result<ActivityChange, ApiError> {
    let index = stop_index(trip, stop_id)?;
    toggle.validate()?;

    let stop = &mut trip.itinerary.stops[index];
    let position = activity_index(stop, activity_id)?;
    let activity = &mut stop.activities[position];
    activity.completed = !activity.completed;
    if let Some(rating) = toggle.rating {
        activity.rating = Some(rating);
    }
    let activity = activity.clone();

    let budget = recompute_stop_budget(stop);
    trip.touch();
    Ok(ActivityChange { activity, budget })
}

/// Activities of a stop in chronological order, optionally for one day only.
pub fn list_activities(
    trip: &Trip,
    stop_id: &str,
    day: Option<i64>,
) -> Result<Vec<Activity>, ApiError> {
    let index = stop_index(trip, stop_id)?;
    let mut activities: Vec<Activity> = trip.itinerary.stops[index]
        .activities
        .iter()
        .filter(|a| day.map_or(true, |d| a.day == d))
        .cloned()
        .collect();
    activities.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    Ok(activities)
}
