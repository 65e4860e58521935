use crate::models::{AppData, Plan, Rhythm, WeightEntry};
use chrono::{Local, Utc};

/// Number of water slots the page shows. The API refuses clicks outside
/// this range, which is the only thing keeping stored tallies at 5 or less.
pub const WATER_SLOTS: u8 = 5;

const MS_PER_DAY: i64 = 86_400_000;

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Key for today's water tally, local calendar date.
pub fn today_key() -> String {
    Local::now().date_naive().to_string()
}

/// Attack-phase length in days as a step function of the kilograms to
/// lose. Boundaries belong to the lower bracket (20 kg still gives 5 days).
pub fn attack_days(diff: f64) -> u32 {
    if diff > 20.0 {
        7
    } else if diff > 10.0 {
        5
    } else if diff > 5.0 {
        3
    } else {
        2
    }
}

/// Parses a user-entered weight. Empty, non-numeric and non-finite input
/// all yield `None`.
pub fn parse_weight(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|weight| weight.is_finite())
}

pub fn create_plan(
    data: &mut AppData,
    start_weight: f64,
    target_weight: f64,
    rhythm: Rhythm,
) -> Option<Plan> {
    create_plan_at(now_ms(), data, start_weight, target_weight, rhythm)
}

/// Computes the three phase durations and installs the plan, wiping any
/// previous plan, log history and water tallies. Returns `None` without
/// touching the state unless both weights are finite, the target is
/// positive and the start lies above it.
///
/// Cruise and consolidation days round half up (7 and 10 days per kilogram
/// to lose).
pub fn create_plan_at(
    now: i64,
    data: &mut AppData,
    start_weight: f64,
    target_weight: f64,
    rhythm: Rhythm,
) -> Option<Plan> {
    if !start_weight.is_finite() || !target_weight.is_finite() {
        return None;
    }
    if target_weight <= 0.0 || start_weight <= target_weight {
        return None;
    }

    let diff = start_weight - target_weight;
    let plan = Plan {
        start_weight,
        target_weight,
        start_date: now,
        attack_days: attack_days(diff),
        cruise_days: (diff * 7.0).round() as u32,
        consolidation_days: (diff * 10.0).round() as u32,
        rhythm,
    };

    data.plan = Some(plan.clone());
    data.logs = vec![WeightEntry {
        date: now,
        weight: start_weight,
    }];
    data.water.clear();

    Some(plan)
}

pub fn record_weight(data: &mut AppData, raw: &str) -> bool {
    record_weight_at(now_ms(), data, raw)
}

/// Appends one measurement. No bounds and no monotonicity requirement;
/// the only rejection is input that does not parse into a finite number.
pub fn record_weight_at(now: i64, data: &mut AppData, raw: &str) -> bool {
    let Some(weight) = parse_weight(raw) else {
        return false;
    };
    data.logs.push(WeightEntry { date: now, weight });
    true
}

pub fn record_water(data: &mut AppData, slot: u8) -> u8 {
    record_water_on(&today_key(), data, slot)
}

/// Applies a click on water slot `slot` (0-based) to the tally for `day`
/// and returns the new tally. Clicking slot `i` fills the row up to
/// `i + 1`, except that clicking the slot sitting at the top of the fill
/// empties it again, dropping the tally to `i`. No clamping happens here.
pub fn record_water_on(day: &str, data: &mut AppData, slot: u8) -> u8 {
    let current = water_on(day, data);
    let filled = slot.saturating_add(1);
    let next = if filled == current { slot } else { filled };
    data.water.insert(day.to_string(), next);
    next
}

/// Restores the untouched-state shape: no plan, no logs, no tallies.
pub fn reset(data: &mut AppData) {
    *data = AppData::default();
}

/// Latest logged weight; an empty log falls back to the plan's start weight.
pub fn current_weight(data: &AppData) -> Option<f64> {
    data.logs
        .last()
        .map(|entry| entry.weight)
        .or_else(|| data.plan.as_ref().map(|plan| plan.start_weight))
}

/// Kilograms lost since the start, formatted to one decimal.
pub fn weight_lost(data: &AppData) -> Option<String> {
    let plan = data.plan.as_ref()?;
    let current = current_weight(data)?;
    Some(format!("{:.1}", plan.start_weight - current))
}

pub fn current_day(data: &AppData) -> Option<i64> {
    current_day_at(now_ms(), data)
}

/// 1-based day of the plan: floor division of the elapsed time, with no
/// upper clamp, so the counter keeps running past the planned durations.
pub fn current_day_at(now: i64, data: &AppData) -> Option<i64> {
    let plan = data.plan.as_ref()?;
    Some((now - plan.start_date).div_euclid(MS_PER_DAY) + 1)
}

/// Dashboard label. Always "Attack": phase durations feed the plan card,
/// but the displayed phase does not advance with elapsed days.
pub fn current_phase() -> &'static str {
    "Attack"
}

/// Water tally readout for a day; days never touched read as zero.
pub fn water_on(day: &str, data: &AppData) -> u8 {
    data.water.get(day).copied().unwrap_or(0)
}

pub fn water_today(data: &AppData) -> u8 {
    water_on(&today_key(), data)
}
