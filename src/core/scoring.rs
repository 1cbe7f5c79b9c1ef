use crate::core::time::{DaySet, TimeSlot, Weekday};
use crate::models::{Combination, PreferenceProfile, ScoringWeights, SpreadPreference, TimeOfDay};

/// 9:00am, earlier starts count as early morning
const EARLY_CUTOFF: u16 = 9 * 60;
/// 12:00pm, start of the afternoon band
const NOON: u16 = 12 * 60;
/// 5:00pm, later starts count as evening
const EVENING_CUTOFF: u16 = 17 * 60;

/// Score a full schedule against a preference profile (higher is better)
///
/// Scoring formula:
/// score = base (100)
///     + centering: center_score * 30 - spread * 0.01     (spreadPreference = centered)
///     + spreading: min(spread * 0.05, 30)                 (spreadPreference = spread)
///     + window_score * 20                                 (preferred window set)
///     - 10 per slot starting before 9:00                  (avoidEarlyMorning)
///     - 10 per slot starting after 17:00                  (avoidLateEvening)
///     + 15 per weekday without class                      (prioritizeFreeDays)
///     - min(gap_minutes / 10, 50), or + 20 with no gaps   (minimizeGaps)
///     - 25 per class above the cap, per weekday           (maxClassesPerDay)
///     + 8 per slot in the preferred band                  (preferredTimeOfDay)
///
/// Terms are independent, so evaluation order does not matter. A slot that is
/// to be arranged (no days, or no valid window) takes part in no term at all.
/// An empty schedule scores 0.
pub fn score_schedule(
    schedule: &[Combination<'_>],
    preferences: &PreferenceProfile,
    weights: &ScoringWeights,
) -> f64 {
    if schedule.is_empty() {
        return 0.0;
    }

    let slots: Vec<&TimeSlot> = schedule
        .iter()
        .flat_map(|combo| combo.time_slots())
        .filter(|slot| slot.is_verifiable())
        .collect();
    let windows: Vec<(u16, u16)> = slots.iter().filter_map(|slot| slot.window()).collect();

    let mut score = weights.base;

    match preferences.spread_preference {
        Some(SpreadPreference::Centered) => {
            score += calculate_center_score(&windows) * weights.centering;
            score -= calculate_spread(&windows) * weights.spread_penalty;
        }
        Some(SpreadPreference::Spread) => {
            score += (calculate_spread(&windows) * weights.spread_bonus).min(weights.spread_bonus_cap);
        }
        None => {}
    }

    if let Some(window) = preferences.preferred_window() {
        score += calculate_window_score(&windows, window) * weights.preferred_window;
    }

    if preferences.avoid_early_morning {
        let early = count_starts(&windows, |start| start < EARLY_CUTOFF);
        score -= early as f64 * weights.early_penalty;
    }

    if preferences.avoid_late_evening {
        let late = count_starts(&windows, |start| start > EVENING_CUTOFF);
        score -= late as f64 * weights.late_penalty;
    }

    if preferences.prioritize_free_days {
        let used = slots
            .iter()
            .fold(DaySet::empty(), |days, slot| days.union(&slot.days));
        let free_days = Weekday::ALL.len() - used.len();
        score += free_days as f64 * weights.free_day;
    }

    if preferences.minimize_gaps {
        let gap_minutes = calculate_gap_minutes(&slots);
        if gap_minutes > 0 {
            score -= (gap_minutes as f64 / weights.gap_divisor).min(weights.gap_penalty_cap);
        } else {
            score += weights.no_gap_bonus;
        }
    }

    if let Some(cap) = preferences.max_classes_per_day {
        let excess: u32 = classes_per_day(&slots)
            .iter()
            .map(|&count| count.saturating_sub(cap))
            .sum();
        score -= excess as f64 * weights.excess_class_penalty;
    }

    if let Some(band) = preferences.preferred_time_of_day {
        let in_band = count_starts(&windows, |start| match band {
            TimeOfDay::Morning => start < NOON,
            TimeOfDay::Afternoon => (NOON..=EVENING_CUTOFF).contains(&start),
            TimeOfDay::Evening => start > EVENING_CUTOFF,
        });
        score += in_band as f64 * weights.time_of_day;
    }

    score
}

/// How spread out the schedule is (lower = more compact)
///
/// Span from earliest start to latest end, plus a tenth of the variance of the
/// start times when there is more than one meeting.
pub fn calculate_spread(windows: &[(u16, u16)]) -> f64 {
    let Some((earliest, latest)) = bounds(windows) else {
        return 0.0;
    };
    let span = (latest - earliest) as f64;

    if windows.len() > 1 {
        span + variance(windows.iter().map(|&(start, _)| start as f64)) * 0.1
    } else {
        span
    }
}

/// Average proximity (0-1) of start times to the middle of the schedule's day
#[inline]
pub fn calculate_center_score(windows: &[(u16, u16)]) -> f64 {
    let Some((earliest, latest)) = bounds(windows) else {
        return 0.0;
    };
    let center = (earliest + latest) as f64 / 2.0;
    let span = (latest - earliest) as f64;

    proximity(windows, center, span)
}

/// Average proximity (0-1) of start times to the middle of a preferred window
///
/// Starts at or beyond the window's edges score 0 for that meeting.
#[inline]
pub fn calculate_window_score(windows: &[(u16, u16)], (start, end): (u16, u16)) -> f64 {
    let center = (start as f64 + end as f64) / 2.0;
    let half_width = (end as f64 - start as f64) / 2.0;

    proximity(windows, center, half_width)
}

/// Total minutes between consecutive meetings on the same day
pub fn calculate_gap_minutes(slots: &[&TimeSlot]) -> u32 {
    let mut total = 0u32;

    for day in Weekday::ALL {
        let mut day_windows: Vec<(u16, u16)> = slots
            .iter()
            .filter(|slot| slot.days.contains(day))
            .filter_map(|slot| slot.window())
            .collect();
        day_windows.sort_by_key(|&(start, _)| start);

        total += day_windows
            .windows(2)
            .map(|pair| pair[1].0.saturating_sub(pair[0].1) as u32)
            .sum::<u32>();
    }

    total
}

/// Meetings per weekday, Monday first
pub fn classes_per_day(slots: &[&TimeSlot]) -> [u32; 5] {
    let mut counts = [0u32; 5];
    for slot in slots {
        for day in slot.days.iter() {
            counts[day.index()] += 1;
        }
    }
    counts
}

fn bounds(windows: &[(u16, u16)]) -> Option<(u16, u16)> {
    let earliest = windows.iter().map(|&(start, _)| start).min()?;
    let latest = windows.iter().map(|&(_, end)| end).max()?;
    Some((earliest, latest))
}

fn proximity(windows: &[(u16, u16)], center: f64, scale: f64) -> f64 {
    if windows.is_empty() || scale <= 0.0 {
        return 0.0;
    }

    let total: f64 = windows
        .iter()
        .map(|&(start, _)| (1.0 - (start as f64 - center).abs() / scale).max(0.0))
        .sum();

    total / windows.len() as f64
}

fn variance(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let n = values.clone().count() as f64;
    if n == 0.0 {
        return 0.0;
    }
    let mean = values.clone().sum::<f64>() / n;
    values.map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

#[inline]
fn count_starts(windows: &[(u16, u16)], predicate: impl Fn(u16) -> bool) -> usize {
    windows.iter().filter(|&&(start, _)| predicate(start)).count()
}
