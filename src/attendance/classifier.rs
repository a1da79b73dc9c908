use chrono::NaiveDateTime;

use crate::clock;
use crate::model::attendance::Punctuality;

pub const DEFAULT_BUSINESS_START_MINUTES: u32 = 9 * 60; // 09:00
pub const DEFAULT_GRACE_MINUTES: u32 = 10;

/// Business-start and grace-window configuration, resolved once at process
/// start and threaded explicitly into every classification.
#[derive(Debug, Clone, Copy)]
pub struct PunctualityRules {
    pub business_start_minutes: u32,
    pub grace_minutes: u32,
}

impl Default for PunctualityRules {
    fn default() -> Self {
        Self {
            business_start_minutes: DEFAULT_BUSINESS_START_MINUTES,
            grace_minutes: DEFAULT_GRACE_MINUTES,
        }
    }
}

/// Classifies a punch-in instant. Boundaries are inclusive on both ends of
/// the grace window: exactly at start and exactly at start+grace are both
/// on-time.
pub fn classify(punch_in: Option<&NaiveDateTime>, rules: &PunctualityRules) -> Punctuality {
    let Some(instant) = punch_in else {
        return Punctuality::Unknown;
    };

    let minutes = clock::minutes_of_day(instant);
    let start = rules.business_start_minutes;

    if minutes < start {
        Punctuality::Early
    } else if minutes <= start + rules.grace_minutes {
        Punctuality::OnTime
    } else {
        Punctuality::Late
    }
}
