//! Wall-clock time and how to say it in words.
//!
//! [`time_to_words`] rounds a time to the nearest phrase the clock can show
//! ("twenty five past ten", "a quarter to noon"). [`Clock`] supplies the time
//! each tick, either from the local clock or from a fixed start, optionally
//! shifted and advanced per tick to simulate a running day.
//!
//! ## Rust concepts
//! - `chrono::Timelike` for `hour()` / `minute()` / `second()` on any time type
//! - `Iterator::min_by_key`, which keeps the first of equally-close phrases

use chrono::{Local, NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

// ── Wording ──────────────────────────────────────────────────────────

/// How the hours 0 and 12 are named.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HourStyle {
    /// "twelve"
    #[default]
    Number,
    /// "midnight" and "noon"
    Name,
}

/// What follows an on-the-hour phrase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suffix {
    None,
    AmPm,
    #[default]
    #[serde(rename = "oclock")]
    OClock,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wording {
    /// Quarter-hour phrases only.
    pub simple: bool,
    pub suffix: Suffix,
    pub hours: HourStyle,
    /// Say "a quarter" rather than "quarter".
    pub show_a: bool,
}

#[derive(Clone, Copy, Debug)]
enum Phrase {
    Hour,
    NextHour,
    QuarterPast,
    HalfPast,
    QuarterTo,
    Past(&'static str),
    To(&'static str),
}

impl Phrase {
    fn names_next_hour(self) -> bool {
        matches!(self, Phrase::NextHour | Phrase::QuarterTo | Phrase::To(_))
    }
}

const QUARTERS: [(u32, Phrase); 5] = [
    (0, Phrase::Hour),
    (15, Phrase::QuarterPast),
    (30, Phrase::HalfPast),
    (45, Phrase::QuarterTo),
    (60, Phrase::NextHour),
];

const FIVES: [(u32, Phrase); 8] = [
    (5, Phrase::Past("five")),
    (10, Phrase::Past("ten")),
    (20, Phrase::Past("twenty")),
    (25, Phrase::Past("twenty five")),
    (35, Phrase::To("twenty five")),
    (40, Phrase::To("twenty")),
    (50, Phrase::To("ten")),
    (55, Phrase::To("five")),
];

const HOURS: [&str; 12] = [
    "twelve", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven",
];

fn hour_word(hour: u32, style: HourStyle) -> &'static str {
    match (hour % 24, style) {
        (0, HourStyle::Name) => "midnight",
        (12, HourStyle::Name) => "noon",
        (h, _) => HOURS[(h % 12) as usize],
    }
}

/// The phrase for `time`, rounded to the nearest quarter (simple) or five
/// minutes.
///
/// Midnight and noon never take a suffix.
pub fn time_to_words(time: impl Timelike, wording: Wording) -> String {
    let minute = time.minute();
    let candidates = QUARTERS
        .iter()
        .chain(if wording.simple { &FIVES[..0] } else { &FIVES[..] });
    let (_, phrase) = candidates
        .min_by_key(|(target, _)| minute.abs_diff(*target))
        .copied()
        .unwrap_or((0, Phrase::Hour));

    let hour = time.hour();
    let spoken_hour = if phrase.names_next_hour() { hour + 1 } else { hour };
    let name = hour_word(spoken_hour, wording.hours);
    let suffix = match wording.suffix {
        _ if name == "midnight" || name == "noon" => "",
        Suffix::None => "",
        Suffix::OClock => " oclock",
        Suffix::AmPm if spoken_hour < 12 || spoken_hour > 23 => " AM",
        Suffix::AmPm => " PM",
    };
    let a = if wording.show_a { "a " } else { "" };

    match phrase {
        Phrase::Hour | Phrase::NextHour => format!("{name}{suffix}"),
        Phrase::QuarterPast => format!("{a}quarter past {name}"),
        Phrase::HalfPast => format!("half past {name}"),
        Phrase::QuarterTo => format!("{a}quarter to {name}"),
        Phrase::Past(minutes) => format!("{minutes} past {name}"),
        Phrase::To(minutes) => format!("{minutes} to {name}"),
    }
}

// ── Time source ──────────────────────────────────────────────────────

/// Where a [`Clock`] gets its time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClockSettings {
    /// Start from this time instead of the local clock.
    pub fixed: Option<NaiveTime>,
    /// Minutes added to every reading.
    pub offset_minutes: i64,
    /// Minutes the clock runs ahead after each tick.
    pub step_minutes: i64,
}

#[derive(Clone, Debug)]
pub struct Clock {
    settings: ClockSettings,
    ticks: i64,
}

const MINUTES_PER_DAY: i64 = 24 * 60;

impl Clock {
    pub fn new(settings: ClockSettings) -> Self {
        Self { settings, ticks: 0 }
    }

    /// A clock stopped at `time`.
    pub fn fixed(time: NaiveTime) -> Self {
        Self::new(ClockSettings {
            fixed: Some(time),
            ..ClockSettings::default()
        })
    }

    /// The time to show this tick.
    pub fn tick(&mut self) -> NaiveTime {
        let base = self.settings.fixed.unwrap_or_else(|| Local::now().time());
        let shift = self
            .settings
            .step_minutes
            .wrapping_mul(self.ticks)
            .wrapping_add(self.settings.offset_minutes)
            .rem_euclid(MINUTES_PER_DAY);
        self.ticks = self.ticks.wrapping_add(1);
        base.overflowing_add_signed(TimeDelta::minutes(shift)).0
    }
}
