use chrono::{Datelike, Months, NaiveDate};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimelineError {
    #[error("timeline end {end} must be after start {start}")]
    EmptyRange { start: NaiveDate, end: NaiveDate },
    #[error("timeline step must be at least one year")]
    ZeroStep,
    #[error("year {0} is outside the supported calendar")]
    YearOutOfRange(i32),
    #[error("{steps} annual steps from {start_year} run past the supported calendar")]
    TooManySteps { start_year: i32, steps: u32 },
}

/// Annual calendar driving the model: steps run from `start` (inclusive) to
/// `end` (exclusive) every `step_years`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeline {
    start: NaiveDate,
    end: NaiveDate,
    step_years: u32,
}

impl Timeline {
    pub fn new(start: NaiveDate, end: NaiveDate, step_years: u32) -> Result<Self, TimelineError> {
        if step_years == 0 {
            return Err(TimelineError::ZeroStep);
        }
        if end <= start {
            return Err(TimelineError::EmptyRange { start, end });
        }
        Ok(Self {
            start,
            end,
            step_years,
        })
    }

    /// Timeline covering `steps` years from January 1st of `start_year`.
    pub fn annual(start_year: i32, steps: u32) -> Result<Self, TimelineError> {
        let start = january_first(start_year)?;
        let end_year = i32::try_from(steps)
            .ok()
            .and_then(|steps| start_year.checked_add(steps))
            .ok_or(TimelineError::TooManySteps { start_year, steps })?;
        let end = january_first(end_year)?;
        Self::new(start, end, 1)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn step_years(&self) -> u32 {
        self.step_years
    }

    /// Date at the start of step `tick` (zero based).
    pub fn date_at(&self, tick: u64) -> Option<NaiveDate> {
        let months = u32::try_from(tick)
            .ok()?
            .checked_mul(self.step_years)?
            .checked_mul(12)?;
        self.start.checked_add_months(Months::new(months))
    }

    /// Year label of step `tick`, if the step lies before the end of the timeline.
    pub fn year_at(&self, tick: u64) -> Option<i32> {
        self.date_at(tick)
            .filter(|date| *date < self.end)
            .map(|date| date.year())
    }

    pub fn steps(&self) -> u64 {
        let mut steps = 0;
        while self.year_at(steps).is_some() {
            steps += 1;
        }
        steps
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2041, 1, 1).unwrap_or_default(),
            step_years: 1,
        }
    }
}

fn january_first(year: i32) -> Result<NaiveDate, TimelineError> {
    NaiveDate::from_ymd_opt(year, 1, 1).ok_or(TimelineError::YearOutOfRange(year))
}
