use crate::{
    error::FetchError,
    model::{Location, TodayMenu, WeeklyMenuResponse},
    today::Today,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt::Debug;

pub mod foodandco;

pub use foodandco::FoodAndCoClient;

/// Somewhere weekly menus come from.
#[async_trait]
pub trait MenuSource: Send + Sync + Debug {
    async fn weekly_menu(
        &self,
        location: &Location,
        date: NaiveDate,
    ) -> Result<WeeklyMenuResponse, FetchError>;

    /// Fetch the week containing `today` and slice out today's entry.
    async fn fetch(&self, location: &Location, today: &Today) -> Result<TodayMenu, FetchError> {
        let week = self.weekly_menu(location, today.date).await?;
        select_day(&week, location, today)
    }
}

/// Pick `today`'s entry out of a weekly response.
///
/// A missing day wins over a week mismatch, so a week without data reports
/// "no data" rather than a confusing week number. Only today's entry is
/// decoded; the other days are never looked at.
pub fn select_day(
    week: &WeeklyMenuResponse,
    location: &Location,
    today: &Today,
) -> Result<TodayMenu, FetchError> {
    let Some(day) = week.day(today.weekday_index) else {
        return Err(FetchError::NoDataForDate {
            location: location.name.clone(),
            date: today.date,
        });
    };

    if week.week_number != today.week_number {
        return Err(FetchError::WeekMismatch {
            location: location.name.clone(),
            expected: today.week_number,
            actual: week.week_number,
        });
    }

    TodayMenu::deserialize(day).map_err(|source| FetchError::Decode {
        location: location.name.clone(),
        source,
    })
}
