use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{error, info};

use crate::{
    error::FetchError,
    fetcher::MenuSource,
    model::Location,
    notifier::{Notifier, PostOutcome},
    today::Today,
};

#[derive(Debug)]
pub enum LocationOutcome {
    Posted(PostOutcome),
    Skipped(FetchError),
}

#[derive(Debug)]
pub struct LocationReport {
    pub location: String,
    pub outcome: LocationOutcome,
}

#[derive(Debug, Default)]
pub struct RunReport {
    /// Set when the run stopped early because today is Saturday or Sunday.
    pub weekend: bool,
    /// One entry per finished location, in completion order.
    pub locations: Vec<LocationReport>,
}

impl RunReport {
    pub fn delivered(&self) -> usize {
        self.locations
            .iter()
            .filter(|r| matches!(&r.outcome, LocationOutcome::Posted(p) if p.is_delivered()))
            .count()
    }

    pub fn get(&self, location: &str) -> Option<&LocationOutcome> {
        self.locations.iter().find(|r| r.location == location).map(|r| &r.outcome)
    }
}

/// Fetch and post today's menu for every location.
///
/// Locations run concurrently and independently; the call returns once all
/// of them have finished.
pub async fn run(
    today: Today,
    locations: &[Location],
    source: Arc<dyn MenuSource>,
    notifier: Arc<dyn Notifier>,
) -> RunReport {
    if today.is_weekend() {
        info!(date = %today.date, "weekend, nothing to post");
        return RunReport { weekend: true, locations: Vec::new() };
    }

    info!(
        date = %today.date,
        weekday = today.weekday_index,
        week = today.week_number,
        locations = locations.len(),
        "posting today's menus"
    );

    let mut tasks = JoinSet::new();
    for location in locations.iter().cloned() {
        let source = Arc::clone(&source);
        let notifier = Arc::clone(&notifier);

        tasks.spawn(async move {
            let outcome = process_location(&location, &today, source.as_ref(), notifier.as_ref()).await;
            LocationReport { location: location.name, outcome }
        });
    }

    let mut report = RunReport::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(r) => report.locations.push(r),
            Err(e) => error!(error = %e, "location task panicked"),
        }
    }

    info!(
        delivered = report.delivered(),
        total = locations.len(),
        "run finished"
    );

    report
}

async fn process_location(
    location: &Location,
    today: &Today,
    source: &dyn MenuSource,
    notifier: &dyn Notifier,
) -> LocationOutcome {
    match source.fetch(location, today).await {
        Ok(menu) => LocationOutcome::Posted(notifier.post(location, &menu).await),
        Err(e) => {
            error!(location = %location.name, date = %today.date, kind = e.kind(), "{e}");
            LocationOutcome::Skipped(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MenuItem, TodayMenu, WeeklyMenuResponse};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct FakeSource {
        calls: Mutex<Vec<String>>,
        week_number: u32,
    }

    #[async_trait]
    impl MenuSource for FakeSource {
        async fn weekly_menu(
            &self,
            location: &Location,
            date: NaiveDate,
        ) -> Result<WeeklyMenuResponse, FetchError> {
            self.calls.lock().unwrap().push(location.name.clone());

            let days = (0..7)
                .map(|_| {
                    let day = TodayMenu {
                        date,
                        menus: vec![MenuItem { kind: Some("Soup".into()), menu: Some("Leek".into()) }],
                    };
                    serde_json::to_value(day).unwrap()
                })
                .collect();
            Ok(WeeklyMenuResponse { week_number: self.week_number, days })
        }
    }

    #[derive(Debug, Default)]
    struct RecordingNotifier {
        channels: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn post(&self, location: &Location, _menu: &TodayMenu) -> PostOutcome {
            self.channels.lock().unwrap().push(location.channel_id.clone());
            PostOutcome::Delivered { status: reqwest::StatusCode::OK }
        }
    }

    fn locations() -> Vec<Location> {
        ["A", "B", "C"]
            .iter()
            .map(|n| Location {
                name: n.to_string(),
                restaurant_id: format!("id-{n}"),
                other_id: format!("site-{n}"),
                channel_id: format!("chan-{n}"),
            })
            .collect()
    }

    fn date(day: u32) -> Today {
        Today::from_date(NaiveDate::from_ymd_opt(2026, 10, day).unwrap())
    }

    #[tokio::test]
    async fn weekdays_post_once_per_location() {
        for day in 19..=23 {
            let today = date(day);
            let source = Arc::new(FakeSource { week_number: today.week_number, ..Default::default() });
            let notifier = Arc::new(RecordingNotifier::default());

            let report = run(today, &locations(), source.clone(), notifier.clone()).await;

            assert!(!report.weekend);
            assert_eq!(report.delivered(), 3);

            let mut channels = notifier.channels.lock().unwrap().clone();
            channels.sort();
            assert_eq!(channels, vec!["chan-A", "chan-B", "chan-C"]);
        }
    }

    #[tokio::test]
    async fn weekend_never_fetches() {
        for day in [17, 18] {
            let source = Arc::new(FakeSource { week_number: 42, ..Default::default() });
            let notifier = Arc::new(RecordingNotifier::default());

            let report = run(date(day), &locations(), source.clone(), notifier.clone()).await;

            assert!(report.weekend);
            assert!(report.locations.is_empty());
            assert!(source.calls.lock().unwrap().is_empty());
            assert!(notifier.channels.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn week_mismatch_skips_every_post() {
        let today = date(19);
        let source = Arc::new(FakeSource { week_number: today.week_number + 1, ..Default::default() });
        let notifier = Arc::new(RecordingNotifier::default());

        let report = run(today, &locations(), source.clone(), notifier.clone()).await;

        assert_eq!(report.locations.len(), 3);
        assert_eq!(report.delivered(), 0);
        assert!(notifier.channels.lock().unwrap().is_empty());
        assert!(matches!(
            report.get("B"),
            Some(LocationOutcome::Skipped(FetchError::WeekMismatch { expected: 43, actual: 44, .. }))
        ));
    }

    #[derive(Debug)]
    struct BrokenFor(&'static str);

    #[async_trait]
    impl MenuSource for BrokenFor {
        async fn weekly_menu(
            &self,
            location: &Location,
            date: NaiveDate,
        ) -> Result<WeeklyMenuResponse, FetchError> {
            if location.name == self.0 {
                let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
                return Err(FetchError::Decode { location: location.name.clone(), source });
            }
            FakeSource { week_number: 43, ..Default::default() }.weekly_menu(location, date).await
        }
    }

    #[tokio::test]
    async fn fetch_failure_is_reported_and_isolated() {
        let notifier = Arc::new(RecordingNotifier::default());

        let report = run(date(19), &locations(), Arc::new(BrokenFor("A")), notifier.clone()).await;

        assert!(matches!(report.get("A"), Some(LocationOutcome::Skipped(FetchError::Decode { .. }))));
        assert_eq!(report.delivered(), 2);

        let mut channels = notifier.channels.lock().unwrap().clone();
        channels.sort();
        assert_eq!(channels, vec!["chan-B", "chan-C"]);
    }
}
