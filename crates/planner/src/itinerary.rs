//! Day-by-day grouping of trip activities.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use trip_store::Activity;

/// The activities scheduled on one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityDay {
    pub date: NaiveDate,
    pub activities: Vec<Activity>,
}

/// Groups activities by the UTC day they occur on.
///
/// Days come out in ascending order and activities within a day are ordered
/// by `occurs_at`.
pub fn group_by_day(activities: Vec<Activity>) -> Vec<ActivityDay> {
    let mut days: BTreeMap<NaiveDate, Vec<Activity>> = BTreeMap::new();
    for activity in activities {
        days.entry(activity.occurs_at.date_naive())
            .or_default()
            .push(activity);
    }

    days.into_iter()
        .map(|(date, mut activities)| {
            activities.sort_by_key(|a| a.occurs_at);
            ActivityDay { date, activities }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use common::{ActivityId, TripId};

    use super::*;

    fn activity(trip_id: TripId, title: &str, day: u32, hour: u32) -> Activity {
        Activity {
            id: ActivityId::new(),
            trip_id,
            title: title.to_string(),
            occurs_at: Utc.with_ymd_and_hms(2025, 1, day, hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_groups_and_orders_by_day() {
        let trip_id = TripId::new();
        let days = group_by_day(vec![
            activity(trip_id, "Dinner", 11, 20),
            activity(trip_id, "Louvre", 12, 10),
            activity(trip_id, "Breakfast", 11, 8),
        ]);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 1, 11).unwrap());
        let first: Vec<_> = days[0].activities.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(first, ["Breakfast", "Dinner"]);
        assert_eq!(days[1].activities[0].title, "Louvre");
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_day(Vec::new()).is_empty());
    }
}
