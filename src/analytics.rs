use chrono::{Days, NaiveDate};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use crate::clock::{day_key, utc_day, Clock, SystemClock};

// Days reported by view_count, today included
pub const REPORT_DAYS: u64 = 7;

// Unique view counts for one post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewCount {
    pub total: usize,
    pub daily: BTreeMap<String, usize>, // YYYY-MM-DD -> unique viewers, oldest first
}

// Viewer sets for one post. Every IP in a daily set is also in `total`.
#[derive(Debug, Default)]
struct PostViews {
    total: HashSet<String>,
    daily: HashMap<NaiveDate, HashSet<String>>,
}

/// Turns raw page hits into unique views per (post, client, UTC day).
///
/// Nothing is ever evicted: sets live until the process exits.
pub struct ViewTracker {
    posts: DashMap<String, PostViews>,
    clock: Arc<dyn Clock>,
}

impl Default for ViewTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTracker {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            posts: DashMap::new(),
            clock,
        }
    }

    /// Records a view and reports whether it is new for today.
    ///
    /// Only a `true` result should bump a persisted view counter. The post's
    /// entry stays locked for the whole check-and-insert, so concurrent
    /// calls for the same triple yield exactly one `true`.
    pub fn track_view(&self, post_id: &str, ip: &str) -> bool {
        let today = utc_day(self.clock.now());

        let mut entry = self.posts.entry(post_id.to_string()).or_default();
        let views = entry.value_mut();

        let todays = views.daily.entry(today).or_default();
        if todays.contains(ip) {
            return false;
        }

        todays.insert(ip.to_string());
        views.total.insert(ip.to_string());
        true
    }

    // Total unique viewers plus the last REPORT_DAYS days, zeros for untracked posts
    pub fn view_count(&self, post_id: &str) -> ViewCount {
        let today = utc_day(self.clock.now());
        match self.posts.get(post_id) {
            Some(views) => summarize(&views, today),
            None => summarize(&PostViews::default(), today),
        }
    }

    // Every post that has at least one tracked view
    pub fn all_view_counts(&self) -> HashMap<String, ViewCount> {
        let today = utc_day(self.clock.now());
        self.posts
            .iter()
            .map(|entry| (entry.key().clone(), summarize(entry.value(), today)))
            .collect()
    }

    pub fn tracked_posts(&self) -> usize {
        self.posts.len()
    }
}

fn summarize(views: &PostViews, today: NaiveDate) -> ViewCount {
    let daily = report_window(today)
        .map(|day| {
            let count = views.daily.get(&day).map_or(0, HashSet::len);
            (day_key(day), count)
        })
        .collect();

    ViewCount {
        total: views.total.len(),
        daily,
    }
}

// today - 6 ..= today
fn report_window(today: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (0..REPORT_DAYS)
        .rev()
        .filter_map(move |back| today.checked_sub_days(Days::new(back)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::time::Duration;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn tracker() -> (ViewTracker, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::at_date(2024, 3, 10));
        (ViewTracker::with_clock(clock.clone()), clock)
    }

    #[test]
    fn test_same_day_duplicate_is_not_counted() {
        let (tracker, _clock) = tracker();

        assert!(tracker.track_view("p1", "1.1.1.1"));
        assert!(!tracker.track_view("p1", "1.1.1.1"));
        assert!(tracker.track_view("p1", "2.2.2.2"));

        assert_eq!(tracker.view_count("p1").total, 2);
    }

    #[test]
    fn test_same_ip_different_posts() {
        let (tracker, _clock) = tracker();

        assert!(tracker.track_view("p1", "1.1.1.1"));
        assert!(tracker.track_view("p2", "1.1.1.1"));
        assert_eq!(tracker.view_count("p1").total, 1);
        assert_eq!(tracker.view_count("p2").total, 1);
    }

    #[test]
    fn test_returning_visitor_counts_daily_not_total() {
        let (tracker, clock) = tracker();

        assert!(tracker.track_view("p1", "1.1.1.1"));
        clock.advance(DAY);
        assert!(tracker.track_view("p1", "1.1.1.1"));
        assert!(!tracker.track_view("p1", "1.1.1.1"));

        let count = tracker.view_count("p1");
        assert_eq!(count.total, 1);
        assert_eq!(count.daily["2024-03-10"], 1);
        assert_eq!(count.daily["2024-03-11"], 1);
    }

    #[test]
    fn test_untracked_post_has_seven_zero_days() {
        let (tracker, _clock) = tracker();

        let count = tracker.view_count("missing");
        assert_eq!(count.total, 0);
        assert_eq!(count.daily.len(), 7);
        assert!(count.daily.values().all(|&n| n == 0));
        assert_eq!(tracker.tracked_posts(), 0);
    }

    #[test]
    fn test_daily_window_is_last_seven_days_in_order() {
        let (tracker, clock) = tracker();

        tracker.track_view("p1", "1.1.1.1");
        clock.advance(DAY * 3);
        tracker.track_view("p1", "2.2.2.2");
        tracker.track_view("p1", "3.3.3.3");

        let count = tracker.view_count("p1");
        let days: Vec<&str> = count.daily.keys().map(String::as_str).collect();
        assert_eq!(
            days,
            vec![
                "2024-03-07",
                "2024-03-08",
                "2024-03-09",
                "2024-03-10",
                "2024-03-11",
                "2024-03-12",
                "2024-03-13",
            ]
        );
        let values: Vec<usize> = count.daily.values().copied().collect();
        assert_eq!(values, vec![0, 0, 0, 1, 0, 0, 2]);
        assert_eq!(count.total, 3);
    }

    #[test]
    fn test_history_older_than_window_is_not_reported() {
        let (tracker, clock) = tracker();

        tracker.track_view("p1", "1.1.1.1");
        clock.advance(DAY * 7);

        let count = tracker.view_count("p1");
        assert!(!count.daily.contains_key("2024-03-10"));
        assert!(count.daily.values().all(|&n| n == 0));
        // still part of the all-time total
        assert_eq!(count.total, 1);
    }

    #[test]
    fn test_all_view_counts_lists_tracked_posts() {
        let (tracker, _clock) = tracker();

        tracker.track_view("p1", "1.1.1.1");
        tracker.track_view("p2", "1.1.1.1");
        tracker.track_view("p2", "2.2.2.2");
        tracker.track_view("p2", "2.2.2.2");

        let all = tracker.all_view_counts();
        assert_eq!(all.len(), 2);
        assert_eq!(all["p1"].total, 1);
        assert_eq!(all["p2"].total, 2);
        assert_eq!(all["p2"].daily["2024-03-10"], 2);
    }

    #[test]
    fn test_concurrent_first_views_counted_once() {
        let clock = Arc::new(ManualClock::at_date(2024, 3, 10));
        let tracker = Arc::new(ViewTracker::with_clock(clock));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                std::thread::spawn(move || tracker.track_view("p1", "5.5.5.5"))
            })
            .collect();

        let new_views = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&fresh| fresh)
            .count();
        assert_eq!(new_views, 1);
        assert_eq!(tracker.view_count("p1").total, 1);
    }

    #[test]
    fn test_view_count_serializes_as_object() {
        let (tracker, _clock) = tracker();
        tracker.track_view("p1", "1.1.1.1");

        let json = serde_json::to_value(tracker.view_count("p1")).unwrap();
        assert_eq!(json["total"], 1);
        assert_eq!(json["daily"]["2024-03-10"], 1);
        assert_eq!(json["daily"]["2024-03-04"], 0);
    }
}
