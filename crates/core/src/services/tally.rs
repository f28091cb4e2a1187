//! Poll vote tallying.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, Utc};
use pole_db::entities::{poll, poll_response};
use serde::Serialize;

/// Rounded share of `count` in `total`, as a whole percent.
///
/// An empty poll reports 0 for every option.
#[must_use]
pub fn percent(count: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u32
}

/// Vote counts per poll and option, plus one user's own picks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteCounts {
    counts: BTreeMap<String, BTreeMap<String, u64>>,
    user_selection: BTreeMap<String, String>,
}

impl VoteCounts {
    /// Votes per option id for a poll.
    #[must_use]
    pub fn for_poll(&self, poll_id: &str) -> Option<&BTreeMap<String, u64>> {
        self.counts.get(poll_id)
    }

    /// All votes cast on a poll, including votes for removed options.
    #[must_use]
    pub fn total(&self, poll_id: &str) -> u64 {
        self.counts
            .get(poll_id)
            .map_or(0, |options| options.values().sum())
    }

    /// The option the user picked on a poll.
    #[must_use]
    pub fn selection(&self, poll_id: &str) -> Option<&str> {
        self.user_selection.get(poll_id).map(String::as_str)
    }
}

/// Count response rows.
///
/// Only the newest response per (user, poll) counts.
#[must_use]
pub fn count_votes(responses: &[poll_response::Model], user_id: Option<&str>) -> VoteCounts {
    let mut latest: BTreeMap<(&str, &str), &poll_response::Model> = BTreeMap::new();
    for response in responses {
        let key = (response.poll_id.as_str(), response.user_id.as_str());
        let newer = latest
            .get(&key)
            .is_none_or(|current| written_at(response) > written_at(current));
        if newer {
            latest.insert(key, response);
        }
    }

    let mut counts = VoteCounts::default();
    for ((poll_id, voter), response) in latest {
        *counts
            .counts
            .entry(poll_id.to_string())
            .or_default()
            .entry(response.selected_option_id.clone())
            .or_default() += 1;

        if user_id == Some(voter) {
            counts
                .user_selection
                .insert(poll_id.to_string(), response.selected_option_id.clone());
        }
    }
    counts
}

fn written_at(response: &poll_response::Model) -> (DateTime<FixedOffset>, &str) {
    (
        response.updated_at.unwrap_or(response.created_at),
        response.id.as_str(),
    )
}

/// One option's share of the vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionTally {
    /// Option id.
    pub id: String,
    /// Option label.
    pub label: String,
    /// Counted votes.
    pub votes: u64,
    /// Whole-number share of the total.
    pub percent: u32,
}

/// Results for one poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollTally {
    /// Poll id.
    pub id: String,
    /// Poll question.
    pub question: String,
    /// Posted by an admin.
    pub is_admin_poll: bool,
    /// Still accepting votes.
    pub is_active: bool,
    /// Closing time, if any.
    pub ends_at: Option<DateTime<FixedOffset>>,
    /// Options in stored order.
    pub options: Vec<OptionTally>,
    /// All counted votes, including removed options.
    pub total_votes: u64,
    /// The viewer's current pick.
    pub user_selection: Option<String>,
}

impl PollTally {
    /// Tally `poll` against counted votes, keeping the poll's option order.
    #[must_use]
    pub fn build(poll: &poll::Model, counts: &VoteCounts, now: DateTime<Utc>) -> Self {
        let total = counts.total(&poll.id);
        let per_option = counts.for_poll(&poll.id);

        let options = poll
            .option_list()
            .unwrap_or_else(|e| {
                tracing::warn!(poll_id = %poll.id, error = %e, "Malformed poll options");
                Vec::new()
            })
            .into_iter()
            .map(|option| {
                let votes = per_option
                    .and_then(|o| o.get(&option.id))
                    .copied()
                    .unwrap_or(0);
                OptionTally {
                    id: option.id,
                    label: option.label,
                    votes,
                    percent: percent(votes, total),
                }
            })
            .collect();

        Self {
            id: poll.id.clone(),
            question: poll.question.clone(),
            is_admin_poll: poll.is_admin_poll(),
            is_active: poll.is_active(now),
            ends_at: poll.ends_at,
            options,
            total_votes: total,
            user_selection: counts.selection(&poll.id).map(str::to_string),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use maplit::btreemap;
    use serde_json::json;

    fn create_test_poll(id: &str) -> poll::Model {
        poll::Model {
            id: id.to_string(),
            question: "Who wins in Suzuka?".to_string(),
            options: json!([{"id": "A", "label": "Max"}, {"id": "B", "label": "Oscar"}]),
            admin_id: Some("admin".to_string()),
            created_by: None,
            ends_at: None,
            is_featured_podium: false,
            created_at: Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap().into(),
        }
    }

    fn response(id: &str, poll_id: &str, user_id: &str, option: &str) -> poll_response::Model {
        poll_response::Model {
            id: id.to_string(),
            poll_id: poll_id.to_string(),
            user_id: user_id.to_string(),
            selected_option_id: option.to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 4, 2, 0, 0, 0).unwrap().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(3, 4), 75);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(0, 0), 0);
    }

    #[test]
    fn test_three_to_one() {
        let responses = vec![
            response("r1", "p1", "u1", "A"),
            response("r2", "p1", "u2", "A"),
            response("r3", "p1", "u3", "A"),
            response("r4", "p1", "u4", "B"),
        ];
        let counts = count_votes(&responses, Some("u4"));

        assert_eq!(
            counts.for_poll("p1").unwrap(),
            &btreemap! { "A".to_string() => 3, "B".to_string() => 1 }
        );

        let tally = PollTally::build(&create_test_poll("p1"), &counts, Utc::now());
        assert_eq!(tally.total_votes, 4);
        assert_eq!(tally.options[0].percent, 75);
        assert_eq!(tally.options[1].percent, 25);
        assert_eq!(tally.user_selection.as_deref(), Some("B"));
    }

    #[test]
    fn test_zero_votes() {
        let counts = count_votes(&[], Some("u1"));
        let tally = PollTally::build(&create_test_poll("p1"), &counts, Utc::now());

        assert_eq!(tally.total_votes, 0);
        assert!(tally.options.iter().all(|o| o.percent == 0 && o.votes == 0));
        assert!(tally.user_selection.is_none());
    }

    #[test]
    fn test_removed_option_counts_in_total_only() {
        let responses = vec![
            response("r1", "p1", "u1", "A"),
            response("r2", "p1", "u2", "GONE"),
        ];
        let counts = count_votes(&responses, None);
        let tally = PollTally::build(&create_test_poll("p1"), &counts, Utc::now());

        assert_eq!(tally.total_votes, 2);
        assert_eq!(tally.options.len(), 2);
        assert_eq!(tally.options[0].percent, 50);
        assert_eq!(tally.options[1].votes, 0);
    }

    #[test]
    fn test_newest_response_wins() {
        let mut changed = response("r2", "p1", "u1", "B");
        changed.updated_at = Some((Utc.with_ymd_and_hms(2025, 4, 3, 0, 0, 0).unwrap()).into());
        let responses = vec![response("r1", "p1", "u1", "A"), changed];

        let counts = count_votes(&responses, Some("u1"));

        assert_eq!(counts.total("p1"), 1);
        assert_eq!(counts.selection("p1"), Some("B"));
    }

    #[test]
    fn test_counts_are_per_poll() {
        let responses = vec![
            response("r1", "p1", "u1", "A"),
            response("r2", "p2", "u1", "B"),
        ];
        let counts = count_votes(&responses, Some("u1"));

        assert_eq!(counts.total("p1"), 1);
        assert_eq!(counts.total("p2"), 1);
        assert_eq!(counts.total("p3"), 0);
        assert_eq!(counts.selection("p2"), Some("B"));
    }

    #[test]
    fn test_ended_poll_is_inactive() {
        let mut poll = create_test_poll("p1");
        let now = Utc.with_ymd_and_hms(2025, 4, 10, 0, 0, 0).unwrap();
        poll.ends_at = Some((now - Duration::hours(1)).into());

        let tally = PollTally::build(&poll, &VoteCounts::default(), now);
        assert!(!tally.is_active);
    }

    #[test]
    fn test_single_object_options() {
        let mut poll = create_test_poll("p1");
        poll.options = json!({"id": "A", "label": "Max"});
        let tally = PollTally::build(&poll, &VoteCounts::default(), Utc::now());

        assert_eq!(tally.options.len(), 1);
        assert_eq!(tally.options[0].label, "Max");
    }
}
