//! Closest-race selection and the live-status gate.
//!
//! A race weekend is *live* from midnight UTC on its start date until 24
//! hours after midnight UTC on its end date, unless chat has been switched
//! off for it.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use pole_db::entities::{track, track_event};
use serde::Serialize;

/// Hours a weekend stays live after its last day begins.
pub const LIVE_GRACE_HOURS: i64 = 24;

/// Chat messages newer than this count towards live participants.
pub const CHAT_ACTIVITY_MINUTES: i64 = 10;

/// Why a race was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RacePhase {
    /// Weekend in progress.
    Live,
    /// Next weekend to start.
    Upcoming,
    /// Nothing live or upcoming; the most recently started weekend.
    Latest,
}

/// A track chosen by [`select_closest_race`].
#[derive(Debug, Clone, Copy)]
pub struct SelectedRace<'a> {
    /// The chosen weekend.
    pub track: &'a track::Model,
    /// Which rule picked it.
    pub phase: RacePhase,
}

impl SelectedRace<'_> {
    /// Whether the pick came from the live rule.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.phase == RacePhase::Live
    }
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Start of the window in which chat messages count as live activity.
#[must_use]
pub fn chat_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::minutes(CHAT_ACTIVITY_MINUTES)
}

/// Whether `track` is inside its live window at `now`.
///
/// Tracks missing either date are never live.
#[must_use]
pub fn is_live(track: &track::Model, now: DateTime<Utc>) -> bool {
    if track.chat_enabled == Some(false) {
        return false;
    }
    let (Some(start), Some(end)) = (track.start_date, track.end_date) else {
        return false;
    };

    day_start(start) <= now && now <= day_start(end) + Duration::hours(LIVE_GRACE_HOURS)
}

fn is_upcoming(track: &track::Model, now: DateTime<Utc>) -> bool {
    track.start_date.is_some_and(|start| day_start(start) > now)
}

/// Pick the single race weekend to show at `now`.
///
/// Live weekends win (latest start first), then upcoming ones (earliest
/// start first), then whichever weekend started last. Ties go to the
/// smallest id so the choice never depends on input order.
#[must_use]
pub fn select_closest_race(tracks: &[track::Model], now: DateTime<Utc>) -> Option<SelectedRace<'_>> {
    let live = tracks
        .iter()
        .filter(|t| is_live(t, now))
        .min_by(|a, b| b.start_date.cmp(&a.start_date).then_with(|| a.id.cmp(&b.id)));
    if let Some(track) = live {
        return Some(SelectedRace {
            track,
            phase: RacePhase::Live,
        });
    }

    let upcoming = tracks
        .iter()
        .filter(|t| is_upcoming(t, now))
        .min_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.id.cmp(&b.id)));
    if let Some(track) = upcoming {
        return Some(SelectedRace {
            track,
            phase: RacePhase::Upcoming,
        });
    }

    // `None` orders below every date, so undated tracks only win when
    // nothing is dated.
    tracks
        .iter()
        .min_by(|a, b| b.start_date.cmp(&a.start_date).then_with(|| a.id.cmp(&b.id)))
        .map(|track| SelectedRace {
            track,
            phase: RacePhase::Latest,
        })
}

/// A scheduled session of the weekend.
#[derive(Debug, Clone, Serialize)]
pub struct RaceSession {
    /// Event id.
    pub id: String,
    /// Session name, e.g. "Qualifying".
    pub name: String,
    /// Start time as stored.
    pub starts_at: DateTime<FixedOffset>,
    /// Start time in the circuit's timezone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_starts_at: Option<String>,
}

/// The race card shown at the top of the feed.
#[derive(Debug, Clone, Serialize)]
pub struct RaceCard {
    /// Track id.
    pub id: String,
    /// Circuit name.
    pub name: String,
    /// City or region.
    pub location: Option<String>,
    /// Country name.
    pub country: Option<String>,
    /// Hero image.
    pub image_url: Option<String>,
    /// First day of the weekend.
    pub start_date: Option<NaiveDate>,
    /// Last day of the weekend.
    pub end_date: Option<NaiveDate>,
    /// IANA timezone of the circuit.
    pub timezone: Option<String>,
    /// Which rule picked this race.
    pub phase: RacePhase,
    /// Inside the live window right now.
    pub is_live: bool,
    /// Distinct chatters in the activity window; 0 unless live.
    pub live_participants: usize,
    /// Weekend start in the circuit's own timezone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_start: Option<String>,
    /// Sessions in start order.
    pub sessions: Vec<RaceSession>,
}

/// Render `at` in the IANA zone `timezone`. Unknown zones yield `None`.
fn local_time(timezone: Option<&str>, at: DateTime<Utc>) -> Option<String> {
    let tz: Tz = timezone?.parse().ok()?;
    Some(at.with_timezone(&tz).to_rfc3339())
}

impl RaceCard {
    /// Build the card for a selected race.
    ///
    /// Participants are only reported while the race is live.
    #[must_use]
    pub fn build(
        selected: SelectedRace<'_>,
        live_participants: usize,
        mut sessions: Vec<track_event::Model>,
    ) -> Self {
        let track = selected.track;
        let timezone = track.timezone.as_deref();

        if timezone.is_some_and(|tz| tz.parse::<Tz>().is_err()) {
            tracing::debug!(track_id = %track.id, timezone = ?track.timezone, "Unknown track timezone");
        }

        sessions.sort_by(|a, b| a.starts_at.cmp(&b.starts_at).then_with(|| a.id.cmp(&b.id)));
        let sessions = sessions
            .into_iter()
            .map(|event| RaceSession {
                local_starts_at: local_time(timezone, event.starts_at.with_timezone(&Utc)),
                id: event.id,
                name: event.name,
                starts_at: event.starts_at,
            })
            .collect();

        Self {
            id: track.id.clone(),
            name: track.name.clone(),
            location: track.location.clone(),
            country: track.country.clone(),
            image_url: track.image_url.clone(),
            start_date: track.start_date,
            end_date: track.end_date,
            timezone: track.timezone.clone(),
            phase: selected.phase,
            is_live: selected.is_live(),
            live_participants: if selected.is_live() { live_participants } else { 0 },
            local_start: track
                .start_date
                .and_then(|start| local_time(timezone, day_start(start))),
            sessions,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn create_test_track(
        id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> track::Model {
        track::Model {
            id: id.to_string(),
            name: format!("Circuit {id}"),
            location: None,
            country: None,
            image_url: None,
            start_date: start,
            end_date: end,
            timezone: None,
            chat_enabled: None,
        }
    }

    #[test]
    fn test_live_track_is_selected() {
        let tracks = vec![create_test_track(
            "bahrain",
            Some(date(2025, 3, 1)),
            Some(date(2025, 3, 3)),
        )];

        let selected = select_closest_race(&tracks, at(2025, 3, 2, 12)).unwrap();
        assert_eq!(selected.track.id, "bahrain");
        assert_eq!(selected.phase, RacePhase::Live);
    }

    #[test]
    fn test_upcoming_track_is_selected() {
        let tracks = vec![create_test_track(
            "imola",
            Some(date(2025, 5, 10)),
            Some(date(2025, 5, 12)),
        )];

        let selected = select_closest_race(&tracks, at(2025, 1, 1, 0)).unwrap();
        assert_eq!(selected.track.id, "imola");
        assert_eq!(selected.phase, RacePhase::Upcoming);
    }

    #[test]
    fn test_live_beats_upcoming() {
        let tracks = vec![
            create_test_track("next", Some(date(2025, 3, 8)), Some(date(2025, 3, 10))),
            create_test_track("now", Some(date(2025, 3, 1)), Some(date(2025, 3, 3))),
        ];

        let selected = select_closest_race(&tracks, at(2025, 3, 2, 9)).unwrap();
        assert_eq!(selected.track.id, "now");
        assert!(selected.is_live());
    }

    #[test]
    fn test_latest_live_start_wins() {
        let tracks = vec![
            create_test_track("long", Some(date(2025, 2, 20)), Some(date(2025, 3, 5))),
            create_test_track("short", Some(date(2025, 3, 1)), Some(date(2025, 3, 3))),
        ];

        let selected = select_closest_race(&tracks, at(2025, 3, 2, 9)).unwrap();
        assert_eq!(selected.track.id, "short");
    }

    #[test]
    fn test_earliest_upcoming_wins() {
        let tracks = vec![
            create_test_track("later", Some(date(2025, 6, 1)), Some(date(2025, 6, 3))),
            create_test_track("sooner", Some(date(2025, 5, 1)), Some(date(2025, 5, 3))),
        ];

        let selected = select_closest_race(&tracks, at(2025, 1, 1, 0)).unwrap();
        assert_eq!(selected.track.id, "sooner");
    }

    #[test]
    fn test_fallback_is_latest_start() {
        let tracks = vec![
            create_test_track("first", Some(date(2024, 3, 1)), Some(date(2024, 3, 3))),
            create_test_track("undated", None, None),
            create_test_track("last", Some(date(2024, 12, 6)), Some(date(2024, 12, 8))),
        ];

        let selected = select_closest_race(&tracks, at(2025, 1, 15, 0)).unwrap();
        assert_eq!(selected.track.id, "last");
        assert_eq!(selected.phase, RacePhase::Latest);
    }

    #[test]
    fn test_empty_input() {
        assert!(select_closest_race(&[], at(2025, 1, 1, 0)).is_none());
    }

    #[test]
    fn test_grace_period_boundary() {
        let track = create_test_track("monza", Some(date(2025, 9, 5)), Some(date(2025, 9, 7)));

        assert!(is_live(&track, at(2025, 9, 5, 0)));
        assert!(is_live(&track, at(2025, 9, 8, 0)));
        assert!(!is_live(&track, at(2025, 9, 8, 1)));
        assert!(!is_live(&track, at(2025, 9, 4, 23)));
    }

    #[test]
    fn test_chat_disabled_is_never_live() {
        let mut track = create_test_track("spa", Some(date(2025, 7, 25)), Some(date(2025, 7, 27)));
        track.chat_enabled = Some(false);
        assert!(!is_live(&track, at(2025, 7, 26, 12)));

        track.chat_enabled = Some(true);
        assert!(is_live(&track, at(2025, 7, 26, 12)));
    }

    #[test]
    fn test_missing_end_date_only_skips_live_check() {
        let tracks = vec![create_test_track("open", Some(date(2025, 3, 1)), None)];

        let selected = select_closest_race(&tracks, at(2025, 3, 2, 0)).unwrap();
        assert_eq!(selected.track.id, "open");
        assert_eq!(selected.phase, RacePhase::Latest);
    }

    #[test]
    fn test_selection_ignores_input_order() {
        let a = create_test_track("a", Some(date(2025, 5, 1)), Some(date(2025, 5, 3)));
        let b = create_test_track("b", Some(date(2025, 5, 1)), Some(date(2025, 5, 3)));
        let now = at(2025, 1, 1, 0);

        let forward = [a.clone(), b.clone()];
        let backward = [b, a];
        assert_eq!(
            select_closest_race(&forward, now).unwrap().track.id,
            select_closest_race(&backward, now).unwrap().track.id
        );
    }

    #[test]
    fn test_race_card_sessions_and_local_time() {
        let mut track = create_test_track("monaco", Some(date(2025, 5, 23)), Some(date(2025, 5, 25)));
        track.timezone = Some("Europe/Monaco".to_string());
        let selected = SelectedRace {
            track: &track,
            phase: RacePhase::Live,
        };
        let sessions = vec![
            track_event::Model {
                id: "race".to_string(),
                track_id: "monaco".to_string(),
                name: "Race".to_string(),
                starts_at: at(2025, 5, 25, 13).into(),
            },
            track_event::Model {
                id: "quali".to_string(),
                track_id: "monaco".to_string(),
                name: "Qualifying".to_string(),
                starts_at: at(2025, 5, 24, 14).into(),
            },
        ];

        let card = RaceCard::build(selected, 42, sessions);

        assert!(card.is_live);
        assert_eq!(card.live_participants, 42);
        assert_eq!(card.sessions[0].id, "quali");
        assert_eq!(
            card.sessions[1].local_starts_at.as_deref(),
            Some("2025-05-25T15:00:00+02:00")
        );
        assert_eq!(card.local_start.as_deref(), Some("2025-05-23T02:00:00+02:00"));
    }

    #[test]
    fn test_race_card_unknown_timezone() {
        let mut track = create_test_track("x", Some(date(2025, 5, 1)), None);
        track.timezone = Some("Mars/Olympus_Mons".to_string());
        let selected = SelectedRace {
            track: &track,
            phase: RacePhase::Upcoming,
        };

        let card = RaceCard::build(selected, 9, Vec::new());

        assert!(card.local_start.is_none());
        assert!(!card.is_live);
        assert_eq!(card.live_participants, 0);
    }
}
