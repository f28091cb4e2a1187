//! Feed composition service.
//!
//! A feed is put together in three fan-out stages. Each stage runs its
//! fetches concurrently and the next stage only starts once the ids it
//! needs are known. A fetch that fails is logged and treated as empty, so
//! composing a feed never fails.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use pole_common::{AppResult, FeedConfig};
use pole_db::{
    entities::{hot_take, news_story, track, weekly_highlight},
    repositories::{
        ChatMessageRepository, DriverRepository, FollowRepository, GridLikeRepository,
        GridRepository, GridSlotCommentRepository, HotTakeRepository, NewsStoryRepository,
        PollRepository, PollResponseRepository, PostRepository, ProfileRepository,
        SponsorRepository, TeamRepository, TrackEventRepository, TrackRepository, VoteRepository,
        WeeklyHighlightRepository,
    },
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{debug, warn};

use super::banner::{
    FeaturedFanCard, SpotlightItem, SpotlightSources, SpotlightView, compose_spotlight,
};
use super::enrichment::{
    GridKind, GridView, Lookups, ParsedGrid, PostView, liked_grid_ids, referenced_ids,
};
use super::race::{RaceCard, chat_window_start, select_closest_race};
use super::tally::{PollTally, count_votes};

/// Every repository the feed reads from.
#[derive(Clone)]
pub struct FeedRepositories {
    /// Follow edges.
    pub follow: FollowRepository,
    /// Race weekends.
    pub track: TrackRepository,
    /// Weekend sessions.
    pub track_event: TrackEventRepository,
    /// Race chat.
    pub chat_message: ChatMessageRepository,
    /// Polls.
    pub poll: PollRepository,
    /// Poll votes.
    pub poll_response: PollResponseRepository,
    /// Posts.
    pub post: PostRepository,
    /// Post votes.
    pub vote: VoteRepository,
    /// Ranking grids.
    pub grid: GridRepository,
    /// Grid likes.
    pub grid_like: GridLikeRepository,
    /// Grid slot comments.
    pub grid_slot_comment: GridSlotCommentRepository,
    /// Hot takes.
    pub hot_take: HotTakeRepository,
    /// Weekly highlights.
    pub weekly_highlight: WeeklyHighlightRepository,
    /// Sponsors.
    pub sponsor: SponsorRepository,
    /// News stories.
    pub news_story: NewsStoryRepository,
    /// Profiles.
    pub profile: ProfileRepository,
    /// Drivers.
    pub driver: DriverRepository,
    /// Teams.
    pub team: TeamRepository,
}

impl FeedRepositories {
    /// Build every repository over one shared pool.
    #[must_use]
    pub fn new(db: &Arc<DatabaseConnection>) -> Self {
        Self {
            follow: FollowRepository::new(Arc::clone(db)),
            track: TrackRepository::new(Arc::clone(db)),
            track_event: TrackEventRepository::new(Arc::clone(db)),
            chat_message: ChatMessageRepository::new(Arc::clone(db)),
            poll: PollRepository::new(Arc::clone(db)),
            poll_response: PollResponseRepository::new(Arc::clone(db)),
            post: PostRepository::new(Arc::clone(db)),
            vote: VoteRepository::new(Arc::clone(db)),
            grid: GridRepository::new(Arc::clone(db)),
            grid_like: GridLikeRepository::new(Arc::clone(db)),
            grid_slot_comment: GridSlotCommentRepository::new(Arc::clone(db)),
            hot_take: HotTakeRepository::new(Arc::clone(db)),
            weekly_highlight: WeeklyHighlightRepository::new(Arc::clone(db)),
            sponsor: SponsorRepository::new(Arc::clone(db)),
            news_story: NewsStoryRepository::new(Arc::clone(db)),
            profile: ProfileRepository::new(Arc::clone(db)),
            driver: DriverRepository::new(Arc::clone(db)),
            team: TeamRepository::new(Arc::clone(db)),
        }
    }
}

/// The composed feed for one user.
#[derive(Debug, Clone, Serialize)]
pub struct FeedView {
    /// Viewer the feed was built for.
    pub user_id: String,
    /// Composition time.
    pub generated_at: DateTime<Utc>,
    /// Monday of the current week.
    pub week_start: NaiveDate,
    /// Closest race weekend.
    pub race: Option<RaceCard>,
    /// Current hot take.
    pub hot_take: Option<hot_take::Model>,
    /// Carousel slots.
    pub spotlight: Vec<SpotlightItem>,
    /// Active polls with results.
    pub polls: Vec<PollTally>,
    /// Posts from followed users and the viewer.
    pub posts: Vec<PostView>,
    /// Grids from followed users and the viewer.
    pub grids: Vec<GridView>,
    /// Latest news.
    pub news: Vec<news_story::Model>,
}

/// Monday (UTC) of the week containing `now`.
#[must_use]
pub fn week_start(now: DateTime<Utc>) -> NaiveDate {
    let today = now.date_naive();
    today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
}

/// Swap a failed fetch for an empty value.
fn degrade<T: Default>(section: &'static str, result: AppResult<T>) -> T {
    result.unwrap_or_else(|e| {
        warn!(error = %e, section, "Feed section unavailable");
        T::default()
    })
}

fn featured_fan(
    lookups: &Lookups,
    highlight: &weekly_highlight::Model,
) -> Option<FeaturedFanCard> {
    let fan_id = highlight.highlighted_fan_id.as_deref()?;
    let Some(fan) = lookups.author(fan_id) else {
        debug!(fan_id, "Highlighted fan has no profile");
        return None;
    };
    Some(FeaturedFanCard {
        fan,
        blurb: highlight.fan_blurb.clone(),
    })
}

/// Feed service for composing the home feed.
#[derive(Clone)]
pub struct FeedService {
    repos: FeedRepositories,
    limits: FeedConfig,
}

impl FeedService {
    /// Create a new feed service.
    #[must_use]
    pub const fn new(repos: FeedRepositories, limits: FeedConfig) -> Self {
        Self { repos, limits }
    }

    /// A copy of this service showing at most `post_limit` posts.
    #[must_use]
    pub fn with_post_limit(&self, post_limit: u64) -> Self {
        let mut service = self.clone();
        service.limits.post_limit = post_limit;
        service
    }

    /// Pick the race to show at `now` and fetch its live details.
    async fn race_card(&self, tracks: &[track::Model], now: DateTime<Utc>) -> Option<RaceCard> {
        let selected = select_closest_race(tracks, now)?;
        let track_id = selected.track.id.as_str();

        let (participants, sessions) = tokio::join!(
            async {
                if selected.is_live() {
                    self.repos
                        .chat_message
                        .count_participants_since(track_id, chat_window_start(now))
                        .await
                } else {
                    Ok(0)
                }
            },
            self.repos.track_event.find_by_track(track_id),
        );

        Some(RaceCard::build(
            selected,
            degrade("live_participants", participants),
            degrade("race_sessions", sessions),
        ))
    }

    /// The race card for `now`, if any track is on record.
    pub async fn current_race(&self, now: DateTime<Utc>) -> Option<RaceCard> {
        let tracks = degrade("tracks", self.repos.track.find_all().await);
        self.race_card(&tracks, now).await
    }

    /// Compose the full feed for `user_id`.
    pub async fn compose(&self, user_id: &str, now: DateTime<Utc>, view: SpotlightView) -> FeedView {
        let repos = &self.repos;
        let limits = &self.limits;
        let week_start = week_start(now);

        // Stage 1: everything keyed only by the user and the clock.
        let (
            following,
            tracks,
            (active_polls, featured_poll),
            hot_take,
            sponsors,
            (news, featured_story),
            highlight,
        ) = tokio::join!(
            repos.follow.find_following_ids(user_id),
            repos.track.find_all(),
            async {
                (
                    repos.poll.find_active(now, limits.poll_limit).await,
                    repos.poll.find_featured_podium().await,
                )
            },
            repos.hot_take.find_active_at(now),
            repos.sponsor.find_all(),
            async {
                (
                    repos.news_story.find_recent(limits.news_limit).await,
                    repos.news_story.find_featured().await,
                )
            },
            repos.weekly_highlight.find_by_week(week_start),
        );

        let following = degrade("follows", following);
        let tracks = degrade("tracks", tracks);
        let active_polls = degrade("polls", active_polls);
        let featured_poll = degrade("featured_poll", featured_poll);
        let hot_take = degrade("hot_take", hot_take);
        let sponsors = degrade("sponsors", sponsors);
        let news = degrade("news", news);
        let featured_story = degrade("featured_story", featured_story);
        let highlight = degrade("weekly_highlight", highlight);

        let mut author_ids: BTreeSet<String> = following.into_iter().collect();
        author_ids.insert(user_id.to_string());
        let author_ids: Vec<String> = author_ids.into_iter().collect();

        let poll_ids: Vec<String> = active_polls
            .iter()
            .chain(featured_poll.as_ref())
            .map(|p| p.id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let highlighted_grid_id = highlight
            .as_ref()
            .and_then(|h| h.highlighted_grid_id.as_deref());

        // Stage 2: content by the user's circle, plus race details.
        let (posts, (grids, highlighted_grid), responses, race) = tokio::join!(
            repos.post.find_by_authors(&author_ids, limits.post_limit),
            async {
                let grids = repos.grid.find_by_authors(&author_ids, limits.grid_limit).await;
                let already_loaded = highlighted_grid_id.and_then(|id| {
                    grids
                        .as_ref()
                        .ok()
                        .and_then(|found| found.iter().find(|g| g.id == id).cloned())
                });
                let highlighted = match (highlighted_grid_id, already_loaded) {
                    (_, Some(grid)) => Ok(Some(grid)),
                    (Some(id), None) => repos.grid.find_by_id(id).await,
                    (None, None) => Ok(None),
                };
                (grids, highlighted)
            },
            repos.poll_response.find_by_polls(&poll_ids),
            self.race_card(&tracks, now),
        );

        let mut posts = degrade("posts", posts);
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

        let mut grids: Vec<ParsedGrid> = degrade("grids", grids)
            .into_iter()
            .filter_map(ParsedGrid::parse)
            .collect();
        grids.sort_by(|a, b| {
            b.model
                .updated_at
                .cmp(&a.model.updated_at)
                .then_with(|| b.model.id.cmp(&a.model.id))
        });
        let highlighted_grid =
            degrade("highlighted_grid", highlighted_grid).and_then(ParsedGrid::parse);
        let responses = degrade("poll_responses", responses);

        let all_grids: Vec<&ParsedGrid> = grids.iter().chain(highlighted_grid.as_ref()).collect();

        let mut profile_ids: BTreeSet<String> = posts.iter().map(|p| p.user_id.clone()).collect();
        profile_ids.extend(all_grids.iter().map(|g| g.model.user_id.clone()));
        profile_ids.extend(highlight.as_ref().and_then(|h| h.highlighted_fan_id.clone()));
        let profile_ids: Vec<String> = profile_ids.into_iter().collect();

        let driver_ids = referenced_ids(&all_grids, &posts, GridKind::Driver);
        let team_ids = referenced_ids(&all_grids, &posts, GridKind::Team);
        let grid_ids: Vec<String> = all_grids
            .iter()
            .map(|g| g.model.id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let post_ids: Vec<String> = posts.iter().map(|p| p.id.clone()).collect();

        // Stage 3: lookups for everything referenced above.
        let (profiles, drivers, teams, liked_posts, grid_likes, slot_comments) = tokio::join!(
            repos.profile.find_by_ids(&profile_ids),
            repos.driver.find_by_ids(&driver_ids),
            repos.team.find_by_ids(&team_ids),
            repos.vote.find_liked_post_ids(user_id, &post_ids),
            repos.grid_like.find_by_grids(&grid_ids),
            repos.grid_slot_comment.find_by_grids(&grid_ids),
        );

        let lookups = Lookups::new(
            degrade("profiles", profiles),
            degrade("drivers", drivers),
            degrade("teams", teams),
            &tracks,
        )
        .with_polls(active_polls.iter().chain(featured_poll.as_ref()))
        .with_hot_take(hot_take.as_ref());
        let liked_posts: BTreeSet<String> = degrade("post_votes", liked_posts).into_iter().collect();
        let liked_grids = liked_grid_ids(&degrade("grid_likes", grid_likes), user_id);
        let slot_comments = degrade("grid_slot_comments", slot_comments);

        let counts = count_votes(&responses, Some(user_id));
        let polls = active_polls
            .iter()
            .map(|p| PollTally::build(p, &counts, now))
            .collect();

        let featured_grid = highlighted_grid
            .as_ref()
            .map(|g| lookups.grid_view(g, &liked_grids, &slot_comments));
        let featured_fan = highlight.as_ref().and_then(|h| featured_fan(&lookups, h));
        let spotlight = compose_spotlight(
            SpotlightSources {
                sponsors: &sponsors,
                weekly_sponsor_id: highlight.as_ref().and_then(|h| h.sponsor_id.as_deref()),
                featured_poll: featured_poll.as_ref(),
                featured_story: featured_story.as_ref(),
                featured_grid: featured_grid.as_ref(),
                featured_fan: featured_fan.as_ref(),
            },
            view,
        );

        debug!(
            user_id,
            posts = posts.len(),
            grids = grids.len(),
            spotlight = spotlight.len(),
            "Composed feed"
        );

        FeedView {
            user_id: user_id.to_string(),
            generated_at: now,
            week_start,
            race,
            hot_take,
            spotlight,
            polls,
            posts: posts
                .iter()
                .map(|p| lookups.post_view(p, &liked_posts))
                .collect(),
            grids: grids
                .iter()
                .map(|g| lookups.grid_view(g, &liked_grids, &slot_comments))
                .collect(),
            news,
        }
    }

    /// Compose only the spotlight carousel.
    ///
    /// `user_id` only decides whether the featured grid shows as liked.
    pub async fn spotlight(
        &self,
        user_id: Option<&str>,
        now: DateTime<Utc>,
        view: SpotlightView,
    ) -> Vec<SpotlightItem> {
        let repos = &self.repos;

        let (sponsors, featured_poll, featured_story, highlight) = tokio::join!(
            repos.sponsor.find_all(),
            repos.poll.find_featured_podium(),
            repos.news_story.find_featured(),
            repos.weekly_highlight.find_by_week(week_start(now)),
        );
        let sponsors = degrade("sponsors", sponsors);
        let featured_poll = degrade("featured_poll", featured_poll);
        let featured_story = degrade("featured_story", featured_story);
        let highlight = degrade("weekly_highlight", highlight);

        let highlighted_grid = match highlight
            .as_ref()
            .and_then(|h| h.highlighted_grid_id.as_deref())
        {
            Some(id) => degrade("highlighted_grid", repos.grid.find_by_id(id).await)
                .and_then(ParsedGrid::parse),
            None => None,
        };

        let grids: Vec<&ParsedGrid> = highlighted_grid.iter().collect();
        let profile_ids: Vec<String> = grids
            .iter()
            .map(|g| g.model.user_id.clone())
            .chain(highlight.as_ref().and_then(|h| h.highlighted_fan_id.clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let driver_ids = referenced_ids(&grids, &[], GridKind::Driver);
        let team_ids = referenced_ids(&grids, &[], GridKind::Team);
        let grid_ids: Vec<String> = grids.iter().map(|g| g.model.id.clone()).collect();
        let needs_tracks = grids.iter().any(|g| g.kind == GridKind::Track);

        let (profiles, drivers, teams, tracks, grid_likes, slot_comments) = tokio::join!(
            repos.profile.find_by_ids(&profile_ids),
            repos.driver.find_by_ids(&driver_ids),
            repos.team.find_by_ids(&team_ids),
            async {
                if needs_tracks {
                    repos.track.find_all().await
                } else {
                    Ok(Vec::new())
                }
            },
            async {
                if user_id.is_some() {
                    repos.grid_like.find_by_grids(&grid_ids).await
                } else {
                    Ok(Vec::new())
                }
            },
            repos.grid_slot_comment.find_by_grids(&grid_ids),
        );

        let lookups = Lookups::new(
            degrade("profiles", profiles),
            degrade("drivers", drivers),
            degrade("teams", teams),
            &degrade("tracks", tracks),
        );
        let liked_grids = user_id.map_or_else(BTreeSet::new, |id| {
            liked_grid_ids(&degrade("grid_likes", grid_likes), id)
        });
        let slot_comments = degrade("grid_slot_comments", slot_comments);

        let featured_grid = highlighted_grid
            .as_ref()
            .map(|g| lookups.grid_view(g, &liked_grids, &slot_comments));
        let featured_fan = highlight.as_ref().and_then(|h| featured_fan(&lookups, h));

        compose_spotlight(
            SpotlightSources {
                sponsors: &sponsors,
                weekly_sponsor_id: highlight.as_ref().and_then(|h| h.sponsor_id.as_deref()),
                featured_poll: featured_poll.as_ref(),
                featured_story: featured_story.as_ref(),
                featured_grid: featured_grid.as_ref(),
                featured_fan: featured_fan.as_ref(),
            },
            view,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use super::super::race::RacePhase;
    use chrono::TimeZone;
    use pole_db::entities::{
        chat_message, driver, follow, grid, grid_like, grid_slot_comment, poll, poll_response,
        post, profile, sponsor, team, track_event, vote,
    };
    use sea_orm::{DatabaseBackend, IntoMockRow, MockDatabase};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 2, 12, 0, 0).unwrap()
    }

    fn conn<M: IntoMockRow>(batches: Vec<Vec<M>>) -> Arc<DatabaseConnection> {
        Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results(batches)
                .into_connection(),
        )
    }

    /// A connection with no prepared results: every query fails.
    fn broken() -> Arc<DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn broken_repositories() -> FeedRepositories {
        FeedRepositories::new(&broken())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_track(id: &str, start: NaiveDate, end: NaiveDate) -> track::Model {
        track::Model {
            id: id.to_string(),
            name: format!("{id} International Circuit"),
            location: Some("Sakhir".to_string()),
            country: None,
            image_url: None,
            start_date: Some(start),
            end_date: Some(end),
            timezone: Some("Asia/Bahrain".to_string()),
            chat_enabled: None,
        }
    }

    fn create_test_profile(id: &str) -> profile::Model {
        profile::Model {
            id: id.to_string(),
            username: format!("fan_{id}"),
            display_name: None,
            avatar_url: None,
            bio: None,
            is_admin: false,
            created_at: now().into(),
        }
    }

    fn create_test_poll(id: &str) -> poll::Model {
        poll::Model {
            id: id.to_string(),
            question: "Who takes pole in Bahrain?".to_string(),
            options: json!([{"id": "A", "label": "Max"}, {"id": "B", "label": "Charles"}]),
            admin_id: Some("admin".to_string()),
            created_by: None,
            ends_at: None,
            is_featured_podium: true,
            created_at: (now() - Duration::days(1)).into(),
        }
    }

    fn create_test_response(id: &str, user_id: &str, option: &str) -> poll_response::Model {
        poll_response::Model {
            id: id.to_string(),
            poll_id: "poll1".to_string(),
            user_id: user_id.to_string(),
            selected_option_id: option.to_string(),
            created_at: now().into(),
            updated_at: None,
        }
    }

    fn create_test_post(
        id: &str,
        user_id: &str,
        parent: Option<(&str, &str)>,
        hours_ago: i64,
    ) -> post::Model {
        post::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            content: format!("post {id}"),
            image_url: None,
            parent_page_type: parent.map(|(kind, _)| kind.to_string()),
            parent_page_id: parent.map(|(_, id)| id.to_string()),
            like_count: 1,
            created_at: (now() - Duration::hours(hours_ago)).into(),
        }
    }

    fn create_test_grid(id: &str, user_id: &str, kind: &str, items: serde_json::Value) -> grid::Model {
        grid::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            grid_type: kind.to_string(),
            ranked_items: items,
            blurb: None,
            like_count: 0,
            created_at: now().into(),
            updated_at: now().into(),
        }
    }

    fn chat(id: &str, user_id: &str) -> chat_message::Model {
        chat_message::Model {
            id: id.to_string(),
            track_id: "bahrain".to_string(),
            user_id: user_id.to_string(),
            content: "Box box".to_string(),
            created_at: (now() - Duration::minutes(2)).into(),
        }
    }

    /// A service over fully populated mock connections, one per repository.
    fn populated_service() -> FeedService {
        let repos = FeedRepositories {
            follow: FollowRepository::new(conn(vec![vec![follow::Model {
                id: "f1".to_string(),
                follower_id: "me".to_string(),
                following_id: "u2".to_string(),
                created_at: now().into(),
            }]])),
            track: TrackRepository::new(conn(vec![vec![
                create_test_track("bahrain", date(2025, 3, 1), date(2025, 3, 3)),
                create_test_track("jeddah", date(2025, 3, 14), date(2025, 3, 16)),
            ]])),
            track_event: TrackEventRepository::new(conn(vec![vec![track_event::Model {
                id: "race".to_string(),
                track_id: "bahrain".to_string(),
                name: "Grand Prix".to_string(),
                starts_at: (now() + Duration::hours(3)).into(),
            }]])),
            chat_message: ChatMessageRepository::new(conn(vec![vec![
                chat("c1", "u2"),
                chat("c2", "u5"),
                chat("c3", "u2"),
            ]])),
            poll: PollRepository::new(conn(vec![
                vec![create_test_poll("poll1")],
                vec![create_test_poll("poll1")],
            ])),
            poll_response: PollResponseRepository::new(conn(vec![vec![
                create_test_response("r1", "me", "A"),
                create_test_response("r2", "u2", "A"),
                create_test_response("r3", "u3", "A"),
                create_test_response("r4", "u4", "B"),
            ]])),
            post: PostRepository::new(conn(vec![vec![
                create_test_post("p1", "me", None, 5),
                create_test_post("p2", "u2", Some(("driver", "max")), 1),
            ]])),
            vote: VoteRepository::new(conn(vec![vec![vote::Model {
                id: "v1".to_string(),
                post_id: "p2".to_string(),
                user_id: "me".to_string(),
                created_at: now().into(),
            }]])),
            grid: GridRepository::new(conn(vec![
                vec![
                    create_test_grid(
                        "g1",
                        "me",
                        "driver",
                        json!([{"id": "max"}, {"id": "ghost", "name": "Ghost"}]),
                    ),
                    create_test_grid("bad", "u2", "constructor", json!([])),
                ],
                vec![create_test_grid("g2", "u3", "team", json!([{"id": "ferrari"}]))],
            ])),
            grid_like: GridLikeRepository::new(conn(vec![vec![grid_like::Model {
                id: "l1".to_string(),
                grid_id: "g1".to_string(),
                user_id: "me".to_string(),
                created_at: now().into(),
            }]])),
            grid_slot_comment: GridSlotCommentRepository::new(conn(vec![vec![
                grid_slot_comment::Model {
                    id: "sc1".to_string(),
                    grid_id: "g1".to_string(),
                    rank_index: 0,
                    user_id: "u2".to_string(),
                    content: "Deserved".to_string(),
                    created_at: now().into(),
                },
            ]])),
            hot_take: HotTakeRepository::new(conn(vec![vec![hot_take::Model {
                id: "ht1".to_string(),
                content: "Sprint races should go".to_string(),
                admin_id: Some("admin".to_string()),
                starts_at: (now() - Duration::days(1)).into(),
                ends_at: (now() + Duration::days(1)).into(),
                created_at: now().into(),
            }]])),
            weekly_highlight: WeeklyHighlightRepository::new(conn(vec![vec![
                weekly_highlight::Model {
                    id: "w1".to_string(),
                    week_start_date: date(2025, 2, 24),
                    highlighted_fan_id: Some("u2".to_string()),
                    fan_blurb: Some("Top grid of the week".to_string()),
                    sponsor_id: Some("s1".to_string()),
                    highlighted_grid_id: Some("g2".to_string()),
                    created_at: now().into(),
                },
            ]])),
            sponsor: SponsorRepository::new(conn(vec![vec![sponsor::Model {
                id: "s1".to_string(),
                name: "Pit Wall Coffee".to_string(),
                logo_url: None,
                website_url: None,
                description: None,
                display_order: 1,
            }]])),
            news_story: NewsStoryRepository::new(conn(vec![
                vec![news_story::Model {
                    id: "n1".to_string(),
                    title: "Testing wraps up".to_string(),
                    summary: None,
                    image_url: None,
                    source_url: None,
                    featured: true,
                    published_at: now().into(),
                }],
                vec![news_story::Model {
                    id: "n1".to_string(),
                    title: "Testing wraps up".to_string(),
                    summary: None,
                    image_url: None,
                    source_url: None,
                    featured: true,
                    published_at: now().into(),
                }],
            ])),
            profile: ProfileRepository::new(conn(vec![vec![
                create_test_profile("me"),
                create_test_profile("u2"),
                create_test_profile("u3"),
            ]])),
            driver: DriverRepository::new(conn(vec![vec![driver::Model {
                id: "max".to_string(),
                name: "Max".to_string(),
                team_id: None,
                headshot_url: Some("https://img/max.png".to_string()),
                nationality: None,
                car_number: Some(1),
            }]])),
            team: TeamRepository::new(conn(vec![vec![team::Model {
                id: "ferrari".to_string(),
                name: "Ferrari".to_string(),
                logo_url: Some("https://img/ferrari.png".to_string()),
                base_location: Some("Maranello".to_string()),
            }]])),
        };

        FeedService::new(repos, FeedConfig::default())
    }

    #[test]
    fn test_week_start_is_monday() {
        assert_eq!(week_start(now()), date(2025, 2, 24));
        let monday = Utc.with_ymd_and_hms(2025, 2, 24, 0, 0, 0).unwrap();
        assert_eq!(week_start(monday), date(2025, 2, 24));
    }

    #[tokio::test]
    async fn test_compose_full_feed() {
        let feed = populated_service()
            .compose("me", now(), SpotlightView::Full)
            .await;

        let race = feed.race.unwrap();
        assert_eq!(race.id, "bahrain");
        assert_eq!(race.phase, RacePhase::Live);
        assert_eq!(race.live_participants, 2);
        assert_eq!(race.sessions.len(), 1);

        assert_eq!(feed.polls.len(), 1);
        assert_eq!(feed.polls[0].total_votes, 4);
        assert_eq!(feed.polls[0].options[0].percent, 75);
        assert_eq!(feed.polls[0].options[1].percent, 25);
        assert_eq!(feed.polls[0].user_selection.as_deref(), Some("A"));

        assert_eq!(feed.posts.len(), 2);
        assert_eq!(feed.posts[0].id, "p2");
        assert!(feed.posts[0].liked_by_me);
        assert!(!feed.posts[1].liked_by_me);
        assert_eq!(
            feed.posts[0].parent.as_ref().unwrap().title.as_deref(),
            Some("Max")
        );

        // The grid with an unknown type is dropped.
        assert_eq!(feed.grids.len(), 1);
        let grid = &feed.grids[0];
        assert!(grid.liked_by_me);
        assert_eq!(grid.items[0].image_url.as_deref(), Some("https://img/max.png"));
        assert_eq!(grid.items[0].slot_comments.len(), 1);
        assert!(grid.items[1].image_url.is_none());

        let kinds: Vec<&str> = feed
            .spotlight
            .iter()
            .map(|item| match item {
                SpotlightItem::Sponsor(_) => "sponsor",
                SpotlightItem::FeaturedPoll(_) => "poll",
                SpotlightItem::FeaturedStory(_) => "story",
                SpotlightItem::FeaturedGrid(_) => "grid",
                SpotlightItem::FeaturedFan(_) => "fan",
            })
            .collect();
        assert_eq!(kinds, vec!["sponsor", "poll", "story", "grid", "fan"]);

        assert_eq!(feed.hot_take.unwrap().id, "ht1");
        assert_eq!(feed.news.len(), 1);
    }

    #[tokio::test]
    async fn test_compose_is_deterministic() {
        let first = populated_service()
            .compose("me", now(), SpotlightView::Full)
            .await;
        let second = populated_service()
            .compose("me", now(), SpotlightView::Full)
            .await;

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_desktop_spotlight_skips_poll_and_story() {
        let feed = populated_service()
            .compose("me", now(), SpotlightView::Desktop)
            .await;

        assert_eq!(feed.spotlight.len(), 3);
        assert!(feed.spotlight.iter().all(SpotlightItem::on_desktop));
    }

    #[tokio::test]
    async fn test_compose_degrades_when_store_is_down() {
        let service = FeedService::new(broken_repositories(), FeedConfig::default());

        let feed = service.compose("me", now(), SpotlightView::Full).await;

        assert!(feed.race.is_none());
        assert!(feed.hot_take.is_none());
        assert!(feed.spotlight.is_empty());
        assert!(feed.polls.is_empty());
        assert!(feed.posts.is_empty());
        assert!(feed.grids.is_empty());
        assert!(feed.news.is_empty());
        assert_eq!(feed.week_start, date(2025, 2, 24));
    }

    #[tokio::test]
    async fn test_failed_chat_count_reads_as_zero() {
        let mut repos = broken_repositories();
        repos.track = TrackRepository::new(conn(vec![vec![create_test_track(
            "bahrain",
            date(2025, 3, 1),
            date(2025, 3, 3),
        )]]));
        let service = FeedService::new(repos, FeedConfig::default());

        let race = service.current_race(now()).await.unwrap();

        assert!(race.is_live);
        assert_eq!(race.live_participants, 0);
        assert!(race.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_spotlight_without_user() {
        let mut repos = broken_repositories();
        repos.sponsor = SponsorRepository::new(conn(vec![vec![sponsor::Model {
            id: "s1".to_string(),
            name: "Pit Wall Coffee".to_string(),
            logo_url: None,
            website_url: None,
            description: None,
            display_order: 1,
        }]]));
        repos.poll = PollRepository::new(conn(vec![vec![create_test_poll("poll1")]]));
        let service = FeedService::new(repos, FeedConfig::default());

        let full = service.spotlight(None, now(), SpotlightView::Full).await;
        assert_eq!(full.len(), 2);
    }
}
