//! Grid and post enrichment.
//!
//! Rows reference drivers, teams, tracks and profiles by id. The feed fetches
//! each referenced table once for the whole page and [`Lookups`] merges the
//! results back in. A reference that does not resolve leaves the derived
//! fields empty.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use pole_common::AppError;
use pole_db::entities::{
    driver, grid, grid::RankedItem, grid_like, grid_slot_comment, hot_take, poll, post, profile,
    team, track,
};
use serde::{Deserialize, Serialize};

/// What a grid ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridKind {
    /// Ranks drivers.
    Driver,
    /// Ranks teams.
    Team,
    /// Ranks circuits.
    Track,
}

impl GridKind {
    /// Lowercase name as stored in `grids.grid_type`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Driver => "driver",
            Self::Team => "team",
            Self::Track => "track",
        }
    }
}

impl fmt::Display for GridKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GridKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "driver" => Ok(Self::Driver),
            "team" => Ok(Self::Team),
            "track" => Ok(Self::Track),
            other => Err(AppError::BadRequest(format!("Unknown grid type: {other}"))),
        }
    }
}

/// Kind of page a post hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentPage {
    /// A poll.
    Poll,
    /// A hot take.
    HotTake,
    /// A driver page.
    Driver,
    /// A team page.
    Team,
    /// A circuit page.
    Track,
}

impl ParentPage {
    /// Parse a stored `parent_page_type`. `none` and empty mean no parent.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "poll" => Some(Self::Poll),
            "hot_take" => Some(Self::HotTake),
            "driver" => Some(Self::Driver),
            "team" => Some(Self::Team),
            "track" => Some(Self::Track),
            "" | "none" => None,
            other => {
                tracing::debug!(parent_page_type = other, "Ignoring unknown parent page type");
                None
            }
        }
    }
}

/// A grid whose type and items decoded cleanly.
#[derive(Debug, Clone)]
pub struct ParsedGrid {
    /// The stored row.
    pub model: grid::Model,
    /// Decoded grid type.
    pub kind: GridKind,
    /// Decoded ranking, best first.
    pub items: Vec<RankedItem>,
}

impl ParsedGrid {
    /// Decode a grid row. Rows with an unknown type or unreadable items are
    /// logged and dropped.
    #[must_use]
    pub fn parse(model: grid::Model) -> Option<Self> {
        let kind = match model.grid_type.parse::<GridKind>() {
            Ok(kind) => kind,
            Err(e) => {
                tracing::warn!(grid_id = %model.id, error = %e, "Rejecting grid");
                return None;
            }
        };
        let items = match model.ranked_item_list() {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(grid_id = %model.id, error = %e, "Rejecting grid with malformed items");
                return None;
            }
        };
        Some(Self { model, kind, items })
    }

    fn item_ids_of(&self, kind: GridKind) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter(move |_| self.kind == kind)
            .map(|item| item.id.as_str())
    }
}

/// Driver and team ids referenced by grids and posts, deduplicated and sorted.
#[must_use]
pub fn referenced_ids(
    grids: &[&ParsedGrid],
    posts: &[post::Model],
    kind: GridKind,
) -> Vec<String> {
    let parent = match kind {
        GridKind::Driver => ParentPage::Driver,
        GridKind::Team => ParentPage::Team,
        GridKind::Track => ParentPage::Track,
    };

    let mut ids: BTreeSet<&str> = grids.iter().flat_map(|g| g.item_ids_of(kind)).collect();
    ids.extend(posts.iter().filter_map(|p| {
        let page = ParentPage::parse(p.parent_page_type.as_deref()?)?;
        (page == parent).then_some(p.parent_page_id.as_deref()).flatten()
    }));
    ids.into_iter().map(str::to_string).collect()
}

/// Public face of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorView {
    /// Profile id.
    pub id: String,
    /// Handle.
    pub username: String,
    /// Display name, if set.
    pub display_name: Option<String>,
    /// Avatar image.
    pub avatar_url: Option<String>,
}

impl From<&profile::Model> for AuthorView {
    fn from(profile: &profile::Model) -> Self {
        Self {
            id: profile.id.clone(),
            username: profile.username.clone(),
            display_name: profile.display_name.clone(),
            avatar_url: profile.avatar_url.clone(),
        }
    }
}

/// A comment left on one slot of a grid.
#[derive(Debug, Clone, Serialize)]
pub struct SlotCommentView {
    /// Comment id.
    pub id: String,
    /// Commenter id, kept when the profile is not resolved.
    pub user_id: String,
    /// Commenter, when resolved.
    pub author: Option<AuthorView>,
    /// Comment text.
    pub content: String,
    /// When it was posted.
    pub created_at: DateTime<FixedOffset>,
}

/// One ranked slot of a grid, merged with its referenced row.
#[derive(Debug, Clone, Serialize)]
pub struct GridItemView {
    /// 1-based rank.
    pub rank: usize,
    /// Referenced driver, team or track id.
    pub id: String,
    /// Name of the referenced row.
    pub name: Option<String>,
    /// Image of the referenced row.
    pub image_url: Option<String>,
    /// Circuit location; tracks only.
    pub location: Option<String>,
    /// Owner's note on this slot.
    pub comment: Option<String>,
    /// Comments on this slot, oldest first.
    pub slot_comments: Vec<SlotCommentView>,
}

/// A grid ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct GridView {
    /// Grid id.
    pub id: String,
    /// What it ranks.
    pub kind: GridKind,
    /// Owner id.
    pub user_id: String,
    /// Owner, when resolved.
    pub author: Option<AuthorView>,
    /// Owner's caption.
    pub blurb: Option<String>,
    /// Stored like counter.
    pub like_count: i32,
    /// Whether the viewer liked it.
    pub liked_by_me: bool,
    /// Last edit.
    pub updated_at: DateTime<FixedOffset>,
    /// Ranked slots.
    pub items: Vec<GridItemView>,
}

/// What a post hangs off, with a display title when one resolves.
#[derive(Debug, Clone, Serialize)]
pub struct ParentRef {
    /// Kind of page.
    pub kind: ParentPage,
    /// Id of the page.
    pub id: String,
    /// Page title, when resolved.
    pub title: Option<String>,
    /// Page image, when resolved.
    pub image_url: Option<String>,
}

/// A post ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    /// Post id.
    pub id: String,
    /// Author id.
    pub user_id: String,
    /// Author, when resolved.
    pub author: Option<AuthorView>,
    /// Body text.
    pub content: String,
    /// Attached image.
    pub image_url: Option<String>,
    /// Page the post was made on.
    pub parent: Option<ParentRef>,
    /// Net vote score.
    pub like_count: i32,
    /// Whether the viewer upvoted it.
    pub liked_by_me: bool,
    /// When it was posted.
    pub created_at: DateTime<FixedOffset>,
}

/// Batch-fetched rows keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Lookups {
    profiles: BTreeMap<String, profile::Model>,
    drivers: BTreeMap<String, driver::Model>,
    teams: BTreeMap<String, team::Model>,
    tracks: BTreeMap<String, track::Model>,
    polls: BTreeMap<String, String>,
    hot_take: Option<(String, String)>,
}

impl Lookups {
    /// Index the batch-fetched rows by id.
    #[must_use]
    pub fn new(
        profiles: Vec<profile::Model>,
        drivers: Vec<driver::Model>,
        teams: Vec<team::Model>,
        tracks: &[track::Model],
    ) -> Self {
        Self {
            profiles: profiles.into_iter().map(|p| (p.id.clone(), p)).collect(),
            drivers: drivers.into_iter().map(|d| (d.id.clone(), d)).collect(),
            teams: teams.into_iter().map(|t| (t.id.clone(), t)).collect(),
            tracks: tracks.iter().map(|t| (t.id.clone(), t.clone())).collect(),
            polls: BTreeMap::new(),
            hot_take: None,
        }
    }

    /// Make poll questions available as post parent titles.
    #[must_use]
    pub fn with_polls<'a>(mut self, polls: impl IntoIterator<Item = &'a poll::Model>) -> Self {
        self.polls
            .extend(polls.into_iter().map(|p| (p.id.clone(), p.question.clone())));
        self
    }

    /// Make the active hot take available as a post parent title.
    #[must_use]
    pub fn with_hot_take(mut self, hot_take: Option<&hot_take::Model>) -> Self {
        self.hot_take = hot_take.map(|h| (h.id.clone(), h.content.clone()));
        self
    }

    /// Raw profile row by id.
    #[must_use]
    pub fn profile(&self, id: &str) -> Option<&profile::Model> {
        self.profiles.get(id)
    }

    /// Public author view by profile id.
    #[must_use]
    pub fn author(&self, id: &str) -> Option<AuthorView> {
        self.profiles.get(id).map(AuthorView::from)
    }

    /// Name, image and location of a referenced row.
    fn resolve(
        &self,
        kind: GridKind,
        id: &str,
    ) -> (Option<String>, Option<String>, Option<String>) {
        match kind {
            GridKind::Driver => self.drivers.get(id).map_or((None, None, None), |d| {
                (Some(d.name.clone()), d.headshot_url.clone(), d.nationality.clone())
            }),
            GridKind::Team => self.teams.get(id).map_or((None, None, None), |t| {
                (Some(t.name.clone()), t.logo_url.clone(), t.base_location.clone())
            }),
            GridKind::Track => self.tracks.get(id).map_or((None, None, None), |t| {
                (Some(t.name.clone()), t.image_url.clone(), t.location.clone())
            }),
        }
    }

    /// Merge a grid with its referenced rows, likes and slot comments.
    #[must_use]
    pub fn grid_view(
        &self,
        grid: &ParsedGrid,
        liked_grid_ids: &BTreeSet<String>,
        comments: &[grid_slot_comment::Model],
    ) -> GridView {
        let mut by_slot: BTreeMap<i32, Vec<&grid_slot_comment::Model>> = BTreeMap::new();
        for comment in comments.iter().filter(|c| c.grid_id == grid.model.id) {
            by_slot.entry(comment.rank_index).or_default().push(comment);
        }

        let items = grid
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let (name, image_url, location) = self.resolve(grid.kind, &item.id);
                let mut slot_comments: Vec<SlotCommentView> = by_slot
                    .get(&(index as i32))
                    .into_iter()
                    .flatten()
                    .map(|c| SlotCommentView {
                        id: c.id.clone(),
                        user_id: c.user_id.clone(),
                        author: self.author(&c.user_id),
                        content: c.content.clone(),
                        created_at: c.created_at,
                    })
                    .collect();
                slot_comments.sort_by(|a, b| {
                    a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id))
                });

                GridItemView {
                    rank: index + 1,
                    id: item.id.clone(),
                    name: item.name.clone().or(name),
                    image_url,
                    location,
                    comment: item.comment.clone(),
                    slot_comments,
                }
            })
            .collect();

        GridView {
            id: grid.model.id.clone(),
            kind: grid.kind,
            user_id: grid.model.user_id.clone(),
            author: self.author(&grid.model.user_id),
            blurb: grid.model.blurb.clone(),
            like_count: grid.model.like_count,
            liked_by_me: liked_grid_ids.contains(&grid.model.id),
            updated_at: grid.model.updated_at,
            items,
        }
    }

    fn parent(&self, post: &post::Model) -> Option<ParentRef> {
        let kind = ParentPage::parse(post.parent_page_type.as_deref()?)?;
        let id = post.parent_page_id.clone()?;

        let (title, image_url) = match kind {
            ParentPage::Driver => {
                let (name, image, _) = self.resolve(GridKind::Driver, &id);
                (name, image)
            }
            ParentPage::Team => {
                let (name, image, _) = self.resolve(GridKind::Team, &id);
                (name, image)
            }
            ParentPage::Track => {
                let (name, image, _) = self.resolve(GridKind::Track, &id);
                (name, image)
            }
            ParentPage::Poll => (self.polls.get(&id).cloned(), None),
            ParentPage::HotTake => (
                self.hot_take
                    .as_ref()
                    .filter(|(hot_take_id, _)| *hot_take_id == id)
                    .map(|(_, content)| content.clone()),
                None,
            ),
        };

        Some(ParentRef {
            kind,
            id,
            title,
            image_url,
        })
    }

    /// Merge a post with its author, parent page and the viewer's like.
    #[must_use]
    pub fn post_view(&self, post: &post::Model, liked_post_ids: &BTreeSet<String>) -> PostView {
        PostView {
            id: post.id.clone(),
            user_id: post.user_id.clone(),
            author: self.author(&post.user_id),
            content: post.content.clone(),
            image_url: post.image_url.clone(),
            parent: self.parent(post),
            like_count: post.like_count,
            liked_by_me: liked_post_ids.contains(&post.id),
            created_at: post.created_at,
        }
    }
}

/// Ids of grids that `user_id` liked.
#[must_use]
pub fn liked_grid_ids(likes: &[grid_like::Model], user_id: &str) -> BTreeSet<String> {
    likes
        .iter()
        .filter(|l| l.user_id == user_id)
        .map(|l| l.grid_id.clone())
        .collect()
}
