//! Spotlight carousel composition.

use chrono::{DateTime, FixedOffset};
use pole_db::entities::{news_story, poll, sponsor};
use serde::{Deserialize, Serialize};

use super::enrichment::{AuthorView, GridView};

/// Which carousel variant to render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotlightView {
    /// Every slot.
    #[default]
    Full,
    /// Sidebar variant without the news and poll slots.
    Desktop,
}

/// A sponsor slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SponsorCard {
    /// Sponsor id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Logo image.
    pub logo_url: Option<String>,
    /// Link target.
    pub website_url: Option<String>,
    /// Short pitch.
    pub description: Option<String>,
    /// Sponsor of this week's highlight.
    pub is_weekly_sponsor: bool,
}

/// The admin poll promoted to the podium slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeaturedPollCard {
    /// Poll id.
    pub id: String,
    /// Poll question.
    pub question: String,
    /// Closing time, if any.
    pub ends_at: Option<DateTime<FixedOffset>>,
}

/// The featured news story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeaturedStoryCard {
    /// Story id.
    pub id: String,
    /// Headline.
    pub title: String,
    /// Teaser text.
    pub summary: Option<String>,
    /// Lead image.
    pub image_url: Option<String>,
    /// Link to the original article.
    pub source_url: Option<String>,
}

/// Fan of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeaturedFanCard {
    /// The featured profile.
    pub fan: AuthorView,
    /// Why they were picked.
    pub blurb: Option<String>,
}

/// One slot of the carousel.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpotlightItem {
    /// Sponsor card.
    Sponsor(SponsorCard),
    /// Featured admin poll.
    FeaturedPoll(FeaturedPollCard),
    /// Featured news story.
    FeaturedStory(FeaturedStoryCard),
    /// Grid of the week.
    FeaturedGrid(GridView),
    /// Fan of the week.
    FeaturedFan(FeaturedFanCard),
}

impl SpotlightItem {
    /// Whether the desktop sidebar shows this slot.
    #[must_use]
    pub const fn on_desktop(&self) -> bool {
        !matches!(self, Self::FeaturedPoll(_) | Self::FeaturedStory(_))
    }
}

/// Everything the carousel can draw from.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpotlightSources<'a> {
    /// Sponsors in any order.
    pub sponsors: &'a [sponsor::Model],
    /// Sponsor attached to this week's highlight.
    pub weekly_sponsor_id: Option<&'a str>,
    /// Candidate podium poll.
    pub featured_poll: Option<&'a poll::Model>,
    /// Candidate featured story.
    pub featured_story: Option<&'a news_story::Model>,
    /// Highlighted grid, already enriched.
    pub featured_grid: Option<&'a GridView>,
    /// Highlighted fan, already resolved.
    pub featured_fan: Option<&'a FeaturedFanCard>,
}

/// Build the carousel: sponsors by display order, then the featured poll,
/// story, grid and fan. Absent sources leave no slot behind.
#[must_use]
pub fn compose_spotlight(sources: SpotlightSources<'_>, view: SpotlightView) -> Vec<SpotlightItem> {
    let mut sponsors: Vec<&sponsor::Model> = sources.sponsors.iter().collect();
    sponsors.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut items: Vec<SpotlightItem> = sponsors
        .into_iter()
        .map(|s| {
            SpotlightItem::Sponsor(SponsorCard {
                id: s.id.clone(),
                name: s.name.clone(),
                logo_url: s.logo_url.clone(),
                website_url: s.website_url.clone(),
                description: s.description.clone(),
                is_weekly_sponsor: sources.weekly_sponsor_id == Some(s.id.as_str()),
            })
        })
        .collect();

    // Community polls never make the carousel, whatever their flag says.
    if let Some(poll) = sources
        .featured_poll
        .filter(|p| p.is_admin_poll() && p.is_featured_podium)
    {
        items.push(SpotlightItem::FeaturedPoll(FeaturedPollCard {
            id: poll.id.clone(),
            question: poll.question.clone(),
            ends_at: poll.ends_at,
        }));
    }

    if let Some(story) = sources.featured_story {
        items.push(SpotlightItem::FeaturedStory(FeaturedStoryCard {
            id: story.id.clone(),
            title: story.title.clone(),
            summary: story.summary.clone(),
            image_url: story.image_url.clone(),
            source_url: story.source_url.clone(),
        }));
    }

    if let Some(grid) = sources.featured_grid {
        items.push(SpotlightItem::FeaturedGrid(grid.clone()));
    }

    if let Some(fan) = sources.featured_fan {
        items.push(SpotlightItem::FeaturedFan(fan.clone()));
    }

    match view {
        SpotlightView::Full => items,
        SpotlightView::Desktop => items.into_iter().filter(SpotlightItem::on_desktop).collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn create_test_sponsor(id: &str, order: i32) -> sponsor::Model {
        sponsor::Model {
            id: id.to_string(),
            name: format!("Sponsor {id}"),
            logo_url: None,
            website_url: None,
            description: None,
            display_order: order,
        }
    }

    fn create_test_poll(admin_id: Option<&str>) -> poll::Model {
        poll::Model {
            id: "poll1".to_string(),
            question: "Who tops the podium?".to_string(),
            options: json!([]),
            admin_id: admin_id.map(str::to_string),
            created_by: None,
            ends_at: None,
            is_featured_podium: true,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap().into(),
        }
    }

    fn create_test_story() -> news_story::Model {
        news_story::Model {
            id: "n1".to_string(),
            title: "Silly season heats up".to_string(),
            summary: None,
            image_url: None,
            source_url: None,
            featured: true,
            published_at: Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap().into(),
        }
    }

    fn fan() -> FeaturedFanCard {
        FeaturedFanCard {
            fan: AuthorView {
                id: "u1".to_string(),
                username: "tifosi".to_string(),
                display_name: None,
                avatar_url: None,
            },
            blurb: Some("Never missed a session".to_string()),
        }
    }

    fn kinds(items: &[SpotlightItem]) -> Vec<String> {
        items
            .iter()
            .map(|i| serde_json::to_value(i).unwrap()["type"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_full_order() {
        let sponsors = vec![create_test_sponsor("s2", 2), create_test_sponsor("s1", 1)];
        let poll = create_test_poll(Some("admin"));
        let story = create_test_story();
        let fan = fan();
        let sources = SpotlightSources {
            sponsors: &sponsors,
            weekly_sponsor_id: Some("s2"),
            featured_poll: Some(&poll),
            featured_story: Some(&story),
            featured_grid: None,
            featured_fan: Some(&fan),
        };

        let items = compose_spotlight(sources, SpotlightView::Full);

        assert_eq!(
            kinds(&items),
            vec!["sponsor", "sponsor", "featured_poll", "featured_story", "featured_fan"]
        );
        let SpotlightItem::Sponsor(first) = &items[0] else {
            panic!("expected sponsor");
        };
        assert_eq!(first.id, "s1");
        assert!(!first.is_weekly_sponsor);
        let SpotlightItem::Sponsor(second) = &items[1] else {
            panic!("expected sponsor");
        };
        assert!(second.is_weekly_sponsor);
    }

    #[test]
    fn test_community_poll_never_included() {
        let poll = create_test_poll(None);
        let sources = SpotlightSources {
            featured_poll: Some(&poll),
            ..SpotlightSources::default()
        };

        let items = compose_spotlight(sources, SpotlightView::Full);
        assert!(items.is_empty());
    }

    #[test]
    fn test_desktop_drops_news_and_poll() {
        let poll = create_test_poll(Some("admin"));
        let story = create_test_story();
        let fan = fan();
        let sources = SpotlightSources {
            featured_poll: Some(&poll),
            featured_story: Some(&story),
            featured_fan: Some(&fan),
            ..SpotlightSources::default()
        };

        let full = compose_spotlight(sources, SpotlightView::Full);
        let desktop = compose_spotlight(sources, SpotlightView::Desktop);

        assert_eq!(full.len(), 3);
        assert_eq!(kinds(&desktop), vec!["featured_fan"]);
    }

    #[test]
    fn test_empty_sources() {
        assert!(compose_spotlight(SpotlightSources::default(), SpotlightView::Full).is_empty());
    }

    #[test]
    fn test_view_parse() {
        let view: SpotlightView = serde_json::from_value(json!("desktop")).unwrap();
        assert_eq!(view, SpotlightView::Desktop);
        assert_eq!(SpotlightView::default(), SpotlightView::Full);
    }
}
