//! Feed composition services.

pub mod banner;
pub mod enrichment;
pub mod feed;
pub mod poll;
pub mod race;
pub mod tally;

pub use banner::{SpotlightItem, SpotlightSources, SpotlightView, compose_spotlight};
pub use enrichment::{GridKind, GridView, Lookups, ParentPage, ParsedGrid, PostView};
pub use feed::{FeedRepositories, FeedService, FeedView};
pub use poll::PollService;
pub use race::{RaceCard, RacePhase, SelectedRace, is_live, select_closest_race};
pub use tally::{PollTally, VoteCounts, count_votes, percent};
