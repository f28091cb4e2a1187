//! Database entities.

#![allow(missing_docs)]

pub mod chat_message;
pub mod driver;
pub mod follow;
pub mod grid;
pub mod grid_like;
pub mod grid_slot_comment;
pub mod hot_take;
pub mod news_story;
pub mod poll;
pub mod poll_response;
pub mod post;
pub mod profile;
pub mod sponsor;
pub mod team;
pub mod track;
pub mod track_event;
pub mod vote;
pub mod weekly_highlight;

pub use chat_message::Entity as ChatMessage;
pub use driver::Entity as Driver;
pub use follow::Entity as Follow;
pub use grid::Entity as Grid;
pub use grid_like::Entity as GridLike;
pub use grid_slot_comment::Entity as GridSlotComment;
pub use hot_take::Entity as HotTake;
pub use news_story::Entity as NewsStory;
pub use poll::Entity as Poll;
pub use poll_response::Entity as PollResponse;
pub use post::Entity as Post;
pub use profile::Entity as Profile;
pub use sponsor::Entity as Sponsor;
pub use team::Entity as Team;
pub use track::Entity as Track;
pub use track_event::Entity as TrackEvent;
pub use vote::Entity as Vote;
pub use weekly_highlight::Entity as WeeklyHighlight;
