//! Database repositories.

pub mod chat_message;
pub mod follow;
pub mod grid;
pub mod highlight;
pub mod poll;
pub mod post;
pub mod profile;
pub mod reference;
pub mod track;

pub use chat_message::ChatMessageRepository;
pub use follow::FollowRepository;
pub use grid::{GridLikeRepository, GridRepository, GridSlotCommentRepository};
pub use highlight::{
    HotTakeRepository, NewsStoryRepository, SponsorRepository, WeeklyHighlightRepository,
};
pub use poll::{PollRepository, PollResponseRepository};
pub use post::{PostRepository, VoteRepository};
pub use profile::ProfileRepository;
pub use reference::{DriverRepository, TeamRepository};
pub use track::{TrackEventRepository, TrackRepository};
