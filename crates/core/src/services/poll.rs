//! Poll service.

use chrono::{DateTime, Utc};
use pole_common::{AppError, AppResult};
use pole_db::{
    entities::poll_response,
    repositories::{PollRepository, PollResponseRepository},
};
use sea_orm::Set;
use tracing::info;

use super::tally::{PollTally, count_votes};

/// Poll service for voting and results.
#[derive(Clone)]
pub struct PollService {
    poll_repo: PollRepository,
    response_repo: PollResponseRepository,
}

impl PollService {
    /// Create a new poll service.
    #[must_use]
    pub const fn new(poll_repo: PollRepository, response_repo: PollResponseRepository) -> Self {
        Self {
            poll_repo,
            response_repo,
        }
    }

    /// Current results of a poll, with `user_id`'s own pick when given.
    pub async fn results(
        &self,
        poll_id: &str,
        user_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<PollTally> {
        let poll = self.poll_repo.get_by_id(poll_id).await?;
        let responses = self
            .response_repo
            .find_by_polls(std::slice::from_ref(&poll.id))
            .await?;

        Ok(PollTally::build(&poll, &count_votes(&responses, user_id), now))
    }

    /// Record `user_id`'s vote, replacing any earlier one, and return the
    /// updated results.
    pub async fn vote(
        &self,
        user_id: &str,
        poll_id: &str,
        option_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<PollTally> {
        let poll = self.poll_repo.get_by_id(poll_id).await?;

        if !poll.is_active(now) {
            return Err(AppError::BadRequest("Poll has ended".to_string()));
        }

        let options = poll
            .option_list()
            .map_err(|e| AppError::Internal(format!("Malformed options on poll {poll_id}: {e}")))?;
        if !options.iter().any(|o| o.id == option_id) {
            return Err(AppError::BadRequest(format!(
                "Poll {poll_id} has no option {option_id}"
            )));
        }

        self.response_repo
            .upsert(poll_response::ActiveModel {
                id: Set(crate::generate_id()),
                poll_id: Set(poll_id.to_string()),
                user_id: Set(user_id.to_string()),
                selected_option_id: Set(option_id.to_string()),
                created_at: Set(now.into()),
                updated_at: Set(Some(now.into())),
            })
            .await?;
        info!(user_id, poll_id, option_id, "Recorded poll vote");

        let responses = self
            .response_repo
            .find_by_polls(std::slice::from_ref(&poll.id))
            .await?;
        Ok(PollTally::build(&poll, &count_votes(&responses, Some(user_id)), now))
    }
}
