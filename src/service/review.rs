//! Review eligibility: one review per spa, only after a confirmed visit
use super::Marketplace;
use crate::context::Actor;
use crate::error::{EngineError, Result, abort};
use crate::model::{BookingStatus, Review, Role};
use crate::types::{ReviewId, SpaId, TimeStamp};
use crate::view::ReviewView;
use tracing::info;

#[derive(Debug, Clone)]
pub struct NewReview {
    pub rating: u8,
    pub comment: String,
}

impl Marketplace {
    pub fn submit_review(
        &self,
        actor: &Actor,
        spa_id: &SpaId,
        new_review: NewReview,
    ) -> Result<ReviewView> {
        actor.require(Role::User)?;
        if !(1..=5).contains(&new_review.rating) {
            return Err(EngineError::InvalidArgument(format!(
                "rating {} is outside 1..=5",
                new_review.rating
            )));
        }

        let id = ReviewId::generate()?;
        let review_date = TimeStamp::new();

        let (review, author) = self.store.transaction(|tx| {
            let author = tx.user(&actor.id)?;
            let spa = tx.spa(spa_id)?;

            if !tx.has_booking_with_status(&author.id, &spa.id, BookingStatus::Confirmed)? {
                return abort(EngineError::Conflict(format!(
                    "a confirmed booking at spa {} is required to review it",
                    spa.id
                )));
            }
            if tx.has_reviewed(&author.id, &spa.id)? {
                return abort(EngineError::Conflict(format!(
                    "{} has already reviewed spa {}",
                    author.id, spa.id
                )));
            }

            let review = Review {
                id: id.clone(),
                rating: new_review.rating,
                comment: new_review.comment.clone(),
                review_date,
                user: author.id.clone(),
                spa: spa.id.clone(),
            };
            tx.insert_review(&review)?;
            Ok((review, author))
        })?;

        info!(review = %review.id, spa = %review.spa, rating = review.rating, "review submitted");
        Ok(ReviewView::new(&review, &author))
    }
}
