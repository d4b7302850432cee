use crate::models::{FilteredReview, Review};

pub fn filter_review_record(review: &Review) -> FilteredReview {
	FilteredReview {
		id: review.id.to_string(),
		user_id: review.user_id.to_string(),
		bar_id: review.bar_id.to_string(),
		rating: review.rating,
		comment: review.comment.to_owned(),
		owner_response: review.owner_response.to_owned(),
		response_date: review.response_date,
		is_visible: review.is_visible,
		created_at: review.created_at,
		updated_at: review.updated_at,
	}
}
