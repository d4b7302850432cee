use crate::models::{
	ActivePromotion, FilteredListedPromotion, FilteredPromotion, Promotion, RankedPromotion,
};

pub fn filter_promotion_record(promotion: &Promotion) -> FilteredPromotion {
	FilteredPromotion {
		id: promotion.id.to_string(),
		bar_id: promotion.bar_id.to_string(),
		title: promotion.title.to_owned(),
		description: promotion.description.to_owned(),
		discount_percentage: promotion.discount_percentage,
		valid_from: promotion.valid_from,
		valid_until: promotion.valid_until,
		is_active: promotion.is_active,
		photo_url: promotion.photo_url.to_owned(),
		terms_and_conditions: promotion.terms_and_conditions.to_owned(),
		created_at: promotion.created_at,
		updated_at: promotion.updated_at,
	}
}

pub fn filter_active_promotion_record(active: &ActivePromotion) -> FilteredListedPromotion {
	FilteredListedPromotion {
		promotion: filter_promotion_record(&active.promotion),
		bar_name: active.bar.name_bar.to_owned(),
		bar_logo: active.bar.photo.to_owned(),
		bar_rating: active.bar.average_rating,
		score: None,
	}
}

pub fn filter_ranked_promotion_record(ranked: &RankedPromotion) -> FilteredListedPromotion {
	FilteredListedPromotion {
		promotion: filter_promotion_record(&ranked.promotion),
		bar_name: ranked.bar.name_bar.to_owned(),
		bar_logo: ranked.bar.photo.to_owned(),
		bar_rating: ranked.bar.average_rating,
		score: Some(ranked.score.total_score),
	}
}
