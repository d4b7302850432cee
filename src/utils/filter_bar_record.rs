use crate::models::{Bar, FilteredBar};

pub fn filter_bar_record(bar: &Bar) -> FilteredBar {
	FilteredBar {
		id: bar.id.to_string(),
		name_bar: bar.name_bar.to_owned(),
		location: bar.location.to_owned(),
		description: bar.description.to_owned(),
		owner_id: bar.owner_id.to_string(),
		phone: bar.phone.to_owned(),
		photo: bar.photo.to_owned(),
		social_links: bar.social_links.0.clone(),
		hours: bar.hours.0.clone(),
		average_rating: bar.average_rating,
		total_reviews: bar.total_reviews,
		is_active: bar.is_active,
		created_at: bar.created_at,
		updated_at: bar.updated_at,
	}
}
