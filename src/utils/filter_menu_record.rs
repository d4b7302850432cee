use crate::models::{FilteredMenu, Menu};

pub fn filter_menu_record(menu: &Menu) -> FilteredMenu {
	FilteredMenu {
		id: menu.id.to_string(),
		bar_id: menu.bar_id.to_string(),
		name: menu.name.to_owned(),
		description: menu.description.to_owned(),
		items: menu.items.0.clone(),
		photo_url: menu.photo_url.to_owned(),
		created_at: menu.created_at,
		updated_at: menu.updated_at,
	}
}
