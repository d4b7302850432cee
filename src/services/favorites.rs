use std::sync::Arc;

use uuid::Uuid;

use crate::api::{BarDirectory, CustomError, FavoriteStore};
use crate::models::{Actor, Bar};
use crate::utils::Clock;

pub struct FavoriteService {
	favorites: Arc<dyn FavoriteStore>,
	bars: Arc<dyn BarDirectory>,
	clock: Arc<dyn Clock>,
}

impl FavoriteService {
	pub fn new(
		favorites: Arc<dyn FavoriteStore>,
		bars: Arc<dyn BarDirectory>,
		clock: Arc<dyn Clock>,
	) -> Self {
		FavoriteService {
			favorites,
			bars,
			clock,
		}
	}

	/// Idempotent: adding a venue twice keeps a single entry.
	pub async fn add(&self, actor: &Actor, bar_id: Uuid) -> Result<(), CustomError> {
		if self.bars.find_bar_summary(bar_id).await?.is_none() {
			return Err(CustomError::not_found(format!("Bar with id {} not found", bar_id)));
		}

		if self
			.favorites
			.add_favorite(actor.user_id, bar_id, self.clock.now())
			.await?
		{
			log::info!("User {} added bar {} to favorites", actor.user_id, bar_id);
		}
		Ok(())
	}

	pub async fn remove(&self, actor: &Actor, bar_id: Uuid) -> Result<(), CustomError> {
		self.favorites.remove_favorite(actor.user_id, bar_id).await?;
		Ok(())
	}

	pub async fn list(&self, actor: &Actor) -> Result<Vec<Bar>, CustomError> {
		self.favorites.list_favorite_bars(actor.user_id).await
	}
}
