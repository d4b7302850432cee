use std::sync::Arc;

use sqlx::{Pool, Postgres};

use crate::api::{
	BarDirectory, BarStore, FavoriteStore, MemoryStore, MenuStore, PgStore, PromotionStore,
	RatingSink, ReservationStore, ReviewStore, UserStore,
};
use crate::config::Config;
use crate::services::{
	BarService, FavoriteService, MenuService, PromotionService, ReservationManager,
	ReviewAggregator, UserService,
};
use crate::utils::{Clock, IdGenerator, RandomIds, SystemClock, UploadDir};

/// Shared per-worker state handed to every handler through `web::Data`.
pub struct AppState {
	pub env: Config,
	pub users: UserService,
	pub bars: BarService,
	pub reservations: ReservationManager,
	pub reviews: ReviewAggregator,
	pub promotions: PromotionService,
	pub menus: MenuService,
	pub favorites: FavoriteService,
}

impl AppState {
	pub fn postgres(env: Config, db: Pool<Postgres>) -> Self {
		AppState::with_store(
			env,
			Arc::new(PgStore::new(db)),
			Arc::new(SystemClock),
			Arc::new(RandomIds),
		)
	}

	pub fn in_memory(env: Config) -> Self {
		AppState::with_store(
			env,
			Arc::new(MemoryStore::new()),
			Arc::new(SystemClock),
			Arc::new(RandomIds),
		)
	}

	/// Wires every service to one store that implements all ports.
	pub fn with_store<S>(
		env: Config,
		store: Arc<S>,
		clock: Arc<dyn Clock>,
		ids: Arc<dyn IdGenerator>,
	) -> Self
	where
		S: UserStore
			+ BarStore
			+ BarDirectory
			+ RatingSink
			+ ReservationStore
			+ ReviewStore
			+ PromotionStore
			+ MenuStore
			+ FavoriteStore
			+ 'static,
	{
		let uploads = UploadDir::new(env.uploads_dir.clone());

		let users = UserService::new(
			store.clone(),
			clock.clone(),
			ids.clone(),
			env.jwt_secret.clone(),
			env.jwt_maxage,
		);
		let bars = BarService::new(store.clone(), uploads.clone(), clock.clone(), ids.clone());
		let reservations =
			ReservationManager::new(store.clone(), store.clone(), clock.clone(), ids.clone());
		let reviews = ReviewAggregator::new(
			store.clone(),
			store.clone(),
			store.clone(),
			clock.clone(),
			ids.clone(),
		);
		let promotions = PromotionService::new(
			store.clone(),
			store.clone(),
			uploads.clone(),
			clock.clone(),
			ids.clone(),
		);
		let menus = MenuService::new(store.clone(), store.clone(), uploads, clock.clone(), ids);
		let favorites = FavoriteService::new(store.clone(), store, clock);

		AppState {
			env,
			users,
			bars,
			reservations,
			reviews,
			promotions,
			menus,
			favorites,
		}
	}
}
