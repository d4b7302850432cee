use std::path::{Component, Path, PathBuf};

/// Local directory holding files served under `/uploads/`.
#[derive(Debug, Clone)]
pub struct UploadDir {
	root: PathBuf,
}

impl UploadDir {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		UploadDir { root: root.into() }
	}

	/// Resolves a public `/uploads/<file>` url to a path inside the root.
	pub fn resolve(&self, url: &str) -> Option<PathBuf> {
		let relative = url.strip_prefix("/uploads/")?;
		let relative = Path::new(relative);
		if relative.as_os_str().is_empty()
			|| !relative
				.components()
				.all(|component| matches!(component, Component::Normal(_)))
		{
			return None;
		}

		Some(self.root.join(relative))
	}

	/// Best-effort delete; failures are logged and swallowed.
	pub async fn remove(&self, url: &str) {
		let Some(path) = self.resolve(url) else {
			log::warn!("Refusing to delete file outside uploads: {}", url);
			return;
		};

		match tokio::fs::remove_file(&path).await {
			Ok(()) => log::info!("Deleted file {}", path.display()),
			Err(e) => log::warn!("Could not delete file {}: {}", path.display(), e),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_plain_upload_paths_resolve() {
		let uploads = UploadDir::new("/srv/uploads");
		assert_eq!(
			uploads.resolve("/uploads/promotion-1.png"),
			Some(PathBuf::from("/srv/uploads/promotion-1.png"))
		);
		assert_eq!(uploads.resolve("/uploads/../etc/passwd"), None);
		assert_eq!(uploads.resolve("/static/logo.png"), None);
		assert_eq!(uploads.resolve("/uploads/"), None);
	}

	#[actix_web::test]
	async fn remove_deletes_existing_file_and_ignores_missing() {
		let dir = tempfile::tempdir().unwrap();
		let file = dir.path().join("menu-1.png");
		std::fs::write(&file, b"png").unwrap();

		let uploads = UploadDir::new(dir.path());
		uploads.remove("/uploads/menu-1.png").await;
		assert!(!file.exists());

		uploads.remove("/uploads/menu-1.png").await;
	}
}
