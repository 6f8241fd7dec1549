use crate::domain::{Page, Title};
use crate::error::WikiError;
use crate::io::PageStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

#[cfg(unix)]
const PAGE_FILE_MODE: u32 = 0o600;

/// Stores each page as `<title>.txt` under `root_path`.
///
/// Saves to one title are serialized, and every save lands through a rename
/// of a fully written staging file, so a page file always holds exactly one
/// submitted body.
pub struct FilePageStore {
    pub root_path: PathBuf,
    locks: Mutex<HashMap<Title, Arc<tokio::sync::Mutex<()>>>>,
}

impl FilePageStore {
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn page_path(&self, title: &Title) -> PathBuf {
        self.root_path.join(title.file_name())
    }

    fn staging_path(&self, title: &Title) -> PathBuf {
        self.root_path
            .join(format!(".{}.{}.tmp", title, Uuid::new_v4().simple()))
    }

    fn lock_map(&self) -> MutexGuard<'_, HashMap<Title, Arc<tokio::sync::Mutex<()>>>> {
        // the map stays consistent even if a holder panicked
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn acquire_title_lock(&self, title: &Title) -> TitleLock<'_> {
        let lock = self.lock_map().entry(title.clone()).or_default().clone();
        TitleLock {
            store: self,
            title: title.clone(),
            lock,
        }
    }

    async fn replace_file(&self, page: &Page) -> std::io::Result<()> {
        let target = self.page_path(&page.title);
        let staging = StagingFile::new(self.staging_path(&page.title));

        write_staging_file(&staging.path, &page.body).await?;
        fs::rename(&staging.path, &target).await?;
        staging.persisted();
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn tracked_locks(&self) -> usize {
        self.lock_map().len()
    }
}

/// A claim on one title's save lock. Dropping it, including when the save
/// future is cancelled while waiting, removes the map entry once nobody
/// else holds or waits on it.
pub(crate) struct TitleLock<'a> {
    store: &'a FilePageStore,
    title: Title,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl TitleLock<'_> {
    pub(crate) async fn lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

impl Drop for TitleLock<'_> {
    fn drop(&mut self) {
        let mut locks = self.store.lock_map();
        // clones are only handed out under the map lock, so two means the
        // map's entry and ours
        if locks
            .get(&self.title)
            .is_some_and(|entry| Arc::strong_count(entry) == 2)
        {
            locks.remove(&self.title);
        }
    }
}

/// Removes the staging file unless it was renamed into place.
struct StagingFile {
    path: PathBuf,
    persisted: bool,
}

impl StagingFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            persisted: false,
        }
    }

    fn persisted(mut self) {
        self.persisted = true;
    }
}

impl Drop for StagingFile {
    fn drop(&mut self) {
        if !self.persisted {
            // best effort, the original error is what matters
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

async fn write_staging_file(path: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(PAGE_FILE_MODE);

    let mut file = options.open(path).await?;
    file.write_all(body).await?;
    file.sync_all().await?;
    Ok(())
}

#[async_trait]
impl PageStore for FilePageStore {
    async fn load(&self, title: &Title) -> Result<Page, WikiError> {
        let body = fs::read(self.page_path(title))
            .await
            .map_err(|source| WikiError::Load {
                title: title.clone(),
                source,
            })?;

        Ok(Page::new(title.clone(), body))
    }

    async fn save(&self, page: &Page) -> Result<(), WikiError> {
        let title_lock = self.acquire_title_lock(&page.title);

        let result = {
            let _guard = title_lock.lock().await;
            self.replace_file(page).await
        };

        drop(title_lock);

        result.map_err(|source| WikiError::Save {
            title: page.title.clone(),
            source,
        })?;

        tracing::info!(title = %page.title, bytes = page.body.len(), "saved page");
        Ok(())
    }
}
