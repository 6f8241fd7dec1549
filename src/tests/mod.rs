mod unit_path_router;

use crate::AppState;
use crate::config::WikiConfig;
use crate::domain::{Page, Title};
use crate::error::WikiError;
use crate::features::pages::route::PathRouter;
use crate::io::{FilePageStore, PageStore};
use crate::render::TemplateSet;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// the templates shipped with the server
pub fn views_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("views")
}

pub fn test_config(pages_dir: &Path) -> WikiConfig {
    WikiConfig {
        bind_addr: "127.0.0.1:0".into(),
        pages_dir: pages_dir.to_path_buf(),
        views_dir: views_dir(),
        expose_errors: false,
        max_body_bytes: None,
    }
}

pub fn state_with_store(store: Arc<dyn PageStore>, config: WikiConfig) -> AppState {
    AppState {
        store,
        templates: Arc::new(TemplateSet::load(&config.views_dir).unwrap()),
        paths: Arc::new(PathRouter::new().unwrap()),
        config: Arc::new(config),
    }
}

// real file store rooted in `pages_dir`
pub fn file_state(pages_dir: &Path) -> AppState {
    let store = Arc::new(FilePageStore::new(pages_dir));
    state_with_store(store, test_config(pages_dir))
}

pub fn title(raw: &str) -> Title {
    Title::new(raw).unwrap()
}

// --- Manual Mock: PageStore ---
// keeps pages in a HashMap and can be told to fail every save, which is
// hard to provoke reliably on a real disk
#[derive(Clone)]
pub struct MockPageStore {
    pub pages: Arc<Mutex<HashMap<Title, Vec<u8>>>>,
    pub fail_saves: bool,
}

impl MockPageStore {
    pub fn new() -> Self {
        Self {
            pages: Arc::new(Mutex::new(HashMap::new())),
            fail_saves: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::new()
        }
    }
}

#[async_trait]
impl PageStore for MockPageStore {
    async fn load(&self, title: &Title) -> Result<Page, WikiError> {
        let pages = self.pages.lock().unwrap();
        pages
            .get(title)
            .map(|body| Page::new(title.clone(), body.clone()))
            .ok_or_else(|| WikiError::Load {
                title: title.clone(),
                source: std::io::ErrorKind::NotFound.into(),
            })
    }

    async fn save(&self, page: &Page) -> Result<(), WikiError> {
        if self.fail_saves {
            return Err(WikiError::Save {
                title: page.title.clone(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk on fire"),
            });
        }
        let mut pages = self.pages.lock().unwrap();
        pages.insert(page.title.clone(), page.body.clone());
        Ok(())
    }
}
