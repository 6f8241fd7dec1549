use crate::domain::{Page, Title};
use crate::error::WikiError;
use async_trait::async_trait;

pub mod local;

pub use self::local::FilePageStore;

// handlers only ever see this trait, so the file store can be swapped for a
// mock in tests
#[async_trait]
pub trait PageStore: Send + Sync {
    async fn load(&self, title: &Title) -> Result<Page, WikiError>;
    async fn save(&self, page: &Page) -> Result<(), WikiError>;
}
