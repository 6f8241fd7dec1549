use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct WikiConfig {
    pub bind_addr: String,
    pub pages_dir: PathBuf,
    pub views_dir: PathBuf,
    pub expose_errors: bool,
    pub max_body_bytes: Option<usize>,
}

impl WikiConfig {
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("WIKI_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let pages_dir =
            PathBuf::from(std::env::var("WIKI_PAGES_DIR").unwrap_or_else(|_| ".".to_string()));

        let views_dir =
            PathBuf::from(std::env::var("WIKI_VIEWS_DIR").unwrap_or_else(|_| "views".to_string()));

        let expose_errors = std::env::var("WIKI_EXPOSE_ERRORS")
            .unwrap_or_else(|_| "false".to_string())
            == "true";

        // unset means no limit at all
        let max_body_bytes = std::env::var("WIKI_MAX_BODY_BYTES")
            .ok()
            .and_then(|val| val.parse::<usize>().ok());

        Self {
            bind_addr,
            pages_dir,
            views_dir,
            expose_errors,
            max_body_bytes,
        }
    }
}
