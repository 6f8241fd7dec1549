use crate::domain::Page;
use crate::error::WikiError;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use walkdir::WalkDir;

const TEMPLATE_EXTENSION: &str = "html";

/// The HTML templates found in the views directory, parsed once at startup.
pub struct TemplateSet {
    tera: Tera,
    files: Vec<PathBuf>,
}

impl TemplateSet {
    // any unreadable directory or unparsable template is fatal, there is no
    // partially loaded set
    pub fn load(views_dir: &Path) -> Result<Self, WikiError> {
        let files = list_template_files(views_dir)?;

        let mut tera = Tera::default();
        tera.add_template_files(files.iter().map(|path| (path, template_name(path))))
            .map_err(|source| WikiError::TemplateParse {
                dir: views_dir.to_path_buf(),
                source,
            })?;

        Ok(Self { tera, files })
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Renders `<name>.html` with the page's `title` and `body`.
    pub fn render(&self, name: &str, page: &Page) -> Result<String, WikiError> {
        let template = format!("{}.{}", name, TEMPLATE_EXTENSION);

        let mut context = Context::new();
        context.insert("title", page.title.as_str());
        context.insert("body", &page.body_text());

        self.tera
            .render(&template, &context)
            .map_err(|source| WikiError::Render {
                name: template,
                source,
            })
    }
}

// flat listing, only files whose extension is exactly "html"
fn list_template_files(views_dir: &Path) -> Result<Vec<PathBuf>, WikiError> {
    let dir_error = |source: std::io::Error| WikiError::TemplateDir {
        dir: views_dir.to_path_buf(),
        source,
    };

    // with min_depth(1) walkdir silently yields nothing for a plain file
    if views_dir.exists() && !views_dir.is_dir() {
        return Err(dir_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a directory",
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(views_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| dir_error(e.into()))?;

        if entry.file_type().is_file()
            && entry.path().extension().and_then(|s| s.to_str()) == Some(TEMPLATE_EXTENSION)
        {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn template_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}
