pub mod templates;

pub use self::templates::TemplateSet;
