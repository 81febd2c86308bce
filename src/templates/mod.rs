pub mod catalog;

pub use catalog::{TemplateCatalog, template_for};
