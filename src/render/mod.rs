// Presentation layer.
// Formats statistics and writes them into SVG badge templates.

pub mod format;
pub mod svg;

pub use format::{age_text, thousands};
pub use svg::{
    Edit, TemplateStatus, overwrite_template, overwrite_templates, replace_accent, replace_field,
};
