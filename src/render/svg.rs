// SVG template rewriting.
// Replaces the text of elements located by `id`, leaving every other byte untouched.

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{info, warn};

use crate::cache::{read_text, write_text};
use crate::error::{Result, StatsError};

/// Outcome of rewriting one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateStatus {
    /// File does not exist.
    Skipped,
    /// File rewritten; lists the ids that had no placeholder.
    Written { missing: Vec<String> },
}

/// One change applied to a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Replace the text of the element with this id.
    Field { id: &'static str, value: String },
    /// Set the text of the tspan styled with `color` that shares a parent with
    /// `anchor`, appending such a tspan to the parent if there is none.
    Accent {
        anchor: &'static str,
        color: &'static str,
        value: String,
    },
}

impl Edit {
    pub fn field(id: &'static str, value: impl Into<String>) -> Self {
        Edit::Field {
            id,
            value: value.into(),
        }
    }

    pub fn accent(anchor: &'static str, color: &'static str, value: impl Into<String>) -> Self {
        Edit::Accent {
            anchor,
            color,
            value: value.into(),
        }
    }

    /// Id this edit is located by.
    pub fn id(&self) -> &'static str {
        match self {
            Edit::Field { id, .. } => *id,
            Edit::Accent { anchor, .. } => *anchor,
        }
    }

    /// Apply to `doc`, or `None` if the placeholder is missing.
    pub fn apply(&self, doc: &str) -> Option<String> {
        match self {
            Edit::Field { id, value } => replace_field(doc, id, value),
            Edit::Accent {
                anchor,
                color,
                value,
            } => replace_accent(doc, anchor, color, value),
        }
    }
}

/// Opening tag of the element whose `id` is `id`: (start, end, tag name).
fn find_by_id<'a>(doc: &'a str, id: &str) -> Option<(usize, usize, &'a str)> {
    let open = Regex::new(&format!(
        r#"<([A-Za-z_][\w:.-]*)(?:\s[^>]*)?\sid\s*=\s*["']{}["'][^>]*>"#,
        regex::escape(id)
    ))
    .ok()?;
    let caps = open.captures(doc)?;
    let tag = caps.get(0)?;
    Some((tag.start(), tag.end(), caps.get(1)?.as_str()))
}

/// Replace the text of the element whose `id` is `id`.
///
/// If the element contains a `<tspan>`, the first tspan's text is replaced
/// instead. Returns `None` when no element with that id can hold text.
pub fn replace_field(doc: &str, id: &str, text: &str) -> Option<String> {
    let (_, content_start, name) = find_by_id(doc, id)?;
    if doc[..content_start].ends_with("/>") {
        return None;
    }

    let close = format!("</{}", name);
    let content_end = content_start + doc[content_start..].find(&close)?;
    let content = &doc[content_start..content_end];

    let text_start = match content.find("<tspan") {
        Some(offset) => {
            let tspan_start = content_start + offset;
            let tag_end = tspan_start + doc[tspan_start..].find('>')? + 1;
            if doc[..tag_end].ends_with("/>") {
                return None;
            }
            tag_end
        }
        None => content_start,
    };
    Some(splice_text(doc, text_start, text))
}

/// Replace the character data starting at `text_start` (up to the next tag).
fn splice_text(doc: &str, text_start: usize, text: &str) -> String {
    let text_end = doc[text_start..]
        .find('<')
        .map_or(doc.len(), |offset| text_start + offset);

    let mut out = String::with_capacity(doc.len() + text.len());
    out.push_str(&doc[..text_start]);
    out.push_str(&escape_text(text));
    out.push_str(&doc[text_end..]);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Open,
    Close,
    Empty,
}

#[derive(Debug, Clone, Copy)]
struct Tag<'a> {
    start: usize,
    end: usize,
    kind: TagKind,
    name: &'a str,
}

/// Element tags of `doc` in document order. Comments and declarations are skipped.
fn scan_tags(doc: &str) -> Option<Vec<Tag<'_>>> {
    let tag = Regex::new(r"<(/?)([A-Za-z_][\w:.-]*)[^>]*?(/?)>").ok()?;
    let tags = tag
        .captures_iter(doc)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let kind = if !caps[1].is_empty() {
                TagKind::Close
            } else if !caps[3].is_empty() {
                TagKind::Empty
            } else {
                TagKind::Open
            };
            Some(Tag {
                start: whole.start(),
                end: whole.end(),
                kind,
                name: caps.get(2)?.as_str(),
            })
        })
        .collect();
    Some(tags)
}

/// Set the text of the `color`-styled tspan under the parent of `anchor`.
pub fn replace_accent(doc: &str, anchor: &str, color: &str, text: &str) -> Option<String> {
    let (anchor_start, _, _) = find_by_id(doc, anchor)?;
    let tags = scan_tags(doc)?;

    let mut stack: Vec<usize> = Vec::new();
    let mut parent = None;
    for (idx, tag) in tags.iter().enumerate() {
        if tag.start == anchor_start {
            parent = stack.last().copied();
            break;
        }
        match tag.kind {
            TagKind::Open => stack.push(idx),
            TagKind::Close => {
                stack.pop();
            }
            TagKind::Empty => {}
        }
    }
    let parent = parent?;

    let mut depth = 0usize;
    for tag in &tags[parent + 1..] {
        match tag.kind {
            TagKind::Open => {
                let is_accent = tag.name == "tspan"
                    && tag.start != anchor_start
                    && doc[tag.start..tag.end].contains(color);
                if is_accent {
                    return Some(splice_text(doc, tag.end, text));
                }
                depth += 1;
            }
            TagKind::Close if depth == 0 => {
                let mut out = String::with_capacity(doc.len() + text.len() + 48);
                out.push_str(&doc[..tag.start]);
                out.push_str(&format!(
                    r#"<tspan dx="12" style="fill:{}">{}</tspan>"#,
                    color,
                    escape_text(text)
                ));
                out.push_str(&doc[tag.start..]);
                return Some(out);
            }
            TagKind::Close => depth -= 1,
            TagKind::Empty => {}
        }
    }
    None
}

/// Escape characters that are significant in XML character data.
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Rewrite one template file with every edit. Writes only if the file exists.
pub fn overwrite_template(path: &Path, edits: &[Edit]) -> Result<TemplateStatus> {
    let Some(mut doc) = read_text(path)? else {
        return Ok(TemplateStatus::Skipped);
    };

    let mut missing = Vec::new();
    for edit in edits {
        match edit.apply(&doc) {
            Some(updated) => doc = updated,
            None => missing.push(edit.id().to_string()),
        }
    }

    write_text(path, &doc)?;
    Ok(TemplateStatus::Written { missing })
}

/// Rewrite every template, logging skipped files and missing placeholders.
///
/// All templates are attempted; the first write failure is returned at the end.
pub fn overwrite_templates(paths: &[PathBuf], edits: &[Edit]) -> Result<()> {
    let mut first_error: Option<StatsError> = None;

    for path in paths {
        match overwrite_template(path, edits) {
            Ok(TemplateStatus::Skipped) => {
                warn!(path = %path.display(), "template not found, skipping");
            }
            Ok(TemplateStatus::Written { missing }) => {
                for id in &missing {
                    warn!(path = %path.display(), id = %id, "placeholder not found");
                }
                info!(path = %path.display(), "template updated");
            }
            Err(err) => {
                warn!(path = %path.display(), "template update failed: {}", err);
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DOC: &str = r#"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg">
<text x="10" id="star_data" class="value">0</text>
<text id="loc_data"><tspan style="fill:#fff">0</tspan><tspan>extra</tspan></text>
<tspan data-id="repo_data" id='repo_data'>old</tspan>
<rect id="empty"/>
</svg>
"#;

    #[test]
    fn test_replace_plain_text() {
        let out = replace_field(DOC, "star_data", "1,234").unwrap();
        assert!(out.contains(r#"<text x="10" id="star_data" class="value">1,234</text>"#));
        assert_eq!(out.len(), DOC.len() + 4);
    }

    #[test]
    fn test_replace_first_tspan() {
        let out = replace_field(DOC, "loc_data", "42").unwrap();
        assert!(out.contains(r#"<tspan style="fill:#fff">42</tspan><tspan>extra</tspan>"#));
    }

    #[test]
    fn test_replace_single_quoted_id() {
        let out = replace_field(DOC, "repo_data", "7").unwrap();
        assert!(out.contains(">7</tspan>"));
    }

    #[test]
    fn test_missing_or_empty_element() {
        assert!(replace_field(DOC, "nope", "1").is_none());
        assert!(replace_field(DOC, "empty", "1").is_none());
        assert!(replace_field(DOC, "star", "1").is_none());
    }

    #[test]
    fn test_text_is_escaped() {
        let out = replace_field(DOC, "star_data", "a<b & c").unwrap();
        assert!(out.contains(">a&lt;b &amp; c</text>"));
    }

    const LOC: &str = r##"<svg><text x="5"><tspan id="loc_data">0</tspan><tspan dx="12" style="fill:#bb9af7">(+0 / -0)</tspan></text></svg>"##;

    #[test]
    fn test_accent_sibling_is_updated() {
        let out = replace_field(LOC, "loc_data", "11").unwrap();
        let out = replace_accent(&out, "loc_data", "#bb9af7", "(+14 / -3)").unwrap();
        assert_eq!(
            out,
            r##"<svg><text x="5"><tspan id="loc_data">11</tspan><tspan dx="12" style="fill:#bb9af7">(+14 / -3)</tspan></text></svg>"##
        );
    }

    #[test]
    fn test_accent_sibling_is_appended_when_missing() {
        let doc = r#"<svg><text><tspan id="loc_data">0</tspan><tspan>x</tspan></text></svg>"#;
        let out = replace_accent(doc, "loc_data", "#bb9af7", "(+1 / -2)").unwrap();
        assert_eq!(
            out,
            r##"<svg><text><tspan id="loc_data">0</tspan><tspan>x</tspan><tspan dx="12" style="fill:#bb9af7">(+1 / -2)</tspan></text></svg>"##
        );
    }

    #[test]
    fn test_accent_skips_other_subtrees() {
        let doc = r##"<svg><text><tspan id="loc_data">0</tspan><rect/></text><text><tspan style="fill:#bb9af7">keep</tspan></text></svg>"##;
        let out = replace_accent(doc, "loc_data", "#bb9af7", "new").unwrap();
        assert!(out.contains(r##"<rect/><tspan dx="12" style="fill:#bb9af7">new</tspan></text>"##));
        assert!(out.contains(">keep</tspan>"));
    }

    #[test]
    fn test_accent_without_anchor_or_parent() {
        assert!(replace_accent(LOC, "nope", "#bb9af7", "x").is_none());
        assert!(replace_accent(r#"<text id="loc_data">0</text>"#, "loc_data", "#bb9af7", "x").is_none());
    }

    #[test]
    fn test_overwrite_template() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dark_mode.svg");
        std::fs::write(&path, DOC).unwrap();

        let edits = [Edit::field("star_data", "5"), Edit::field("follower_data", "9")];
        let status = overwrite_template(&path, &edits).unwrap();
        assert_eq!(
            status,
            TemplateStatus::Written {
                missing: vec!["follower_data".to_string()]
            }
        );

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, DOC.replace(r#"class="value">0<"#, r#"class="value">5<"#));
    }

    #[test]
    fn test_overwrite_template_with_accent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dark_mode.svg");
        std::fs::write(&path, LOC).unwrap();

        let edits = [
            Edit::field("loc_data", "1,200"),
            Edit::accent("loc_data", "#bb9af7", "(+1,500 / -300)"),
        ];
        overwrite_template(&path, &edits).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains(r#"<tspan id="loc_data">1,200</tspan>"#));
        assert!(written.contains(r##"style="fill:#bb9af7">(+1,500 / -300)</tspan>"##));
    }

    #[test]
    fn test_missing_template_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("light_mode.svg");
        let status = overwrite_template(&path, &[Edit::field("star_data", "1")]).unwrap();
        assert_eq!(status, TemplateStatus::Skipped);
        assert!(!path.exists());

        overwrite_templates(&[path], &[Edit::field("star_data", "1")]).unwrap();
    }
}
