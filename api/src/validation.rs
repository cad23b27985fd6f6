use crate::openapi::common::CreateArticleRequest;
use anyhow::{bail, Result};
use std::collections::{BTreeMap, HashSet};

const MAX_TITLE_CHARS: usize = 255;
const MAX_SHORT_DESCRIPTION_CHARS: usize = 500;
const MAX_AUTHOR_CHARS: usize = 100;
const MAX_CONTENT_CHARS: usize = 100_000;
const MAX_TAGS: usize = 20;
const MAX_TAG_CHARS: usize = 50;

/// Per-field validation failures, keyed by payload field name
pub type FieldErrors = BTreeMap<String, String>;

fn validate_required_text(value: &str, label: &str, max_chars: usize) -> Result<()> {
    if value.trim().is_empty() {
        bail!("{} cannot be empty", label);
    }
    if value.chars().count() > max_chars {
        bail!("{} is too long (max {} characters)", label, max_chars);
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<()> {
    validate_required_text(title, "Title", MAX_TITLE_CHARS)
}

pub fn validate_short_description(short_description: &str) -> Result<()> {
    if short_description.chars().count() > MAX_SHORT_DESCRIPTION_CHARS {
        bail!(
            "Short description is too long (max {} characters)",
            MAX_SHORT_DESCRIPTION_CHARS
        );
    }
    Ok(())
}

pub fn validate_author(author: &str) -> Result<()> {
    validate_required_text(author, "Author", MAX_AUTHOR_CHARS)
}

pub fn validate_content(content: &str) -> Result<()> {
    validate_required_text(content, "Content", MAX_CONTENT_CHARS)
}

/// Tags must stay addressable from the filter grammar, so the clause
/// separator `;` and the tag-list separator `,` are not allowed inside a tag.
/// Filter values are trimmed, so neither is surrounding whitespace.
pub fn validate_tags(tags: &[String]) -> Result<()> {
    if tags.len() > MAX_TAGS {
        bail!("Too many tags (max {})", MAX_TAGS);
    }

    let mut seen = HashSet::new();
    for tag in tags {
        if tag.trim().is_empty() {
            bail!("Tags cannot be empty");
        }
        if tag.trim() != tag {
            bail!("Tag '{}' must not start or end with whitespace", tag);
        }
        if tag.chars().count() > MAX_TAG_CHARS {
            bail!("Tag '{}' is too long (max {} characters)", tag, MAX_TAG_CHARS);
        }
        if tag.contains([',', ';']) {
            bail!("Tag '{}' must not contain ',' or ';'", tag);
        }
        if !seen.insert(tag.as_str()) {
            bail!("Duplicate tag '{}'", tag);
        }
    }
    Ok(())
}

/// Validates a create payload, collecting every failing field
pub fn validate_create_article(request: &CreateArticleRequest) -> Result<(), FieldErrors> {
    let checks = [
        ("title", validate_title(&request.title)),
        (
            "short_description",
            validate_short_description(&request.short_description),
        ),
        ("author", validate_author(&request.author)),
        ("content", validate_content(&request.content)),
        (
            "tags",
            validate_tags(request.tags.as_deref().unwrap_or_default()),
        ),
    ];

    let errors: FieldErrors = checks
        .into_iter()
        .filter_map(|(field, result)| result.err().map(|e| (field.to_string(), e.to_string())))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates the recognised fields of a partial update, keyed by their
/// filter name. Unknown names are left to the update itself to ignore.
pub fn validate_field_updates(updates: &BTreeMap<String, String>) -> Result<(), FieldErrors> {
    let errors: FieldErrors = updates
        .iter()
        .filter_map(|(name, value)| {
            let result = match name.as_str() {
                "title" => validate_title(value),
                "shortDescription" => validate_short_description(value),
                "author" => validate_author(value),
                "content" => validate_content(value),
                _ => return None,
            };
            result.err().map(|e| (name.clone(), e.to_string()))
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
