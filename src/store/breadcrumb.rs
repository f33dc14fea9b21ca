//! Breadcrumbs: validated paths into a body's `bones` tree.

use std::fmt;

use thiserror::Error;

/// Root field every breadcrumb is resolved under.
pub const BONES_FIELD: &str = "bones";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BreadcrumbError {
    #[error("breadcrumb must contain at least one segment")]
    Empty,

    #[error("breadcrumb segment {0} is empty")]
    EmptySegment(usize),

    #[error("breadcrumb segment {0:?} contains '.' or starts with '$'")]
    ReservedCharacter(String),
}

/// Non-empty sequence of segments, none of which can escape its own level of
/// the dotted field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb(Vec<String>);

impl Breadcrumb {
    pub fn new<I, S>(segments: I) -> Result<Self, BreadcrumbError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(BreadcrumbError::Empty);
        }

        for (i, segment) in segments.iter().enumerate() {
            if segment.is_empty() {
                return Err(BreadcrumbError::EmptySegment(i));
            }
            if segment.contains('.') || segment.starts_with('$') {
                return Err(BreadcrumbError::ReservedCharacter(segment.clone()));
            }
        }

        Ok(Self(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Dotted path relative to the document root, e.g. `bones.ribs.count`.
    pub fn field_path(&self) -> String {
        format!("{}.{}", BONES_FIELD, self.0.join("."))
    }
}

impl fmt::Display for Breadcrumb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" > "))
    }
}
