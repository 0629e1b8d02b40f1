//! Per-field column metadata attached at registration time.

use smallvec::SmallVec;
use std::borrow::{Borrow, Cow};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Caller-defined label a field opts into for partial exports.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupTag(Cow<'static, str>);

impl GroupTag {
    pub const fn new_static(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for GroupTag {
    fn from(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }
}

impl From<String> for GroupTag {
    fn from(tag: String) -> Self {
        Self(Cow::Owned(tag))
    }
}

impl Borrow<str> for GroupTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declared column metadata for one field.
///
/// A negative `index` keeps the field out of the positional view and an
/// empty `title` keeps it out of the header view. `order` only affects
/// [`sort_fields`](crate::sort_fields).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub index: i32,
    pub title: String,
    pub order: i32,
    pub groups: SmallVec<[GroupTag; 2]>,
}

impl Default for ColumnMeta {
    fn default() -> Self {
        Self {
            index: -1,
            title: String::new(),
            order: 0,
            groups: SmallVec::new(),
        }
    }
}

impl ColumnMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(mut self, index: i32) -> Self {
        self.index = index;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn group(mut self, tag: impl Into<GroupTag>) -> Self {
        let tag = tag.into();
        if !self.groups.contains(&tag) {
            self.groups.push(tag);
        }
        self
    }

    pub fn groups<I, G>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: Into<GroupTag>,
    {
        for tag in tags {
            self = self.group(tag);
        }
        self
    }

    /// Non-negative declared index, if the field takes part in positional export.
    pub fn column_index(&self) -> Option<u32> {
        u32::try_from(self.index).ok()
    }

    /// Non-empty declared title, if the field takes part in header export.
    pub fn column_title(&self) -> Option<&str> {
        (!self.title.is_empty()).then_some(self.title.as_str())
    }

    pub fn in_group(&self, tag: &str) -> bool {
        self.groups.iter().any(|g| g.as_str() == tag)
    }
}
