//! Path extraction for candidate file handles
//!
//! Build pipelines hand the filter whatever node type they use internally.
//! `SourcePath` turns such a handle into the string the rules match on.

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// A handle that can report the path of the source file it stands for
///
/// Returning `None` means the handle is not path-like; the filter then
/// includes it.
pub trait SourcePath {
    fn source_path(&self) -> Option<Cow<'_, str>>;
}

/// Normalize separators so markers containing `/` match Windows-style paths
pub(crate) fn normalize(path: Cow<'_, str>) -> Cow<'_, str> {
    if path.contains('\\') {
        Cow::Owned(path.replace('\\', "/"))
    } else {
        path
    }
}

impl SourcePath for str {
    fn source_path(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }
}

impl SourcePath for String {
    fn source_path(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.as_str()))
    }
}

impl SourcePath for Cow<'_, str> {
    fn source_path(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.as_ref()))
    }
}

impl SourcePath for Path {
    fn source_path(&self) -> Option<Cow<'_, str>> {
        Some(self.to_string_lossy())
    }
}

impl SourcePath for PathBuf {
    fn source_path(&self) -> Option<Cow<'_, str>> {
        Some(self.to_string_lossy())
    }
}

impl SourcePath for OsStr {
    fn source_path(&self) -> Option<Cow<'_, str>> {
        Some(self.to_string_lossy())
    }
}

impl SourcePath for OsString {
    fn source_path(&self) -> Option<Cow<'_, str>> {
        Some(self.to_string_lossy())
    }
}

impl<T: SourcePath> SourcePath for Option<T> {
    fn source_path(&self) -> Option<Cow<'_, str>> {
        self.as_ref().and_then(|inner| inner.source_path())
    }
}

impl<T: SourcePath + ?Sized> SourcePath for &T {
    fn source_path(&self) -> Option<Cow<'_, str>> {
        (**self).source_path()
    }
}

impl<T: SourcePath + ?Sized> SourcePath for Box<T> {
    fn source_path(&self) -> Option<Cow<'_, str>> {
        (**self).source_path()
    }
}
