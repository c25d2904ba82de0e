use std::borrow::Cow;
use std::collections::HashMap;

/// Resolves sticker icon names (e.g. `"mdi:heart"`) to SVG markup.
pub trait IconSource: Send + Sync {
    /// SVG document for `icon_name`, or `None` if the icon is unknown.
    fn icon_svg(&self, icon_name: &str) -> Option<Cow<'_, str>>;
}

/// An in-memory icon registry.
#[derive(Clone, Debug, Default)]
pub struct IconSet {
    icons: HashMap<String, String>,
}

impl IconSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) an icon.
    pub fn insert(&mut self, icon_name: impl Into<String>, svg: impl Into<String>) {
        self.icons.insert(icon_name.into(), svg.into());
    }

    /// Builder form of [`IconSet::insert`].
    pub fn with_icon(mut self, icon_name: impl Into<String>, svg: impl Into<String>) -> Self {
        self.insert(icon_name, svg);
        self
    }

    /// Number of registered icons.
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    /// `true` when no icon is registered.
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

impl IconSource for IconSet {
    fn icon_svg(&self, icon_name: &str) -> Option<Cow<'_, str>> {
        self.icons.get(icon_name).map(|s| Cow::Borrowed(s.as_str()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/icons.rs"]
mod tests;
