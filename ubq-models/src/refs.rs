//! References to server resources.
//!
//! API methods accept either a bare identifier or a previously fetched
//! object. Each enum here names the accepted forms and owns the single
//! function that turns a reference into a URL.

use std::fmt;

use crate::app::App;
use crate::content::{ContentItem, ContentItemVersion, ContentKind};

/// Ensure `url` ends with `/` so path segments can be appended.
pub fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

/// An app, by v2 token or by object.
#[derive(Debug, Clone, Copy)]
pub enum AppRef<'a> {
    Token(&'a str),
    App(&'a App),
}

impl AppRef<'_> {
    /// The app's token.
    pub fn token(&self) -> &str {
        match self {
            AppRef::Token(token) => *token,
            AppRef::App(app) => app.token.as_str(),
        }
    }

    /// URL of one of the app's content collections.
    ///
    /// Fetched apps carry their own hyperlinks; bare tokens are expanded
    /// against `base_url` (which must end with `/`).
    pub fn collection_url(&self, base_url: &str, kind: ContentKind) -> String {
        match self {
            AppRef::App(app) => with_trailing_slash(&app.collection_url(kind)),
            AppRef::Token(token) => format!("{base_url}api/v2/apps/{token}/{kind}/"),
        }
    }
}

impl<'a> From<&'a str> for AppRef<'a> {
    fn from(token: &'a str) -> Self {
        AppRef::Token(token)
    }
}

impl<'a> From<&'a String> for AppRef<'a> {
    fn from(token: &'a String) -> Self {
        AppRef::Token(token)
    }
}

impl<'a> From<&'a App> for AppRef<'a> {
    fn from(app: &'a App) -> Self {
        AppRef::App(app)
    }
}

/// A content item, by uuid or by object.
#[derive(Debug, Clone, Copy)]
pub enum ItemRef<'a> {
    Id(&'a str),
    Item(&'a ContentItem),
}

impl ItemRef<'_> {
    /// URL of the item within `collection_url`.
    pub fn url_in(&self, collection_url: &str) -> String {
        match self {
            ItemRef::Item(item) => with_trailing_slash(&item.url),
            ItemRef::Id(id) => format!("{}{id}/", with_trailing_slash(collection_url)),
        }
    }
}

impl<'a> From<&'a str> for ItemRef<'a> {
    fn from(id: &'a str) -> Self {
        ItemRef::Id(id)
    }
}

impl<'a> From<&'a String> for ItemRef<'a> {
    fn from(id: &'a String) -> Self {
        ItemRef::Id(id)
    }
}

impl<'a> From<&'a ContentItem> for ItemRef<'a> {
    fn from(item: &'a ContentItem) -> Self {
        ItemRef::Item(item)
    }
}

/// A version of some item: by number, the latest, or by hyperlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionRef<'a> {
    Number(u32),
    Latest,
    Url(&'a str),
}

impl VersionRef<'_> {
    /// URL of the version under `item_url`. A hyperlink is used as-is.
    pub fn url_under(&self, item_url: &str) -> String {
        match self {
            VersionRef::Url(url) => with_trailing_slash(url),
            VersionRef::Number(n) => format!("{}versions/{n}/", with_trailing_slash(item_url)),
            VersionRef::Latest => format!("{}versions/latest/", with_trailing_slash(item_url)),
        }
    }

    /// Whether the reference can be resolved without knowing the item.
    pub fn is_absolute(&self) -> bool {
        matches!(self, VersionRef::Url(_))
    }
}

impl From<u32> for VersionRef<'_> {
    fn from(number: u32) -> Self {
        VersionRef::Number(number)
    }
}

impl<'a, P> From<&'a ContentItemVersion<P>> for VersionRef<'a> {
    fn from(version: &'a ContentItemVersion<P>) -> Self {
        VersionRef::Url(&version.url)
    }
}

/// Identifier accepted by the v1 core API: numeric id or string key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Numeric(u64),
    Key(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(id) => write!(f, "{id}"),
            Identifier::Key(key) => f.write_str(key),
        }
    }
}

impl From<u64> for Identifier {
    fn from(id: u64) -> Self {
        Identifier::Numeric(id)
    }
}

impl From<&str> for Identifier {
    fn from(key: &str) -> Self {
        Identifier::Key(key.to_string())
    }
}

impl From<String> for Identifier {
    fn from(key: String) -> Self {
        Identifier::Key(key)
    }
}

impl From<&App> for Identifier {
    fn from(app: &App) -> Self {
        Identifier::Numeric(app.id)
    }
}
