//! Version endpoints of a content item.

use serde::Serialize;
use tracing::info;

use ubq_core::error::{UbqError, UbqResult};
use ubq_models::{
    refs::with_trailing_slash, ApiList, ContentItemVersion, DocumentPayload, DocumentVersion, ItemRef,
    Upload, VersionPayload, VersionRef,
};

use crate::endpoints::content::ContentItemApi;
use crate::paginator::Paginator;
use crate::waiter::{PollStatus, Waiter};

impl<P: VersionPayload> ContentItemApi<P> {
    /// URL of an item's versions collection.
    pub fn versions_url<'a>(&self, item: impl Into<ItemRef<'a>>) -> String {
        format!("{}versions/", self.item_url(item))
    }

    /// URL of one version. A hyperlink reference ignores `item`.
    pub fn version_url<'a, 'b>(
        &self,
        item: impl Into<ItemRef<'a>>,
        version: impl Into<VersionRef<'b>>,
    ) -> String {
        match version.into() {
            VersionRef::Url(url) => with_trailing_slash(url),
            relative => relative.url_under(&self.item_url(item)),
        }
    }

    /// One page of an item's versions: the first, or the one at `next_page`.
    pub async fn list_versions<'a>(
        &self,
        item: impl Into<ItemRef<'a>>,
        next_page: Option<&str>,
    ) -> UbqResult<ApiList<ContentItemVersion<P>>> {
        let url = match next_page {
            Some(next) => next.to_string(),
            None => self.versions_url(item),
        };
        self.executor().get_json(&url).await
    }

    /// Cursor over every version of an item.
    pub fn versions<'a>(&self, item: impl Into<ItemRef<'a>>) -> Paginator<ContentItemVersion<P>> {
        Paginator::new(self.executor().clone()).begin(self.versions_url(item))
    }

    /// Get a version by number, `Latest`, or hyperlink.
    pub async fn get_version<'a, 'b>(
        &self,
        item: impl Into<ItemRef<'a>>,
        version: impl Into<VersionRef<'b>>,
    ) -> UbqResult<ContentItemVersion<P>> {
        let url = self.version_url(item, version);
        self.executor().get_json(&url).await
    }

    /// Create a new version. The server assigns the next number; the
    /// version starts out not ready.
    pub async fn create_version<'a, B>(
        &self,
        item: impl Into<ItemRef<'a>>,
        data: &B,
    ) -> UbqResult<ContentItemVersion<P>>
    where
        B: Serialize + ?Sized,
    {
        let url = self.versions_url(item);
        let version: ContentItemVersion<P> = self.executor().post_json(&url, data).await?;
        info!(kind = %P::KIND, number = version.number, "created version");
        Ok(version)
    }

    /// Poll a version until the server marks it ready.
    pub async fn await_version_ready(
        &self,
        version: &ContentItemVersion<P>,
        waiter: &Waiter,
    ) -> UbqResult<ContentItemVersion<P>> {
        if version.is_ready {
            return Ok(version.clone());
        }
        let executor = self.executor();
        let url = version.url.as_str();
        waiter
            .wait("version processing", move || async move {
                let snapshot: ContentItemVersion<P> = executor.get_json(url).await?;
                Ok::<_, UbqError>(PollStatus::from_snapshot(snapshot))
            })
            .await
    }

    /// Create a version and wait until it is ready.
    pub async fn create_version_and_wait<'a, B>(
        &self,
        item: impl Into<ItemRef<'a>>,
        data: &B,
        waiter: &Waiter,
    ) -> UbqResult<ContentItemVersion<P>>
    where
        B: Serialize + ?Sized,
    {
        let version = self.create_version(item, data).await?;
        self.await_version_ready(&version, waiter).await
    }

    /// Update a version's payload in place.
    pub async fn edit_version<'a, 'b, B>(
        &self,
        item: impl Into<ItemRef<'a>>,
        version: impl Into<VersionRef<'b>>,
        data: &B,
    ) -> UbqResult<ContentItemVersion<P>>
    where
        B: Serialize + ?Sized,
    {
        let url = self.version_url(item, version);
        self.executor().put_json(&url, data).await
    }

    /// Ask the server to package a version for distribution.
    pub async fn package_version<'a, 'b>(
        &self,
        item: impl Into<ItemRef<'a>>,
        version: impl Into<VersionRef<'b>>,
    ) -> UbqResult<()> {
        let url = format!("{}package/", self.version_url(item, version));
        self.executor().post_empty(&url).await
    }
}

impl ContentItemApi<DocumentPayload> {
    /// Create a document version from a processed upload and wait until it is ready.
    pub async fn create_version_from_upload<'a>(
        &self,
        item: impl Into<ItemRef<'a>>,
        upload: &Upload,
        waiter: &Waiter,
    ) -> UbqResult<DocumentVersion> {
        let body = DocumentPayload {
            source_upload: Some(upload.url.clone()),
            pages: None,
        };
        self.create_version_and_wait(item, &body, waiter).await
    }
}
