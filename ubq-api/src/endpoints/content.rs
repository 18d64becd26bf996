//! Content item endpoints (forms, messages, weblinks, documents).

use std::fmt;
use std::marker::PhantomData;

use tracing::info;

use ubq_core::error::{UbqError, UbqResult};
use ubq_models::{
    ApiList, AppRef, ContentItem, ContentItemData, ContentItemVersion, ContentKind, ItemRef,
    VersionPayload,
};

use crate::client::RequestExecutor;
use crate::paginator::Paginator;
use crate::waiter::{PollStatus, Waiter};

/// Endpoints for one content collection of one app.
///
/// `P` is the kind-specific version payload and fixes which collection
/// (`forms`, `messages`, `weblinks` or `documents`) is addressed.
pub struct ContentItemApi<P> {
    executor: RequestExecutor,
    /// Collection URL, ending with `/`.
    collection_url: String,
    _payload: PhantomData<fn() -> P>,
}

impl<P> Clone for ContentItemApi<P> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            collection_url: self.collection_url.clone(),
            _payload: PhantomData,
        }
    }
}

impl<P: VersionPayload> fmt::Debug for ContentItemApi<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentItemApi")
            .field("kind", &P::KIND)
            .field("collection_url", &self.collection_url)
            .finish()
    }
}

impl<P: VersionPayload> ContentItemApi<P> {
    pub(crate) fn new(executor: RequestExecutor, app: AppRef<'_>) -> Self {
        let collection_url = app.collection_url(executor.base_url(), P::KIND);
        Self {
            executor,
            collection_url,
            _payload: PhantomData,
        }
    }

    /// Which collection this API addresses.
    pub fn kind(&self) -> ContentKind {
        P::KIND
    }

    /// URL of the collection, ending with `/`.
    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    pub(crate) fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// URL of an item in this collection.
    pub fn item_url<'a>(&self, item: impl Into<ItemRef<'a>>) -> String {
        item.into().url_in(&self.collection_url)
    }

    /// Cursor over every item in the collection.
    pub fn pagination(&self) -> Paginator<ContentItem> {
        Paginator::new(self.executor.clone()).begin(self.collection_url.clone())
    }

    /// One page of items: the first, or the one at `next_page`.
    pub async fn list(&self, next_page: Option<&str>) -> UbqResult<ApiList<ContentItem>> {
        let url = next_page.unwrap_or(self.collection_url.as_str());
        self.executor.get_json(url).await
    }

    /// Get one item by uuid or hyperlink.
    pub async fn get<'a>(&self, item: impl Into<ItemRef<'a>>) -> UbqResult<ContentItem> {
        let url = self.item_url(item);
        self.executor.get_json(&url).await
    }

    /// Create an item. Versions are added separately.
    pub async fn create(&self, data: &ContentItemData) -> UbqResult<ContentItem> {
        let item: ContentItem = self.executor.post_json(&self.collection_url, data).await?;
        info!(kind = %P::KIND, uuid = %item.uuid, "created content item");
        Ok(item)
    }

    /// Create an item and wait until the server has generated its first version.
    pub async fn create_and_await_first_version(
        &self,
        data: &ContentItemData,
        waiter: &Waiter,
    ) -> UbqResult<(ContentItem, ContentItemVersion<P>)> {
        let item = self.create(data).await?;
        let versions_url = self.versions_url(&item);

        let executor = &self.executor;
        let url = versions_url.as_str();
        let first = waiter
            .wait("content item creation", move || async move {
                let page: ApiList<ContentItemVersion<P>> = executor.get_json(url).await?;
                Ok::<_, UbqError>(match page.results.into_iter().min_by_key(|v| v.number) {
                    Some(version) => PollStatus::Ready(version),
                    None => PollStatus::Pending,
                })
            })
            .await?;

        Ok((item, first))
    }

    /// Replace an item's name, slug and description.
    pub async fn edit<'a>(
        &self,
        item: impl Into<ItemRef<'a>>,
        data: &ContentItemData,
    ) -> UbqResult<ContentItem> {
        let url = self.item_url(item);
        self.executor.put_json(&url, data).await
    }

    /// Delete an item with all its versions.
    pub async fn delete<'a>(&self, item: impl Into<ItemRef<'a>>) -> UbqResult<()> {
        let url = self.item_url(item);
        self.executor.delete(&url).await
    }

    /// Make the item visible to app users.
    pub async fn make_available<'a>(&self, item: impl Into<ItemRef<'a>>) -> UbqResult<()> {
        let url = format!("{}make_available/", self.item_url(item));
        self.executor.post_empty(&url).await
    }

    /// Hide the item from app users.
    pub async fn make_unavailable<'a>(&self, item: impl Into<ItemRef<'a>>) -> UbqResult<()> {
        let url = format!("{}make_unavailable/", self.item_url(item));
        self.executor.post_empty(&url).await
    }
}
