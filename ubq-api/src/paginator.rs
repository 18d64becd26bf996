//! Pull-based cursor over paged list endpoints.

use futures::stream::{self, Stream};
use serde::de::DeserializeOwned;
use tracing::debug;

use ubq_core::error::{UbqError, UbqResult};
use ubq_models::ApiList;

use crate::client::RequestExecutor;

/// What the cursor will return on the next call.
enum Queued<T> {
    /// A page that has already been fetched.
    Page(ApiList<T>),
    /// The URL of the first page, fetched lazily.
    Url(String),
}

/// Walks a list endpoint page by page by following `next` links.
///
/// Advancing takes `&mut self`, so a cursor cannot be driven from two places
/// at once. A failed fetch leaves the cursor where it was; calling
/// [`Paginator::next`] again retries the same page.
pub struct Paginator<T> {
    executor: RequestExecutor,
    queued: Option<Queued<T>>,
    next_link: Option<String>,
}

impl<T: DeserializeOwned> Paginator<T> {
    /// An exhausted cursor; seed it with [`Paginator::begin`].
    pub fn new(executor: RequestExecutor) -> Self {
        Self {
            executor,
            queued: None,
            next_link: None,
        }
    }

    /// Queue the first page's URL. Nothing is fetched until `next()`.
    pub fn begin(mut self, first_page_url: impl Into<String>) -> Self {
        self.queued = Some(Queued::Url(first_page_url.into()));
        self.next_link = None;
        self
    }

    /// Seed the cursor with a page the caller already holds.
    pub fn from_page(executor: RequestExecutor, page: ApiList<T>) -> Self {
        Self {
            executor,
            queued: Some(Queued::Page(page)),
            next_link: None,
        }
    }

    /// Whether a page is queued or a next link is known.
    pub fn has_next(&self) -> bool {
        self.queued.is_some() || self.next_link.is_some()
    }

    /// Fetch the next page's items, or `None` once the list is exhausted.
    pub async fn next(&mut self) -> UbqResult<Option<Vec<T>>> {
        let page = match self.queued.take() {
            Some(Queued::Page(page)) => page,
            Some(Queued::Url(url)) => match self.fetch(&url).await {
                Ok(page) => page,
                Err(e) => {
                    self.queued = Some(Queued::Url(url));
                    return Err(e);
                }
            },
            None => match self.next_link.take() {
                Some(url) => match self.fetch(&url).await {
                    Ok(page) => page,
                    Err(e) => {
                        self.next_link = Some(url);
                        return Err(e);
                    }
                },
                None => return Ok(None),
            },
        };

        self.next_link = page.next;
        Ok(Some(page.results))
    }

    /// Drain every remaining page into one vector.
    pub async fn collect_all(mut self) -> UbqResult<Vec<T>> {
        let mut all = Vec::new();
        while let Some(items) = self.next().await? {
            all.extend(items);
        }
        Ok(all)
    }

    /// Turn the cursor into a stream of pages.
    pub fn into_stream(self) -> impl Stream<Item = UbqResult<Vec<T>>> {
        stream::try_unfold(self, |mut cursor| async move {
            let page = cursor.next().await?;
            Ok::<_, UbqError>(page.map(|items| (items, cursor)))
        })
    }

    async fn fetch(&self, url: &str) -> UbqResult<ApiList<T>> {
        debug!(%url, "fetching page");
        self.executor.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ubq_core::config::ServerConfig;

    fn executor() -> RequestExecutor {
        RequestExecutor::new(&ServerConfig::with_base_url("http://127.0.0.1:9"), None).unwrap()
    }

    #[tokio::test]
    async fn test_single_page_then_sentinel() {
        let mut cursor = Paginator::from_page(executor(), ApiList::single(vec![1, 2]));
        assert!(cursor.has_next());
        assert_eq!(cursor.next().await.unwrap(), Some(vec![1, 2]));
        assert!(!cursor.has_next());
        assert_eq!(cursor.next().await.unwrap(), None);
        assert_eq!(cursor.next().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unseeded_cursor_is_exhausted() {
        let mut cursor: Paginator<u32> = Paginator::new(executor());
        assert!(!cursor.has_next());
        assert_eq!(cursor.next().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_begin_is_lazy() {
        let cursor: Paginator<u32> = Paginator::new(executor()).begin("http://127.0.0.1:9/list/");
        assert!(cursor.has_next());
    }
}
