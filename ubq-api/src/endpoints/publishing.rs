//! Publishing records of a content item.

use tracing::info;

use ubq_core::error::{UbqError, UbqResult};
use ubq_models::{ApiList, ItemRef, NewPublishingRecord, PublishingRecord, VersionPayload, VersionRef};

use crate::endpoints::content::ContentItemApi;
use crate::paginator::Paginator;
use crate::waiter::{PollStatus, Waiter};

impl<P: VersionPayload> ContentItemApi<P> {
    /// URL of an item's publishing records collection.
    pub fn publishing_records_url<'a>(&self, item: impl Into<ItemRef<'a>>) -> String {
        format!("{}publishing_records/", self.item_url(item))
    }

    /// One page of an item's publishing records.
    pub async fn list_publishing_records<'a>(
        &self,
        item: impl Into<ItemRef<'a>>,
        next_page: Option<&str>,
    ) -> UbqResult<ApiList<PublishingRecord>> {
        let url = match next_page {
            Some(next) => next.to_string(),
            None => self.publishing_records_url(item),
        };
        self.executor().get_json(&url).await
    }

    /// Cursor over every publishing record of an item.
    pub fn publishing_records<'a>(&self, item: impl Into<ItemRef<'a>>) -> Paginator<PublishingRecord> {
        Paginator::new(self.executor().clone()).begin(self.publishing_records_url(item))
    }

    /// Publish a version, making it the one served (when `available`) to app users.
    ///
    /// Returns as soon as the record exists; rollout may still be running.
    pub async fn publish<'a, 'b>(
        &self,
        item: impl Into<ItemRef<'a>>,
        version: impl Into<VersionRef<'b>>,
        available: bool,
    ) -> UbqResult<PublishingRecord> {
        let item = item.into();
        let body = NewPublishingRecord {
            version: self.version_url(item, version),
            available,
        };
        let url = self.publishing_records_url(item);
        let record: PublishingRecord = self.executor().post_json(&url, &body).await?;
        info!(kind = %P::KIND, version = %record.version, available, "created publishing record");
        Ok(record)
    }

    /// Read a publishing record by hyperlink.
    pub async fn get_publishing_record(&self, url: &str) -> UbqResult<PublishingRecord> {
        self.executor().get_json(url).await
    }

    /// Poll a publishing record until its rollout finishes.
    pub async fn await_publish(
        &self,
        record: &PublishingRecord,
        waiter: &Waiter,
    ) -> UbqResult<PublishingRecord> {
        let executor = self.executor();
        let url = record.url.as_str();
        waiter
            .wait("publishing", move || async move {
                let snapshot: PublishingRecord = executor.get_json(url).await?;
                Ok::<_, UbqError>(PollStatus::from_snapshot(snapshot))
            })
            .await
    }

    /// Publish a version and wait until it is live.
    pub async fn publish_and_wait<'a, 'b>(
        &self,
        item: impl Into<ItemRef<'a>>,
        version: impl Into<VersionRef<'b>>,
        available: bool,
        waiter: &Waiter,
    ) -> UbqResult<PublishingRecord> {
        let record = self.publish(item, version, available).await?;
        self.await_publish(&record, waiter).await
    }
}

#[cfg(test)]
mod tests {
    use ubq_core::config::ServerConfig;
    use ubq_models::{AppRef, WeblinkPayload};

    use super::*;
    use crate::client::RequestExecutor;

    #[test]
    fn test_publishing_records_url() {
        let executor =
            RequestExecutor::new(&ServerConfig::with_base_url("https://cloud.example.com/"), None)
                .unwrap();
        let api: ContentItemApi<WeblinkPayload> = ContentItemApi::new(executor, AppRef::Token("abc"));
        assert_eq!(
            api.publishing_records_url("w-1"),
            "https://cloud.example.com/api/v2/apps/abc/weblinks/w-1/publishing_records/"
        );
        assert_eq!(
            api.version_url("w-1", VersionRef::Latest),
            "https://cloud.example.com/api/v2/apps/abc/weblinks/w-1/versions/latest/"
        );
    }
}
