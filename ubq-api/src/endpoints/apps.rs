//! App endpoints.

use ubq_core::constants::paths;
use ubq_core::error::UbqResult;
use ubq_models::{ApiList, App, NewAppData};

use crate::admin::AdminClient;
use crate::paginator::Paginator;

impl AdminClient {
    /// URL of the v2 apps collection.
    fn apps_url(&self) -> String {
        self.executor().url(&format!("{}apps/", paths::V2))
    }

    /// List the apps visible to this credential (first page).
    pub async fn list_apps(&self) -> UbqResult<ApiList<App>> {
        self.executor().get_json(&self.apps_url()).await
    }

    /// Cursor over every app page.
    pub fn apps(&self) -> Paginator<App> {
        Paginator::new(self.executor().clone()).begin(self.apps_url())
    }

    /// Get one app by token.
    pub async fn get_app(&self, token: &str) -> UbqResult<App> {
        let url = format!("{}{token}/", self.apps_url());
        self.executor().get_json(&url).await
    }

    /// Create an app.
    pub async fn create_app(&self, data: &NewAppData) -> UbqResult<App> {
        self.executor().post_json(&self.apps_url(), data).await
    }
}
