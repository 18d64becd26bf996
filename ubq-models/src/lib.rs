//! Ubiquity Models - typed representations of the Ubiquity API resources.
//!
//! All entities are owned by the server; these types are snapshots of the
//! last response the client received. Collections come back wrapped in
//! [`ApiList`], and every "id or object" parameter is expressed through one
//! of the closed reference enums in [`refs`].

pub mod app;
pub mod content;
pub mod list;
pub mod lookup;
pub mod publishing;
pub mod refs;
pub mod settle;
pub mod upload;

pub use app::{App, NewAppData};
pub use content::{
    ContentItem, ContentItemData, ContentItemVersion, ContentKind, DocumentPayload,
    DocumentVersion, FormPayload, FormVersion, MessagePayload, MessageVersion, VersionPayload,
    WeblinkPayload, WeblinkType, WeblinkVersion,
};
pub use list::ApiList;
pub use lookup::{ContentLookup, LookupContent};
pub use publishing::{NewPublishingRecord, PublishStatus, PublishingRecord};
pub use refs::{AppRef, Identifier, ItemRef, VersionRef};
pub use settle::{Settlement, Settles};
pub use upload::{NewUpload, Upload, UploadStatus};
