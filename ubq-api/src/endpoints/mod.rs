//! API endpoint modules organized by resource.
//!
//! Each module provides typed methods for a group of related endpoints.

pub mod apps;
pub mod content;
pub mod publishing;
pub mod uploads;
pub mod versions;
