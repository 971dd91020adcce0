//! Authoritative student record store for Pravartak.
//!
//! Every write path that touches an academic metric re-derives the record's
//! dropout risk under the same per-record lock, so stored risk can never
//! drift from the metrics it describes.

pub mod config;
pub mod record;
pub mod store;

pub use config::StoreConfig;
pub use record::{NewStudent, RiskPreview, StudentPatch, StudentRecord};
pub use store::{sort_by_risk, StudentRecordStore};
