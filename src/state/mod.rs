/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The static disease catalog and its search view (catalog.rs)
/// - The ordered collection of uploads (uploads.rs)
/// - The upload classification workflow (workflow.rs)
/// - Dashboard figures and the live session summary (stats.rs)

pub mod catalog;
pub mod data;
pub mod stats;
pub mod uploads;
pub mod workflow;
