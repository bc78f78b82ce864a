//! Core library for epicdash
//!
//! This crate implements the **Functional Core** of the epicdash application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The epicdash project uses a two-crate architecture:
//!
//! - **`epicdash_core`** (this crate): Pure transformation functions with zero I/O
//! - **`epicdash`**: HTTP calls, file loading, terminal rendering and the dev proxy
//!   (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No I/O operations, no external state mutations
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! # Module Organization
//!
//! - [`atlassian`]: Epic key resolution, Jira search transformations and the
//!   HTTP failure classifier
//! - [`wcag`]: Completion statistics for the static WCAG issue export
//! - [`proxy`]: Header rewriting rules used by the development reverse proxy
//! - [`status`]: The lookup table from raw workflow statuses to categories
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use epicdash_core::wcag::{aggregate, WcagIssue};
//!
//! let issues = vec![WcagIssue {
//!     issue_number: "A11Y-1".to_string(),
//!     standard: "1.1.1".to_string(),
//!     title: "Missing alt text".to_string(),
//!     status: "Done".to_string(),
//! }];
//!
//! let output = aggregate(&issues);
//!
//! assert_eq!(output.standards.len(), 1);
//! assert_eq!(output.overall.overall_completion_percentage, 100.0);
//! ```

pub mod atlassian;
pub mod proxy;
pub mod status;
pub mod wcag;
