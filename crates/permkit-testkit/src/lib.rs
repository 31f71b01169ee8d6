//! # Permkit Testkit
//!
//! Testing utilities for permkit.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Generators**: Proptest strategies for contexts, nodes and holder contents
//! - **Fixtures**: A service over in-memory storage with a recording audit sink
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use permkit_testkit::generators::{node_from_params, NodeParams};
//!
//! proptest! {
//!     #[test]
//!     fn meta_nodes_decode(params: NodeParams) {
//!         let node = node_from_params(&params);
//!         prop_assert!(params.meta_type.matches(&node));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use permkit::core::ChatMetaType;
//! use permkit_testkit::fixtures::{meta, HolderFixture};
//!
//! let fixture = HolderFixture::new();
//! let holder = fixture.user("alice", vec![meta(ChatMetaType::Prefix, 10, "A", &[])]);
//! assert_eq!(holder.node_count(), 1);
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{contexts, meta, temp_meta, HolderFixture, RecordingAuditSink};
pub use generators::{node_from_params, NodeParams};
