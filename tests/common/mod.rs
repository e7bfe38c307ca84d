//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{create_test_store, run_sync, sample_library};
//!
//! #[test]
//! fn test_sync() {
//!     let (store, _dir) = create_test_store();
//!     let report = run_sync(sample_library(), &store, Default::default()).unwrap();
//!     assert!(report.all_succeeded());
//! }
//! ```

mod constants;
mod fake_api;
mod fixtures;

#[allow(unused_imports)]
pub use constants::*;
pub use fake_api::FakeLibraryApi;
#[allow(unused_imports)]
pub use fixtures::*;
