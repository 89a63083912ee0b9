//! Mock implementations for testing

mod native_store;

pub use native_store::{MockCall, MockEntry, MockNativeStore, MockOperation};
