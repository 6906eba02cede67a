//! Shared synchronization re-exports.

pub use parking_lot::Mutex;

pub use std::sync::{
    atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering},
    Arc,
};
