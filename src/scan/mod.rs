pub mod cursor;
pub mod item;
pub mod memory;
pub mod range;
pub mod session;
pub mod source;

#[cfg(test)]
mod range_test;

pub use cursor::{RESET_TOKEN, ScanCursor};
pub use item::{
    HashField, InsertAt, ListElement, Locator, ScanItem, ScoredMember, SetMember, scan_reply,
};
pub use memory::MemorySource;
pub use range::{RangePager, RangeSource};
pub use session::ScanSession;
pub use source::{KeyRef, Page, PageRequest, PageSource};
