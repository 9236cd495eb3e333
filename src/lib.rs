pub mod config;
pub mod error;
pub mod render;
pub mod scan;
pub mod telemetry;
pub mod value;

pub use config::{Settings, SettingsManager};
pub use error::{ScanError, ScanResult};
pub use render::{render, render_lines, write_lines};
pub use scan::{
    HashField, InsertAt, KeyRef, ListElement, Locator, MemorySource, Page, PageRequest,
    PageSource, RangePager, RangeSource, ScanCursor, ScanItem, ScanSession, ScoredMember,
    SetMember,
};
pub use value::{ResultValue, ValueKind};
