use serde::Serialize;
use std::fmt;

/// The closed set of key kinds the inspector knows how to display.
///
/// Kind tags come from the server's `TYPE` reply; module types report their
/// module type name. Strings carry an optional sub-kind for HyperLogLog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueKind {
    String,
    HyperLogLog,
    Hash,
    List,
    Set,
    SortedSet,
    JsonDocument,
    TopK,
    TimeSeries,
    TDigest,
    BloomFilter,
    CountMinSketch,
    CuckooFilter,
}

/// How a collection kind is paged from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    /// Server cursor (`HSCAN`, `SSCAN`, `ZSCAN`).
    Cursor,
    /// Offset ranges (`LRANGE`).
    Range,
}

impl ValueKind {
    pub const ALL: [ValueKind; 13] = [
        ValueKind::String,
        ValueKind::HyperLogLog,
        ValueKind::Hash,
        ValueKind::List,
        ValueKind::Set,
        ValueKind::SortedSet,
        ValueKind::JsonDocument,
        ValueKind::TopK,
        ValueKind::TimeSeries,
        ValueKind::TDigest,
        ValueKind::BloomFilter,
        ValueKind::CountMinSketch,
        ValueKind::CuckooFilter,
    ];

    /// Select the view for a reported kind tag.
    ///
    /// Returns `None` for tags this version does not know, so a newer or
    /// older server never breaks the inspector; the caller renders nothing.
    pub fn from_tags(kind: &str, sub_kind: Option<&str>) -> Option<Self> {
        let selected = match kind {
            "string" => match sub_kind {
                Some("HyperLogLog") => ValueKind::HyperLogLog,
                _ => ValueKind::String,
            },
            "hash" => ValueKind::Hash,
            "list" => ValueKind::List,
            "set" => ValueKind::Set,
            "zset" => ValueKind::SortedSet,
            "ReJSON-RL" => ValueKind::JsonDocument,
            "TopK-TYPE" => ValueKind::TopK,
            "TSDB-TYPE" => ValueKind::TimeSeries,
            "TDIS-TYPE" => ValueKind::TDigest,
            "MBbloom--" => ValueKind::BloomFilter,
            "CMSk-TYPE" => ValueKind::CountMinSketch,
            "MBbloomCF" => ValueKind::CuckooFilter,
            _ => return None,
        };
        Some(selected)
    }

    /// The tag pair the server reports for this kind.
    pub fn tags(self) -> (&'static str, Option<&'static str>) {
        match self {
            ValueKind::String => ("string", None),
            ValueKind::HyperLogLog => ("string", Some("HyperLogLog")),
            ValueKind::Hash => ("hash", None),
            ValueKind::List => ("list", None),
            ValueKind::Set => ("set", None),
            ValueKind::SortedSet => ("zset", None),
            ValueKind::JsonDocument => ("ReJSON-RL", None),
            ValueKind::TopK => ("TopK-TYPE", None),
            ValueKind::TimeSeries => ("TSDB-TYPE", None),
            ValueKind::TDigest => ("TDIS-TYPE", None),
            ValueKind::BloomFilter => ("MBbloom--", None),
            ValueKind::CountMinSketch => ("CMSk-TYPE", None),
            ValueKind::CuckooFilter => ("MBbloomCF", None),
        }
    }

    /// Whether the key header shows an element count for this kind.
    pub fn shows_length(self) -> bool {
        !matches!(
            self,
            ValueKind::JsonDocument
                | ValueKind::TopK
                | ValueKind::TimeSeries
                | ValueKind::TDigest
                | ValueKind::CuckooFilter
                | ValueKind::CountMinSketch
        )
    }

    pub fn paging(self) -> Option<Paging> {
        match self {
            ValueKind::Hash | ValueKind::Set | ValueKind::SortedSet => Some(Paging::Cursor),
            ValueKind::List => Some(Paging::Range),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::HyperLogLog => "hyperloglog",
            ValueKind::Hash => "hash",
            ValueKind::List => "list",
            ValueKind::Set => "set",
            ValueKind::SortedSet => "sorted-set",
            ValueKind::JsonDocument => "json-document",
            ValueKind::TopK => "top-k",
            ValueKind::TimeSeries => "time-series",
            ValueKind::TDigest => "t-digest",
            ValueKind::BloomFilter => "bloom-filter",
            ValueKind::CountMinSketch => "count-min-sketch",
            ValueKind::CuckooFilter => "cuckoo-filter",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
