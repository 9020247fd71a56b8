//! Hand-written protobuf types for the binary trace log.
//!
//! Uses prost derive macros for encode/decode without prost-build.
//!
//! ```text
//! message EdgeRecord   { uint64 edge = 1; repeated ProcessState processes = 2; }
//! message ProcessState { string name = 1; repeated Element elements = 2; }
//! message Element      { string name = 1; oneof value { bool boolean = 2; string bits = 3; } }
//! ```

use prost::Message;

#[derive(Clone, PartialEq, Message)]
pub struct ProtoEdgeRecord {
    #[prost(uint64, tag = "1")]
    pub edge: u64,
    #[prost(message, repeated, tag = "2")]
    pub processes: Vec<ProtoProcessState>,
}

#[derive(Clone, PartialEq, Message)]
pub struct ProtoProcessState {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, repeated, tag = "2")]
    pub elements: Vec<ProtoElement>,
}

#[derive(Clone, PartialEq, Message)]
pub struct ProtoElement {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(oneof = "ElementValue", tags = "2, 3")]
    pub value: Option<ElementValue>,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum ElementValue {
    #[prost(bool, tag = "2")]
    Boolean(bool),
    /// MSB-first `0`/`1` string.
    #[prost(string, tag = "3")]
    Bits(String),
}
