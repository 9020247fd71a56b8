//! Proto ↔ kernel conversion bridge.
//!
//! Vectors travel as MSB-first bit strings, the same text form the
//! kernel uses for canonical hashing. A whole trace encodes as a
//! sequence of length-delimited `ProtoEdgeRecord` messages with strictly
//! increasing edge numbers.

use prost::Message;

use clock_kernel::{BitVector, State, StateValue};

use crate::error::{Result, RuntimeError};
use crate::proto_types::*;
use crate::trace::{EdgeRecord, Trace};

pub fn encode_trace(trace: &Trace) -> Vec<u8> {
    let mut buf = Vec::new();
    for record in trace.records() {
        // Vec<u8> grows on demand; encoding into it cannot fail.
        let _ = record_to_proto(record).encode_length_delimited(&mut buf);
    }
    buf
}

pub fn decode_trace(mut bytes: &[u8]) -> Result<Trace> {
    let mut records: Vec<EdgeRecord> = Vec::new();
    while !bytes.is_empty() {
        let proto = ProtoEdgeRecord::decode_length_delimited(&mut bytes)?;
        let record = proto_to_record(&proto)?;
        if let Some(last) = records.last() {
            if record.edge <= last.edge {
                return Err(RuntimeError::EdgeOrder {
                    last: last.edge,
                    got: record.edge,
                });
            }
        }
        records.push(record);
    }
    Ok(Trace::from(records))
}

pub fn record_to_proto(record: &EdgeRecord) -> ProtoEdgeRecord {
    ProtoEdgeRecord {
        edge: record.edge,
        processes: record
            .processes
            .iter()
            .map(|(name, state)| state_to_proto(name, state))
            .collect(),
    }
}

pub fn proto_to_record(proto: &ProtoEdgeRecord) -> Result<EdgeRecord> {
    let processes = proto
        .processes
        .iter()
        .map(|p| Ok((p.name.clone(), proto_to_state(p)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(EdgeRecord {
        edge: proto.edge,
        processes,
    })
}

pub fn state_to_proto(name: &str, state: &State) -> ProtoProcessState {
    ProtoProcessState {
        name: name.to_string(),
        elements: state
            .iter()
            .map(|(element, value)| ProtoElement {
                name: element.clone(),
                value: Some(match value {
                    StateValue::Boolean(b) => ElementValue::Boolean(*b),
                    StateValue::Vector(v) => ElementValue::Bits(v.to_string()),
                }),
            })
            .collect(),
    }
}

pub fn proto_to_state(proto: &ProtoProcessState) -> Result<State> {
    let mut state = State::new();
    for element in &proto.elements {
        let value = match &element.value {
            Some(ElementValue::Boolean(b)) => StateValue::Boolean(*b),
            Some(ElementValue::Bits(bits)) => StateValue::Vector(bits.parse::<BitVector>()?),
            None => {
                return Err(RuntimeError::CorruptTrace(format!(
                    "element {:?} of process {:?} has no value",
                    element.name, proto.name
                )))
            }
        };
        state.insert(element.name.clone(), value);
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clock_kernel::{unsigned, zero};

    #[test]
    fn test_record_survives_encoding() {
        let record = EdgeRecord {
            edge: 7,
            processes: vec![
                (
                    "blink".to_string(),
                    State::new()
                        .with("counter", unsigned(3, 7).unwrap())
                        .with("out", true),
                ),
                ("idle".to_string(), State::new().with("v", zero(0))),
            ],
        };
        let bytes = record_to_proto(&record).encode_to_vec();
        let decoded = ProtoEdgeRecord::decode(bytes.as_slice()).unwrap();
        assert_eq!(proto_to_record(&decoded).unwrap(), record);
    }

    fn flag_record(edge: u64, flag: bool) -> EdgeRecord {
        EdgeRecord {
            edge,
            processes: vec![("p".to_string(), State::new().with("f", flag))],
        }
    }

    #[test]
    fn test_trace_encoding() {
        let trace = Trace::from(vec![flag_record(1, true), flag_record(2, false)]);
        let bytes = encode_trace(&trace);
        assert_eq!(decode_trace(&bytes).unwrap(), trace);
        assert!(decode_trace(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_trace_decoding_rejects_stale_edges() {
        let trace = Trace::from(vec![flag_record(2, true), flag_record(2, false)]);
        assert!(matches!(
            decode_trace(&encode_trace(&trace)),
            Err(RuntimeError::EdgeOrder { last: 2, got: 2 })
        ));
    }

    #[test]
    fn test_truncated_trace_rejected() {
        let trace = Trace::from(vec![flag_record(1, true), flag_record(2, false)]);
        let bytes = encode_trace(&trace);
        assert!(matches!(
            decode_trace(&bytes[..bytes.len() - 3]),
            Err(RuntimeError::Decode(_))
        ));
    }

    #[test]
    fn test_missing_value_is_corrupt() {
        let proto = ProtoProcessState {
            name: "p".into(),
            elements: vec![ProtoElement {
                name: "x".into(),
                value: None,
            }],
        };
        assert!(matches!(
            proto_to_state(&proto),
            Err(RuntimeError::CorruptTrace(_))
        ));
    }

    #[test]
    fn test_bad_bits_rejected() {
        let proto = ProtoProcessState {
            name: "p".into(),
            elements: vec![ProtoElement {
                name: "x".into(),
                value: Some(ElementValue::Bits("10z".into())),
            }],
        };
        assert!(matches!(
            proto_to_state(&proto),
            Err(RuntimeError::Kernel(clock_kernel::Error::RangeConstruction(_)))
        ));
    }
}
