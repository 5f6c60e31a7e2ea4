use serde::{Deserialize, Serialize};

/// Observable effects of successful oracle transitions, consumed by
/// indexers. Exactly one event is emitted per state change; no-op
/// submissions emit nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A validated RRSET was inserted or overwritten.
    RRSetUpdated { name: Vec<u8>, rrs: Vec<u8> },
    /// An RRSET was removed through a proof of non-existence.
    RRSetDeleted { name: Vec<u8>, dnstype: u16 },
    /// A signature verifier was registered or replaced.
    AlgorithmUpdated { id: u8, identity: String },
    /// A DS digest verifier was registered or replaced.
    DigestUpdated { id: u8, identity: String },
    /// An NSEC3 hasher was registered or replaced.
    Nsec3DigestUpdated { id: u8, identity: String },
}
