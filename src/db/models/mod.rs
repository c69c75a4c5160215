pub mod session;

pub use session::{
    active_seconds_between, CallProvider, SessionKind, SessionPatch, SessionRecord,
};
