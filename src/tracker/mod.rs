mod apps;
mod calls;
mod controller;
mod domain;
mod idle;
mod policy;
mod poll_loop;
mod privacy;
mod session;

pub use controller::TrackerController;
pub use idle::IdleOracle;
pub use session::{ActiveSession, SessionManager};
