mod credentials;
pub use credentials::Credentials;

mod players;
pub use players::PlayerCount;

mod worker;
pub use worker::{WorkerId, WorkerOutcome, WorkerRecord, WorkerState};
