pub mod client;
pub mod dispatcher;
pub mod operation;
