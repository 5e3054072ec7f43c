pub mod dispatcher;
pub mod models;

pub use dispatcher::{apply_actions, DispatchReport};
