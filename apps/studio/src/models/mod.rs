pub mod chat;
pub mod resume;
pub mod style;
pub mod template;
