mod chat;
mod common;
mod file;
mod index;
mod path;
mod request;
mod user;

pub use chat::*;
pub use common::*;
pub use file::*;
pub use request::*;
pub use user::*;
