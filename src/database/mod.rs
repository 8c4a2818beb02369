/*!
 * 数据库抽象库，为不同的数据库后端提供统一的异步接口。
 *
 * 后端由配置中的database.backend选择：memory为单进程内存后端，
 * redis为生产环境使用的连接池后端。
*/

pub mod memory;
mod redis;

mod chat;
mod common;
mod file;
mod request;
mod user;

pub use chat::*;
pub use common::*;
pub use file::*;
pub use request::*;
pub use user::*;
