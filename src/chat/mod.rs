/*!
 * 聊天会话的数据类型
*/

mod chat_message;
mod chat_session;

pub use chat_message::*;
pub use chat_session::*;
