/*!
 * 账号相关逻辑的封装，负责身份解析与注册登录的数据类型
*/

mod user_auth;
mod user_data;

pub use user_auth::*;
pub use user_data::*;
