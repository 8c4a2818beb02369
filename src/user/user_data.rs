use serde::{Deserialize, Serialize};

use crate::chat::ChatRole;
use crate::config::datatype::{Timestamp, UserId};

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
/** `UserInfo` 账号信息的数据类型
*/
pub struct UserInfo {
    pub user_id: UserId,
    pub user_name: String,
    pub role: ChatRole,
}

/** `Token` 客户端访问令牌的数据类型
*/
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub token: String,
    pub timestamp: Timestamp,
}

/** `Caller` 经过令牌解析后的调用方身份
*/
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Caller {
    pub user_id: UserId,
    pub role: ChatRole,
}
