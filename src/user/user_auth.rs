/*!
注册、登录与令牌解析的数据类型与检查
*/

use serde::{Deserialize, Serialize};

use crate::{
    chat::ChatRole,
    config::{config::PWD_PATTERN, datatype::UserId, Config},
};

/** `UserRegisterData` 注册时所用的数据类型
*/
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserRegisterData {
    pub user_name: String,
    pub password: String,
    pub email: String,
    pub role: ChatRole,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "state")]
pub enum UserRegisterResponse {
    #[serde(rename_all = "camelCase")]
    Success {
        user_id: UserId,
    },
    UserNameFormatError,
    PasswordFormatError,
    EmailRegistered,
    EmailInvalid,
    ServerError,
}

impl UserRegisterData {
    pub fn check_data(&self) -> Result<(), UserRegisterResponse> {
        if self.user_name.is_empty()
            || self.user_name.len() > Config::get().user.max_user_name_length as usize
        {
            return Err(UserRegisterResponse::UserNameFormatError);
        }

        // 粗粒度的邮箱格式检查，真正的验证由外部身份服务完成
        if !self.email.contains('@') {
            return Err(UserRegisterResponse::EmailInvalid);
        }

        if !PWD_PATTERN.is_match(&self.password) {
            return Err(UserRegisterResponse::PasswordFormatError);
        }

        return Ok(());
    }
}

/** `UserLoginData` 登录时所用的数据类型
*/
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserLoginData {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "state")]
pub enum UserLoginResponse {
    #[serde(rename_all = "camelCase")]
    Success {
        user_id: UserId,
        role: ChatRole,
        token: String,
    },
    UserNotFound,
    PasswordError,
    ServerError,
}

/** `AuthState` 令牌解析失败时的状态
*/
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "state")]
pub enum AuthState {
    NeedToken,
    TokenError,
    TokenExpired,
    ServerError,
}
