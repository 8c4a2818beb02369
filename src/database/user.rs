use crate::config::datatype::*;
use crate::user::*;

use super::common::use_memory;
use super::memory;
use super::redis;

/// 在数据库内写入一个账号。
/// 此接口仅负责检查 UserRegisterResponse::EmailRegistered
pub async fn user_register(data: UserRegisterData) -> UserRegisterResponse {
    let result = if use_memory() {
        memory::user_register(&data).await
    } else {
        redis::user_register(&data).await
    };
    match result {
        Ok(res) => res,
        Err(_) => UserRegisterResponse::ServerError,
    }
}

/// 账号登录接口，校验密码并签发新令牌。
// 此接口仅负责检查 UserLoginResponse::PasswordError, UserLoginResponse::UserNotFound
pub async fn user_login(data: UserLoginData) -> UserLoginResponse {
    let result = if use_memory() {
        memory::user_login(&data).await
    } else {
        redis::user_login(&data).await
    };
    match result {
        Ok(res) => res,
        Err(_) => UserLoginResponse::ServerError,
    }
}

/// 通过令牌解析调用方身份，检查过期时间
pub async fn authenticate_token(token: &str) -> Result<Caller, AuthState> {
    if use_memory() {
        return memory::authenticate_token(token).await;
    }
    return redis::authenticate_token(token).await;
}

/// 获得账号Info
pub async fn get_user_info(user_id: UserId) -> Result<Option<UserInfo>, ()> {
    if use_memory() {
        return memory::get_user_info(user_id).await;
    }
    return redis::get_user_info(user_id).await;
}
