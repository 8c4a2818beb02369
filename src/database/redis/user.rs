use chrono::Utc;
use mobc_redis::redis;
use mobc_redis::redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use std::ops::DerefMut;
use uuid::Uuid;

use super::common::*;
use super::index;
use super::path;
use crate::config::datatype::{Timestamp, UserId};
use crate::config::Config;
use crate::user::*;

/** `TokenRecord` 令牌哈希表中存储的序列化项
*/
#[derive(Serialize, Deserialize)]
struct TokenRecord {
    user_id: UserId,
    role: crate::chat::ChatRole,
    timestamp: Timestamp,
}

pub async fn user_register(data: &UserRegisterData) -> Result<UserRegisterResponse, ()> {
    let mut con = get_con().await?;

    let email_existed: bool = con
        .hexists(path::USER_EMAIL_MAP, &data.email)
        .await
        .map_err(|_| ())?;

    if email_existed {
        return Ok(UserRegisterResponse::EmailRegistered);
    }

    let user_id: UserId = con.incr(path::LAST_USER_ID, 1).await.map_err(|_| ())?;

    let info = UserInfo {
        user_id,
        user_name: data.user_name.clone(),
        role: data.role,
    };
    let info_serialized = serde_json::to_string(&info).unwrap();

    redis::pipe()
        .set(
            index::get_user_info_index(user_id).as_str(),
            info_serialized,
        )
        .ignore()
        .set(
            index::get_user_password_index(user_id).as_str(),
            &data.password,
        )
        .ignore()
        .hset(path::USER_EMAIL_MAP, &data.email, user_id)
        .query_async::<_, ()>(con.deref_mut())
        .await
        .map_err(|_| ())?;

    return Ok(UserRegisterResponse::Success { user_id });
}

pub async fn user_login(data: &UserLoginData) -> Result<UserLoginResponse, ()> {
    let mut con = get_con().await?;

    let user_id_opt: Option<UserId> = con
        .hget(path::USER_EMAIL_MAP, &data.email)
        .await
        .map_err(|_| ())?;

    let user_id = match user_id_opt {
        Some(id) => id,
        None => return Ok(UserLoginResponse::UserNotFound),
    };

    let password: String = con
        .get(index::get_user_password_index(user_id).as_str())
        .await
        .map_err(|_| ())?;

    if password != data.password {
        return Ok(UserLoginResponse::PasswordError);
    }

    let info: String = con
        .get(index::get_user_info_index(user_id).as_str())
        .await
        .map_err(|_| ())?;
    let info = serde_json::from_str::<UserInfo>(&info).expect("UserInfo 反序列化失败");

    let record = TokenRecord {
        user_id,
        role: info.role,
        timestamp: Utc::now().timestamp_millis() as Timestamp,
    };
    let token = Uuid::new_v4().simple().to_string();

    con.hset::<_, _, _, ()>(
        path::TOKEN_MAP,
        &token,
        serde_json::to_string(&record).unwrap(),
    )
    .await
    .map_err(|_| ())?;

    return Ok(UserLoginResponse::Success {
        user_id,
        role: info.role,
        token,
    });
}

pub async fn authenticate_token(token: &str) -> Result<Caller, AuthState> {
    let mut con = get_con().await.map_err(|_| AuthState::ServerError)?;

    let serialized_opt: Option<String> = con
        .hget(path::TOKEN_MAP, token)
        .await
        .map_err(|_| AuthState::ServerError)?;

    let record = match serialized_opt {
        Some(serialized) => {
            serde_json::from_str::<TokenRecord>(&serialized).map_err(|_| AuthState::ServerError)?
        }
        None => return Err(AuthState::TokenError),
    };

    if Utc::now().timestamp_millis() as Timestamp - record.timestamp
        > (Config::get().user.token_expire_time as Timestamp) * 1000
    {
        return Err(AuthState::TokenExpired);
    }

    return Ok(Caller {
        user_id: record.user_id,
        role: record.role,
    });
}

pub async fn get_user_info(user_id: UserId) -> Result<Option<UserInfo>, ()> {
    let mut con = get_con().await?;

    let serialized_opt: Option<String> = con
        .get(index::get_user_info_index(user_id).as_str())
        .await
        .map_err(|_| ())?;

    return Ok(serialized_opt
        .map(|serialized| serde_json::from_str(&serialized).expect("UserInfo 反序列化失败")));
}
