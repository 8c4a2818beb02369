use chrono::Utc;
use std::sync::atomic::Ordering;
use uuid::Uuid;

use crate::{
    config::{
        datatype::{Timestamp, UserId},
        Config,
    },
    user::*,
};

use super::store::{self, TokenRecord, UserRecord};

pub async fn user_register(data: &UserRegisterData) -> Result<UserRegisterResponse, ()> {
    if store::user_email_map.contains_key(&data.email) {
        return Ok(UserRegisterResponse::EmailRegistered);
    }

    let user_id = store::last_user_id.fetch_add(1, Ordering::SeqCst) + 1;

    store::users.insert(
        user_id,
        UserRecord {
            info: UserInfo {
                user_id,
                user_name: data.user_name.clone(),
                role: data.role,
            },
            email: data.email.clone(),
            password: data.password.clone(),
        },
    );
    store::user_email_map.insert(data.email.clone(), user_id);

    return Ok(UserRegisterResponse::Success { user_id });
}

pub async fn user_login(data: &UserLoginData) -> Result<UserLoginResponse, ()> {
    let user_id = match store::user_email_map.get(&data.email) {
        Some(guard) => *guard,
        None => return Ok(UserLoginResponse::UserNotFound),
    };

    let role = match store::users.get(&user_id) {
        Some(record) => {
            if record.password != data.password {
                return Ok(UserLoginResponse::PasswordError);
            }
            record.info.role
        }
        None => return Err(()),
    };

    let token = Uuid::new_v4().simple().to_string();
    store::tokens.insert(
        token.clone(),
        TokenRecord {
            caller: Caller { user_id, role },
            timestamp: Utc::now().timestamp_millis() as Timestamp,
        },
    );

    return Ok(UserLoginResponse::Success {
        user_id,
        role,
        token,
    });
}

pub async fn authenticate_token(token: &str) -> Result<Caller, AuthState> {
    let record = match store::tokens.get(&token.to_string()) {
        Some(record) => record,
        None => return Err(AuthState::TokenError),
    };

    let now = Utc::now().timestamp_millis() as Timestamp;
    if now - record.timestamp > (Config::get().user.token_expire_time as Timestamp) * 1000 {
        return Err(AuthState::TokenExpired);
    }

    return Ok(record.caller);
}

pub async fn get_user_info(user_id: UserId) -> Result<Option<UserInfo>, ()> {
    return Ok(store::users
        .get(&user_id)
        .map(|record| record.info.clone()));
}
