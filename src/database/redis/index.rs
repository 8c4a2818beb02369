use crate::config::datatype::{RequestId, UserId};
use smartstring::alias::String;
use std::fmt::Write;

pub fn get_user_info_index(user_id: UserId) -> String {
    let mut str: String = String::new();
    write!(str, "user:{}:info", user_id).ok();
    return str;
}

pub fn get_user_password_index(user_id: UserId) -> String {
    let mut str: String = String::new();
    write!(str, "user:{}:pass", user_id).ok();
    return str;
}

pub fn get_user_reqs_index(user_id: UserId) -> String {
    let mut str: String = String::new();
    write!(str, "user:{}:reqs", user_id).ok();
    return str;
}

pub fn get_expert_reqs_index(expert_id: UserId) -> String {
    let mut str: String = String::new();
    write!(str, "expert:{}:reqs", expert_id).ok();
    return str;
}

pub fn get_req_info_index(request_id: RequestId) -> String {
    let mut str: String = String::new();
    write!(str, "req:{}:info", request_id).ok();
    return str;
}

pub fn get_req_msgs_index(request_id: RequestId) -> String {
    let mut str: String = String::new();
    write!(str, "req:{}:msgs", request_id).ok();
    return str;
}

pub fn get_req_last_id_index(request_id: RequestId) -> String {
    let mut str: String = String::new();
    write!(str, "req:{}:last_id", request_id).ok();
    return str;
}

pub fn get_req_read_index(request_id: RequestId) -> String {
    let mut str: String = String::new();
    write!(str, "req:{}:read", request_id).ok();
    return str;
}
