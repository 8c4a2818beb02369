/*!
内存后端的共享表，使用分片哈希表获得按键的原子更新
*/

use chashmap::CHashMap;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use crate::{
    chat::{ChatMessage, ChatRole},
    config::datatype::{MessageId, RequestId, Timestamp, UploadId, UserId},
    consult::ConsultRequest,
    oss::{ObjectUploadRequest, PresignUrl},
    user::{Caller, UserInfo},
};

/** `UserRecord` 账号的内存存储形式
*/
pub struct UserRecord {
    pub info: UserInfo,
    pub email: String,
    pub password: String,
}

/** `TokenRecord` 令牌到调用方身份的映射项
*/
pub struct TokenRecord {
    pub caller: Caller,
    pub timestamp: Timestamp,
}

/** `ConversationLog` 单个请求会话的消息列表与序号分配器
 *
 * 序号分配与追加发生在同一把分片写锁内，保证全序与前缀一致。
*/
pub struct ConversationLog {
    pub last_id: MessageId,
    pub messages: Vec<ChatMessage>,
}

#[allow(non_upper_case_globals)]
pub static users: Lazy<CHashMap<UserId, UserRecord>> = Lazy::new(|| CHashMap::new());
#[allow(non_upper_case_globals)]
pub static user_email_map: Lazy<CHashMap<String, UserId>> = Lazy::new(|| CHashMap::new());
#[allow(non_upper_case_globals)]
pub static tokens: Lazy<CHashMap<String, TokenRecord>> = Lazy::new(|| CHashMap::new());
#[allow(non_upper_case_globals)]
pub static consult_requests: Lazy<CHashMap<RequestId, ConsultRequest>> =
    Lazy::new(|| CHashMap::new());
#[allow(non_upper_case_globals)]
pub static conversations: Lazy<CHashMap<RequestId, ConversationLog>> =
    Lazy::new(|| CHashMap::new());
#[allow(non_upper_case_globals)]
pub static read_cursors: Lazy<CHashMap<(RequestId, ChatRole), MessageId>> =
    Lazy::new(|| CHashMap::new());
#[allow(non_upper_case_globals)]
pub static upload_requests: Lazy<CHashMap<UploadId, ObjectUploadRequest>> =
    Lazy::new(|| CHashMap::new());
#[allow(non_upper_case_globals)]
pub static file_urls: Lazy<CHashMap<String, PresignUrl>> = Lazy::new(|| CHashMap::new());

#[allow(non_upper_case_globals)]
pub static last_user_id: AtomicU32 = AtomicU32::new(0);
#[allow(non_upper_case_globals)]
pub static last_request_id: AtomicU64 = AtomicU64::new(0);
#[allow(non_upper_case_globals)]
pub static last_upload_id: AtomicU64 = AtomicU64::new(0);

/// 清空全部内存表，测试间复位用
pub fn flush_all() {
    users.clear();
    user_email_map.clear();
    tokens.clear();
    consult_requests.clear();
    conversations.clear();
    read_cursors.clear();
    upload_requests.clear();
    file_urls.clear();
    last_user_id.store(0, Ordering::SeqCst);
    last_request_id.store(0, Ordering::SeqCst);
    last_upload_id.store(0, Ordering::SeqCst);
}
