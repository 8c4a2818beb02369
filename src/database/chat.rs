use crate::chat::{ChatMessage, ChatRole, MessageContent};
use crate::config::datatype::*;

use super::common::use_memory;
use super::memory;
use super::redis;

/// 向请求会话的消息列表追加一条消息
/// 序号与时间戳由存储分配，成功时返回完整的消息记录
pub async fn write_message_to_request(
    request_id: RequestId,
    sender: ChatRole,
    content: MessageContent,
) -> Result<ChatMessage, ()> {
    if use_memory() {
        return memory::write_message_to_request(request_id, sender, content).await;
    }
    return redis::write_message_to_request(request_id, sender, content).await;
}

/// 按创建顺序获得请求会话中的消息，after为不包含的起始序号
pub async fn get_messages_in_request(
    request_id: RequestId,
    after: Option<MessageId>,
) -> Result<Vec<ChatMessage>, ()> {
    if use_memory() {
        return memory::get_messages_in_request(request_id, after).await;
    }
    return redis::get_messages_in_request(request_id, after).await;
}

/// 获得请求会话中最新一条消息的序号，没有消息时为0
pub async fn get_last_message_id(request_id: RequestId) -> Result<MessageId, ()> {
    if use_memory() {
        return memory::get_last_message_id(request_id).await;
    }
    return redis::get_last_message_id(request_id).await;
}

/// 将某一角色的已读游标推进到at
/// 游标只会前进：新值不大于旧值时为无操作，可安全地并发调用
pub async fn set_already_read(
    request_id: RequestId,
    role: ChatRole,
    at: MessageId,
) -> Result<(), ()> {
    if use_memory() {
        return memory::set_already_read(request_id, role, at).await;
    }
    return redis::set_already_read(request_id, role, at).await;
}

/// 获得某一角色的已读游标，从未读过时为0
pub async fn get_read_cursor(request_id: RequestId, role: ChatRole) -> Result<MessageId, ()> {
    if use_memory() {
        return memory::get_read_cursor(request_id, role).await;
    }
    return redis::get_read_cursor(request_id, role).await;
}

/// 统计某一角色未读的对端消息数量，即游标之后由对端发送的消息数
pub async fn count_unread_messages(request_id: RequestId, role: ChatRole) -> Result<u64, ()> {
    if use_memory() {
        return memory::count_unread_messages(request_id, role).await;
    }
    return redis::count_unread_messages(request_id, role).await;
}
