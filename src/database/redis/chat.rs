use mobc_redis::redis;
use mobc_redis::redis::AsyncCommands;
use std::ops::DerefMut;

use super::common::*;
use super::index;
use crate::chat::{ChatMessage, ChatRole, MessageContent};
use crate::config::datatype::{MessageId, RequestId, SerializedChatMessage, Timestamp};

pub async fn write_message_to_request(
    request_id: RequestId,
    sender: ChatRole,
    content: MessageContent,
) -> Result<ChatMessage, ()> {
    let mut con = get_con().await?;

    let request_existed: bool = con
        .exists(index::get_req_info_index(request_id).as_str())
        .await
        .map_err(|_| ())?;
    if request_existed == false {
        return Err(());
    }

    let timestamp = chrono::Utc::now().timestamp_millis() as Timestamp;

    let in_chat_id: MessageId = con
        .incr(index::get_req_last_id_index(request_id).as_str(), 1)
        .await
        .map_err(|_| ())?;

    let message = ChatMessage {
        in_chat_id,
        request_id,
        sender,
        content,
        timestamp,
    };
    let serialized_msg = serde_json::to_string(&message).unwrap();

    // TODO : 实现消息列表分块存储
    con.zadd::<_, _, _, ()>(
        index::get_req_msgs_index(request_id).as_str(),
        &serialized_msg,
        in_chat_id,
    )
    .await
    .map_err(|_| ())?;

    return Ok(message);
}

pub async fn get_messages_in_request(
    request_id: RequestId,
    after: Option<MessageId>,
) -> Result<Vec<ChatMessage>, ()> {
    let mut con = get_con().await?;

    let request_existed: bool = con
        .exists(index::get_req_info_index(request_id).as_str())
        .await
        .map_err(|_| ())?;
    if request_existed == false {
        return Err(());
    }

    let start = after.unwrap_or(0) + 1;
    let serialized: Vec<SerializedChatMessage> = con
        .zrangebyscore(index::get_req_msgs_index(request_id).as_str(), start, "+inf")
        .await
        .map_err(|_| ())?;

    return Ok(serialized
        .iter()
        .map(|msg| serde_json::from_str::<ChatMessage>(msg).expect("ChatMessage 反序列化失败"))
        .collect());
}

pub async fn get_last_message_id(request_id: RequestId) -> Result<MessageId, ()> {
    let mut con = get_con().await?;

    let last_id: Option<MessageId> = con
        .get(index::get_req_last_id_index(request_id).as_str())
        .await
        .map_err(|_| ())?;

    return Ok(last_id.unwrap_or(0));
}

// redis没有HSETMAX，用脚本在服务端完成max比较，
// 两个同角色客户端并发标记已读时游标也不会回退
const SET_READ_SCRIPT: &str = r#"
local cur = redis.call('HGET', KEYS[1], ARGV[1])
if (not cur) or (tonumber(ARGV[2]) > tonumber(cur)) then
    redis.call('HSET', KEYS[1], ARGV[1], ARGV[2])
end
return 1
"#;

pub async fn set_already_read(
    request_id: RequestId,
    role: ChatRole,
    at: MessageId,
) -> Result<(), ()> {
    let mut con = get_con().await?;

    redis::Script::new(SET_READ_SCRIPT)
        .key(index::get_req_read_index(request_id).as_str())
        .arg(role.get_str())
        .arg(at)
        .invoke_async::<_, ()>(con.deref_mut())
        .await
        .map_err(|_| ())?;

    return Ok(());
}

pub async fn get_read_cursor(request_id: RequestId, role: ChatRole) -> Result<MessageId, ()> {
    let mut con = get_con().await?;

    let cursor: Option<MessageId> = con
        .hget(index::get_req_read_index(request_id).as_str(), role.get_str())
        .await
        .map_err(|_| ())?;

    return Ok(cursor.unwrap_or(0));
}

pub async fn count_unread_messages(request_id: RequestId, role: ChatRole) -> Result<u64, ()> {
    let cursor = get_read_cursor(request_id, role).await?;
    let counterpart = role.counterpart();

    let messages = get_messages_in_request(request_id, Some(cursor)).await?;

    return Ok(messages
        .iter()
        .filter(|message| message.sender == counterpart)
        .count() as u64);
}
