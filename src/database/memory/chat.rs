use chrono::Utc;

use crate::{
    chat::{ChatMessage, ChatRole, MessageContent},
    config::datatype::{MessageId, RequestId, Timestamp},
};

use super::store;

pub async fn write_message_to_request(
    request_id: RequestId,
    sender: ChatRole,
    content: MessageContent,
) -> Result<ChatMessage, ()> {
    let timestamp = Utc::now().timestamp_millis() as Timestamp;

    let mut created: Option<ChatMessage> = None;
    store::conversations.alter(request_id, |opt| match opt {
        Some(mut log) => {
            log.last_id += 1;
            let message = ChatMessage {
                in_chat_id: log.last_id,
                request_id,
                sender,
                content,
                timestamp,
            };
            log.messages.push(message.clone());
            created = Some(message);
            Some(log)
        }
        // 会话列表随请求建立，不存在说明请求本身不存在
        None => None,
    });

    return created.ok_or(());
}

pub async fn get_messages_in_request(
    request_id: RequestId,
    after: Option<MessageId>,
) -> Result<Vec<ChatMessage>, ()> {
    let log = match store::conversations.get(&request_id) {
        Some(log) => log,
        None => return Err(()),
    };

    let start = after.unwrap_or(0);
    return Ok(log
        .messages
        .iter()
        .filter(|message| message.in_chat_id > start)
        .cloned()
        .collect());
}

pub async fn get_last_message_id(request_id: RequestId) -> Result<MessageId, ()> {
    match store::conversations.get(&request_id) {
        Some(log) => Ok(log.last_id),
        None => Err(()),
    }
}

pub async fn set_already_read(
    request_id: RequestId,
    role: ChatRole,
    at: MessageId,
) -> Result<(), ()> {
    // upsert在键锁内执行，max比较保证游标只前进
    store::read_cursors.upsert(
        (request_id, role),
        || at,
        |cursor| {
            if at > *cursor {
                *cursor = at;
            }
        },
    );
    return Ok(());
}

pub async fn get_read_cursor(request_id: RequestId, role: ChatRole) -> Result<MessageId, ()> {
    return Ok(store::read_cursors
        .get(&(request_id, role))
        .map(|guard| *guard)
        .unwrap_or(0));
}

pub async fn count_unread_messages(request_id: RequestId, role: ChatRole) -> Result<u64, ()> {
    let cursor = get_read_cursor(request_id, role).await?;
    let counterpart = role.counterpart();

    let log = match store::conversations.get(&request_id) {
        Some(log) => log,
        None => return Err(()),
    };

    return Ok(log
        .messages
        .iter()
        .filter(|message| message.sender == counterpart && message.in_chat_id > cursor)
        .count() as u64);
}
