/*!
会话操作的处理函数，组合消息存储与已读游标
*/

use log::debug;

use crate::{
    chat::{ChatMessage, ChatRole, ChatSessionView, MessageContent},
    config::{
        datatype::{MessageId, RequestId},
        Config,
    },
    consult::ConsultRequest,
    database,
    user::Caller,
};

use super::ChatError;

/** `resolve_party` 解析调用方在请求会话中扮演的角色
 *
 * 调用方必须是请求的发起农户或受理专家，身份检查委托给请求目录。
*/
pub async fn resolve_party(
    caller: Caller,
    request_id: RequestId,
) -> Result<(ConsultRequest, ChatRole), ChatError> {
    let request = match database::get_consult_request(request_id).await {
        Ok(opt) => match opt {
            Some(request) => request,
            None => return Err(ChatError::RequestNotFound),
        },
        Err(_) => return Err(ChatError::DatabaseError),
    };

    if request.user_id == caller.user_id && caller.role == ChatRole::User {
        return Ok((request, ChatRole::User));
    }
    if request.expert_id == Some(caller.user_id) && caller.role == ChatRole::Expert {
        return Ok((request, ChatRole::Expert));
    }
    return Err(ChatError::NoPermission);
}

/** `open_session` 打开或恢复会话，返回消息列表与调用方游标
*/
pub async fn open_session(
    caller: Caller,
    request_id: RequestId,
) -> Result<ChatSessionView, ChatError> {
    let (_, role) = resolve_party(caller, request_id).await?;

    let messages = database::get_messages_in_request(request_id, None)
        .await
        .map_err(|_| ChatError::DatabaseError)?;

    let cursor = database::get_read_cursor(request_id, role)
        .await
        .map_err(|_| ChatError::DatabaseError)?;

    debug!(
        "open_session: request {} role {} ({}条消息)",
        request_id,
        role.get_str(),
        messages.len()
    );

    return Ok(ChatSessionView {
        request_id,
        messages,
        cursor,
    });
}

/** `get_messages` 按创建顺序拉取会话消息，after为不包含的起始序号
*/
pub async fn get_messages(
    caller: Caller,
    request_id: RequestId,
    after: Option<MessageId>,
) -> Result<Vec<ChatMessage>, ChatError> {
    resolve_party(caller, request_id).await?;

    let mut messages = database::get_messages_in_request(request_id, after)
        .await
        .map_err(|_| ChatError::DatabaseError)?;

    let max_num = Config::get().protocol.max_messages_num_when_getting as usize;
    if messages.len() > max_num {
        messages.truncate(max_num);
    }

    return Ok(messages);
}

/** `send_message` 向会话中追加一条消息
 *
 * 不推动发送方自己的游标，也不触碰对端的游标，
 * 对端的未读数由此增加。
*/
pub async fn send_message(
    caller: Caller,
    request_id: RequestId,
    content: MessageContent,
) -> Result<ChatMessage, ChatError> {
    if content.is_empty() {
        return Err(ChatError::EmptyMessage);
    }
    if content.text_len() > Config::get().safety.max_msg_length as usize {
        return Err(ChatError::MessageTooLong);
    }

    let (_, role) = resolve_party(caller, request_id).await?;

    let message = database::write_message_to_request(request_id, role, content)
        .await
        .map_err(|_| ChatError::DatabaseError)?;

    debug!(
        "send_message: request {} role {} -> 消息{}",
        request_id,
        role.get_str(),
        message.in_chat_id
    );

    return Ok(message);
}

/** `set_already_read` 将调用方的游标推进到当前最新消息
 *
 * "已读"指此刻已存在的全部消息。游标单调推进，
 * 写入后同一调用方紧接着的未读查询立即可见。
*/
pub async fn set_already_read(caller: Caller, request_id: RequestId) -> Result<(), ChatError> {
    let (_, role) = resolve_party(caller, request_id).await?;

    let last_id = database::get_last_message_id(request_id)
        .await
        .map_err(|_| ChatError::DatabaseError)?;

    database::set_already_read(request_id, role, last_id)
        .await
        .map_err(|_| ChatError::DatabaseError)?;

    return Ok(());
}

/** `get_unread_count` 计算调用方未读的对端消息数量
 *
 * 每次从消息存储与游标即时计算，不落库。
*/
pub async fn get_unread_count(caller: Caller, request_id: RequestId) -> Result<u64, ChatError> {
    let (_, role) = resolve_party(caller, request_id).await?;

    return database::count_unread_messages(request_id, role)
        .await
        .map_err(|_| ChatError::DatabaseError);
}
