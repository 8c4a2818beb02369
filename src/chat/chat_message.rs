use serde::{Deserialize, Serialize};

use crate::config::datatype::{MessageId, RequestId, Timestamp};

/** `ChatRole` 会话参与者角色，同时作为账号角色与消息发送者
*/
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Expert,
}

impl ChatRole {
    /// 返回会话中的对端角色
    pub fn counterpart(&self) -> ChatRole {
        match *self {
            ChatRole::User => ChatRole::Expert,
            ChatRole::Expert => ChatRole::User,
        }
    }

    pub fn get_str(&self) -> &'static str {
        match *self {
            ChatRole::User => "user",
            ChatRole::Expert => "expert",
        }
    }
}

/** `FileAttachment` 消息附件描述，四个字段作为整体出现
*/
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileAttachment {
    pub file_url: String,
    pub file_name: String,
    pub file_mime: String,
    pub file_size: u64,
}

/** `MessageContent` 消息内容，纯文本或文本带附件
*/
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum MessageContent {
    #[serde(rename_all = "camelCase")]
    Text { text: String },
    #[serde(rename_all = "camelCase")]
    File { text: String, file: FileAttachment },
}

impl MessageContent {
    /// 纯文本消息不允许为空，带附件时正文可以为空
    pub fn is_empty(&self) -> bool {
        match self {
            MessageContent::Text { text } => text.trim().is_empty(),
            MessageContent::File { .. } => false,
        }
    }

    pub fn text_len(&self) -> usize {
        match self {
            MessageContent::Text { text } => text.len(),
            MessageContent::File { text, .. } => text.len(),
        }
    }
}

/** `ChatMessage` 聊天消息数据类型
*/
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub in_chat_id: MessageId,
    pub request_id: RequestId,
    pub sender: ChatRole,
    pub content: MessageContent,
    pub timestamp: Timestamp,
}
