use serde::{Deserialize, Serialize};

use crate::config::datatype::{MessageId, RequestId};

use super::ChatMessage;

/** `ChatSessionView` 会话视图，由消息列表与调用方的已读游标组合而成
 *
 * 会话本身没有独立的生命周期，始终按当前存储状态即时计算。
*/
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChatSessionView {
    pub request_id: RequestId,
    pub messages: Vec<ChatMessage>,
    /// 调用方已读到的消息序号，0表示尚未读过
    pub cursor: MessageId,
}
