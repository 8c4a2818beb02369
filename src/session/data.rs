/*!
会话服务的数据类型与错误状态
*/

use serde::{Deserialize, Serialize};

use crate::{
    chat::MessageContent,
    config::datatype::{MessageId, RequestId},
    consult::ConsultRequest,
};

/** `ChatError` 会话操作的错误状态
 *
 * `EmptyMessage`/`MessageTooLong`由发送数据检查产生，调用方不重试；
 * `DatabaseError`为暂时性错误，轮询客户端吞掉并在下个周期重试，
 * 用户主动操作则原样上报由用户手动重试。
*/
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "state")]
pub enum ChatError {
    EmptyMessage,
    MessageTooLong,
    RequestNotFound,
    NoPermission,
    DatabaseError,
}

/** `ChatSendMessageData` 发送消息时所用的数据类型
*/
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChatSendMessageData {
    pub content: MessageContent,
}

/** `ChatGetMessagesData` 拉取消息时的查询参数，after为不包含的已知序号
*/
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChatGetMessagesData {
    pub after: Option<MessageId>,
}

/** `UnreadCountResponse` 未读数查询的应答
*/
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub request_id: RequestId,
    pub unread: u64,
}

/** `AckResponse` 无数据成功应答
*/
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "state")]
pub enum AckResponse {
    Success,
}

/** `ConsultRequestEntry` 请求列表中的条目，附带调用方视角的未读数
*/
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ConsultRequestEntry {
    pub request: ConsultRequest,
    pub unread_count: u64,
}
