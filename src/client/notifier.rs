use crate::config::datatype::RequestId;

/** `ChatNotice` 轮询客户端向UI上抛的通知事件
*/
#[derive(Clone, Debug, PartialEq)]
pub enum ChatNotice {
    /// 新观察到对端消息，每条消息恰好通知一次
    NewMessages {
        request_id: RequestId,
        /// 本次新观察到的对端消息数
        new_count: u64,
        /// 服务端权威未读数，降级路径下拿不到
        unread: Option<u64>,
    },
    /// 服务端未读数回落（例如另一个标签页标记了已读）
    UnreadChanged { request_id: RequestId, unread: u64 },
}

/** `ChatNotifier` 通知事件的接收方，由UI实现
*/
pub trait ChatNotifier: Send + Sync {
    fn notify(&self, notice: ChatNotice);
}

/** `EmptyChatNotifier` 丢弃一切通知的默认实现
*/
pub struct EmptyChatNotifier;

impl ChatNotifier for EmptyChatNotifier {
    fn notify(&self, _notice: ChatNotice) {}
}
