use async_trait::async_trait;

use crate::{
    chat::ChatMessage,
    config::datatype::RequestId,
    session::{service, ChatError},
    user::Caller,
};

/** `PollFetchError` 轮询访问会话服务时的错误
 *
 * Backend为暂时性故障，由轮询客户端吞掉并降级；
 * Denied表示请求不存在或身份不符，该会话会被移出监视列表。
*/
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PollFetchError {
    Backend,
    Denied,
}

/** `SessionApi` 轮询客户端眼中的会话服务
 *
 * 同进程部署时由LocalSessionApi直接调用服务，
 * 远端部署时可以换成HTTP实现，轮询逻辑不感知差别。
*/
#[async_trait]
pub trait SessionApi: Send + Sync {
    async fn get_unread_count(&self, request_id: RequestId) -> Result<u64, PollFetchError>;

    async fn get_messages(&self, request_id: RequestId)
        -> Result<Vec<ChatMessage>, PollFetchError>;

    async fn set_already_read(&self, request_id: RequestId) -> Result<(), PollFetchError>;
}

fn convert_error(err: ChatError) -> PollFetchError {
    match err {
        ChatError::DatabaseError => PollFetchError::Backend,
        _ => PollFetchError::Denied,
    }
}

/** `LocalSessionApi` 同进程直连会话服务的实现
*/
pub struct LocalSessionApi {
    pub caller: Caller,
}

#[async_trait]
impl SessionApi for LocalSessionApi {
    async fn get_unread_count(&self, request_id: RequestId) -> Result<u64, PollFetchError> {
        return service::get_unread_count(self.caller, request_id)
            .await
            .map_err(convert_error);
    }

    async fn get_messages(
        &self,
        request_id: RequestId,
    ) -> Result<Vec<ChatMessage>, PollFetchError> {
        return service::get_messages(self.caller, request_id, None)
            .await
            .map_err(convert_error);
    }

    async fn set_already_read(&self, request_id: RequestId) -> Result<(), PollFetchError> {
        return service::set_already_read(self.caller, request_id)
            .await
            .map_err(convert_error);
    }
}
