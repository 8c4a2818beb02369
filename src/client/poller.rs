/*!
轮询核心逻辑：基线维护、通知判定与降级路径
*/

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::{debug, warn};

use crate::{chat::ChatRole, config::datatype::RequestId};

use super::{ChatNotice, ChatNotifier, PollFetchError, SessionApi};

/** `PollBaseline` 单个会话的客户端基线
 *
 * 只是可丢弃的缓存，权威未读数永远在服务端。
*/
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PollBaseline {
    /// 上次观察到的服务端未读数
    pub unread: u64,
    /// 降级路径维护的对端消息总数
    pub counterpart_count: u64,
}

struct PollerInner {
    watched: Vec<RequestId>,
    baselines: HashMap<RequestId, PollBaseline>,
    open_request: Option<RequestId>,
}

/** `ChatPoller` 角色参数化的轮询客户端
 *
 * 农户端与专家端各持有一个实例，互相之间没有任何协调，
 * 每个实例只推进自己角色的游标。
*/
pub struct ChatPoller {
    role: ChatRole,
    api: Arc<dyn SessionApi>,
    notifier: Arc<dyn ChatNotifier>,
    inner: Mutex<PollerInner>,
}

impl ChatPoller {
    pub fn new(role: ChatRole, api: Arc<dyn SessionApi>, notifier: Arc<dyn ChatNotifier>) -> Self {
        return ChatPoller {
            role,
            api,
            notifier,
            inner: Mutex::new(PollerInner {
                watched: Vec::new(),
                baselines: HashMap::new(),
                open_request: None,
            }),
        };
    }

    pub fn role(&self) -> ChatRole {
        return self.role;
    }

    /// 将一个会话加入监视列表
    pub fn watch(&self, request_id: RequestId) {
        let mut inner = self.inner.lock().unwrap();
        if !inner.watched.contains(&request_id) {
            inner.watched.push(request_id);
        }
    }

    /// 将一个会话移出监视列表并丢弃其基线
    pub fn unwatch(&self, request_id: RequestId) {
        let mut inner = self.inner.lock().unwrap();
        inner.watched.retain(|id| *id != request_id);
        inner.baselines.remove(&request_id);
        if inner.open_request == Some(request_id) {
            inner.open_request = None;
        }
    }

    pub fn watched(&self) -> Vec<RequestId> {
        return self.inner.lock().unwrap().watched.clone();
    }

    pub fn open_request(&self) -> Option<RequestId> {
        return self.inner.lock().unwrap().open_request;
    }

    pub fn baseline(&self, request_id: RequestId) -> PollBaseline {
        return self
            .inner
            .lock()
            .unwrap()
            .baselines
            .get(&request_id)
            .copied()
            .unwrap_or_default();
    }

    /// 打开一个会话：立即标记已读并开始压制该会话的通知
    pub async fn open_conversation(&self, request_id: RequestId) {
        {
            let mut inner = self.inner.lock().unwrap();
            if !inner.watched.contains(&request_id) {
                inner.watched.push(request_id);
            }
            inner.open_request = Some(request_id);
        }

        if self.api.set_already_read(request_id).await.is_ok() {
            let mut inner = self.inner.lock().unwrap();
            if let Some(baseline) = inner.baselines.get_mut(&request_id) {
                baseline.unread = 0;
            }
        }
        // 标记失败时不清零基线，未读角标不会被错误归零
    }

    /// 关闭当前打开的会话，补发最后一次已读
    pub async fn close_conversation(&self) {
        let request_id = {
            let mut inner = self.inner.lock().unwrap();
            inner.open_request.take()
        };

        if let Some(request_id) = request_id {
            if self.api.set_already_read(request_id).await.is_err() {
                warn!("close_conversation: request {} 标记已读失败", request_id);
            }
        }
    }

    /// 一个轮询周期：重新同步所有被监视的会话
    ///
    /// 单个会话的失败在内部消化，定时器照常进入下个周期。
    pub async fn tick(&self) {
        let ids = self.watched();
        futures::future::join_all(ids.into_iter().map(|id| self.poll_one(id))).await;
    }

    async fn poll_one(&self, request_id: RequestId) {
        let is_open = self.inner.lock().unwrap().open_request == Some(request_id);

        match self.api.get_unread_count(request_id).await {
            Ok(unread) => self.reconcile_server(request_id, is_open, unread).await,
            Err(PollFetchError::Denied) => {
                warn!("poll: request {} 不可访问，移出监视列表", request_id);
                self.unwatch(request_id);
            }
            Err(PollFetchError::Backend) => {
                // 权威未读数拿不到时退回本地增量计算
                match self.api.get_messages(request_id).await {
                    Ok(messages) => {
                        let current = messages
                            .iter()
                            .filter(|message| message.sender != self.role)
                            .count() as u64;
                        self.reconcile_local(request_id, is_open, current);
                    }
                    Err(_) => {
                        debug!("poll: request {} 本周期失败，下个周期重试", request_id);
                    }
                }
            }
        }
    }

    /// 服务端权威路径：以服务端未读数为准维护基线
    async fn reconcile_server(&self, request_id: RequestId, is_open: bool, unread: u64) {
        if is_open {
            // 打开中的会话即视为已读，压制通知
            if unread > 0 && self.api.set_already_read(request_id).await.is_err() {
                return;
            }
            let mut inner = self.inner.lock().unwrap();
            inner.baselines.entry(request_id).or_default().unread = 0;
            return;
        }

        let notice = {
            let mut inner = self.inner.lock().unwrap();
            let baseline = inner.baselines.entry(request_id).or_default();
            let newly = unread.saturating_sub(baseline.unread);
            let notice = if newly > 0 {
                Some(ChatNotice::NewMessages {
                    request_id,
                    new_count: newly,
                    unread: Some(unread),
                })
            } else if unread < baseline.unread {
                Some(ChatNotice::UnreadChanged { request_id, unread })
            } else {
                None
            };
            baseline.unread = unread;
            notice
        };

        if let Some(notice) = notice {
            self.notifier.notify(notice);
        }
    }

    /// 降级路径：unread_delta = max(0, current − lastKnown)
    ///
    /// 无论增量符号如何基线都对齐到current，陈旧增量不会累积；
    /// 跨设备的偏差只有服务端游标能纠正，这条路径不尝试。
    fn reconcile_local(&self, request_id: RequestId, is_open: bool, current: u64) {
        let notice = {
            let mut inner = self.inner.lock().unwrap();
            let baseline = inner.baselines.entry(request_id).or_default();
            let delta = current.saturating_sub(baseline.counterpart_count);
            baseline.counterpart_count = current;
            if is_open {
                baseline.unread = 0;
                None
            } else if delta > 0 {
                Some(ChatNotice::NewMessages {
                    request_id,
                    new_count: delta,
                    unread: None,
                })
            } else {
                None
            }
        };

        if let Some(notice) = notice {
            self.notifier.notify(notice);
        }
    }
}
