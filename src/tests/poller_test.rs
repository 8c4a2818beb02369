use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use actix::Actor;
use async_trait::async_trait;
use serial_test::serial;

use crate::{
    chat::{ChatMessage, ChatRole, MessageContent},
    client::{
        ChatNotice, ChatNotifier, ChatPoller, ChatPollerActor, LocalSessionApi, PollFetchError,
        PollerControl, SessionApi,
    },
    config::datatype::RequestId,
    database,
    session::service,
    user::Caller,
};

use super::test::block_on;

/** `RecordingNotifier` 把通知按顺序记下来供断言
*/
struct RecordingNotifier {
    notices: Mutex<Vec<ChatNotice>>,
}

impl RecordingNotifier {
    fn new() -> Arc<Self> {
        return Arc::new(RecordingNotifier {
            notices: Mutex::new(Vec::new()),
        });
    }

    fn take(&self) -> Vec<ChatNotice> {
        return std::mem::take(&mut *self.notices.lock().unwrap());
    }
}

impl ChatNotifier for RecordingNotifier {
    fn notify(&self, notice: ChatNotice) {
        self.notices.lock().unwrap().push(notice);
    }
}

/** `MockSessionApi` 可注入故障的会话服务替身
*/
struct MockSessionApi {
    role: ChatRole,
    messages: Mutex<Vec<ChatMessage>>,
    next_id: AtomicU64,
    cursor: AtomicU64,
    fail_unread: AtomicBool,
    fail_messages: AtomicBool,
    fail_mark_read: AtomicBool,
    deny: AtomicBool,
    mark_read_ok_calls: AtomicU64,
}

impl MockSessionApi {
    fn new(role: ChatRole) -> Arc<Self> {
        return Arc::new(MockSessionApi {
            role,
            messages: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
            cursor: AtomicU64::new(0),
            fail_unread: AtomicBool::new(false),
            fail_messages: AtomicBool::new(false),
            fail_mark_read: AtomicBool::new(false),
            deny: AtomicBool::new(false),
            mark_read_ok_calls: AtomicU64::new(0),
        });
    }

    fn push_counterpart_message(&self, request_id: RequestId, body: &str) {
        let in_chat_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.messages.lock().unwrap().push(ChatMessage {
            in_chat_id,
            request_id,
            sender: self.role.counterpart(),
            content: MessageContent::Text {
                text: body.to_string(),
            },
            timestamp: in_chat_id,
        });
    }

    fn drop_messages(&self) {
        self.messages.lock().unwrap().clear();
    }
}

#[async_trait]
impl SessionApi for MockSessionApi {
    async fn get_unread_count(&self, _request_id: RequestId) -> Result<u64, PollFetchError> {
        if self.deny.load(Ordering::SeqCst) {
            return Err(PollFetchError::Denied);
        }
        if self.fail_unread.load(Ordering::SeqCst) {
            return Err(PollFetchError::Backend);
        }
        let cursor = self.cursor.load(Ordering::SeqCst);
        return Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|message| message.sender != self.role && message.in_chat_id > cursor)
            .count() as u64);
    }

    async fn get_messages(
        &self,
        _request_id: RequestId,
    ) -> Result<Vec<ChatMessage>, PollFetchError> {
        if self.fail_messages.load(Ordering::SeqCst) {
            return Err(PollFetchError::Backend);
        }
        return Ok(self.messages.lock().unwrap().clone());
    }

    async fn set_already_read(&self, _request_id: RequestId) -> Result<(), PollFetchError> {
        if self.fail_mark_read.load(Ordering::SeqCst) {
            return Err(PollFetchError::Backend);
        }
        let last = self.next_id.load(Ordering::SeqCst);
        self.cursor.fetch_max(last, Ordering::SeqCst);
        self.mark_read_ok_calls.fetch_add(1, Ordering::SeqCst);
        return Ok(());
    }
}

fn make_poller(api: Arc<MockSessionApi>, notifier: Arc<RecordingNotifier>) -> ChatPoller {
    let role = api.role;
    return ChatPoller::new(role, api, notifier);
}

#[test]
fn test_for_notify_exactly_once() {
    block_on(async {
        let api = MockSessionApi::new(ChatRole::Expert);
        let notifier = RecordingNotifier::new();
        let poller = make_poller(api.clone(), notifier.clone());
        poller.watch(1);

        api.push_counterpart_message(1, "leaves are yellowing");
        poller.tick().await;
        assert_eq!(
            notifier.take(),
            vec![ChatNotice::NewMessages {
                request_id: 1,
                new_count: 1,
                unread: Some(1),
            }]
        );

        // 没有新消息的周期不重复通知
        poller.tick().await;
        assert_eq!(notifier.take(), vec![]);

        api.push_counterpart_message(1, "photo attached");
        api.push_counterpart_message(1, "please advise");
        poller.tick().await;
        assert_eq!(
            notifier.take(),
            vec![ChatNotice::NewMessages {
                request_id: 1,
                new_count: 2,
                unread: Some(3),
            }]
        );
    });
}

#[test]
fn test_for_open_conversation_suppresses() {
    block_on(async {
        let api = MockSessionApi::new(ChatRole::Expert);
        let notifier = RecordingNotifier::new();
        let poller = make_poller(api.clone(), notifier.clone());

        poller.open_conversation(1).await;
        assert_eq!(api.mark_read_ok_calls.load(Ordering::SeqCst), 1);

        // 打开中的会话：压制通知，轮询周期内隐式已读
        api.push_counterpart_message(1, "new while open");
        poller.tick().await;
        assert_eq!(notifier.take(), vec![]);
        assert_eq!(api.get_unread_count(1).await, Ok(0));
        assert_eq!(poller.baseline(1).unread, 0);
    });
}

#[test]
fn test_for_fallback_delta_and_convergence() {
    block_on(async {
        let api = MockSessionApi::new(ChatRole::User);
        let notifier = RecordingNotifier::new();
        let poller = make_poller(api.clone(), notifier.clone());
        poller.watch(7);

        api.fail_unread.store(true, Ordering::SeqCst);
        api.push_counterpart_message(7, "reply 1");
        api.push_counterpart_message(7, "reply 2");

        // 降级路径：delta = max(0, current - lastKnown)
        poller.tick().await;
        assert_eq!(
            notifier.take(),
            vec![ChatNotice::NewMessages {
                request_id: 7,
                new_count: 2,
                unread: None,
            }]
        );
        assert_eq!(poller.baseline(7).counterpart_count, 2);

        // 增量为零时无通知，基线保持对齐
        poller.tick().await;
        assert_eq!(notifier.take(), vec![]);

        // 消息数回落：delta取0，基线仍然对齐到current
        api.drop_messages();
        api.push_counterpart_message(7, "only one now");
        poller.tick().await;
        assert_eq!(notifier.take(), vec![]);
        assert_eq!(poller.baseline(7).counterpart_count, 1);
    });
}

#[test]
fn test_for_failed_tick_keeps_baseline() {
    block_on(async {
        let api = MockSessionApi::new(ChatRole::User);
        let notifier = RecordingNotifier::new();
        let poller = make_poller(api.clone(), notifier.clone());
        poller.watch(3);

        api.push_counterpart_message(3, "hello");
        api.fail_unread.store(true, Ordering::SeqCst);
        api.fail_messages.store(true, Ordering::SeqCst);

        // 两条路径都失败：本周期放弃，基线不动，循环不中断
        poller.tick().await;
        assert_eq!(notifier.take(), vec![]);
        assert_eq!(poller.baseline(3).counterpart_count, 0);

        // 下个周期恢复后消息恰好补报一次
        api.fail_unread.store(false, Ordering::SeqCst);
        api.fail_messages.store(false, Ordering::SeqCst);
        poller.tick().await;
        assert_eq!(
            notifier.take(),
            vec![ChatNotice::NewMessages {
                request_id: 3,
                new_count: 1,
                unread: Some(1),
            }]
        );
    });
}

#[test]
fn test_for_failed_mark_read_keeps_badge() {
    block_on(async {
        let api = MockSessionApi::new(ChatRole::Expert);
        let notifier = RecordingNotifier::new();
        let poller = make_poller(api.clone(), notifier.clone());
        poller.watch(5);

        api.push_counterpart_message(5, "question");
        poller.tick().await;
        assert_eq!(poller.baseline(5).unread, 1);
        notifier.take();

        // 标记失败时本地未读角标不能被错误归零
        api.fail_mark_read.store(true, Ordering::SeqCst);
        poller.open_conversation(5).await;
        assert_eq!(poller.baseline(5).unread, 1);
        poller.tick().await;
        assert_eq!(poller.baseline(5).unread, 1);

        api.fail_mark_read.store(false, Ordering::SeqCst);
        poller.tick().await;
        assert_eq!(poller.baseline(5).unread, 0);
        assert_eq!(notifier.take(), vec![]);
    });
}

#[test]
fn test_for_unread_changed_notice() {
    block_on(async {
        let api = MockSessionApi::new(ChatRole::Expert);
        let notifier = RecordingNotifier::new();
        let poller = make_poller(api.clone(), notifier.clone());
        poller.watch(2);

        api.push_counterpart_message(2, "ping");
        poller.tick().await;
        notifier.take();

        // 另一个标签页标记了已读，服务端未读回落
        api.cursor.store(1, Ordering::SeqCst);
        poller.tick().await;
        assert_eq!(
            notifier.take(),
            vec![ChatNotice::UnreadChanged {
                request_id: 2,
                unread: 0,
            }]
        );
    });
}

#[test]
fn test_for_denied_request_unwatched() {
    block_on(async {
        let api = MockSessionApi::new(ChatRole::User);
        let notifier = RecordingNotifier::new();
        let poller = make_poller(api.clone(), notifier.clone());
        poller.watch(9);

        api.deny.store(true, Ordering::SeqCst);
        poller.tick().await;
        assert_eq!(poller.watched(), Vec::<RequestId>::new());
        assert_eq!(notifier.take(), vec![]);
    });
}

#[test]
fn test_for_close_conversation_marks_read() {
    block_on(async {
        let api = MockSessionApi::new(ChatRole::User);
        let notifier = RecordingNotifier::new();
        let poller = make_poller(api.clone(), notifier.clone());

        poller.open_conversation(4).await;
        api.push_counterpart_message(4, "last words");
        poller.close_conversation().await;

        // 关闭时补发的已读把正在查看的一方清零
        assert_eq!(api.mark_read_ok_calls.load(Ordering::SeqCst), 2);
        assert_eq!(api.get_unread_count(4).await, Ok(0));
        assert_eq!(poller.open_request(), None);
    });
}

#[test]
#[serial]
fn test_for_local_session_api() {
    database::memory::flush_all();
    block_on(async {
        database::connect_database().await.unwrap();
        let request = database::create_consult_request(1, "咨询".to_string(), None)
            .await
            .unwrap();
        database::set_request_expert(request.id, 2).await.unwrap();

        let farmer = Caller {
            user_id: 1,
            role: ChatRole::User,
        };
        let expert = Caller {
            user_id: 2,
            role: ChatRole::Expert,
        };

        service::send_message(
            farmer,
            request.id,
            MessageContent::Text {
                text: "叶子发黄".to_string(),
            },
        )
        .await
        .unwrap();

        // 专家端轮询客户端直连会话服务
        let notifier = RecordingNotifier::new();
        let poller = ChatPoller::new(
            ChatRole::Expert,
            Arc::new(LocalSessionApi { caller: expert }),
            notifier.clone(),
        );
        poller.watch(request.id);

        poller.tick().await;
        assert_eq!(
            notifier.take(),
            vec![ChatNotice::NewMessages {
                request_id: request.id,
                new_count: 1,
                unread: Some(1),
            }]
        );

        // 打开会话后服务端游标前进，未读归零
        poller.open_conversation(request.id).await;
        assert_eq!(service::get_unread_count(expert, request.id).await, Ok(0));
        assert_eq!(service::get_unread_count(farmer, request.id).await, Ok(0));
    });
    database::memory::flush_all();
}

#[test]
fn test_for_poller_actor_interval() {
    actix_web::rt::System::new().block_on(async {
        let api = MockSessionApi::new(ChatRole::Expert);
        let notifier = RecordingNotifier::new();
        let poller = Arc::new(make_poller(api.clone(), notifier.clone()));

        let addr = ChatPollerActor {
            poller: poller.clone(),
            interval: Duration::from_millis(50),
        }
        .start();

        addr.send(PollerControl::Watch(1)).await.unwrap();
        api.push_counterpart_message(1, "tick me");

        tokio::time::sleep(Duration::from_millis(300)).await;
        let notices = notifier.take();
        assert_eq!(
            notices,
            vec![ChatNotice::NewMessages {
                request_id: 1,
                new_count: 1,
                unread: Some(1),
            }]
        );

        addr.send(PollerControl::Stop).await.ok();
    });
}
