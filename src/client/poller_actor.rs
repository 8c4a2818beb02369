use std::sync::Arc;
use std::time::Duration;

use actix::{Actor, ActorContext, AsyncContext, Context, Handler, Message, Running, WrapFuture};
use log::debug;

use crate::{config::datatype::RequestId, config::Config, server::server_state::workers_handle};

use super::ChatPoller;

/** `ChatPollerActor` 按固定间隔驱动轮询的Actor
 *
 * 定时器只负责调度，重同步逻辑都在ChatPoller内，
 * 挂起只发生在轮询间隔的边界上。
*/
pub struct ChatPollerActor {
    pub poller: Arc<ChatPoller>,
    pub interval: Duration,
}

impl ChatPollerActor {
    pub fn new(poller: Arc<ChatPoller>) -> Self {
        return ChatPollerActor {
            poller,
            interval: Duration::from_secs(Config::get().protocol.poll_interval_sec),
        };
    }
}

impl Actor for ChatPollerActor {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        debug!(
            "轮询客户端启动 ({})，间隔{}秒",
            self.poller.role().get_str(),
            self.interval.as_secs()
        );

        ctx.run_interval(self.interval, |act, ctx| {
            let poller = act.poller.clone();
            ctx.spawn(async move { poller.tick().await }.into_actor(act));
        });
    }

    fn stopping(&mut self, _ctx: &mut Self::Context) -> Running {
        debug!("轮询客户端停止 ({})", self.poller.role().get_str());

        // 视图卸载时补发最后一次已读，主动查看过的一方未读归零
        let poller = self.poller.clone();
        workers_handle.spawn(async move { poller.close_conversation().await });

        Running::Stop
    }
}

/** `PollerControl` UI发给轮询Actor的控制消息
*/
#[derive(Message)]
#[rtype(result = "()")]
pub enum PollerControl {
    Watch(RequestId),
    Unwatch(RequestId),
    OpenConversation(RequestId),
    CloseConversation,
    Stop,
}

impl Handler<PollerControl> for ChatPollerActor {
    type Result = ();

    fn handle(&mut self, msg: PollerControl, ctx: &mut Self::Context) {
        match msg {
            PollerControl::Watch(request_id) => self.poller.watch(request_id),
            PollerControl::Unwatch(request_id) => self.poller.unwatch(request_id),
            PollerControl::OpenConversation(request_id) => {
                let poller = self.poller.clone();
                ctx.spawn(
                    async move { poller.open_conversation(request_id).await }.into_actor(self),
                );
            }
            PollerControl::CloseConversation => {
                let poller = self.poller.clone();
                ctx.spawn(async move { poller.close_conversation().await }.into_actor(self));
            }
            PollerControl::Stop => ctx.stop(),
        }
    }
}
