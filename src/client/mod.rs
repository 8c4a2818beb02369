/*!
 * 轮询客户端，农户端与专家端各自独立实例化
*/

mod notifier;
mod poller;
mod poller_actor;
mod session_api;

pub use notifier::*;
pub use poller::*;
pub use poller_actor::*;
pub use session_api::*;
