/*!
服务器状态有关的函数
*/

use log::info;
use once_cell::sync::Lazy;

use crate::config::Config;
use crate::database;
use crate::oss;

use tokio::runtime::Handle as TokioHandle;

/** `workers_handle` server_worker的tokio句柄，承接后台任务
*/
#[allow(non_upper_case_globals)]
pub static workers_handle: Lazy<TokioHandle> = Lazy::new(|| {
    let num = std::cmp::max(1, Config::get().server_worker_num);
    info!("正在启动{}个server_worker", num);
    let local_runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num)
        .enable_io()
        .enable_time()
        .build()
        .unwrap();

    let runtime_box = Box::leak(Box::new(local_runtime));

    runtime_box.handle().clone()
});

pub struct ServerState;

impl ServerState {
    pub async fn start() {
        Lazy::force(&workers_handle);
        if Config::get().s3_oss.enable {
            Lazy::force(&oss::BUCKET);
        }
        database::connect_database().await.ok();
    }
}
