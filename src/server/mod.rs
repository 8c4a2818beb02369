/*!
 * 服务器状态与启动流程
*/

pub mod server_state;
