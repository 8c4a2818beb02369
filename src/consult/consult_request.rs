use serde::{Deserialize, Serialize};

use crate::config::datatype::{RequestId, Timestamp, UserId};

/** `ConsultRequestStatus` 咨询请求状态
*/
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ConsultRequestStatus {
    Pending,
    InProgress,
    Resolved,
}

/** `ConsultRequest` 咨询请求数据类型
 *
 * 每个咨询请求对应一个农户与至多一位受理专家之间的会话。
*/
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConsultRequest {
    pub id: RequestId,
    pub user_id: UserId,
    /// 受理前为None
    pub expert_id: Option<UserId>,
    pub summary: String,
    /// 分类模型给出的病害名，由上游服务填入
    pub disease: Option<String>,
    pub status: ConsultRequestStatus,
    pub created_at: Timestamp,
}
