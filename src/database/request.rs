use crate::config::datatype::*;
use crate::consult::{ConsultRequest, ConsultRequestStatus};

use super::common::use_memory;
use super::memory;
use super::redis;

/// 写入一个咨询请求并分配ID，同时建立空的会话消息列表
pub async fn create_consult_request(
    user_id: UserId,
    summary: String,
    disease: Option<String>,
) -> Result<ConsultRequest, ()> {
    if use_memory() {
        return memory::create_consult_request(user_id, summary, disease).await;
    }
    return redis::create_consult_request(user_id, summary, disease).await;
}

/// 通过ID获得咨询请求
pub async fn get_consult_request(request_id: RequestId) -> Result<Option<ConsultRequest>, ()> {
    if use_memory() {
        return memory::get_consult_request(request_id).await;
    }
    return redis::get_consult_request(request_id).await;
}

/// 为请求设置受理专家并更新状态
pub async fn set_request_expert(request_id: RequestId, expert_id: UserId) -> Result<(), ()> {
    if use_memory() {
        return memory::set_request_expert(request_id, expert_id).await;
    }
    return redis::set_request_expert(request_id, expert_id).await;
}

/// 更新请求状态
pub async fn set_request_status(
    request_id: RequestId,
    status: ConsultRequestStatus,
) -> Result<(), ()> {
    if use_memory() {
        return memory::set_request_status(request_id, status).await;
    }
    return redis::set_request_status(request_id, status).await;
}

/// 获得某农户发起的全部请求
pub async fn list_requests_of_user(user_id: UserId) -> Result<Vec<ConsultRequest>, ()> {
    if use_memory() {
        return memory::list_requests_of_user(user_id).await;
    }
    return redis::list_requests_of_user(user_id).await;
}

/// 获得某专家受理的全部请求
pub async fn list_requests_of_expert(expert_id: UserId) -> Result<Vec<ConsultRequest>, ()> {
    if use_memory() {
        return memory::list_requests_of_expert(expert_id).await;
    }
    return redis::list_requests_of_expert(expert_id).await;
}

/// 获得所有等待受理的请求
pub async fn list_pending_requests() -> Result<Vec<ConsultRequest>, ()> {
    if use_memory() {
        return memory::list_pending_requests().await;
    }
    return redis::list_pending_requests().await;
}
