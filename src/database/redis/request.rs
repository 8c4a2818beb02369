use mobc_redis::redis::AsyncCommands;

use super::common::*;
use super::index;
use super::path;
use crate::config::datatype::{RequestId, SerializedConsultRequest, Timestamp, UserId};
use crate::consult::{ConsultRequest, ConsultRequestStatus};

pub async fn create_consult_request(
    user_id: UserId,
    summary: String,
    disease: Option<String>,
) -> Result<ConsultRequest, ()> {
    let mut con = get_con().await?;

    let request_id: RequestId = con.incr(path::LAST_REQ_ID, 1).await.map_err(|_| ())?;

    let request = ConsultRequest {
        id: request_id,
        user_id,
        expert_id: None,
        summary,
        disease,
        status: ConsultRequestStatus::Pending,
        created_at: chrono::Utc::now().timestamp_millis() as Timestamp,
    };

    let serialized = serde_json::to_string(&request).unwrap();

    con.set::<_, _, ()>(index::get_req_info_index(request_id).as_str(), &serialized)
        .await
        .map_err(|_| ())?;
    con.zadd::<_, _, _, ()>(
        index::get_user_reqs_index(user_id).as_str(),
        request_id,
        request_id,
    )
    .await
    .map_err(|_| ())?;
    con.sadd::<_, _, ()>(path::PENDING_REQS, request_id)
        .await
        .map_err(|_| ())?;

    return Ok(request);
}

pub async fn get_consult_request(request_id: RequestId) -> Result<Option<ConsultRequest>, ()> {
    let mut con = get_con().await?;

    let serialized_opt: Option<SerializedConsultRequest> = con
        .get(index::get_req_info_index(request_id).as_str())
        .await
        .map_err(|_| ())?;

    return Ok(serialized_opt.map(|serialized| {
        serde_json::from_str::<ConsultRequest>(&serialized).expect("ConsultRequest 反序列化失败")
    }));
}

async fn update_consult_request(request: &ConsultRequest) -> Result<(), ()> {
    let mut con = get_con().await?;

    let serialized = serde_json::to_string(request).unwrap();
    con.set::<_, _, ()>(index::get_req_info_index(request.id).as_str(), &serialized)
        .await
        .map_err(|_| ())?;

    return Ok(());
}

pub async fn set_request_expert(request_id: RequestId, expert_id: UserId) -> Result<(), ()> {
    let mut request = match get_consult_request(request_id).await? {
        Some(request) => request,
        None => return Err(()),
    };

    request.expert_id = Some(expert_id);
    request.status = ConsultRequestStatus::InProgress;
    update_consult_request(&request).await?;

    let mut con = get_con().await?;
    con.zadd::<_, _, _, ()>(
        index::get_expert_reqs_index(expert_id).as_str(),
        request_id,
        request_id,
    )
    .await
    .map_err(|_| ())?;
    con.srem::<_, _, ()>(path::PENDING_REQS, request_id)
        .await
        .map_err(|_| ())?;

    return Ok(());
}

pub async fn set_request_status(
    request_id: RequestId,
    status: ConsultRequestStatus,
) -> Result<(), ()> {
    let mut request = match get_consult_request(request_id).await? {
        Some(request) => request,
        None => return Err(()),
    };

    request.status = status;
    return update_consult_request(&request).await;
}

async fn get_requests_by_ids(request_ids: Vec<RequestId>) -> Result<Vec<ConsultRequest>, ()> {
    let mut requests: Vec<ConsultRequest> = Vec::new();
    for request_id in request_ids {
        if let Some(request) = get_consult_request(request_id).await? {
            requests.push(request);
        }
    }
    return Ok(requests);
}

pub async fn list_requests_of_user(user_id: UserId) -> Result<Vec<ConsultRequest>, ()> {
    let mut con = get_con().await?;

    let request_ids: Vec<RequestId> = con
        .zrangebyscore(index::get_user_reqs_index(user_id).as_str(), 0, "+inf")
        .await
        .map_err(|_| ())?;

    return get_requests_by_ids(request_ids).await;
}

pub async fn list_requests_of_expert(expert_id: UserId) -> Result<Vec<ConsultRequest>, ()> {
    let mut con = get_con().await?;

    let request_ids: Vec<RequestId> = con
        .zrangebyscore(index::get_expert_reqs_index(expert_id).as_str(), 0, "+inf")
        .await
        .map_err(|_| ())?;

    return get_requests_by_ids(request_ids).await;
}

pub async fn list_pending_requests() -> Result<Vec<ConsultRequest>, ()> {
    let mut con = get_con().await?;

    let mut request_ids: Vec<RequestId> = con
        .smembers(path::PENDING_REQS)
        .await
        .map_err(|_| ())?;
    request_ids.sort();

    return get_requests_by_ids(request_ids).await;
}
