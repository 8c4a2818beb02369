use chrono::Utc;
use std::sync::atomic::Ordering;

use crate::{
    config::datatype::{RequestId, Timestamp, UserId},
    consult::{ConsultRequest, ConsultRequestStatus},
};

use super::store::{self, ConversationLog};

pub async fn create_consult_request(
    user_id: UserId,
    summary: String,
    disease: Option<String>,
) -> Result<ConsultRequest, ()> {
    let request_id = store::last_request_id.fetch_add(1, Ordering::SeqCst) + 1;

    let request = ConsultRequest {
        id: request_id,
        user_id,
        expert_id: None,
        summary,
        disease,
        status: ConsultRequestStatus::Pending,
        created_at: Utc::now().timestamp_millis() as Timestamp,
    };

    store::consult_requests.insert(request_id, request.clone());
    store::conversations.insert(
        request_id,
        ConversationLog {
            last_id: 0,
            messages: Vec::new(),
        },
    );

    return Ok(request);
}

pub async fn get_consult_request(request_id: RequestId) -> Result<Option<ConsultRequest>, ()> {
    return Ok(store::consult_requests
        .get(&request_id)
        .map(|guard| guard.clone()));
}

pub async fn set_request_expert(request_id: RequestId, expert_id: UserId) -> Result<(), ()> {
    let mut found = false;
    store::consult_requests.alter(request_id, |opt| {
        opt.map(|mut request| {
            request.expert_id = Some(expert_id);
            request.status = ConsultRequestStatus::InProgress;
            found = true;
            request
        })
    });
    return if found { Ok(()) } else { Err(()) };
}

pub async fn set_request_status(
    request_id: RequestId,
    status: ConsultRequestStatus,
) -> Result<(), ()> {
    let mut found = false;
    store::consult_requests.alter(request_id, |opt| {
        opt.map(|mut request| {
            request.status = status;
            found = true;
            request
        })
    });
    return if found { Ok(()) } else { Err(()) };
}

fn collect_requests<F>(filter: F) -> Vec<ConsultRequest>
where
    F: Fn(&ConsultRequest) -> bool,
{
    // 请求ID从1起连续分配，按ID扫描即为创建顺序
    let last = store::last_request_id.load(Ordering::SeqCst);
    let mut requests: Vec<ConsultRequest> = Vec::new();
    for request_id in 1..=last {
        if let Some(request) = store::consult_requests.get(&request_id) {
            if filter(&request) {
                requests.push(request.clone());
            }
        }
    }
    return requests;
}

pub async fn list_requests_of_user(user_id: UserId) -> Result<Vec<ConsultRequest>, ()> {
    return Ok(collect_requests(|request| request.user_id == user_id));
}

pub async fn list_requests_of_expert(expert_id: UserId) -> Result<Vec<ConsultRequest>, ()> {
    return Ok(collect_requests(|request| {
        request.expert_id == Some(expert_id)
    }));
}

pub async fn list_pending_requests() -> Result<Vec<ConsultRequest>, ()> {
    return Ok(collect_requests(|request| {
        request.status == ConsultRequestStatus::Pending
    }));
}
