/*!
咨询请求接口：创建、受理、办结与列表
*/

use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::{
    chat::ChatRole,
    config::{datatype::RequestId, Config},
    consult::ConsultRequestStatus,
    database,
    session::{AckResponse, ChatError, ConsultRequestEntry},
    user::Caller,
};

use super::{
    auth::{authenticate, unauthorized},
    chat_error_response,
};

/** `CreateConsultData` 创建咨询请求时所用的数据类型
*/
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateConsultData {
    pub summary: String,
    pub disease: Option<String>,
}

/** `ConsultActionError` 受理与办结的错误状态
*/
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "state")]
pub enum ConsultActionError {
    SummaryFormatError,
    AlreadyAssigned,
}

/** `create_consult_request` 农户创建咨询请求时调用的函数
*/
#[post("/consult")]
pub async fn create_consult_request(
    json: web::Json<CreateConsultData>,
    request: HttpRequest,
) -> impl Responder {
    let caller = match authenticate(&request).await {
        Ok(caller) => caller,
        Err(state) => return unauthorized(state),
    };
    if caller.role != ChatRole::User {
        return chat_error_response(&ChatError::NoPermission);
    }

    let data = json.into_inner();
    if data.summary.trim().is_empty()
        || data.summary.len() > Config::get().safety.max_summary_length as usize
    {
        return HttpResponse::UnprocessableEntity().json(ConsultActionError::SummaryFormatError);
    }

    match database::create_consult_request(caller.user_id, data.summary, data.disease).await {
        Ok(consult_request) => HttpResponse::Ok().json(consult_request),
        Err(_) => chat_error_response(&ChatError::DatabaseError),
    }
}

/** `get_consult_request` 查看单个请求时调用的函数
 *
 * 请求双方可见；等待受理的请求对所有专家可见，供其决定是否受理。
*/
#[get("/consult/{request_id}")]
pub async fn get_consult_request(
    path: web::Path<RequestId>,
    request: HttpRequest,
) -> impl Responder {
    let caller = match authenticate(&request).await {
        Ok(caller) => caller,
        Err(state) => return unauthorized(state),
    };

    let consult_request = match database::get_consult_request(path.into_inner()).await {
        Ok(Some(consult_request)) => consult_request,
        Ok(None) => return chat_error_response(&ChatError::RequestNotFound),
        Err(_) => return chat_error_response(&ChatError::DatabaseError),
    };

    let visible = consult_request.user_id == caller.user_id
        || consult_request.expert_id == Some(caller.user_id)
        || (caller.role == ChatRole::Expert
            && consult_request.status == ConsultRequestStatus::Pending);
    if !visible {
        return chat_error_response(&ChatError::NoPermission);
    }

    return HttpResponse::Ok().json(consult_request);
}

/** `assign_consult_request` 专家受理请求时调用的函数
*/
#[post("/consult/{request_id}/assign")]
pub async fn assign_consult_request(
    path: web::Path<RequestId>,
    request: HttpRequest,
) -> impl Responder {
    let caller = match authenticate(&request).await {
        Ok(caller) => caller,
        Err(state) => return unauthorized(state),
    };
    if caller.role != ChatRole::Expert {
        return chat_error_response(&ChatError::NoPermission);
    }

    let request_id = path.into_inner();
    let consult_request = match database::get_consult_request(request_id).await {
        Ok(Some(consult_request)) => consult_request,
        Ok(None) => return chat_error_response(&ChatError::RequestNotFound),
        Err(_) => return chat_error_response(&ChatError::DatabaseError),
    };

    if consult_request.status != ConsultRequestStatus::Pending {
        return HttpResponse::Conflict().json(ConsultActionError::AlreadyAssigned);
    }

    match database::set_request_expert(request_id, caller.user_id).await {
        Ok(()) => HttpResponse::Ok().json(AckResponse::Success),
        Err(_) => chat_error_response(&ChatError::DatabaseError),
    }
}

/** `resolve_consult_request` 受理专家办结请求时调用的函数
*/
#[post("/consult/{request_id}/resolve")]
pub async fn resolve_consult_request(
    path: web::Path<RequestId>,
    request: HttpRequest,
) -> impl Responder {
    let caller = match authenticate(&request).await {
        Ok(caller) => caller,
        Err(state) => return unauthorized(state),
    };

    let request_id = path.into_inner();
    let consult_request = match database::get_consult_request(request_id).await {
        Ok(Some(consult_request)) => consult_request,
        Ok(None) => return chat_error_response(&ChatError::RequestNotFound),
        Err(_) => return chat_error_response(&ChatError::DatabaseError),
    };

    if caller.role != ChatRole::Expert || consult_request.expert_id != Some(caller.user_id) {
        return chat_error_response(&ChatError::NoPermission);
    }

    match database::set_request_status(request_id, ConsultRequestStatus::Resolved).await {
        Ok(()) => HttpResponse::Ok().json(AckResponse::Success),
        Err(_) => chat_error_response(&ChatError::DatabaseError),
    }
}

/// 为列表条目补上调用方视角的未读数
/// 尚无会话参与资格的条目（等待受理）未读数记0
async fn attach_unread(
    caller: Caller,
    requests: Vec<crate::consult::ConsultRequest>,
) -> Vec<ConsultRequestEntry> {
    let mut entries = Vec::with_capacity(requests.len());
    for consult_request in requests {
        let is_party = consult_request.user_id == caller.user_id
            || consult_request.expert_id == Some(caller.user_id);
        let unread_count = if is_party {
            database::count_unread_messages(consult_request.id, caller.role)
                .await
                .unwrap_or(0)
        } else {
            0
        };
        entries.push(ConsultRequestEntry {
            request: consult_request,
            unread_count,
        });
    }
    return entries;
}

/** `list_consult_requests` 请求列表时调用的函数
 *
 * 农户看到自己发起的请求，专家看到自己受理的与所有等待受理的。
*/
#[get("/consult")]
pub async fn list_consult_requests(request: HttpRequest) -> impl Responder {
    let caller = match authenticate(&request).await {
        Ok(caller) => caller,
        Err(state) => return unauthorized(state),
    };

    let requests = match caller.role {
        ChatRole::User => database::list_requests_of_user(caller.user_id).await,
        ChatRole::Expert => {
            let mut assigned = match database::list_requests_of_expert(caller.user_id).await {
                Ok(assigned) => assigned,
                Err(()) => return chat_error_response(&ChatError::DatabaseError),
            };
            match database::list_pending_requests().await {
                Ok(mut pending) => {
                    assigned.append(&mut pending);
                    Ok(assigned)
                }
                Err(()) => Err(()),
            }
        }
    };

    match requests {
        Ok(requests) => HttpResponse::Ok().json(attach_unread(caller, requests).await),
        Err(()) => chat_error_response(&ChatError::DatabaseError),
    }
}
