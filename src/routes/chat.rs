/*!
会话接口：打开会话、收发消息、标记已读与未读数查询
*/

use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};

use crate::{
    config::datatype::RequestId,
    session::{service, AckResponse, ChatGetMessagesData, ChatSendMessageData, UnreadCountResponse},
};

use super::{
    auth::{authenticate, unauthorized},
    chat_error_response,
};

/** `start_chat_session` 打开或恢复会话时调用的函数
*/
#[post("/chat/{request_id}/start")]
pub async fn start_chat_session(
    path: web::Path<RequestId>,
    request: HttpRequest,
) -> impl Responder {
    let caller = match authenticate(&request).await {
        Ok(caller) => caller,
        Err(state) => return unauthorized(state),
    };

    match service::open_session(caller, path.into_inner()).await {
        Ok(session) => HttpResponse::Ok().json(session),
        Err(err) => chat_error_response(&err),
    }
}

/** `get_chat_session` 获取会话视图时调用的函数
*/
#[get("/chat/{request_id}")]
pub async fn get_chat_session(path: web::Path<RequestId>, request: HttpRequest) -> impl Responder {
    let caller = match authenticate(&request).await {
        Ok(caller) => caller,
        Err(state) => return unauthorized(state),
    };

    match service::open_session(caller, path.into_inner()).await {
        Ok(session) => HttpResponse::Ok().json(session),
        Err(err) => chat_error_response(&err),
    }
}

/** `get_chat_messages` 拉取会话消息时调用的函数
*/
#[get("/chat/{request_id}/messages")]
pub async fn get_chat_messages(
    path: web::Path<RequestId>,
    query: web::Query<ChatGetMessagesData>,
    request: HttpRequest,
) -> impl Responder {
    let caller = match authenticate(&request).await {
        Ok(caller) => caller,
        Err(state) => return unauthorized(state),
    };

    match service::get_messages(caller, path.into_inner(), query.after).await {
        Ok(messages) => HttpResponse::Ok().json(messages),
        Err(err) => chat_error_response(&err),
    }
}

/** `send_chat_message` 发送消息时调用的函数
 *
 * 发送失败原样向UI上报，由用户手动重试，消息不会被静默丢弃。
*/
#[post("/chat/{request_id}/message")]
pub async fn send_chat_message(
    path: web::Path<RequestId>,
    json: web::Json<ChatSendMessageData>,
    request: HttpRequest,
) -> impl Responder {
    let caller = match authenticate(&request).await {
        Ok(caller) => caller,
        Err(state) => return unauthorized(state),
    };

    match service::send_message(caller, path.into_inner(), json.into_inner().content).await {
        Ok(message) => HttpResponse::Ok().json(message),
        Err(err) => chat_error_response(&err),
    }
}

/** `mark_chat_read` 将调用方游标推进到最新消息时调用的函数
*/
#[post("/chat/{request_id}/read")]
pub async fn mark_chat_read(path: web::Path<RequestId>, request: HttpRequest) -> impl Responder {
    let caller = match authenticate(&request).await {
        Ok(caller) => caller,
        Err(state) => return unauthorized(state),
    };

    match service::set_already_read(caller, path.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(AckResponse::Success),
        Err(err) => chat_error_response(&err),
    }
}

/** `get_unread_count` 查询调用方未读数时调用的函数
*/
#[get("/chat/{request_id}/unread")]
pub async fn get_unread_count(path: web::Path<RequestId>, request: HttpRequest) -> impl Responder {
    let caller = match authenticate(&request).await {
        Ok(caller) => caller,
        Err(state) => return unauthorized(state),
    };

    let request_id = path.into_inner();
    match service::get_unread_count(caller, request_id).await {
        Ok(unread) => HttpResponse::Ok().json(UnreadCountResponse { request_id, unread }),
        Err(err) => chat_error_response(&err),
    }
}
