/*!
 * 对外HTTP接口，轮询客户端与UI都经由这里访问
*/

pub mod auth;
pub mod chat;
pub mod consult;
pub mod file;

use actix_web::{web, HttpResponse};

use crate::session::ChatError;

/** `configure` 注册全部HTTP服务
*/
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::register)
        .service(auth::login)
        .service(consult::create_consult_request)
        .service(consult::list_consult_requests)
        .service(consult::get_consult_request)
        .service(consult::assign_consult_request)
        .service(consult::resolve_consult_request)
        .service(chat::start_chat_session)
        .service(chat::get_chat_messages)
        .service(chat::send_chat_message)
        .service(chat::mark_chat_read)
        .service(chat::get_unread_count)
        .service(chat::get_chat_session)
        .service(file::upload_file_request)
        .service(file::file_uploaded_confirm)
        .service(file::get_file_url);
}

/** `chat_error_response` 将会话错误映射到HTTP应答
*/
pub fn chat_error_response(err: &ChatError) -> HttpResponse {
    match err {
        ChatError::EmptyMessage | ChatError::MessageTooLong => {
            HttpResponse::UnprocessableEntity().json(err)
        }
        ChatError::RequestNotFound => HttpResponse::NotFound().json(err),
        ChatError::NoPermission => HttpResponse::Forbidden().json(err),
        ChatError::DatabaseError => HttpResponse::ServiceUnavailable().json(err),
    }
}
