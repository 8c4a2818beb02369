use actix_web::{http::StatusCode, test, App};
use serde_json::{json, Value};
use serial_test::serial;

use CornCare::database;
use CornCare::routes;

fn password() -> String {
    return "0123456789abcdef".repeat(4);
}

macro_rules! register_and_login {
    ($app:expr, $user_name:expr, $email:expr, $role:expr) => {{
        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({
                "userName": $user_name,
                "password": password(),
                "email": $email,
                "role": $role,
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&$app, req).await;
        assert_eq!(body["state"], "Success", "register {}", $email);

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": $email, "password": password() }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&$app, req).await;
        assert_eq!(body["state"], "Success", "login {}", $email);
        body["token"].as_str().unwrap().to_string()
    }};
}

fn bearer(token: &str) -> (&'static str, String) {
    return ("Authorization", format!("Bearer {}", token));
}

#[actix_web::test]
#[serial]
async fn test_consultation_chat_flow() {
    database::memory::flush_all();
    let app = test::init_service(App::new().configure(routes::configure)).await;

    let farmer_token = register_and_login!(app, "farmer_zhang", "flow_farmer@corncare.cn", "user");
    let expert_token = register_and_login!(app, "expert_li", "flow_expert@corncare.cn", "expert");

    // 农户创建咨询请求
    let req = test::TestRequest::post()
        .uri("/consult")
        .insert_header(bearer(&farmer_token))
        .set_json(json!({ "summary": "叶片发黄，疑似灰斑病", "disease": "gray_leaf_spot" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let request_id = body["id"].as_u64().unwrap();
    assert_eq!(body["status"], "pending");

    // 专家在列表里看到等待受理的请求并受理
    let req = test::TestRequest::get()
        .uri("/consult")
        .insert_header(bearer(&expert_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["request"]["id"].as_u64().unwrap(), request_id);

    let req = test::TestRequest::post()
        .uri(&format!("/consult/{}/assign", request_id))
        .insert_header(bearer(&expert_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["state"], "Success");

    // 农户打开会话并发送第一条消息
    let req = test::TestRequest::post()
        .uri(&format!("/chat/{}/start", request_id))
        .insert_header(bearer(&farmer_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["messages"].as_array().unwrap().len(), 0);
    assert_eq!(body["cursor"].as_u64().unwrap(), 0);

    let req = test::TestRequest::post()
        .uri(&format!("/chat/{}/message", request_id))
        .insert_header(bearer(&farmer_token))
        .set_json(json!({ "content": { "type": "Text", "text": "leaves are yellowing" } }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["inChatId"].as_u64().unwrap(), 1);
    assert_eq!(body["sender"], "user");

    // 专家的未读变为1，农户自己的未读不受影响
    let req = test::TestRequest::get()
        .uri(&format!("/chat/{}/unread", request_id))
        .insert_header(bearer(&expert_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["unread"].as_u64().unwrap(), 1);

    let req = test::TestRequest::get()
        .uri(&format!("/chat/{}/unread", request_id))
        .insert_header(bearer(&farmer_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["unread"].as_u64().unwrap(), 0);

    // 专家标记已读后未读归零
    let req = test::TestRequest::post()
        .uri(&format!("/chat/{}/read", request_id))
        .insert_header(bearer(&expert_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["state"], "Success");

    let req = test::TestRequest::get()
        .uri(&format!("/chat/{}/unread", request_id))
        .insert_header(bearer(&expert_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["unread"].as_u64().unwrap(), 0);

    // 专家回复，农户未读变为1，标记已读后立即归零
    let req = test::TestRequest::post()
        .uri(&format!("/chat/{}/message", request_id))
        .insert_header(bearer(&expert_token))
        .set_json(json!({ "content": { "type": "Text", "text": "apply fungicide X" } }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["inChatId"].as_u64().unwrap(), 2);
    assert_eq!(body["sender"], "expert");

    let req = test::TestRequest::get()
        .uri(&format!("/chat/{}/unread", request_id))
        .insert_header(bearer(&farmer_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["unread"].as_u64().unwrap(), 1);

    let req = test::TestRequest::post()
        .uri(&format!("/chat/{}/read", request_id))
        .insert_header(bearer(&farmer_token))
        .to_request();
    test::call_and_read_body_json::<_, _, Value>(&app, req).await;

    let req = test::TestRequest::get()
        .uri(&format!("/chat/{}/unread", request_id))
        .insert_header(bearer(&farmer_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["unread"].as_u64().unwrap(), 0);

    // 消息列表保持发送顺序
    let req = test::TestRequest::get()
        .uri(&format!("/chat/{}/messages", request_id))
        .insert_header(bearer(&farmer_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let messages = body.as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["content"]["text"], "leaves are yellowing");
    assert_eq!(messages[1]["content"]["text"], "apply fungicide X");

    // 专家办结请求
    let req = test::TestRequest::post()
        .uri(&format!("/consult/{}/resolve", request_id))
        .insert_header(bearer(&expert_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["state"], "Success");
}

#[actix_web::test]
#[serial]
async fn test_chat_error_states() {
    database::memory::flush_all();
    let app = test::init_service(App::new().configure(routes::configure)).await;

    let farmer_token = register_and_login!(app, "farmer_wang", "err_farmer@corncare.cn", "user");
    let expert_token = register_and_login!(app, "expert_chen", "err_expert@corncare.cn", "expert");
    let outsider_token =
        register_and_login!(app, "farmer_zhao", "err_outsider@corncare.cn", "user");

    let req = test::TestRequest::post()
        .uri("/consult")
        .insert_header(bearer(&farmer_token))
        .set_json(json!({ "summary": "疑似锈病", "disease": null }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let request_id = body["id"].as_u64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/consult/{}/assign", request_id))
        .insert_header(bearer(&expert_token))
        .to_request();
    test::call_and_read_body_json::<_, _, Value>(&app, req).await;

    // 空消息被拒绝
    let req = test::TestRequest::post()
        .uri(&format!("/chat/{}/message", request_id))
        .insert_header(bearer(&farmer_token))
        .set_json(json!({ "content": { "type": "Text", "text": "" } }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // 未知请求
    let req = test::TestRequest::get()
        .uri("/chat/999/unread")
        .insert_header(bearer(&farmer_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // 局外人不是会话一方
    let req = test::TestRequest::get()
        .uri(&format!("/chat/{}/unread", request_id))
        .insert_header(bearer(&outsider_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // 缺少令牌
    let req = test::TestRequest::get()
        .uri(&format!("/chat/{}/unread", request_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // 重复受理
    let req = test::TestRequest::post()
        .uri(&format!("/consult/{}/assign", request_id))
        .insert_header(bearer(&expert_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // 农户不能受理，专家不能创建
    let req = test::TestRequest::post()
        .uri(&format!("/consult/{}/assign", request_id))
        .insert_header(bearer(&farmer_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/consult")
        .insert_header(bearer(&expert_token))
        .set_json(json!({ "summary": "专家不能发起", "disease": null }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
