/*!
注册与登录，以及各接口共用的令牌解析
*/

use actix_web::{http::header, post, web, HttpRequest, HttpResponse, Responder};

use crate::{
    database,
    user::{AuthState, Caller, UserLoginData, UserRegisterData},
};

/** `authenticate` 从Authorization头解析调用方身份
*/
pub async fn authenticate(request: &HttpRequest) -> Result<Caller, AuthState> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = match header_value.and_then(|value| value.strip_prefix("Bearer ")) {
        Some(token) => token,
        None => return Err(AuthState::NeedToken),
    };

    return database::authenticate_token(token).await;
}

/** `unauthorized` 令牌解析失败时的应答
*/
pub fn unauthorized(state: AuthState) -> HttpResponse {
    return HttpResponse::Unauthorized().json(state);
}

/** `register` 注册账号时调用的函数
*/
#[post("/auth/register")]
pub async fn register(json: web::Json<UserRegisterData>) -> impl Responder {
    // TODO : 请求速率限制
    let data = json.into_inner();
    if let Err(res) = data.check_data() {
        return HttpResponse::Ok().json(res);
    }

    return HttpResponse::Ok().json(database::user_register(data).await);
}

/** `login` 登录并签发令牌时调用的函数
*/
#[post("/auth/login")]
pub async fn login(json: web::Json<UserLoginData>) -> impl Responder {
    return HttpResponse::Ok().json(database::user_login(json.into_inner()).await);
}
