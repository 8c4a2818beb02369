/*!
附件接口：申请上传、确认上传与获取访问url
*/

use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::{
    config::{
        datatype::{UploadId, UserId},
        Config,
    },
    database,
    oss::{self, ObjectUploadRequest},
};

use super::auth::{authenticate, unauthorized};

/** `UploadFileRequestData` 申请上传附件时所用的数据类型
*/
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileRequestData {
    pub suffix: String,
    pub user_hash: String,
    pub file_name: String,
    pub file_mime: String,
    pub size: u64,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum UploadFileRequestResponseState {
    Approve,
    Existed,
    FileTooLarge,
    OssDisabled,
    OSSError,
    DatabaseError,
}

/** `UploadFileRequestResponse` 申请上传附件的应答
*/
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileRequestResponse {
    pub user_hash: String,
    pub state: UploadFileRequestResponseState,
    pub url: Option<String>,
    pub upload_id: Option<UploadId>,
}

impl UploadFileRequestResponse {
    fn err(user_hash: String, state: UploadFileRequestResponseState) -> Self {
        return UploadFileRequestResponse {
            user_hash,
            state,
            url: None,
            upload_id: None,
        };
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum FileUploadedState {
    Success,
    FileHashError,
    FileSizeError,
    NotUploader,
    RequestNotFound,
    ObjectNotFound,
    OssDisabled,
    OSSError,
    DatabaseError,
}

/** `FileUploadedResponse` 确认上传完成的应答
*/
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadedResponse {
    pub upload_id: UploadId,
    pub state: FileUploadedState,
    pub url: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum GetFileUrlState {
    Success,
    FileNotExisted,
    OssDisabled,
    OSSError,
}

/** `GetFileUrlResponse` 获取附件url的应答
*/
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GetFileUrlResponse {
    pub hash: String,
    pub state: GetFileUrlState,
    pub url: Option<String>,
}

async fn upload_file_req(user_id: UserId, req: UploadFileRequestData) -> UploadFileRequestResponse {
    if req.size > Config::get().safety.max_file_size {
        return UploadFileRequestResponse::err(
            req.user_hash,
            UploadFileRequestResponseState::FileTooLarge,
        );
    }

    // 同一份文件已经上传过时直接复用已有url
    if let Ok(url_opt) = oss::get_public_url_and_auto_renew(&req.user_hash).await {
        if let Some(url) = url_opt {
            return UploadFileRequestResponse {
                user_hash: req.user_hash,
                state: UploadFileRequestResponseState::Existed,
                url: Some(url),
                upload_id: None,
            };
        }
    } else {
        return UploadFileRequestResponse::err(
            req.user_hash,
            UploadFileRequestResponseState::OSSError,
        );
    }

    let presign = match oss::get_presign_put_file_url(req.suffix) {
        Ok(presign) => presign,
        Err(_) => {
            return UploadFileRequestResponse::err(
                req.user_hash,
                UploadFileRequestResponseState::OSSError,
            )
        }
    };

    let upload_req = ObjectUploadRequest {
        user_id,
        user_hash: req.user_hash.clone(),
        file_name: req.file_name,
        file_mime: req.file_mime,
        file_size: req.size,
        path: presign.path.clone(),
    };

    let upload_id = match database::write_upload_request(upload_req).await {
        Ok(id) => id,
        Err(_) => {
            return UploadFileRequestResponse::err(
                req.user_hash,
                UploadFileRequestResponseState::DatabaseError,
            )
        }
    };

    return UploadFileRequestResponse {
        user_hash: req.user_hash,
        state: UploadFileRequestResponseState::Approve,
        url: Some(presign.url),
        upload_id: Some(upload_id),
    };
}

async fn file_uploaded(user_id: UserId, upload_id: UploadId) -> FileUploadedResponse {
    let req = match database::get_upload_request(upload_id).await {
        Ok(Some(req)) => req,
        Ok(None) => {
            return FileUploadedResponse {
                upload_id,
                state: FileUploadedState::RequestNotFound,
                url: None,
            }
        }
        Err(_) => {
            return FileUploadedResponse {
                upload_id,
                state: FileUploadedState::DatabaseError,
                url: None,
            }
        }
    };

    if req.user_id != user_id {
        return FileUploadedResponse {
            upload_id,
            state: FileUploadedState::NotUploader,
            url: None,
        };
    }

    let object_stat = match oss::get_object_stat(&req.path).await {
        Ok(stat) => stat,
        Err(_) => {
            return FileUploadedResponse {
                upload_id,
                state: FileUploadedState::ObjectNotFound,
                url: None,
            }
        }
    };

    let hash = object_stat.e_tag.unwrap();
    if &hash[1..hash.len() - 1] != &req.user_hash {
        return FileUploadedResponse {
            upload_id,
            state: FileUploadedState::FileHashError,
            url: None,
        };
    }

    if object_stat.content_length.unwrap() != req.file_size as i64 {
        return FileUploadedResponse {
            upload_id,
            state: FileUploadedState::FileSizeError,
            url: None,
        };
    }

    let url = match oss::create_pub_url(
        &req.user_hash,
        req.path,
        Config::get().s3_oss.presign_get_expire,
    )
    .await
    {
        Ok(presign_url) => presign_url.url,
        Err(_) => {
            return FileUploadedResponse {
                upload_id,
                state: FileUploadedState::OSSError,
                url: None,
            }
        }
    };

    return FileUploadedResponse {
        upload_id,
        state: FileUploadedState::Success,
        url: Some(url),
    };
}

/** `upload_file_request` 申请附件上传位时调用的函数
*/
#[post("/file/upload")]
pub async fn upload_file_request(
    json: web::Json<UploadFileRequestData>,
    request: HttpRequest,
) -> impl Responder {
    let caller = match authenticate(&request).await {
        Ok(caller) => caller,
        Err(state) => return unauthorized(state),
    };

    let req = json.into_inner();
    if !Config::get().s3_oss.enable {
        return HttpResponse::Ok().json(UploadFileRequestResponse::err(
            req.user_hash,
            UploadFileRequestResponseState::OssDisabled,
        ));
    }

    return HttpResponse::Ok().json(upload_file_req(caller.user_id, req).await);
}

/** `file_uploaded_confirm` 客户端确认上传完成时调用的函数
*/
#[post("/file/uploaded/{upload_id}")]
pub async fn file_uploaded_confirm(
    path: web::Path<UploadId>,
    request: HttpRequest,
) -> impl Responder {
    let caller = match authenticate(&request).await {
        Ok(caller) => caller,
        Err(state) => return unauthorized(state),
    };

    let upload_id = path.into_inner();
    if !Config::get().s3_oss.enable {
        return HttpResponse::Ok().json(FileUploadedResponse {
            upload_id,
            state: FileUploadedState::OssDisabled,
            url: None,
        });
    }

    return HttpResponse::Ok().json(file_uploaded(caller.user_id, upload_id).await);
}

/** `get_file_url` 获取附件公共url时调用的函数
*/
#[get("/file/url/{hash}")]
pub async fn get_file_url(path: web::Path<String>, request: HttpRequest) -> impl Responder {
    if let Err(state) = authenticate(&request).await {
        return unauthorized(state);
    }

    let hash = path.into_inner();
    if !Config::get().s3_oss.enable {
        return HttpResponse::Ok().json(GetFileUrlResponse {
            hash,
            state: GetFileUrlState::OssDisabled,
            url: None,
        });
    }

    match oss::get_public_url_and_auto_renew(&hash).await {
        Ok(url_opt) => HttpResponse::Ok().json(GetFileUrlResponse {
            state: if url_opt.is_some() {
                GetFileUrlState::Success
            } else {
                GetFileUrlState::FileNotExisted
            },
            hash,
            url: url_opt,
        }),
        Err(_) => HttpResponse::Ok().json(GetFileUrlResponse {
            hash,
            state: GetFileUrlState::OSSError,
            url: None,
        }),
    }
}
