use crate::config::datatype::*;
use crate::oss::{ObjectUploadRequest, PresignUrl};

use super::common::use_memory;
use super::memory;
use super::redis;

/// 写入附件上传申请并分配ID
pub async fn write_upload_request(req: ObjectUploadRequest) -> Result<UploadId, ()> {
    if use_memory() {
        return memory::write_upload_request(req).await;
    }
    return redis::write_upload_request(req).await;
}

/// 通过UploadId获取上传申请
pub async fn get_upload_request(upload_id: UploadId) -> Result<Option<ObjectUploadRequest>, ()> {
    if use_memory() {
        return memory::get_upload_request(upload_id).await;
    }
    return redis::get_upload_request(upload_id).await;
}

/// 写入附件的公共url
pub async fn write_file_public_url(hash: &String, pub_url: &PresignUrl) -> Result<(), ()> {
    if use_memory() {
        return memory::write_file_public_url(hash, pub_url).await;
    }
    return redis::write_file_public_url(hash, pub_url).await;
}

/// 获取附件的公共url
pub async fn get_file_public_url(hash: &String) -> Result<Option<PresignUrl>, ()> {
    if use_memory() {
        return memory::get_file_public_url(hash).await;
    }
    return redis::get_file_public_url(hash).await;
}
