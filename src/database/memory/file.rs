use std::sync::atomic::Ordering;

use crate::{
    config::datatype::UploadId,
    oss::{ObjectUploadRequest, PresignUrl},
};

use super::store;

pub async fn write_upload_request(req: ObjectUploadRequest) -> Result<UploadId, ()> {
    let upload_id = store::last_upload_id.fetch_add(1, Ordering::SeqCst) + 1;
    store::upload_requests.insert(upload_id, req);
    return Ok(upload_id);
}

pub async fn get_upload_request(upload_id: UploadId) -> Result<Option<ObjectUploadRequest>, ()> {
    return Ok(store::upload_requests
        .get(&upload_id)
        .map(|guard| guard.clone()));
}

pub async fn write_file_public_url(hash: &String, pub_url: &PresignUrl) -> Result<(), ()> {
    store::file_urls.insert(hash.clone(), pub_url.clone());
    return Ok(());
}

pub async fn get_file_public_url(hash: &String) -> Result<Option<PresignUrl>, ()> {
    return Ok(store::file_urls.get(hash).map(|guard| guard.clone()));
}
