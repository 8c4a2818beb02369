use crate::{
    consult::ConsultRequestStatus,
    database,
};

pub async fn test_for_create_consult_request() -> Result<(), ()> {
    let request = database::create_consult_request(
        1,
        "叶片出现灰斑".to_string(),
        Some("gray_leaf_spot".to_string()),
    )
    .await?;
    assert_eq!(request.id, 1);
    assert_eq!(request.user_id, 1);
    assert_eq!(request.expert_id, None);
    assert_eq!(request.status, ConsultRequestStatus::Pending);
    return Ok(());
}

pub async fn test_for_get_consult_request() -> Result<(), ()> {
    match database::get_consult_request(1).await? {
        Some(request) => assert_eq!(request.summary, "叶片出现灰斑"),
        None => panic!("get_consult_request"),
    }
    assert!(database::get_consult_request(999).await?.is_none());
    return Ok(());
}

pub async fn test_for_set_request_expert() -> Result<(), ()> {
    database::set_request_expert(1, 2).await?;
    let request = database::get_consult_request(1).await?.unwrap();
    assert_eq!(request.expert_id, Some(2));
    assert_eq!(request.status, ConsultRequestStatus::InProgress);
    assert!(database::set_request_expert(999, 2).await.is_err());
    return Ok(());
}

pub async fn test_for_set_request_status() -> Result<(), ()> {
    database::set_request_status(1, ConsultRequestStatus::Resolved).await?;
    let request = database::get_consult_request(1).await?.unwrap();
    assert_eq!(request.status, ConsultRequestStatus::Resolved);
    return Ok(());
}

pub async fn test_for_list_requests() -> Result<(), ()> {
    let second = database::create_consult_request(1, "玉米锈病求助".to_string(), None).await?;
    assert_eq!(second.id, 2);

    let of_user = database::list_requests_of_user(1).await?;
    assert_eq!(
        of_user.iter().map(|request| request.id).collect::<Vec<_>>(),
        vec![1, 2]
    );

    let of_expert = database::list_requests_of_expert(2).await?;
    assert_eq!(
        of_expert.iter().map(|request| request.id).collect::<Vec<_>>(),
        vec![1]
    );

    let pending = database::list_pending_requests().await?;
    assert_eq!(
        pending.iter().map(|request| request.id).collect::<Vec<_>>(),
        vec![2]
    );

    assert!(database::list_requests_of_user(42).await?.is_empty());
    return Ok(());
}
