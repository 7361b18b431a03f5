use cfn_manage::core::memory::RecordedRequest;
use cfn_manage::core::{
    CfnError, IndexMap, InMemoryProvisioner, StackDescriptor, StackStatus, Tag, WaiterConfig,
};

const TEMPLATE_URL: &str = "https://test_cloudformation.s3-us-west-2.amazonaws.com/template.json";

fn fast_waiter() -> WaiterConfig {
    WaiterConfig {
        delay_secs: 0,
        max_attempts: 5,
    }
}

#[tokio::test]
async fn test_create_stack() {
    let provisioner = InMemoryProvisioner::new().with_template(TEMPLATE_URL);
    let mut stack = StackDescriptor::new("testStack", TEMPLATE_URL, false, IndexMap::new()).unwrap();

    stack.create_stack(&provisioner).await.unwrap();

    let response = stack.last_create_result().unwrap();
    assert!(response.stack_id.as_deref().unwrap().contains("stack/testStack/"));
    let remote = provisioner.stack("testStack").await.unwrap();
    assert_eq!(remote.status, StackStatus::CreateComplete);
}

#[tokio::test]
async fn test_create_then_delete_stack() {
    let provisioner = InMemoryProvisioner::new().with_template(TEMPLATE_URL);
    let mut stack = StackDescriptor::new("testStack", TEMPLATE_URL, false, IndexMap::new()).unwrap();

    stack.create_stack(&provisioner).await.unwrap();
    stack.delete_stack(&provisioner, &fast_waiter()).await.unwrap();

    assert!(stack.last_delete_result().is_some());
    assert!(provisioner.stack("testStack").await.is_none());

    let describes = provisioner
        .requests()
        .await
        .into_iter()
        .filter(|r| matches!(r, RecordedRequest::Describe(_)))
        .count();
    assert_eq!(describes, 2);
}

#[tokio::test]
async fn test_tags_sent_on_create_only() {
    let provisioner = InMemoryProvisioner::new()
        .with_template(TEMPLATE_URL)
        .with_template("https://example.com/v2.json");

    let mut stack = StackDescriptor::builder("tagged", TEMPLATE_URL)
        .parameter("owner", "o")
        .parameter("environment", "dev")
        .build()
        .unwrap();
    stack.create_stack(&provisioner).await.unwrap();

    let mut next = StackDescriptor::builder("tagged", "https://example.com/v2.json")
        .parameter("owner", "o")
        .parameter("environment", "dev")
        .build()
        .unwrap();
    next.update_stack(&provisioner).await.unwrap();
    assert!(next.last_update_result().is_some());

    let requests = provisioner.requests().await;
    match &requests[0] {
        RecordedRequest::Create(req) => {
            assert_eq!(req.tags, vec![Tag::new("owner", "o"), Tag::new("environment", "dev")]);
        }
        other => panic!("unexpected request {:?}", other),
    }
    assert!(matches!(&requests[1], RecordedRequest::Update(req) if req.template_url.ends_with("v2.json")));

    let remote = provisioner.stack("tagged").await.unwrap();
    assert_eq!(remote.status, StackStatus::UpdateComplete);
    assert_eq!(remote.tags.len(), 2);
}

#[tokio::test]
async fn test_provider_rejections_propagate() {
    let provisioner = InMemoryProvisioner::new().with_template(TEMPLATE_URL);

    let mut missing = StackDescriptor::new("ghost", TEMPLATE_URL, false, IndexMap::new()).unwrap();
    let err = missing.update_stack(&provisioner).await.unwrap_err();
    assert!(matches!(err, CfnError::Provisioning(ref msg) if msg.contains("does not exist")));
    assert!(missing.last_update_result().is_none());

    let mut bad_template =
        StackDescriptor::new("bad", "https://example.com/missing.json", false, IndexMap::new())
            .unwrap();
    let err = bad_template.create_stack(&provisioner).await.unwrap_err();
    assert!(matches!(err, CfnError::Provisioning(_)));
    assert!(bad_template.last_create_result().is_none());

    let mut first = StackDescriptor::new("dup", TEMPLATE_URL, false, IndexMap::new()).unwrap();
    let mut second = first.clone();
    first.create_stack(&provisioner).await.unwrap();
    let err = second.create_stack(&provisioner).await.unwrap_err();
    assert!(matches!(err, CfnError::Provisioning(ref msg) if msg.contains("already exists")));
}

#[tokio::test]
async fn test_noop_update_is_an_error() {
    let provisioner = InMemoryProvisioner::new().with_template(TEMPLATE_URL);
    let mut stack = StackDescriptor::new("same", TEMPLATE_URL, true, IndexMap::new()).unwrap();

    stack.create_stack(&provisioner).await.unwrap();
    let err = stack.update_stack(&provisioner).await.unwrap_err();
    assert!(err.to_string().contains("No updates are to be performed"));
}

#[tokio::test]
async fn test_failed_delete_surfaces_as_wait_error() {
    let provisioner = InMemoryProvisioner::new().with_template(TEMPLATE_URL);
    let mut stack = StackDescriptor::new("stuck", TEMPLATE_URL, false, IndexMap::new()).unwrap();

    stack.create_stack(&provisioner).await.unwrap();
    provisioner.fail_next_delete("stuck").await;

    let err = stack.delete_stack(&provisioner, &fast_waiter()).await.unwrap_err();
    assert!(matches!(err, CfnError::WaitTimeout(_)));
    assert!(stack.last_delete_result().is_some());
    assert_eq!(
        provisioner.stack("stuck").await.unwrap().status,
        StackStatus::DeleteFailed
    );
}

#[tokio::test]
async fn test_delete_of_unknown_stack_succeeds() {
    let provisioner = InMemoryProvisioner::new();
    let mut stack = StackDescriptor::new("never", TEMPLATE_URL, false, IndexMap::new()).unwrap();

    stack.delete_stack(&provisioner, &fast_waiter()).await.unwrap();
    assert!(stack.last_delete_result().is_some());
}
