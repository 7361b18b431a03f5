use cfn_manage::core::{InMemoryProvisioner, StackDescriptor, WaiterConfig};
use cfn_manage_cli::{execute_create, execute_delete, execute_show, execute_update};

const TEMPLATE_URL: &str = "https://bucket.s3.amazonaws.com/app.json";

fn stack(name: &str) -> StackDescriptor {
    StackDescriptor::builder(name, TEMPLATE_URL)
        .iam(true)
        .parameter("product", "p")
        .parameter("size", "small")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_create_and_delete_commands() {
    let provisioner = InMemoryProvisioner::new().with_template(TEMPLATE_URL);
    let mut stack = stack("app");
    let waiter = WaiterConfig {
        delay_secs: 0,
        max_attempts: 3,
    };

    execute_create(&mut stack, &provisioner).await.unwrap();
    assert!(stack.last_create_result().is_some());

    execute_delete(&mut stack, &provisioner, &waiter).await.unwrap();
    assert!(provisioner.stack("app").await.is_none());
}

#[tokio::test]
async fn test_update_command_reports_provider_error() {
    let provisioner = InMemoryProvisioner::new().with_template(TEMPLATE_URL);
    let mut stack = stack("absent");

    let err = execute_update(&mut stack, &provisioner).await.unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn test_show_command() {
    execute_show(&stack("app")).unwrap();
}
