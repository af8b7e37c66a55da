//! In-memory integration tests for paged listing and strategy selection.

use super::helpers::{create_in_status, due, service, titles};
use rstest::rstest;
use tasklane::{
    app::TaskService,
    task::{
        domain::TaskStatus,
        services::{CreateTaskRequest, ListTasksRequest},
    },
};

async fn seed(service: &TaskService) -> eyre::Result<()> {
    create_in_status(
        service,
        CreateTaskRequest::new("finished").with_due_at(due("2025-01-10T09:00:00Z")?),
        TaskStatus::Done,
    )
    .await?;
    create_in_status(service, CreateTaskRequest::new("undated"), TaskStatus::Open).await?;
    create_in_status(
        service,
        CreateTaskRequest::new("underway").with_due_at(due("2025-01-05T09:00:00+01:00")?),
        TaskStatus::InProgress,
    )
    .await?;
    create_in_status(
        service,
        CreateTaskRequest::new("fresh").with_due_at(due("2025-01-20T09:00:00-03:00")?),
        TaskStatus::Open,
    )
    .await?;
    Ok(())
}

#[rstest]
#[case(None, &["underway", "finished", "fresh", "undated"])]
#[case(Some("dueDate"), &["underway", "finished", "fresh", "undated"])]
#[case(Some("status"), &["undated", "fresh", "underway", "finished"])]
#[case(Some("priority"), &["underway", "finished", "fresh", "undated"])]
#[case(Some(""), &["underway", "finished", "fresh", "undated"])]
#[tokio::test(flavor = "multi_thread")]
async fn listing_orders_by_requested_strategy(
    service: TaskService,
    #[case] sort: Option<&str>,
    #[case] expected: &[&str],
) -> eyre::Result<()> {
    seed(&service).await?;
    let request = match sort {
        Some(name) => ListTasksRequest::new(1, 20).with_sort(name),
        None => ListTasksRequest::new(1, 20),
    };

    let listed = service.list(request).await?;

    eyre::ensure!(
        titles(&listed) == expected,
        "unexpected order {:?}",
        titles(&listed)
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pages_partition_the_fetch_order(service: TaskService) -> eyre::Result<()> {
    seed(&service).await?;

    let first = service
        .list(ListTasksRequest::new(1, 3).with_sort("status"))
        .await?;
    let second = service
        .list(ListTasksRequest::new(2, 3).with_sort("status"))
        .await?;
    let beyond = service.list(ListTasksRequest::new(3, 3)).await?;

    eyre::ensure!(titles(&first) == ["undated", "underway", "finished"]);
    eyre::ensure!(titles(&second) == ["fresh"]);
    eyre::ensure!(beyond.is_empty());
    Ok(())
}
