//! Runs against a live MongoDB only when `MONGODB_URI` is set and `SKIP_DB_TESTS` is not.

use std::sync::Arc;

use models::db::Datastore;
use models::ObjectId;
use service::employee::repo::MongoEmployeeStore;
use service::employee::repository::EmployeeStore;
use service::employee::EmployeeFields;
use service::errors::ServiceError;
use service::{Deadline, EmployeeService};

async fn connect() -> Option<Datastore> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let url = std::env::var("MONGODB_URI").ok()?;
    let cfg = configs::DatabaseConfig {
        url,
        name: "employee_db_test".into(),
        collection: format!("employees_{}", ObjectId::new().to_hex()),
        ..Default::default()
    };
    match Datastore::connect(&cfg).await {
        Ok(ds) => Some(ds),
        Err(e) => {
            eprintln!("skip: cannot connect to mongodb: {}", e);
            None
        }
    }
}

#[tokio::test]
async fn mongo_store_crud_roundtrip() -> anyhow::Result<()> {
    let Some(ds) = connect().await else { return Ok(()) };
    let collection = ds.employees();
    let store = Arc::new(MongoEmployeeStore::new(collection.clone()));
    let svc = EmployeeService::new(Arc::clone(&store));

    assert!(svc.list(Deadline::none()).await?.is_empty());

    let jane = EmployeeFields {
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        email: "jane.doe@example.com".into(),
        position: "Software Engineer".into(),
        department: "Engineering".into(),
    };
    let created = svc.create(Deadline::none(), jane.clone()).await?;
    assert_eq!(svc.get(Deadline::none(), &created.id).await?.fields, jane);

    // Same content again: matched but not modified still counts as success.
    let matched = store.replace_one(models::employee::parse_id(&created.id)?, &jane).await?;
    assert_eq!(matched, 1);

    let smith = EmployeeFields { last_name: "Smith".into(), ..jane.clone() };
    svc.update(Deadline::none(), &created.id, smith.clone()).await?;
    assert_eq!(svc.get(Deadline::none(), &created.id).await?.fields, smith);
    assert_eq!(svc.list(Deadline::none()).await?.len(), 1);

    svc.delete(Deadline::none(), &created.id).await?;
    assert!(matches!(svc.get(Deadline::none(), &created.id).await, Err(ServiceError::NotFound(_))));
    assert!(matches!(svc.delete(Deadline::none(), &created.id).await, Err(ServiceError::NotFound(_))));

    collection.drop().await?;
    ds.close().await;
    Ok(())
}
