//! Integration tests for pool setup and driver error mapping

mod test_helpers;

use cadence_core::CadenceError;
use cadence_storage::StorageError;
use test_helpers::*;

#[tokio::test]
async fn test_create_pool_rejects_malformed_url() {
    let result = cadence_storage::create_pool("not-a-database-url").await;

    assert!(matches!(result, Err(StorageError::Connection(_))));
}

#[tokio::test]
async fn test_driver_failure_maps_to_database_error() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    pool.close().await;

    let result = cadence_storage::tracks::get_all(pool).await;

    assert!(matches!(result, Err(CadenceError::Database(_))));
}
