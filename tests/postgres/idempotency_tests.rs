//! Idempotency claim tests for the `PostgreSQL` store.

use crate::postgres::helpers::{
    BoxError, CleanupGuard, SteppingClock, ensure_template, setup_pool, test_runtime,
    unique_db_name,
};
use chrono::{DateTime, TimeZone, Utc};
use diesel::prelude::*;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use std::sync::Arc;
use tasklane::task::{
    adapters::postgres::{PostgresIdempotencyStore, TaskPgPool},
    ports::{IdempotencyKey, IdempotencyRecord, IdempotencyStore},
};
use tokio::task::JoinSet;

/// Stored claim read back for verification.
#[derive(diesel::QueryableByName, Debug)]
struct ClaimRow {
    #[diesel(sql_type = diesel::sql_types::Text)]
    fingerprint: String,
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    created_at: DateTime<Utc>,
}

fn record(key: &str, fingerprint_char: char) -> Result<IdempotencyRecord, BoxError> {
    let key = IdempotencyKey::parse(Some(key)).ok_or_else(|| eyre::eyre!("blank key"))?;
    Ok(IdempotencyRecord {
        key,
        fingerprint: fingerprint_char.to_string().repeat(64),
    })
}

fn stored_claims(pool: &TaskPgPool, key: &str) -> Result<Vec<ClaimRow>, BoxError> {
    let mut conn = pool.get().map_err(|e| Box::new(e) as BoxError)?;
    diesel::sql_query("SELECT fingerprint, created_at FROM idempotency_entry WHERE id_key = $1")
        .bind::<diesel::sql_types::Text, _>(key)
        .load::<ClaimRow>(&mut conn)
        .map_err(|e| Box::new(e) as BoxError)
}

fn claim_start() -> Result<DateTime<Utc>, BoxError> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
        .single()
        .ok_or_else(|| eyre::eyre!("invalid start instant").into())
}

#[rstest]
fn first_claim_succeeds_and_repeat_is_refused(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    ensure_template(shared_test_cluster)?;
    let db_name = unique_db_name("claim_once");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let pool = setup_pool(shared_test_cluster, &db_name, 1)?;
    let clock = Arc::new(SteppingClock::starting_at(claim_start()?));
    let claimed_at = clock.peek();
    let store = PostgresIdempotencyStore::new(pool.clone(), clock);

    let rt = test_runtime()?;
    let first = rt.block_on(store.try_claim(&record("order-42", 'a')?))?;
    let repeat = rt.block_on(store.try_claim(&record("order-42", 'b')?))?;

    assert!(first, "first claim of a fresh key must win");
    assert!(!repeat, "second claim of the same key must be refused");

    let claims = stored_claims(&pool, "order-42")?;
    assert_eq!(claims.len(), 1);
    let claim = claims.first().ok_or_else(|| eyre::eyre!("claim row missing"))?;
    assert_eq!(claim.fingerprint, "a".repeat(64));
    assert_eq!(claim.created_at, claimed_at);
    Ok(())
}

#[rstest]
fn distinct_keys_are_claimed_independently(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    ensure_template(shared_test_cluster)?;
    let db_name = unique_db_name("claim_distinct");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let pool = setup_pool(shared_test_cluster, &db_name, 1)?;
    let store = PostgresIdempotencyStore::new(
        pool,
        Arc::new(SteppingClock::starting_at(claim_start()?)),
    );

    let rt = test_runtime()?;
    for key in ["alpha", "Alpha", " alpha"] {
        let claimed = rt.block_on(store.try_claim(&record(key, 'c')?))?;
        assert!(claimed, "key {key:?} should be claimable on its own");
    }
    Ok(())
}

#[rstest]
fn concurrent_claims_of_one_key_have_a_single_winner(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    const CONTENDERS: usize = 8;

    ensure_template(shared_test_cluster)?;
    let db_name = unique_db_name("claim_race");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let pool = setup_pool(shared_test_cluster, &db_name, 4)?;
    let store = Arc::new(PostgresIdempotencyStore::new(
        pool.clone(),
        Arc::new(SteppingClock::starting_at(claim_start()?)),
    ));

    let rt = test_runtime()?;
    let outcomes = rt.block_on(async {
        let mut contenders = JoinSet::new();
        for fingerprint_char in ['0', '1', '2', '3', '4', '5', '6', '7'] {
            let contender = Arc::clone(&store);
            let claim = record("race-key", fingerprint_char)?;
            contenders.spawn(async move { contender.try_claim(&claim).await });
        }
        let mut outcomes = Vec::with_capacity(CONTENDERS);
        while let Some(joined) = contenders.join_next().await {
            outcomes.push(joined.map_err(|e| Box::new(e) as BoxError)??);
        }
        Ok::<_, BoxError>(outcomes)
    })?;

    assert_eq!(outcomes.len(), CONTENDERS);
    assert_eq!(outcomes.iter().filter(|claimed| **claimed).count(), 1);
    assert_eq!(stored_claims(&pool, "race-key")?.len(), 1);
    Ok(())
}
