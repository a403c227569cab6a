//! Engine properties exercised through the public API
//!
//! Uses the in-memory store and cache shipped with the crate.

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;
use wallet_balance_engine::{
    BalanceEngine, InMemoryWalletCache, InMemoryWalletStore, OperationKind, Wallet, WalletCache,
    WalletError, WalletStore,
};

struct Harness {
    store: Arc<InMemoryWalletStore>,
    cache: Arc<InMemoryWalletCache>,
    engine: Arc<BalanceEngine>,
}

fn harness(wallets: &[(Uuid, i64)]) -> Harness {
    let store = Arc::new(InMemoryWalletStore::new());
    for (id, balance) in wallets {
        store
            .insert(Wallet::new(*id, Decimal::from(*balance)))
            .unwrap();
    }
    let cache = Arc::new(InMemoryWalletCache::new());
    let engine = Arc::new(BalanceEngine::new(
        Arc::clone(&store) as Arc<dyn WalletStore>,
        Arc::clone(&cache) as Arc<dyn WalletCache>,
    ));

    Harness {
        store,
        cache,
        engine,
    }
}

#[tokio::test]
async fn test_deposit_then_withdraw_sequence() {
    let id = Uuid::new_v4();
    let h = harness(&[(id, 100)]);

    let after_deposit = h
        .engine
        .perform_operation(id, OperationKind::Deposit, Decimal::from(50))
        .await
        .unwrap();
    assert_eq!(after_deposit.balance, Decimal::from(150));

    let after_withdraw = h
        .engine
        .perform_operation(id, OperationKind::Withdraw, Decimal::from(30))
        .await
        .unwrap();
    assert_eq!(after_withdraw.balance, Decimal::from(120));

    let err = h
        .engine
        .perform_operation(id, OperationKind::Withdraw, Decimal::from(500))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InsufficientFunds { .. }));

    assert_eq!(h.engine.find_balance(id).await.unwrap().balance, Decimal::from(120));
    assert_eq!(
        h.store.get(id).await.unwrap().unwrap().balance,
        Decimal::from(120)
    );
}

#[tokio::test]
async fn test_unknown_wallet_has_no_side_effects() {
    let known = Uuid::new_v4();
    let unknown = Uuid::new_v4();
    let h = harness(&[(known, 1)]);

    let err = h
        .engine
        .perform_operation(unknown, OperationKind::Deposit, Decimal::from(10))
        .await
        .unwrap_err();
    assert_eq!(err, WalletError::wallet_not_found(unknown));

    let err = h.engine.find_balance(unknown).await.unwrap_err();
    assert_eq!(err, WalletError::wallet_not_found(unknown));

    assert_eq!(h.store.len(), 1);
    assert!(h.cache.is_empty());
}

#[tokio::test]
async fn test_unknown_wallet_not_found_with_populated_cache() {
    let known = Uuid::new_v4();
    let unknown = Uuid::new_v4();
    let h = harness(&[(known, 25)]);

    assert_eq!(h.engine.find_balance(known).await.unwrap().balance, Decimal::from(25));
    assert_eq!(h.cache.len(), 1);

    let err = h.engine.find_balance(unknown).await.unwrap_err();

    assert_eq!(err, WalletError::wallet_not_found(unknown));
    assert_eq!(h.cache.len(), 1);
    assert_eq!(h.cache.get(unknown).await.unwrap(), None);
}

#[tokio::test]
async fn test_read_your_write_through_cache() {
    let id = Uuid::new_v4();
    let h = harness(&[(id, 10)]);

    // Populate the cache with the opening balance
    assert_eq!(h.engine.find_balance(id).await.unwrap().balance, Decimal::from(10));
    assert_eq!(h.cache.len(), 1);

    h.engine
        .perform_operation(id, OperationKind::Deposit, Decimal::from(5))
        .await
        .unwrap();

    assert_eq!(h.engine.find_balance(id).await.unwrap().balance, Decimal::from(15));
    assert_eq!(
        h.cache.get(id).await.unwrap().map(|wallet| wallet.balance),
        Some(Decimal::from(15))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_deposits_are_not_lost() {
    let id = Uuid::new_v4();
    let h = harness(&[(id, 100)]);

    let first = {
        let engine = Arc::clone(&h.engine);
        tokio::spawn(async move {
            engine
                .perform_operation(id, OperationKind::Deposit, Decimal::from(10))
                .await
        })
    };
    let second = {
        let engine = Arc::clone(&h.engine);
        tokio::spawn(async move {
            engine
                .perform_operation(id, OperationKind::Deposit, Decimal::from(5))
                .await
        })
    };

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    assert_eq!(h.engine.find_balance(id).await.unwrap().balance, Decimal::from(115));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_conservation_under_mixed_load() {
    let wallets: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
    let seed: Vec<(Uuid, i64)> = wallets.iter().map(|id| (*id, 50)).collect();
    let h = harness(&seed);

    let mut tasks = Vec::new();
    for i in 0..200usize {
        let engine = Arc::clone(&h.engine);
        let id = wallets[i % wallets.len()];
        let (kind, amount) = if i % 3 == 0 {
            (OperationKind::Withdraw, Decimal::from(7))
        } else {
            (OperationKind::Deposit, Decimal::from(2))
        };
        tasks.push(tokio::spawn(async move {
            let result = engine.perform_operation(id, kind, amount).await;
            (id, kind, amount, result)
        }));
    }

    let mut expected = std::collections::HashMap::new();
    for id in &wallets {
        expected.insert(*id, Decimal::from(50));
    }
    for task in tasks {
        let (id, kind, amount, result) = task.await.unwrap();
        match result {
            Ok(_) => {
                let balance = expected.get_mut(&id).unwrap();
                match kind {
                    OperationKind::Deposit => *balance += amount,
                    OperationKind::Withdraw => *balance -= amount,
                }
            }
            Err(e) => assert!(matches!(e, WalletError::InsufficientFunds { .. })),
        }
    }

    for id in &wallets {
        let wallet = h.engine.find_balance(*id).await.unwrap();
        assert_eq!(wallet.balance, expected[id]);
        assert!(wallet.balance >= Decimal::ZERO);
    }
}

#[tokio::test]
async fn test_negative_amount_rejected() {
    let id = Uuid::new_v4();
    let h = harness(&[(id, 10)]);

    let err = h
        .engine
        .perform_operation(id, OperationKind::Deposit, Decimal::from(-1))
        .await
        .unwrap_err();

    assert!(matches!(err, WalletError::InvalidInput { .. }));
    assert_eq!(
        h.store.get(id).await.unwrap().unwrap().balance,
        Decimal::from(10)
    );
    assert!(h.cache.is_empty());
}
