//! End-to-end tests wiring the whole engine together

use chrono::NaiveDate;
use economy_engine::{Config, EconomyEngine, Error};
use ledger_core::AccountId;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("economy_engine=debug,persistence=debug")
        .with_test_writer()
        .try_init();
}

fn test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.data_dir = dir.path().join("data");
    config.legacy.user_data = dir.path().join("economy_userdata.json");
    config.legacy.server_data = dir.path().join("economy_serverdata.json");
    config
}

fn dec(n: i64) -> Decimal {
    Decimal::from(n)
}

fn day(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[test]
fn test_bootstrap_writes_default_settings() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    let engine = EconomyEngine::bootstrap(config.clone()).unwrap();

    assert_eq!(engine.currency(), "Coins");
    assert_eq!(engine.locale(), "en_US");
    assert_eq!(engine.balance(AccountId::random()), Decimal::ZERO);
    assert!(config.server_data_path().exists());
}

#[test]
fn test_pay_flow_and_error_taxonomy() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let engine = EconomyEngine::bootstrap(test_config(&dir)).unwrap();

    let alice = AccountId::random();
    let bob = AccountId::random();
    engine.admin_deposit(alice, dec(100)).unwrap();

    engine.pay(alice, bob, dec(40)).unwrap();
    assert_eq!(engine.balance(alice), dec(60));
    assert_eq!(engine.balance(bob), dec(40));

    assert!(matches!(
        engine.pay(alice, bob, Decimal::ZERO),
        Err(Error::InvalidAmount(_))
    ));
    assert!(matches!(
        engine.pay(alice, bob, dec(-5)),
        Err(Error::InvalidAmount(_))
    ));
    assert!(matches!(
        engine.pay(alice, bob, dec(1000)),
        Err(Error::InsufficientFunds)
    ));

    // Failed payments must not move funds
    assert_eq!(engine.balance(alice), dec(60));
    assert_eq!(engine.balance(bob), dec(40));

    assert_eq!(engine.metrics().payments_total.get(), 1);
    assert_eq!(engine.metrics().insufficient_funds_total.get(), 1);
}

#[test]
fn test_admin_withdraw_insufficient_funds() {
    let dir = TempDir::new().unwrap();
    let engine = EconomyEngine::bootstrap(test_config(&dir)).unwrap();

    let account = AccountId::random();
    engine.admin_set_balance(account, dec(10)).unwrap();

    assert!(matches!(
        engine.admin_withdraw(account, dec(20)),
        Err(Error::InsufficientFunds)
    ));
    assert_eq!(engine.balance(account), dec(10));

    engine.admin_withdraw(account, dec(10)).unwrap();
    assert_eq!(engine.balance(account), Decimal::ZERO);
}

#[test]
fn test_rename_and_leaderboard_scenario() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let engine = EconomyEngine::bootstrap(test_config(&dir)).unwrap();

    let a = AccountId::random();
    let b = AccountId::random();
    let c = AccountId::random();
    engine.admin_set_balance(a, dec(100)).unwrap();
    engine.admin_set_balance(b, dec(50)).unwrap();
    engine.admin_set_balance(c, dec(200)).unwrap();

    // Rename conserves every balance
    assert!(engine.rename_currency("Gems").unwrap());
    assert_eq!(engine.currency(), "Gems");
    assert_eq!(engine.balance(a), dec(100));
    assert_eq!(engine.balance(b), dec(50));
    assert_eq!(engine.balance(c), dec(200));

    // Renaming again to the same name is a no-op
    assert!(!engine.rename_currency("Gems").unwrap());
    assert!(matches!(
        engine.rename_currency("  "),
        Err(Error::InvalidCurrency(_))
    ));

    // Rank order: c, a, b
    assert_eq!(engine.rank_of(c), Some(1));
    assert_eq!(engine.rank_of(a), Some(2));
    assert_eq!(engine.rank_of(b), Some(3));

    let first = engine.leaderboard_page(1, 2);
    assert_eq!(first.total_pages, 2);
    let ids: Vec<AccountId> = first.entries.iter().map(|e| e.account).collect();
    assert_eq!(ids, vec![c, a]);

    let second = engine.leaderboard_page(2, 2);
    let ids: Vec<AccountId> = second.entries.iter().map(|e| e.account).collect();
    assert_eq!(ids, vec![b]);

    // Page 3 clamps to the last page
    assert_eq!(engine.leaderboard_page(3, 2), second);
}

#[test]
fn test_daily_claim_flow() {
    let dir = TempDir::new().unwrap();
    let engine = EconomyEngine::bootstrap(test_config(&dir)).unwrap();

    engine.set_daily_reward(100, 500).unwrap();

    let account = AccountId::random();
    let amount = engine.claim_daily_reward(account, day("2025-06-01")).unwrap();

    assert!(amount >= dec(100) && amount <= dec(500));
    assert_eq!(engine.balance(account), amount);
    assert_eq!(engine.last_claim(account), Some(day("2025-06-01")));

    // Same day again: rejected, balance unchanged
    assert!(matches!(
        engine.claim_daily_reward(account, day("2025-06-01")),
        Err(Error::Reward(reward_engine::Error::AlreadyClaimedToday))
    ));
    assert_eq!(engine.balance(account), amount);

    // Next day: an independent draw succeeds
    let next = engine.claim_daily_reward(account, day("2025-06-02")).unwrap();
    assert!(next >= dec(100) && next <= dec(500));
    assert_eq!(engine.balance(account), amount + next);

    assert_eq!(engine.metrics().claims_total.get(), 2);
    assert_eq!(engine.metrics().claims_rejected_total.get(), 1);
}

#[test]
fn test_invalid_reward_range_keeps_prior_configuration() {
    let dir = TempDir::new().unwrap();
    let engine = EconomyEngine::bootstrap(test_config(&dir)).unwrap();

    engine.set_daily_reward(7, 7).unwrap();
    assert!(matches!(
        engine.set_daily_reward(50, 5),
        Err(Error::Reward(reward_engine::Error::InvalidRange { .. }))
    ));

    let account = AccountId::random();
    let amount = engine.claim_daily_reward(account, day("2025-06-01")).unwrap();
    assert_eq!(amount, dec(7));
}

#[test]
fn test_state_survives_restart() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    let account = AccountId::random();
    {
        let engine = EconomyEngine::bootstrap(config.clone()).unwrap();
        engine.admin_deposit(account, dec(777)).unwrap();
        engine
            .claim_daily_reward(account, day("2025-06-01"))
            .unwrap();
        engine.rename_currency("Shards").unwrap();

        assert!(engine.flush_if_dirty().unwrap());
        assert!(!engine.flush_if_dirty().unwrap());
    }

    let engine = EconomyEngine::bootstrap(config).unwrap();
    assert_eq!(engine.currency(), "Shards");
    assert!(engine.balance(account) >= dec(777));
    assert_eq!(engine.last_claim(account), Some(day("2025-06-01")));
}

#[test]
fn test_legacy_import_end_to_end() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    let scalar = AccountId::random();
    let multi = AccountId::random();
    std::fs::write(
        &config.legacy.user_data,
        format!(
            r#"{{
                "balances": {{
                    "{scalar}": 120,
                    "{multi}": {{ "Coins": 100, "Gems": 250 }}
                }},
                "dailyRewards": {{ "{scalar}": "2025-05-30" }}
            }}"#
        ),
    )
    .unwrap();
    std::fs::write(
        &config.legacy.server_data,
        r#"{ "currency": "Marks", "locale": "de_DE", "dailyReward": "10-20" }"#,
    )
    .unwrap();

    let engine = EconomyEngine::bootstrap(config.clone()).unwrap();

    assert_eq!(engine.currency(), "Marks");
    assert_eq!(engine.locale(), "de_DE");
    assert_eq!(engine.balance(scalar), dec(120));
    assert_eq!(engine.balance(multi), dec(350));
    assert_eq!(engine.last_claim(scalar), Some(day("2025-05-30")));

    // Fully successful import retires the legacy files
    assert!(!config.legacy.user_data.exists());
    assert!(!config.legacy.server_data.exists());

    // And the imported state is already in the active store
    let reopened = EconomyEngine::bootstrap(config).unwrap();
    assert_eq!(reopened.balance(multi), dec(350));
}

#[test]
fn test_active_store_wins_over_legacy_on_conflict() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let account = AccountId::random();

    // Seed the active store first
    {
        let engine = EconomyEngine::bootstrap(config.clone()).unwrap();
        engine.admin_set_balance(account, dec(900)).unwrap();
        engine.save().unwrap();
    }

    // A stale legacy file reappears with an older balance
    std::fs::write(
        &config.legacy.user_data,
        format!(r#"{{ "balances": {{ "{account}": 1 }} }}"#),
    )
    .unwrap();

    let engine = EconomyEngine::bootstrap(config).unwrap();
    assert_eq!(engine.balance(account), dec(900));
}

#[test]
fn test_reload_applies_external_edits() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let engine = EconomyEngine::bootstrap(config.clone()).unwrap();

    let account = AccountId::random();
    engine.admin_deposit(account, dec(5)).unwrap();
    engine.save().unwrap();

    // An operator edits the settings file on disk
    let mut server_data = persistence::ServerDataStore::new(config.server_data_path()).load();
    server_data.currency = "Tokens".to_string();
    persistence::ServerDataStore::new(config.server_data_path())
        .save(&server_data)
        .unwrap();

    engine.reload().unwrap();
    assert_eq!(engine.currency(), "Tokens");
    assert_eq!(engine.balance(account), dec(5));
}

#[tokio::test]
async fn test_checkpointer_persists_dirty_state() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    let account = AccountId::random();
    {
        let engine = Arc::new(EconomyEngine::bootstrap(config.clone()).unwrap());
        let checkpointer = engine.start_checkpointer(Duration::from_millis(20));

        engine.admin_deposit(account, dec(64)).unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;
        checkpointer.shutdown().await;
    }

    let engine = EconomyEngine::bootstrap(config).unwrap();
    assert_eq!(engine.balance(account), dec(64));
}
