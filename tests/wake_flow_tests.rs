mod common;

use anyhow::Result;
use common::{FakeChannel, FakeProbe};
use nudge_bot::database::{connection::DatabaseManager, models::*};
use nudge_bot::services::reply_router::ReplyRouter;
use nudge_bot::services::wake::{WakeEngine, WakeOutcome, WakeRequest};
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

struct Flow {
    db: Arc<DatabaseManager>,
    channel: Arc<FakeChannel>,
    engine: WakeEngine,
    router: ReplyRouter,
    _temp_dir: TempDir,
}

async fn setup_flow(probe: FakeProbe) -> Result<Flow> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db_manager = DatabaseManager::new(&database_url).await?;
    db_manager.run_migrations().await?;
    let db = Arc::new(db_manager);

    let channel = Arc::new(FakeChannel::default());
    let engine = WakeEngine::new(db.clone(), db.clone(), Arc::new(probe), channel.clone());
    let router = ReplyRouter::new(db.clone(), channel.clone());

    Ok(Flow { db, channel, engine, router, _temp_dir: temp_dir })
}

#[tokio::test]
async fn test_wake_reply_and_cooldown_against_sqlite() -> Result<()> {
    let flow = setup_flow(FakeProbe::default()).await?;
    Person::create(&flow.db.pool, "bob", Some("555".to_string()), None).await?;

    let request = WakeRequest::new("111", "Alice", Some("check in!".to_string()), 42);
    let outcome = flow.engine.request_wake(&request, "bob").await;
    assert_eq!(outcome, WakeOutcome::Woken { target: "bob".to_string() });

    let sent = flow.channel.all();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].chat_id, "555");
    assert!(sent[0].text.contains("check in!"));

    let bob = Person::find_by_name(&flow.db.pool, "bob").await?.unwrap();
    assert!(bob.cooldowns.expiry_for("111").is_some());

    let events = WakeEvent::find_by_sender(&flow.db.pool, "111").await?;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].receiver, "555");
    assert_eq!(events[0].notification_message_id, sent[0].message_id);
    assert_eq!(events[0].command_chat_id, "111");
    assert_eq!(events[0].command_message_id, 42);
    assert!(!events[0].reply_used);

    // A repeat nudge is refused and leaves the log alone.
    let repeat = flow.engine.request_wake(&request, "bob").await;
    assert!(matches!(repeat, WakeOutcome::CooldownActive { .. }));
    assert_eq!(WakeEvent::find_by_sender(&flow.db.pool, "111").await?.len(), 1);

    // The first reply goes back to Alice, the second is dropped.
    assert!(flow.router.route_reply("555", sent[0].message_id, "on it", "Bob").await);
    assert!(!flow.router.route_reply("555", sent[0].message_id, "on it!", "Bob").await);

    let sent = flow.channel.all();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].chat_id, "111");
    assert_eq!(sent[1].text, "Bob : on it");
    assert_eq!(sent[1].reply_to, Some(42));

    let event = WakeEvent::find_by_notification(&flow.db.pool, "555", sent[0].message_id)
        .await?
        .unwrap();
    assert!(event.reply_used);

    Ok(())
}

#[tokio::test]
async fn test_malformed_stored_cooldowns_fail_open() -> Result<()> {
    let flow = setup_flow(FakeProbe::default()).await?;
    let bob = Person::create(&flow.db.pool, "bob", Some("555".to_string()), None).await?;

    sqlx::query("UPDATE people SET cooldowns = ? WHERE id = ?")
        .bind(r#"{"111": "not a timestamp", "222": 17}"#)
        .bind(&bob.id)
        .execute(&flow.db.pool)
        .await?;

    let outcome = flow
        .engine
        .request_wake(&WakeRequest::new("111", "Alice", None, 1), "bob")
        .await;
    assert!(outcome.is_woken());

    let bob = Person::find_by_name(&flow.db.pool, "bob").await?.unwrap();
    assert_eq!(bob.cooldowns.len(), 1);
    assert!(bob.cooldowns.expiry_for("111").is_some());

    Ok(())
}

#[tokio::test]
async fn test_wake_all_against_sqlite() -> Result<()> {
    let flow = setup_flow(FakeProbe::tracking(&["cat-token"])).await?;
    Person::create(&flow.db.pool, "ann", Some("501".to_string()), None).await?;
    Person::create(&flow.db.pool, "cat", Some("503".to_string()), Some("cat-token".to_string())).await?;
    Person::create(&flow.db.pool, "zoe", None, None).await?;

    let report = flow
        .engine
        .request_wake_all(&WakeRequest::new("111", "Alice", None, 1))
        .await;

    assert_eq!(report.woken_count(), 1);
    assert_eq!(flow.channel.all().len(), 1);
    assert_eq!(WakeEvent::find_by_sender(&flow.db.pool, "111").await?.len(), 1);

    let html = report.to_html();
    assert!(html.contains("Ann: Successfully woke Ann!"));
    assert!(html.contains("Cat: Cat is already studying!"));
    assert!(html.contains("Zoe: Zoe has no Telegram chat to send to."));

    Ok(())
}
