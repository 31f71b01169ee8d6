//! End-to-end chat meta scenarios through the service layer.

use permkit::{CommandOutcome, ServiceConfig};
use permkit_core::ChatMetaType;
use permkit_store::HolderStorage;
use permkit_testkit::fixtures::{contexts, meta, temp_meta, HolderFixture};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[tokio::test]
async fn bulk_remove_clears_slot_and_persists() {
    init_tracing();
    let fixture = HolderFixture::new();
    let holder = fixture.user(
        "alice",
        vec![
            meta(ChatMetaType::Prefix, 10, "A", &[]),
            meta(ChatMetaType::Prefix, 10, "B", &[]),
            meta(ChatMetaType::Prefix, 20, "C", &[]),
        ],
    );

    let outcome = fixture
        .service
        .remove_chat_meta("console", &holder, ChatMetaType::Prefix, 10, Some("null"), &contexts(&[]))
        .await
        .unwrap();

    assert_eq!(outcome, CommandOutcome::Success);
    assert_eq!(holder.nodes(), vec![meta(ChatMetaType::Prefix, 20, "C", &[])]);

    let stored = fixture.storage().load(holder.id()).await.unwrap().unwrap();
    assert_eq!(stored.nodes, holder.nodes());

    // Bulk removals are not audited by default.
    assert!(fixture.audit.entries().is_empty());
}

#[tokio::test]
async fn exact_unset_then_repeat_fails() {
    init_tracing();
    let fixture = HolderFixture::new();
    let nether = [("world", "nether")];
    let holder = fixture.user("bob", vec![meta(ChatMetaType::Suffix, 5, "X", &nether)]);

    let first = fixture
        .service
        .remove_chat_meta("admin", &holder, ChatMetaType::Suffix, 5, Some("X"), &contexts(&nether))
        .await
        .unwrap();
    assert_eq!(first, CommandOutcome::Success);
    assert_eq!(holder.node_count(), 0);

    let second = fixture
        .service
        .remove_chat_meta("admin", &holder, ChatMetaType::Suffix, 5, Some("X"), &contexts(&nether))
        .await
        .unwrap();
    assert_eq!(second, CommandOutcome::StateError);

    let entries = fixture.audit.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].actor, "admin");
    assert_eq!(entries[0].acted, *holder.id());
    assert_eq!(entries[0].action, "meta removesuffix 5 X world=nether");
    assert_eq!(fixture.storage().save_count(holder.id()), 1);
}

#[tokio::test]
async fn bulk_remove_spares_temporary_and_other_contexts() {
    let fixture = HolderFixture::new();
    let holder = fixture.group(
        "staff",
        vec![
            meta(ChatMetaType::Prefix, 10, "global", &[]),
            meta(ChatMetaType::Prefix, 10, "nether", &[("world", "nether")]),
            temp_meta(ChatMetaType::Prefix, 10, "temp", &[], 60_000),
        ],
    );

    let outcome = fixture
        .service
        .remove_chat_meta("console", &holder, ChatMetaType::Prefix, 10, Some("*"), &contexts(&[]))
        .await
        .unwrap();

    assert_eq!(outcome, CommandOutcome::Success);
    assert_eq!(
        holder.nodes(),
        vec![
            meta(ChatMetaType::Prefix, 10, "nether", &[("world", "nether")]),
            temp_meta(ChatMetaType::Prefix, 10, "temp", &[], 60_000),
        ]
    );
}

#[tokio::test]
async fn bulk_removals_audited_when_configured() {
    let fixture = HolderFixture::with_config(ServiceConfig {
        audit_bulk_removals: true,
        ..ServiceConfig::default()
    });
    let holder = fixture.user("carol", vec![]);

    let outcome = fixture
        .service
        .remove_chat_meta("console", &holder, ChatMetaType::Suffix, 3, Some("NULL"), &contexts(&[("server", "hub")]))
        .await
        .unwrap();

    assert_eq!(outcome, CommandOutcome::Success);
    assert_eq!(fixture.audit.actions(), vec!["meta removesuffix 3 NULL server=hub".to_string()]);
}

#[tokio::test]
async fn add_then_reload_from_storage() {
    let fixture = HolderFixture::new();
    let holder = fixture.service.load(&permkit::HolderId::group("vip")).await.unwrap();
    let ctx = contexts(&[("server", "survival")]);

    let added = fixture
        .service
        .add_chat_meta("console", &holder, ChatMetaType::Prefix, 50, "[VIP] v2.0", &ctx)
        .await
        .unwrap();
    let again = fixture
        .service
        .add_chat_meta("console", &holder, ChatMetaType::Prefix, 50, "[VIP] v2.0", &ctx)
        .await
        .unwrap();

    assert_eq!(added, CommandOutcome::Success);
    assert_eq!(again, CommandOutcome::StateError);

    let reloaded = fixture.service.load(holder.id()).await.unwrap();
    let entries = reloaded.chat_meta(ChatMetaType::Prefix);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].value, "[VIP] v2.0");
    assert_eq!(
        fixture.audit.actions(),
        vec!["meta addprefix 50 \"[VIP] v2.0\" server=survival".to_string()]
    );
}

#[tokio::test]
async fn temporary_meta_expires_through_audit() {
    let fixture = HolderFixture::new();
    let holder = fixture.user("dave", vec![]);

    fixture
        .service
        .add_temp_chat_meta("console", &holder, ChatMetaType::Suffix, 1, "*", &contexts(&[]), 1_000)
        .await
        .unwrap();
    assert_eq!(fixture.audit.actions(), vec!["meta addtempsuffix 1 * until 1000".to_string()]);

    assert_eq!(fixture.service.audit_expired(&holder, 2_000).await.unwrap(), 1);
    assert_eq!(holder.node_count(), 0);
}
