//! Shared-state behaviour of [`InMemoryFlashRepository`].

use crate::contract::{message, session, user};
use crate::in_memory::helpers::{repo, runtime, storage};
use flashbox::config::FlashSettings;
use flashbox::flash::{
    adapters::memory::InMemoryFlashRepository,
    domain::{ExtraTags, Level, MessageOwner, MessageScope, RequestIdentity},
    ports::{FlashMessageRepository, MessageStorage},
};
use rstest::rstest;
use std::io;
use tokio::runtime::Runtime;

/// Clones share one underlying store.
#[rstest]
fn clones_observe_each_others_writes(runtime: io::Result<Runtime>, repo: InMemoryFlashRepository) {
    let rt = runtime.expect("runtime creation");
    let clone = repo.clone();
    let stored = message(MessageOwner::user(user()), Level::Info, "shared", 0);

    rt.block_on(clone.store(&stored)).expect("store via clone");

    assert_eq!(repo.total().expect("total"), 1);
}

/// Concurrent writers lose nothing.
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_stores_are_all_kept() {
    let shared = InMemoryFlashRepository::new();
    let member = user();
    let mut tasks = Vec::new();
    for minute in 0..16 {
        let writer = shared.clone();
        tasks.push(tokio::spawn(async move {
            let stored = message(MessageOwner::user(member), Level::Info, "burst", minute);
            writer.store(&stored).await
        }));
    }
    for task in tasks {
        task.await.expect("task join").expect("store");
    }

    assert_eq!(
        shared
            .count_unread(&MessageScope::User(member))
            .await
            .expect("count"),
        16
    );
}

/// Two requests in one session hand messages over exactly once.
#[rstest]
fn session_storage_hands_messages_to_next_request(
    runtime: io::Result<Runtime>,
    repo: InMemoryFlashRepository,
) {
    let rt = runtime.expect("runtime creation");
    let settings = FlashSettings::default().with_use_sessions(true);
    let identity = RequestIdentity::anonymous().with_session(session("browser"));

    let first = storage(&repo, settings.clone(), identity.clone());
    rt.block_on(first.add(Level::Success, "Signed up", ExtraTags::from("welcome")));
    rt.block_on(first.update()).expect("first update");

    let second = storage(&repo, settings.clone(), identity.clone());
    let delivered = rt.block_on(second.messages()).expect("read");
    rt.block_on(second.update()).expect("second update");

    let third = storage(&repo, settings, identity);
    let again = rt.block_on(third.messages()).expect("read again");

    assert_eq!(delivered.len(), 1);
    assert!(
        delivered
            .first()
            .is_some_and(|notice| notice.extra_tags == ["welcome"])
    );
    assert!(again.is_empty());
}
