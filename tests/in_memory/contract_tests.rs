//! Runs the shared repository contract against [`InMemoryFlashRepository`].

use crate::contract;
use crate::in_memory::helpers::{repo, runtime};
use flashbox::flash::adapters::memory::InMemoryFlashRepository;
use rstest::rstest;
use std::io;
use tokio::runtime::Runtime;

#[rstest]
fn stored_message_is_found_with_tags(
    runtime: io::Result<Runtime>,
    repo: InMemoryFlashRepository,
) {
    let rt = runtime.expect("runtime creation");
    rt.block_on(contract::stored_message_is_found_with_tags(&repo));
}

#[rstest]
fn duplicate_identifier_is_rejected(runtime: io::Result<Runtime>, repo: InMemoryFlashRepository) {
    let rt = runtime.expect("runtime creation");
    rt.block_on(contract::duplicate_identifier_is_rejected(&repo));
}

#[rstest]
fn scopes_are_isolated(runtime: io::Result<Runtime>, repo: InMemoryFlashRepository) {
    let rt = runtime.expect("runtime creation");
    rt.block_on(contract::scopes_are_isolated(&repo));
}

#[rstest]
fn mark_read_is_idempotent(runtime: io::Result<Runtime>, repo: InMemoryFlashRepository) {
    let rt = runtime.expect("runtime creation");
    rt.block_on(contract::mark_read_is_idempotent(&repo));
}

#[rstest]
fn mark_read_limits_to_selection(runtime: io::Result<Runtime>, repo: InMemoryFlashRepository) {
    let rt = runtime.expect("runtime creation");
    rt.block_on(contract::mark_read_limits_to_selection(&repo));
}

#[rstest]
fn pages_follow_default_ordering(runtime: io::Result<Runtime>, repo: InMemoryFlashRepository) {
    let rt = runtime.expect("runtime creation");
    rt.block_on(contract::pages_follow_default_ordering(&repo));
}

#[rstest]
fn filters_and_ordering_apply(runtime: io::Result<Runtime>, repo: InMemoryFlashRepository) {
    let rt = runtime.expect("runtime creation");
    rt.block_on(contract::filters_and_ordering_apply(&repo));
}

#[rstest]
fn tag_filter_stays_in_scope(runtime: io::Result<Runtime>, repo: InMemoryFlashRepository) {
    let rt = runtime.expect("runtime creation");
    rt.block_on(contract::tag_filter_stays_in_scope(&repo));
}

#[rstest]
fn read_filters_apply(runtime: io::Result<Runtime>, repo: InMemoryFlashRepository) {
    let rt = runtime.expect("runtime creation");
    rt.block_on(contract::read_filters_apply(&repo));
}

#[rstest]
fn unread_checks_and_summary(runtime: io::Result<Runtime>, repo: InMemoryFlashRepository) {
    let rt = runtime.expect("runtime creation");
    rt.block_on(contract::unread_checks_and_summary(&repo));
}

#[rstest]
fn deletions_respect_read_state_and_scope(
    runtime: io::Result<Runtime>,
    repo: InMemoryFlashRepository,
) {
    let rt = runtime.expect("runtime creation");
    rt.block_on(contract::deletions_respect_read_state_and_scope(&repo));
}

#[rstest]
fn teardown_purges_sessions_and_users(
    runtime: io::Result<Runtime>,
    repo: InMemoryFlashRepository,
) {
    let rt = runtime.expect("runtime creation");
    rt.block_on(contract::teardown_purges_sessions_and_users(&repo));
}
