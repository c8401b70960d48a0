// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The batch commit pipeline.
//!
//! Turns the current cart, plus session identity and a chosen meeting date,
//! into zero or more records in the external store. Items are processed
//! strictly in cart order; attachment failures degrade the item (empty URL)
//! and continue, append failures stop the batch immediately with the prefix
//! already committed left standing.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use minutelog_cache::ReadCache;
use minutelog_config::model::StoreConfig;
use minutelog_core::{AttachmentRelay, Record, TabularStore};
use minutelog_session::Session;

use crate::outcome::{
    AttachmentFailure, CommitOutcome, CommitProgress, CommitReceipt, HaltReason,
};

/// Upload-name prefix format, matching the record timestamp granularity.
const UPLOAD_PREFIX_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Drives one batch commit at a time for a session.
///
/// Items are committed sequentially -- the fatal-stop-with-ordering contract
/// rules out parallel item processing. Control returns to the caller through
/// the progress callback after every item.
pub struct CommitPipeline {
    store: Arc<dyn TabularStore>,
    relay: Arc<dyn AttachmentRelay>,
    cache: Arc<ReadCache>,
    records_table: String,
    cancel: Option<CancellationToken>,
}

impl CommitPipeline {
    pub fn new(
        store: Arc<dyn TabularStore>,
        relay: Arc<dyn AttachmentRelay>,
        cache: Arc<ReadCache>,
        store_config: &StoreConfig,
    ) -> Self {
        Self {
            store,
            relay,
            cache,
            records_table: store_config.records_table.clone(),
            cancel: None,
        }
    }

    /// Honors `token` at item boundaries: an in-flight network call is never
    /// interrupted, the cancel is observed before the next item starts.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Commits the session's cart for `meeting_date`.
    ///
    /// On success the read cache is invalidated (the committing session sees
    /// its own writes immediately) and the cart is cleared. On a fatal stop
    /// the cart is left intact; see [`CommitOutcome`] for the duplication
    /// consequences of retrying.
    pub async fn commit<F>(
        &self,
        session: &mut Session,
        meeting_date: NaiveDate,
        mut on_progress: F,
    ) -> CommitOutcome
    where
        F: FnMut(CommitProgress),
    {
        let total = session.cart().len();
        if total == 0 {
            debug!("commit of an empty cart is a trivial success");
            return CommitOutcome::Success(CommitReceipt {
                appended: 0,
                attachment_failures: Vec::new(),
            });
        }

        let identity = session.identity().clone();
        info!(
            total,
            department = %identity.department,
            group = %identity.group,
            meeting_date = %meeting_date,
            "batch commit started"
        );

        let mut attachment_failures = Vec::new();
        let mut appended = 0;

        for index in 0..total {
            if let Some(token) = &self.cancel {
                if token.is_cancelled() {
                    warn!(index, appended, "commit cancelled at item boundary");
                    return CommitOutcome::FatalStop {
                        failed_index: index,
                        appended,
                        reason: HaltReason::Cancelled,
                        attachment_failures,
                    };
                }
            }

            let item = &session.cart().items()[index];

            let attachment_url = match &item.attachment {
                Some(attachment) => {
                    let upload_name = format!(
                        "{}_{}",
                        chrono::Local::now().format(UPLOAD_PREFIX_FORMAT),
                        attachment.filename
                    );
                    match self
                        .relay
                        .upload(&attachment.bytes, &upload_name, &attachment.mime_type)
                        .await
                    {
                        Ok(url) => url,
                        Err(error) => {
                            // A report with a missing attachment beats losing
                            // the report entirely; surface and continue.
                            warn!(
                                index,
                                filename = %attachment.filename,
                                %error,
                                "attachment upload failed, record will carry no URL"
                            );
                            attachment_failures.push(AttachmentFailure {
                                index,
                                filename: attachment.filename.clone(),
                                error,
                            });
                            String::new()
                        }
                    }
                }
                None => String::new(),
            };

            let record = Record::new(
                &identity,
                meeting_date,
                item.content.clone(),
                attachment_url,
            );

            match self
                .store
                .append_row(&self.records_table, record.to_row())
                .await
            {
                Ok(()) => {
                    appended += 1;
                    debug!(index, id = %record.id, "record appended");
                    on_progress(CommitProgress {
                        completed: index + 1,
                        total,
                    });
                }
                Err(error) => {
                    warn!(
                        index,
                        appended,
                        rate_limited = error.is_rate_limited(),
                        %error,
                        "append failed, stopping batch"
                    );
                    on_progress(CommitProgress {
                        completed: index + 1,
                        total,
                    });
                    return CommitOutcome::FatalStop {
                        failed_index: index,
                        appended,
                        reason: HaltReason::Store(error),
                        attachment_failures,
                    };
                }
            }
        }

        self.cache.invalidate().await;
        session.cart_mut().discard_all();
        info!(
            appended,
            attachment_failures = attachment_failures.len(),
            "batch commit succeeded"
        );
        CommitOutcome::Success(CommitReceipt {
            appended,
            attachment_failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minutelog_config::model::{CacheConfig, StoreConfig};
    use minutelog_core::{Attachment, DirectoryEntry, RelayError};
    use minutelog_session::Directory;
    use minutelog_test_utils::{MockFailure, MockRelay, MockRelayFailure, MockStore};

    const CONTENT_COLUMN: usize = 5;
    const URL_COLUMN: usize = 6;

    struct Fixture {
        store: Arc<MockStore>,
        relay: Arc<MockRelay>,
        cache: Arc<ReadCache>,
        pipeline: CommitPipeline,
    }

    fn fixture() -> Fixture {
        let store_config = StoreConfig::default();
        let cache_config = CacheConfig::default();
        let store = Arc::new(MockStore::new());
        let relay = Arc::new(MockRelay::new());
        let cache = Arc::new(ReadCache::new(
            store.clone(),
            &store_config,
            &cache_config,
        ));
        let pipeline = CommitPipeline::new(
            store.clone(),
            relay.clone(),
            cache.clone(),
            &store_config,
        );
        Fixture {
            store,
            relay,
            cache,
            pipeline,
        }
    }

    fn logged_in_session() -> Session {
        let directory = Directory::new(vec![DirectoryEntry {
            department: "Office A".into(),
            group: "G1".into(),
            secret: "pw1".into(),
        }]);
        Session::login(&directory, "Office A", "G1", "pw1").unwrap()
    }

    fn meeting_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
    }

    fn attachment(bytes: &[u8], filename: &str) -> Attachment {
        Attachment {
            bytes: bytes.to_vec(),
            filename: filename.to_string(),
            mime_type: "application/octet-stream".to_string(),
        }
    }

    #[tokio::test]
    async fn clean_batch_appends_in_cart_order_and_clears_cart() {
        let f = fixture();
        let mut session = logged_in_session();
        for content in ["first", "second", "third"] {
            session.cart_mut().stage(content, None).unwrap();
        }

        let mut events = Vec::new();
        let outcome = f
            .pipeline
            .commit(&mut session, meeting_date(), |p| events.push(p))
            .await;

        assert!(outcome.is_success());
        assert!(session.cart().is_empty());

        let rows = f.store.rows("records").await;
        let contents: Vec<&str> = rows.iter().map(|r| r[CONTENT_COLUMN].as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);

        let fractions: Vec<(usize, usize)> =
            events.iter().map(|p| (p.completed, p.total)).collect();
        assert_eq!(fractions, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[tokio::test]
    async fn success_invalidates_the_cache_for_read_your_write() {
        let f = fixture();
        f.store.seed("config", vec![]).await;

        // Populate the snapshot before committing; the TTL alone would keep
        // it alive for a full minute.
        assert_eq!(f.cache.get().await.unwrap().records.len(), 0);

        let mut session = logged_in_session();
        session.cart_mut().stage("fresh row", None).unwrap();
        let outcome = f
            .pipeline
            .commit(&mut session, meeting_date(), |_| {})
            .await;
        assert!(outcome.is_success());

        let snapshot = f.cache.get().await.unwrap();
        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.records[0].content, "fresh row");
    }

    #[tokio::test]
    async fn append_failure_stops_the_batch_and_keeps_the_cart() {
        let f = fixture();
        f.store.fail_append_at(2, MockFailure::RateLimited).await;

        let mut session = logged_in_session();
        for content in ["one", "two", "three"] {
            session.cart_mut().stage(content, None).unwrap();
        }

        let mut events = Vec::new();
        let outcome = f
            .pipeline
            .commit(&mut session, meeting_date(), |p| events.push(p))
            .await;

        match &outcome {
            CommitOutcome::FatalStop {
                failed_index,
                appended,
                ..
            } => {
                assert_eq!(*failed_index, 1);
                assert_eq!(*appended, 1);
            }
            other => panic!("expected fatal stop, got: {other:?}"),
        }
        assert!(outcome.is_rate_limited());

        // Item three was never attempted; the failed item still reported
        // progress so the indicator does not stall.
        assert_eq!(
            events.iter().map(|p| p.completed).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(f.store.rows("records").await.len(), 1);
        assert_eq!(session.cart().len(), 3);
    }

    #[tokio::test]
    async fn retry_after_fatal_stop_duplicates_the_committed_prefix() {
        let f = fixture();
        f.store.fail_append_at(2, MockFailure::Write).await;

        let mut session = logged_in_session();
        for content in ["one", "two"] {
            session.cart_mut().stage(content, None).unwrap();
        }

        let first = f
            .pipeline
            .commit(&mut session, meeting_date(), |_| {})
            .await;
        assert!(!first.is_success());
        assert_eq!(session.cart().len(), 2);

        // The scripted failure is consumed, so the retry runs clean -- and
        // re-appends the already-committed first item. Duplication is the
        // documented cost of never losing a report.
        let second = f
            .pipeline
            .commit(&mut session, meeting_date(), |_| {})
            .await;
        assert!(second.is_success());
        assert!(session.cart().is_empty());

        let contents: Vec<String> = f
            .store
            .rows("records")
            .await
            .iter()
            .map(|r| r[CONTENT_COLUMN].clone())
            .collect();
        assert_eq!(contents, vec!["one", "one", "two"]);
    }

    #[tokio::test]
    async fn attachment_failure_degrades_the_item_but_continues() {
        let f = fixture();
        f.relay
            .push_failure(MockRelayFailure::Application("file too large".into()))
            .await;

        let mut session = logged_in_session();
        session
            .cart_mut()
            .stage("with broken upload", Some(attachment(b"bytes", "big.pdf")))
            .unwrap();
        session.cart_mut().stage("plain", None).unwrap();

        let outcome = f
            .pipeline
            .commit(&mut session, meeting_date(), |_| {})
            .await;

        match outcome {
            CommitOutcome::Success(receipt) => {
                assert_eq!(receipt.appended, 2);
                assert_eq!(receipt.attachment_failures.len(), 1);
                let failure = &receipt.attachment_failures[0];
                assert_eq!(failure.index, 0);
                assert_eq!(failure.filename, "big.pdf");
                assert!(matches!(failure.error, RelayError::Application { .. }));
            }
            other => panic!("expected success, got: {other:?}"),
        }

        let rows = f.store.rows("records").await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][URL_COLUMN], "");
        assert_eq!(rows[1][URL_COLUMN], "");
    }

    #[tokio::test]
    async fn upload_names_are_timestamp_prefixed() {
        let f = fixture();
        let mut session = logged_in_session();
        session
            .cart_mut()
            .stage("with file", Some(attachment(b"0123456789", "notes.pdf")))
            .unwrap();

        let outcome = f
            .pipeline
            .commit(&mut session, meeting_date(), |_| {})
            .await;
        assert!(outcome.is_success());

        let uploads = f.relay.uploads().await;
        assert_eq!(uploads.len(), 1);
        assert!(uploads[0].filename.ends_with("_notes.pdf"));
        // YYYYmmdd_HHMMSS_ prefix
        assert_eq!(uploads[0].filename.len(), "20260805_103000_notes.pdf".len());
        assert!(uploads[0].filename[..8].chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn items_without_attachments_never_touch_the_relay() {
        let f = fixture();
        let mut session = logged_in_session();
        session.cart_mut().stage("text only", None).unwrap();

        let outcome = f
            .pipeline
            .commit(&mut session, meeting_date(), |_| {})
            .await;
        assert!(outcome.is_success());
        assert!(f.relay.uploads().await.is_empty());
    }

    #[tokio::test]
    async fn empty_cart_commit_is_a_trivial_success() {
        let f = fixture();
        let mut session = logged_in_session();

        let mut events = Vec::new();
        let outcome = f
            .pipeline
            .commit(&mut session, meeting_date(), |p| events.push(p))
            .await;

        assert!(outcome.is_success());
        assert!(events.is_empty());
        assert_eq!(f.store.append_calls(), 0);
    }

    #[tokio::test]
    async fn cancellation_takes_effect_at_the_item_boundary() {
        let store_config = StoreConfig::default();
        let f = fixture();
        let token = CancellationToken::new();
        let pipeline = CommitPipeline::new(
            f.store.clone(),
            f.relay.clone(),
            f.cache.clone(),
            &store_config,
        )
        .with_cancellation(token.clone());

        let mut session = logged_in_session();
        session.cart_mut().stage("never committed", None).unwrap();
        token.cancel();

        let outcome = pipeline
            .commit(&mut session, meeting_date(), |_| {})
            .await;

        match outcome {
            CommitOutcome::FatalStop {
                failed_index,
                appended,
                reason: HaltReason::Cancelled,
                ..
            } => {
                assert_eq!(failed_index, 0);
                assert_eq!(appended, 0);
            }
            other => panic!("expected cancelled stop, got: {other:?}"),
        }
        assert_eq!(f.store.append_calls(), 0);
        assert_eq!(session.cart().len(), 1);
    }

    // The end-to-end scenario: two items, the first with a 10-byte
    // attachment, the second bare; commit; verify rows, URLs, cart, and the
    // post-invalidate cache view.
    #[tokio::test]
    async fn end_to_end_two_item_commit() {
        let f = fixture();
        f.store.seed("config", vec![]).await;
        f.relay.push_url("https://files.example/abc123").await;

        // Warm the cache so only invalidation can explain the fresh view.
        assert!(f.cache.get().await.unwrap().records.is_empty());

        let mut session = logged_in_session();
        session
            .cart_mut()
            .stage("with attachment", Some(attachment(b"0123456789", "pic.png")))
            .unwrap();
        session.cart_mut().stage("without attachment", None).unwrap();

        let outcome = f
            .pipeline
            .commit(&mut session, meeting_date(), |_| {})
            .await;
        assert!(outcome.is_success());
        assert!(session.cart().is_empty());

        let uploads = f.relay.uploads().await;
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].bytes, b"0123456789");

        let snapshot = f.cache.get().await.unwrap();
        assert_eq!(snapshot.records.len(), 2);
        assert_eq!(snapshot.records[0].content, "with attachment");
        assert_eq!(
            snapshot.records[0].attachment_url,
            "https://files.example/abc123"
        );
        assert_eq!(snapshot.records[1].content, "without attachment");
        assert_eq!(snapshot.records[1].attachment_url, "");
    }
}
