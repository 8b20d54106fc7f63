//! HandlePaymentWebhookHandler - Command handler for Stripe webhook deliveries.
//!
//! Verifies the delivery, normalizes `checkout.session.completed` sessions,
//! grows the sheet header to fit, and appends one row. Only verification and
//! parse failures are returned as errors; storage problems are logged and
//! reported in the result so the provider is still acknowledged.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::foundation::Timestamp;
use crate::domain::submission::{
    map_row, EventNormalizer, NormalizedRecord, NormalizerOptions, PaymentSession, SheetRow,
    SheetSchema, StorageFailure, StripeEvent, StripeWebhookVerifier, WebhookError, WebhookLifecycle,
    WebhookState,
};
use crate::ports::{SheetError, SheetStore, SheetTarget};

/// Default pause before the single append retry.
pub const DEFAULT_APPEND_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Command to handle a payment webhook.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw webhook payload, exactly as received.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header, if sent.
    pub signature: Option<String>,
}

/// What happened to a verified event.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    /// Row appended.
    Stored {
        columns: usize,
        added_columns: Vec<String>,
    },
    /// Verified, but storage failed. The provider is still acknowledged.
    StoreFailed(StorageFailure),
    /// Event kind not processed.
    Ignored,
}

/// Result of webhook processing.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookResult {
    pub event_id: String,
    pub event_type: String,
    pub outcome: WebhookOutcome,
    /// Lifecycle states visited, from `Received` to `Acknowledged`.
    pub states: Vec<WebhookState>,
}

/// Settings for the storage leg of the pipeline.
#[derive(Debug, Clone)]
pub struct WebhookStorageSettings {
    pub target: SheetTarget,
    pub append_retry_delay: Duration,
    pub normalizer: NormalizerOptions,
}

impl WebhookStorageSettings {
    pub fn new(target: SheetTarget) -> Self {
        Self {
            target,
            append_retry_delay: DEFAULT_APPEND_RETRY_DELAY,
            normalizer: NormalizerOptions::default(),
        }
    }
}

/// Handler for processing payment provider webhooks.
pub struct HandlePaymentWebhookHandler {
    verifier: StripeWebhookVerifier,
    normalizer: EventNormalizer,
    sheet_store: Arc<dyn SheetStore>,
    target: SheetTarget,
    append_retry_delay: Duration,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        verifier: StripeWebhookVerifier,
        sheet_store: Arc<dyn SheetStore>,
        settings: WebhookStorageSettings,
    ) -> Self {
        Self {
            verifier,
            normalizer: EventNormalizer::new(settings.normalizer),
            sheet_store,
            target: settings.target,
            append_retry_delay: settings.append_retry_delay,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        let mut lifecycle = WebhookLifecycle::new();
        advance(&mut lifecycle, WebhookState::Verifying);

        // 1. Verify, then parse. Nothing is parsed before the signature checks out.
        let (event, session) = match self.verify_and_extract(&cmd) {
            Ok(parsed) => parsed,
            Err(err) => {
                advance(&mut lifecycle, WebhookState::Rejected);
                if err.is_signature_failure() {
                    tracing::warn!(error = %err, "Webhook signature verification failed");
                } else {
                    tracing::warn!(error = %err, "Webhook payload rejected");
                }
                return Err(err);
            }
        };
        advance(&mut lifecycle, WebhookState::Verified);

        tracing::info!(
            event_id = %event.id,
            event_type = %event.event_type,
            livemode = event.livemode,
            "Webhook received"
        );

        // 2. Non-checkout events are acknowledged as-is
        let Some(session) = session else {
            advance(&mut lifecycle, WebhookState::Acknowledged);
            tracing::debug!(event_id = %event.id, event_type = %event.event_type, "Webhook ignored");
            return Ok(HandlePaymentWebhookResult {
                event_id: event.id,
                event_type: event.event_type,
                outcome: WebhookOutcome::Ignored,
                states: lifecycle.history().to_vec(),
            });
        };

        // 3. Normalize and store
        advance(&mut lifecycle, WebhookState::Processing);
        let record = self.normalize(&event, &session);

        let outcome = match self.store(&event.id, &record).await {
            Ok((columns, added_columns)) => {
                advance(&mut lifecycle, WebhookState::Stored);
                tracing::info!(
                    event_id = %event.id,
                    session_id = %session.session_id,
                    spreadsheet_id = %self.target.spreadsheet_id,
                    columns,
                    "Payment data stored"
                );
                WebhookOutcome::Stored {
                    columns,
                    added_columns,
                }
            }
            Err(failure) => {
                advance(&mut lifecycle, WebhookState::StoreFailed);
                tracing::error!(
                    event_id = %event.id,
                    session_id = %session.session_id,
                    spreadsheet_id = %self.target.spreadsheet_id,
                    failure = failure.kind(),
                    error = %failure,
                    "Failed to store payment data; acknowledging anyway"
                );
                WebhookOutcome::StoreFailed(failure)
            }
        };

        advance(&mut lifecycle, WebhookState::Acknowledged);

        Ok(HandlePaymentWebhookResult {
            event_id: event.id,
            event_type: event.event_type,
            outcome,
            states: lifecycle.history().to_vec(),
        })
    }

    fn verify_and_extract(
        &self,
        cmd: &HandlePaymentWebhookCommand,
    ) -> Result<(StripeEvent, Option<PaymentSession>), WebhookError> {
        let signature = cmd
            .signature
            .as_deref()
            .ok_or(WebhookError::MissingSignature)?;

        let event = self.verifier.verify_and_parse(&cmd.payload, signature)?;
        let session = self.normalizer.session_from_event(&event)?;
        Ok((event, session))
    }

    fn normalize(&self, event: &StripeEvent, session: &PaymentSession) -> NormalizedRecord {
        let normalization = self.normalizer.normalize(session, Timestamp::now());

        for key in &normalization.discarded_keys {
            tracing::debug!(
                event_id = %event.id,
                key = %key,
                "Metadata key collides with a system field; discarded"
            );
        }

        normalization.record
    }

    /// Reconciles the header, appends the row and auto-sizes columns.
    ///
    /// Returns the column count and the headers added.
    async fn store(
        &self,
        event_id: &str,
        record: &NormalizedRecord,
    ) -> Result<(usize, Vec<String>), StorageFailure> {
        let current = self
            .sheet_store
            .read_header(&self.target)
            .await
            .map_err(|e| classify(e, StorageFailure::SchemaReadFailed))?;

        let reconciliation = SheetSchema::new(current).reconcile(record.field_names());

        if reconciliation.requires_write() {
            self.sheet_store
                .write_header(&self.target, reconciliation.schema.headers())
                .await
                .map_err(|e| classify(e, StorageFailure::SchemaWriteFailed))?;

            tracing::info!(
                event_id,
                added = ?reconciliation.added,
                "Extended sheet header"
            );
        }

        let schema = reconciliation.schema;
        let row = map_row(&schema, record);

        self.append_with_retry(event_id, &row).await?;

        if let Err(e) = self
            .sheet_store
            .autosize_columns(&self.target, schema.len())
            .await
        {
            let failure = StorageFailure::CosmeticFormattingFailed(e.to_string());
            tracing::warn!(event_id, error = %failure, "Column auto-resize failed");
        }

        Ok((schema.len(), reconciliation.added))
    }

    /// Appends the row, retrying once after a pause when the failure is transient.
    async fn append_with_retry(
        &self,
        event_id: &str,
        row: &SheetRow,
    ) -> Result<(), StorageFailure> {
        let mut attempt = 1;
        loop {
            match self.sheet_store.append_row(&self.target, row).await {
                Ok(()) => return Ok(()),
                Err(e) if e.retryable && attempt == 1 => {
                    tracing::warn!(
                        event_id,
                        attempt,
                        error = %e,
                        delay_ms = self.append_retry_delay.as_millis() as u64,
                        "Append failed, retrying"
                    );
                    tokio::time::sleep(self.append_retry_delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(classify(e, StorageFailure::AppendFailed)),
            }
        }
    }
}

/// Missing credentials surface as their own failure at any stage.
fn classify(err: SheetError, stage: fn(String) -> StorageFailure) -> StorageFailure {
    if err.is_credentials_missing() {
        StorageFailure::CredentialsMissing(err.message)
    } else {
        stage(err.to_string())
    }
}

/// Advances the lifecycle. A refused transition is logged, never returned.
fn advance(lifecycle: &mut WebhookLifecycle, next: WebhookState) {
    if let Err(e) = lifecycle.advance(next) {
        tracing::error!(
            from = %lifecycle.state(),
            to = %next,
            error = %e,
            "Invalid webhook lifecycle transition"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::google_sheets::{InMemorySheetStore, SheetOperation};
    use crate::domain::submission::{sign_payload, CellValue};
    use crate::ports::SheetErrorCode;

    const SECRET: &str = "whsec_test_secret";

    // ════════════════════════════════════════════════════════════════════════════
    // Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn target() -> SheetTarget {
        SheetTarget::new("ss_test", "Sheet1")
    }

    fn handler(store: &InMemorySheetStore) -> HandlePaymentWebhookHandler {
        let mut settings = WebhookStorageSettings::new(target());
        settings.append_retry_delay = Duration::from_millis(1);
        HandlePaymentWebhookHandler::new(
            StripeWebhookVerifier::new(SECRET),
            Arc::new(store.clone()),
            settings,
        )
    }

    fn checkout_payload(metadata: serde_json::Value) -> Vec<u8> {
        serde_json::json!({
            "id": "evt_test_1",
            "type": "checkout.session.completed",
            "created": 1704067200,
            "livemode": false,
            "data": {"object": {
                "id": "cs_test_1",
                "payment_intent": "pi_123",
                "amount_total": 1250,
                "currency": "usd",
                "customer_details": {"email": "jo@x.com", "name": "Jo"},
                "metadata": metadata
            }}
        })
        .to_string()
        .into_bytes()
    }

    fn signed(payload: Vec<u8>) -> HandlePaymentWebhookCommand {
        let signature = sign_payload(SECRET, Timestamp::now().as_unix_secs(), &payload);
        HandlePaymentWebhookCommand {
            payload,
            signature: Some(signature),
        }
    }

    fn column(store: &InMemorySheetStore, name: &str) -> CellValue {
        let header = store.header(&target());
        let index = header.iter().position(|h| h == name).unwrap();
        store.rows(&target())[0][index].clone()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Verification
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn missing_signature_is_rejected() {
        let store = InMemorySheetStore::new();
        let cmd = HandlePaymentWebhookCommand {
            payload: checkout_payload(serde_json::json!({})),
            signature: None,
        };

        let err = handler(&store).handle(cmd).await.unwrap_err();

        assert_eq!(err, WebhookError::MissingSignature);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn bad_signature_has_no_side_effects() {
        let store = InMemorySheetStore::new();
        let mut cmd = signed(checkout_payload(serde_json::json!({})));
        cmd.payload.push(b' ');

        let err = handler(&store).handle(cmd).await.unwrap_err();

        assert_eq!(err, WebhookError::InvalidSignature);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn malformed_checkout_object_is_rejected() {
        let store = InMemorySheetStore::new();
        let payload = serde_json::json!({
            "id": "evt_bad",
            "type": "checkout.session.completed",
            "data": {"object": {"amount_total": "twelve"}}
        })
        .to_string()
        .into_bytes();

        let err = handler(&store).handle(signed(payload)).await.unwrap_err();

        assert!(matches!(err, WebhookError::MalformedEvent(_)));
        assert!(store.calls().is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Storage
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn checkout_on_empty_sheet_writes_header_and_row() {
        let store = InMemorySheetStore::new();

        let result = handler(&store)
            .handle(signed(checkout_payload(serde_json::json!({"promoCode": "SPRING"}))))
            .await
            .unwrap();

        assert_eq!(
            store.header(&target()),
            vec![
                "timestamp",
                "name",
                "email",
                "paymentStatus",
                "paymentId",
                "paymentAmount",
                "promoCode"
            ]
        );
        assert_eq!(store.rows(&target()).len(), 1);
        assert_eq!(column(&store, "name"), CellValue::Text("Jo".into()));
        assert_eq!(column(&store, "paymentAmount"), CellValue::Number(12.5));
        assert_eq!(column(&store, "promoCode"), CellValue::Text("SPRING".into()));
        assert!(matches!(result.outcome, WebhookOutcome::Stored { columns: 7, .. }));
        assert_eq!(
            result.states,
            vec![
                WebhookState::Received,
                WebhookState::Verifying,
                WebhookState::Verified,
                WebhookState::Processing,
                WebhookState::Stored,
                WebhookState::Acknowledged
            ]
        );
    }

    #[tokio::test]
    async fn existing_header_order_is_kept() {
        let store = InMemorySheetStore::new();
        store.set_header(&target(), &["email", "timestamp", "notes"]);

        handler(&store)
            .handle(signed(checkout_payload(serde_json::json!({}))))
            .await
            .unwrap();

        let header = store.header(&target());
        assert_eq!(&header[..3], &["email", "timestamp", "notes"]);
        assert_eq!(column(&store, "email"), CellValue::Text("jo@x.com".into()));
        assert_eq!(column(&store, "notes"), CellValue::empty());
    }

    #[tokio::test]
    async fn header_not_rewritten_when_complete() {
        let store = InMemorySheetStore::new();
        store.set_header(
            &target(),
            &["timestamp", "name", "email", "paymentStatus", "paymentId", "paymentAmount"],
        );

        handler(&store)
            .handle(signed(checkout_payload(serde_json::json!({}))))
            .await
            .unwrap();

        assert_eq!(store.call_count(SheetOperation::WriteHeader), 0);
        assert_eq!(store.call_count(SheetOperation::AppendRow), 1);
    }

    #[tokio::test]
    async fn photo_urls_land_in_one_cell() {
        let store = InMemorySheetStore::new();

        handler(&store)
            .handle(signed(checkout_payload(serde_json::json!({"photoUrls": "a,b,c"}))))
            .await
            .unwrap();

        assert_eq!(column(&store, "photoUrls"), CellValue::Text("a\nb\nc".into()));
    }

    #[tokio::test]
    async fn non_checkout_event_is_acknowledged_without_append() {
        let store = InMemorySheetStore::new();
        let payload = serde_json::json!({
            "id": "evt_other",
            "type": "payment_intent.succeeded",
            "data": {"object": {"id": "pi_1"}}
        })
        .to_string()
        .into_bytes();

        let result = handler(&store).handle(signed(payload)).await.unwrap();

        assert_eq!(result.outcome, WebhookOutcome::Ignored);
        assert_eq!(result.states.last(), Some(&WebhookState::Acknowledged));
        assert!(store.calls().is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Failure Handling
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn append_failure_is_absorbed() {
        let store = InMemorySheetStore::new();
        store.fail_always(
            SheetOperation::AppendRow,
            SheetError::new(SheetErrorCode::RequestRejected, "bad range"),
        );

        let result = handler(&store)
            .handle(signed(checkout_payload(serde_json::json!({}))))
            .await
            .unwrap();

        assert!(matches!(
            result.outcome,
            WebhookOutcome::StoreFailed(StorageFailure::AppendFailed(_))
        ));
        assert!(result.states.contains(&WebhookState::StoreFailed));
        assert_eq!(result.states.last(), Some(&WebhookState::Acknowledged));
        // Non-transient failures are not retried
        assert_eq!(store.call_count(SheetOperation::AppendRow), 1);
    }

    #[tokio::test]
    async fn transient_append_failure_is_retried_once() {
        let store = InMemorySheetStore::new();
        store.fail_next(SheetOperation::AppendRow, SheetError::network("reset"));

        let result = handler(&store)
            .handle(signed(checkout_payload(serde_json::json!({}))))
            .await
            .unwrap();

        assert!(matches!(result.outcome, WebhookOutcome::Stored { .. }));
        assert_eq!(store.call_count(SheetOperation::AppendRow), 2);
        assert_eq!(store.rows(&target()).len(), 1);
    }

    #[tokio::test]
    async fn retry_gives_up_after_second_transient_failure() {
        let store = InMemorySheetStore::new();
        store.fail_times(SheetOperation::AppendRow, SheetError::timeout("slow"), 2);

        let result = handler(&store)
            .handle(signed(checkout_payload(serde_json::json!({}))))
            .await
            .unwrap();

        assert!(matches!(
            result.outcome,
            WebhookOutcome::StoreFailed(StorageFailure::AppendFailed(_))
        ));
        assert_eq!(store.call_count(SheetOperation::AppendRow), 2);
    }

    #[tokio::test]
    async fn schema_read_failure_aborts_storage() {
        let store = InMemorySheetStore::new();
        store.fail_next(SheetOperation::ReadHeader, SheetError::network("down"));

        let result = handler(&store)
            .handle(signed(checkout_payload(serde_json::json!({}))))
            .await
            .unwrap();

        assert!(matches!(
            result.outcome,
            WebhookOutcome::StoreFailed(StorageFailure::SchemaReadFailed(_))
        ));
        assert_eq!(store.call_count(SheetOperation::AppendRow), 0);
    }

    #[tokio::test]
    async fn schema_write_failure_aborts_storage() {
        let store = InMemorySheetStore::new();
        store.fail_next(
            SheetOperation::WriteHeader,
            SheetError::new(SheetErrorCode::RequestRejected, "protected range"),
        );

        let result = handler(&store)
            .handle(signed(checkout_payload(serde_json::json!({}))))
            .await
            .unwrap();

        assert!(matches!(
            result.outcome,
            WebhookOutcome::StoreFailed(StorageFailure::SchemaWriteFailed(_))
        ));
        assert_eq!(store.call_count(SheetOperation::AppendRow), 0);
    }

    #[tokio::test]
    async fn missing_credentials_are_reported_as_such() {
        let store = InMemorySheetStore::new();
        store.fail_always(
            SheetOperation::ReadHeader,
            SheetError::credentials_missing("no service account"),
        );

        let result = handler(&store)
            .handle(signed(checkout_payload(serde_json::json!({}))))
            .await
            .unwrap();

        assert!(matches!(
            result.outcome,
            WebhookOutcome::StoreFailed(StorageFailure::CredentialsMissing(_))
        ));
    }

    #[tokio::test]
    async fn autosize_failure_does_not_fail_the_append() {
        let store = InMemorySheetStore::new();
        store.fail_always(SheetOperation::AutosizeColumns, SheetError::network("x"));

        let result = handler(&store)
            .handle(signed(checkout_payload(serde_json::json!({}))))
            .await
            .unwrap();

        assert!(matches!(result.outcome, WebhookOutcome::Stored { .. }));
        assert_eq!(store.rows(&target()).len(), 1);
    }
}
