//! Expiration sweep.
//!
//! For each [`NotificationStage`] the sweep selects offers in the stage's
//! deadline window whose flag is still unset, emails every recipient, then
//! flips the flag with a conditional update. The flag is flipped even when
//! some sends fail, so each notice is attempted at most once.

use std::sync::Arc;

use async_trait::async_trait;
use portal_core::lifecycle::NotificationStage;
use portal_core::offers::{notification_recipients, Recipient};
use portal_core::types::{Date, DbId};
use portal_db::models::offer::DueOffer;
use portal_db::repositories::{LogRepo, OfferRepo};
use portal_events::templates::{offer_expired, upcoming_expiration, GENERIC_RECIPIENT_NAME};
use portal_events::Mailer;
use serde::Serialize;
use sqlx::PgPool;

/// Persistence the sweep needs. Implemented over PostgreSQL by
/// [`PgLifecycleStore`] and by in-memory fakes in tests.
#[async_trait]
pub trait LifecycleStore: Send + Sync {
    /// Offers in `stage`'s window for `as_of` whose stage flag is still `false`.
    async fn due_offers(
        &self,
        stage: NotificationStage,
        as_of: Date,
    ) -> Result<Vec<DueOffer>, sqlx::Error>;

    /// Flip the stage flag `false -> true`. `Ok(false)` if it was already set.
    async fn mark_notified(
        &self,
        offer_id: DbId,
        stage: NotificationStage,
    ) -> Result<bool, sqlx::Error>;

    async fn append_log(&self, message: &str) -> Result<(), sqlx::Error>;
}

pub struct PgLifecycleStore {
    pool: PgPool,
}

impl PgLifecycleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LifecycleStore for PgLifecycleStore {
    async fn due_offers(
        &self,
        stage: NotificationStage,
        as_of: Date,
    ) -> Result<Vec<DueOffer>, sqlx::Error> {
        OfferRepo::list_due(&self.pool, stage, as_of).await
    }

    async fn mark_notified(
        &self,
        offer_id: DbId,
        stage: NotificationStage,
    ) -> Result<bool, sqlx::Error> {
        OfferRepo::mark_notified(&self.pool, offer_id, stage).await
    }

    async fn append_log(&self, message: &str) -> Result<(), sqlx::Error> {
        LogRepo::append(&self.pool, message).await.map(|_| ())
    }
}

/// Outcome of one stage of a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: NotificationStage,
    pub offers_selected: usize,
    /// Offers whose flag this run flipped.
    pub offers_marked: usize,
    pub emails_sent: usize,
    pub emails_failed: usize,
    /// Set when the stage could not select its offers at all.
    pub error: Option<String>,
}

impl StageReport {
    fn new(stage: NotificationStage) -> Self {
        Self {
            stage,
            offers_selected: 0,
            offers_marked: 0,
            emails_sent: 0,
            emails_failed: 0,
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub as_of: Date,
    pub stages: Vec<StageReport>,
}

impl SweepReport {
    pub fn stage(&self, stage: NotificationStage) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    pub fn emails_sent(&self) -> usize {
        self.stages.iter().map(|s| s.emails_sent).sum()
    }

    pub fn has_errors(&self) -> bool {
        self.stages.iter().any(|s| s.error.is_some())
    }
}

pub struct ExpirationSweep {
    store: Arc<dyn LifecycleStore>,
    mailer: Arc<dyn Mailer>,
}

impl ExpirationSweep {
    pub fn new(store: Arc<dyn LifecycleStore>, mailer: Arc<dyn Mailer>) -> Self {
        Self { store, mailer }
    }

    /// Run every stage for `as_of`. A failing stage does not stop the others.
    pub async fn run(&self, as_of: Date) -> SweepReport {
        let mut stages = Vec::with_capacity(NotificationStage::ALL.len());
        for stage in NotificationStage::ALL {
            stages.push(self.run_stage(stage, as_of).await);
        }
        SweepReport { as_of, stages }
    }

    async fn run_stage(&self, stage: NotificationStage, as_of: Date) -> StageReport {
        let mut report = StageReport::new(stage);

        let offers = match self.store.due_offers(stage, as_of).await {
            Ok(offers) => offers,
            Err(e) => {
                tracing::error!(%stage, %as_of, error = %e, "Expiration sweep: stage query failed");
                report.error = Some(e.to_string());
                return report;
            }
        };
        report.offers_selected = offers.len();

        for offer in &offers {
            self.notify_offer(stage, offer, &mut report).await;
        }

        if report.offers_selected > 0 {
            tracing::info!(
                %stage,
                %as_of,
                offers = report.offers_selected,
                sent = report.emails_sent,
                failed = report.emails_failed,
                "Expiration sweep: stage processed",
            );
        }
        report
    }

    async fn notify_offer(&self, stage: NotificationStage, offer: &DueOffer, report: &mut StageReport) {
        let recipients = notification_recipients(&offer.creator_email, &offer.notification_emails);
        let subject = stage.subject(&offer.title);

        for recipient in &recipients {
            let body = self.render(stage, offer, recipient);
            match self.mailer.send(&recipient.email, &subject, &body).await {
                Ok(()) => {
                    report.emails_sent += 1;
                    let line = stage.sent_audit_line(&offer.title, &recipient.email, recipient.is_creator);
                    self.audit(&line).await;
                }
                Err(e) => {
                    report.emails_failed += 1;
                    tracing::warn!(
                        offer_id = offer.id,
                        %stage,
                        to = %recipient.email,
                        error = %e,
                        "Expiration notice failed",
                    );
                }
            }
        }

        match self.store.mark_notified(offer.id, stage).await {
            Ok(true) => report.offers_marked += 1,
            Ok(false) => {
                tracing::debug!(offer_id = offer.id, %stage, "Flag already set by another sweep");
            }
            Err(e) => {
                tracing::error!(
                    offer_id = offer.id,
                    %stage,
                    error = %e,
                    "Failed to set notification flag; offer will be retried",
                );
            }
        }

        self.audit(&stage.processed_audit_line(&offer.title, recipients.len()))
            .await;
    }

    fn render(&self, stage: NotificationStage, offer: &DueOffer, recipient: &Recipient) -> String {
        let name = if recipient.is_creator {
            offer.creator_name.as_str()
        } else {
            GENERIC_RECIPIENT_NAME
        };
        match stage.days_remaining() {
            Some(days) => upcoming_expiration(name, &offer.title, offer.deadline, days),
            None => offer_expired(name, &offer.title, offer.deadline),
        }
    }

    async fn audit(&self, message: &str) {
        if let Err(e) = self.store.append_log(message).await {
            tracing::warn!(error = %e, "Failed to write audit log entry");
        }
    }
}
