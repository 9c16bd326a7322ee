//! Expiration sweep against PostgreSQL.
//!
//! The offer is created through the API; the sweep then runs over
//! `PgLifecycleStore` with the test app's recording mailer.

mod common;

use std::sync::Arc;

use common::{date, TestApp};
use portal_api::engine::lifecycle::{ExpirationSweep, PgLifecycleStore};
use portal_core::lifecycle::NotificationStage;
use portal_db::repositories::LogRepo;
use sqlx::PgPool;

async fn flags(pool: &PgPool, offer_id: i64) -> (bool, bool, bool) {
    sqlx::query_as(
        "SELECT two_day_notified, one_day_notified, deadline_notified FROM offers WHERE id = $1",
    )
    .bind(offer_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn log_messages(pool: &PgPool) -> Vec<String> {
    LogRepo::list(pool)
        .await
        .unwrap()
        .into_iter()
        .map(|entry| entry.message)
        .collect()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_sweep_walks_offer_through_every_stage(pool: PgPool) {
    let app = TestApp::new(pool.clone(), "2025-01-05");
    let (_, token) = app.seed_user("HR Lead", "hr@x.com", "comite_ajout").await;
    let project_id = app.create_project(&token, "Payroll").await;
    let offer_id = app
        .create_offer(&token, project_id, "candidature", "Data Analyst", "2025-01-10")
        .await;

    let sweep = ExpirationSweep::new(
        Arc::new(PgLifecycleStore::new(pool.clone())),
        app.mailer.clone(),
    );

    // Two days out: creator first, then the notification address.
    let report = sweep.run(date("2025-01-08")).await;
    assert!(!report.has_errors());
    let two_day = report.stage(NotificationStage::TwoDay).unwrap();
    assert_eq!(two_day.offers_selected, 1);
    assert_eq!(two_day.offers_marked, 1);
    assert_eq!(two_day.emails_sent, 2);

    let sent = app.mailer.sent();
    let to: Vec<&str> = sent.iter().map(|m| m.to.as_str()).collect();
    assert_eq!(to, vec!["hr@x.com", "a@x.com"]);
    assert!(sent
        .iter()
        .all(|m| m.subject == "Offer Expiring in 2 Days: Data Analyst"));
    assert!(sent[0].body.contains("HR Lead"));
    assert!(sent[1].body.contains("Notification Recipient"));
    assert_eq!(flags(&pool, offer_id).await, (true, false, false));

    let logs = log_messages(&pool).await;
    for expected in [
        "System sent 2-day expiration warning for offer \"Data Analyst\" to hr@x.com (HR creator)",
        "System sent 2-day expiration warning for offer \"Data Analyst\" to a@x.com (notification email)",
        "System processed 2-day warning for offer \"Data Analyst\" with 2 notification emails",
    ] {
        assert!(logs.iter().any(|m| m == expected), "missing audit line: {expected}");
    }

    // Same day again: nothing is re-sent.
    let report = sweep.run(date("2025-01-08")).await;
    assert_eq!(report.emails_sent(), 0);
    assert_eq!(app.mailer.sent().len(), 2);

    let report = sweep.run(date("2025-01-09")).await;
    assert_eq!(report.stage(NotificationStage::OneDay).unwrap().emails_sent, 2);
    assert_eq!(report.stage(NotificationStage::TwoDay).unwrap().offers_selected, 0);
    assert_eq!(flags(&pool, offer_id).await, (true, true, false));

    // Deadline day itself belongs to no stage.
    let report = sweep.run(date("2025-01-10")).await;
    assert_eq!(report.emails_sent(), 0);

    let report = sweep.run(date("2025-01-11")).await;
    let expired = report.stage(NotificationStage::Expired).unwrap();
    assert_eq!(expired.offers_marked, 1);
    assert_eq!(expired.emails_sent, 2);
    assert_eq!(flags(&pool, offer_id).await, (true, true, true));

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 6);
    assert_eq!(sent[2].subject, "Offer Expiring Tomorrow: Data Analyst");
    assert_eq!(sent[4].subject, "Offer Expired: Data Analyst");
    assert!(log_messages(&pool).await.iter().any(
        |m| m == "System processed expired offer \"Data Analyst\" with 2 notification emails"
    ));

    // Later runs leave the expired offer alone.
    let report = sweep.run(date("2025-01-20")).await;
    assert_eq!(report.emails_sent(), 0);
}
