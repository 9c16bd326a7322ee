//! Offer lifecycle calendar.
//!
//! Everything here is pure date arithmetic: which notification stage an
//! offer falls into on a given day, and whether its applications may still
//! be bundled for archival. Nothing is persisted; callers recompute on every
//! read.

use chrono::Duration;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::{Date, DbId};

/// Number of days after the deadline during which applications may be archived.
/// The boundary is inclusive: day 14 is open, day 15 is closed.
pub const ARCHIVE_WINDOW_DAYS: i64 = 14;

// ---------------------------------------------------------------------------
// Derived offer state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Active,
    Expired,
}

impl OfferStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveWindowStatus {
    Active,
    ArchiveWindowOpen,
    ArchiveWindowClosed,
}

impl ArchiveWindowStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::ArchiveWindowOpen => "archive_window_open",
            Self::ArchiveWindowClosed => "archive_window_closed",
        }
    }
}

/// Whole days elapsed since `deadline`. Negative while the offer is still open.
pub fn days_since_expiry(deadline: Date, today: Date) -> i64 {
    (today - deadline).num_days()
}

/// An offer expires the day after its deadline.
pub fn offer_status(deadline: Date, today: Date) -> OfferStatus {
    if deadline < today {
        OfferStatus::Expired
    } else {
        OfferStatus::Active
    }
}

pub fn archive_window_status(deadline: Date, today: Date) -> ArchiveWindowStatus {
    if deadline >= today {
        return ArchiveWindowStatus::Active;
    }
    if days_since_expiry(deadline, today) <= ARCHIVE_WINDOW_DAYS {
        ArchiveWindowStatus::ArchiveWindowOpen
    } else {
        ArchiveWindowStatus::ArchiveWindowClosed
    }
}

/// Why an offer's applications cannot be archived today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveIneligible {
    /// Deadline is today or later.
    NotExpired,
    /// Expired more than [`ARCHIVE_WINDOW_DAYS`] days ago.
    WindowClosed { days_since_expiry: i64 },
}

/// Returns the number of days since expiry when archiving is allowed.
pub fn archive_eligibility(deadline: Date, today: Date) -> Result<i64, ArchiveIneligible> {
    match archive_window_status(deadline, today) {
        ArchiveWindowStatus::Active => Err(ArchiveIneligible::NotExpired),
        ArchiveWindowStatus::ArchiveWindowOpen => Ok(days_since_expiry(deadline, today)),
        ArchiveWindowStatus::ArchiveWindowClosed => Err(ArchiveIneligible::WindowClosed {
            days_since_expiry: days_since_expiry(deadline, today),
        }),
    }
}

/// [`archive_eligibility`] lifted into the shared error taxonomy.
///
/// A not-yet-expired offer is reported as not found so that the archive
/// surface never hints at offers still accepting applications.
pub fn ensure_archivable(offer_id: DbId, deadline: Date, today: Date) -> Result<i64, CoreError> {
    archive_eligibility(deadline, today).map_err(|reason| match reason {
        ArchiveIneligible::NotExpired => CoreError::NotFound {
            entity: "ExpiredOffer",
            id: offer_id,
        },
        ArchiveIneligible::WindowClosed { days_since_expiry } => CoreError::ArchiveWindowClosed {
            offer_id,
            days_since_expiry,
        },
    })
}

// ---------------------------------------------------------------------------
// Notification stages
// ---------------------------------------------------------------------------

/// The three one-shot expiration notices, in sweep order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStage {
    TwoDay,
    OneDay,
    Expired,
}

/// How a stage selects offers relative to the sweep date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageWindow {
    /// `deadline == date`
    On(Date),
    /// `deadline < date`
    Before(Date),
}

impl StageWindow {
    pub fn contains(self, deadline: Date) -> bool {
        match self {
            Self::On(date) => deadline == date,
            Self::Before(date) => deadline < date,
        }
    }
}

impl NotificationStage {
    pub const ALL: [NotificationStage; 3] = [Self::TwoDay, Self::OneDay, Self::Expired];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TwoDay => "two_day",
            Self::OneDay => "one_day",
            Self::Expired => "expired",
        }
    }

    /// Column holding the stage's one-shot flag.
    pub fn flag_column(self) -> &'static str {
        match self {
            Self::TwoDay => "two_day_notified",
            Self::OneDay => "one_day_notified",
            Self::Expired => "deadline_notified",
        }
    }

    /// Audit line for one delivered notice.
    pub fn sent_audit_line(self, offer_title: &str, email: &str, is_creator: bool) -> String {
        let recipient_type = if is_creator {
            "HR creator"
        } else {
            "notification email"
        };
        let what = match self {
            Self::TwoDay => "2-day expiration warning",
            Self::OneDay => "1-day expiration warning",
            Self::Expired => "expiration notification",
        };
        format!("System sent {what} for offer \"{offer_title}\" to {email} ({recipient_type})")
    }

    /// Audit line written once per offer after its batch, whatever the outcome of each send.
    pub fn processed_audit_line(self, offer_title: &str, recipients: usize) -> String {
        match self {
            Self::TwoDay => format!(
                "System processed 2-day warning for offer \"{offer_title}\" with {recipients} notification emails"
            ),
            Self::OneDay => format!(
                "System processed 1-day warning for offer \"{offer_title}\" with {recipients} notification emails"
            ),
            Self::Expired => format!(
                "System processed expired offer \"{offer_title}\" with {recipients} notification emails"
            ),
        }
    }

    /// Days left before the deadline for the warning stages.
    pub fn days_remaining(self) -> Option<i64> {
        match self {
            Self::TwoDay => Some(2),
            Self::OneDay => Some(1),
            Self::Expired => None,
        }
    }

    /// Deadlines this stage picks up when the sweep runs on `as_of`.
    ///
    /// The warning stages match one exact date, so a skipped sweep day skips
    /// that warning. The expired stage catches up on any past deadline.
    pub fn window(self, as_of: Date) -> StageWindow {
        match self {
            Self::TwoDay => StageWindow::On(as_of + Duration::days(2)),
            Self::OneDay => StageWindow::On(as_of + Duration::days(1)),
            Self::Expired => StageWindow::Before(as_of),
        }
    }

    pub fn matches(self, deadline: Date, as_of: Date) -> bool {
        self.window(as_of).contains(deadline)
    }

    pub fn subject(self, offer_title: &str) -> String {
        match self {
            Self::TwoDay => format!("Offer Expiring in 2 Days: {offer_title}"),
            Self::OneDay => format!("Offer Expiring Tomorrow: {offer_title}"),
            Self::Expired => format!("Offer Expired: {offer_title}"),
        }
    }
}

impl std::fmt::Display for NotificationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Date {
        Date::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_window_boundary_is_inclusive_at_fourteen() {
        let deadline = d("2025-01-10");
        assert_eq!(
            archive_window_status(deadline, d("2025-01-24")),
            ArchiveWindowStatus::ArchiveWindowOpen
        );
        assert_eq!(
            archive_window_status(deadline, d("2025-01-25")),
            ArchiveWindowStatus::ArchiveWindowClosed
        );
    }

    #[test]
    fn test_deadline_day_is_still_active() {
        let deadline = d("2025-01-10");
        assert_eq!(offer_status(deadline, deadline), OfferStatus::Active);
        assert_eq!(
            archive_window_status(deadline, deadline),
            ArchiveWindowStatus::Active
        );
        assert_eq!(offer_status(deadline, d("2025-01-11")), OfferStatus::Expired);
        assert_eq!(days_since_expiry(deadline, d("2025-01-08")), -2);
    }

    #[test]
    fn test_archive_eligibility() {
        let deadline = d("2025-01-10");
        assert_eq!(
            archive_eligibility(deadline, d("2025-01-10")),
            Err(ArchiveIneligible::NotExpired)
        );
        assert_eq!(archive_eligibility(deadline, d("2025-01-20")), Ok(10));
        assert_eq!(
            archive_eligibility(deadline, d("2025-01-26")),
            Err(ArchiveIneligible::WindowClosed {
                days_since_expiry: 16
            })
        );
    }

    #[test]
    fn test_ensure_archivable_errors() {
        let deadline = d("2025-01-10");
        assert!(matches!(
            ensure_archivable(4, deadline, d("2025-01-09")),
            Err(CoreError::NotFound { id: 4, .. })
        ));
        assert!(matches!(
            ensure_archivable(4, deadline, d("2025-01-26")),
            Err(CoreError::ArchiveWindowClosed {
                offer_id: 4,
                days_since_expiry: 16
            })
        ));
    }

    #[test]
    fn test_stage_selection_is_exclusive() {
        let today = d("2025-01-08");
        let in_two = d("2025-01-10");
        assert!(NotificationStage::TwoDay.matches(in_two, today));
        assert!(!NotificationStage::OneDay.matches(in_two, today));
        assert!(!NotificationStage::Expired.matches(in_two, today));

        let tomorrow = d("2025-01-09");
        assert!(NotificationStage::OneDay.matches(tomorrow, today));
        assert!(!NotificationStage::TwoDay.matches(tomorrow, today));

        // Deadline today belongs to no stage.
        for stage in NotificationStage::ALL {
            assert!(!stage.matches(today, today));
        }
    }

    #[test]
    fn test_expired_stage_catches_up() {
        let today = d("2025-01-26");
        assert!(NotificationStage::Expired.matches(d("2025-01-11"), today));
        assert!(NotificationStage::Expired.matches(d("2024-06-01"), today));
    }

    #[test]
    fn test_subjects() {
        assert_eq!(
            NotificationStage::TwoDay.subject("Dev"),
            "Offer Expiring in 2 Days: Dev"
        );
        assert_eq!(
            NotificationStage::OneDay.subject("Dev"),
            "Offer Expiring Tomorrow: Dev"
        );
        assert_eq!(NotificationStage::Expired.subject("Dev"), "Offer Expired: Dev");
    }

    #[test]
    fn test_audit_lines() {
        assert_eq!(
            NotificationStage::TwoDay.sent_audit_line("Dev", "hr@x.com", true),
            "System sent 2-day expiration warning for offer \"Dev\" to hr@x.com (HR creator)"
        );
        assert_eq!(
            NotificationStage::Expired.sent_audit_line("Dev", "a@x.com", false),
            "System sent expiration notification for offer \"Dev\" to a@x.com (notification email)"
        );
        assert_eq!(
            NotificationStage::OneDay.processed_audit_line("Dev", 2),
            "System processed 1-day warning for offer \"Dev\" with 2 notification emails"
        );
    }
}
