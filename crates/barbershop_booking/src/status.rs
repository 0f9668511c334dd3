// --- File: crates/barbershop_booking/src/status.rs ---

//! Appointment status lifecycle.
//!
//! ```text
//! pending ──► confirmed ──► completed
//!    │            │
//!    └────────────┴──► cancelled
//! ```

use thiserror::Error;

pub use barbershop_common::models::AppointmentStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("appointment is already {0}")]
    SameState(AppointmentStatus),
    #[error("appointment is {0} and can no longer change")]
    Terminal(AppointmentStatus),
    #[error("cannot move appointment from {from} to {to}")]
    NotAllowed {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
}

/// Lifecycle queries on a status value.
pub trait Lifecycle {
    fn is_terminal(&self) -> bool;
    /// Statuses reachable in one step.
    fn next_states(&self) -> &'static [AppointmentStatus];
}

impl Lifecycle for AppointmentStatus {
    fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled
        )
    }

    fn next_states(&self) -> &'static [AppointmentStatus] {
        match self {
            AppointmentStatus::Pending => {
                &[AppointmentStatus::Confirmed, AppointmentStatus::Cancelled]
            }
            AppointmentStatus::Confirmed => {
                &[AppointmentStatus::Completed, AppointmentStatus::Cancelled]
            }
            AppointmentStatus::Completed | AppointmentStatus::Cancelled => &[],
        }
    }
}

pub fn can_transition(from: AppointmentStatus, to: AppointmentStatus) -> bool {
    from.next_states().contains(&to)
}

pub fn validate_transition(
    from: AppointmentStatus,
    to: AppointmentStatus,
) -> Result<(), TransitionError> {
    if from == to {
        return Err(TransitionError::SameState(from));
    }
    if from.is_terminal() {
        return Err(TransitionError::Terminal(from));
    }
    if !can_transition(from, to) {
        return Err(TransitionError::NotAllowed { from, to });
    }
    Ok(())
}
