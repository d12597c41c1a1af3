//! Scheduling for outbound emails. Delivery belongs to a separate sender process.

use super::Delegate;
use crate::error::AppError;
use crate::model::Email;

impl Delegate<Email> {
    /// Queue an email for the sender process; it must name a send time.
    pub async fn schedule(&self, email: &Email) -> Result<Email, AppError> {
        if email.get_scheduled_date().is_none() {
            return Err(AppError::Validation("email.scheduled_date is required".into()));
        }
        self.create(email).await
    }
}
