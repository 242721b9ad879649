// Job id generation

use uuid::Uuid;

/// Source of staging file names.
/// Ids must be unique among jobs that are in flight at the same time.
pub trait JobIdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random 128-bit ids rendered as 32 hex characters
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJobIds;

impl JobIdGenerator for RandomJobIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}
