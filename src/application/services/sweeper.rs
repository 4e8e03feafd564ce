use std::{sync::Arc, time::Duration as StdDuration};

use crate::application::{
    ApplicationResult,
    ports::{
        authorization_code::AuthorizationCodeStore, ticket_store::TicketStore, time::Clock,
        token_store::TokenStore,
    },
};
use chrono::Duration;
use tokio::task::JoinHandle;

/// Entries are only swept once they have been expired for this long, so a redemption
/// that read the clock just before expiry never races the sweeper.
pub const SWEEP_GRACE_SECONDS: i64 = 60;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub tickets: usize,
    pub codes: usize,
    pub tokens: usize,
}

impl SweepReport {
    pub const fn total(&self) -> usize {
        self.tickets + self.codes + self.tokens
    }
}

pub struct ExpirySweeper {
    tickets: Arc<dyn TicketStore>,
    codes: Arc<dyn AuthorizationCodeStore>,
    tokens: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
}

impl ExpirySweeper {
    pub fn new(
        tickets: Arc<dyn TicketStore>,
        codes: Arc<dyn AuthorizationCodeStore>,
        tokens: Arc<dyn TokenStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tickets,
            codes,
            tokens,
            clock,
        }
    }

    pub async fn sweep_once(&self) -> ApplicationResult<SweepReport> {
        let cutoff = self.clock.now() - Duration::seconds(SWEEP_GRACE_SECONDS);
        Ok(SweepReport {
            tickets: self.tickets.purge_expired(cutoff).await?,
            codes: self.codes.purge_expired(cutoff).await?,
            tokens: self.tokens.purge_expired(cutoff).await?,
        })
    }

    /// Run `sweep_once` on a fixed period until the task is aborted.
    pub fn spawn(self: Arc<Self>, period: StdDuration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match self.sweep_once().await {
                    Ok(report) if report.total() > 0 => {
                        tracing::debug!(
                            tickets = report.tickets,
                            codes = report.codes,
                            tokens = report.tokens,
                            "expired entries swept"
                        );
                    }
                    Ok(_) => {}
                    Err(err) => tracing::warn!(error = %err, "expiry sweep failed"),
                }
            }
        })
    }
}
