use std::time::Duration;

use crate::config::{Config, SuppressionPolicy};
use crate::error::{CycleError, ErrorKind};
use crate::logger;
use crate::practicum::StatusSource;
use crate::status::{check_response, current_date, parse_status};
use crate::telegram::{ChatSender, Notifier};

pub const EMPTY_LIST_MESSAGE: &str = "Список домашних работ пуст: новых статусов нет.";

/// Remembers the unresolved failure, if any, so a failure streak is
/// reported to the chat only once.
#[derive(Debug, Default)]
pub struct FailureMemo {
    last: Option<ErrorKind>,
}

impl FailureMemo {
    pub fn should_notify(&self, kind: ErrorKind, policy: SuppressionPolicy) -> bool {
        match (self.last, policy) {
            (None, _) => true,
            (Some(_), SuppressionPolicy::Streak) => false,
            (Some(last), SuppressionPolicy::PerKind) => last != kind,
        }
    }

    pub fn record(&mut self, kind: ErrorKind) {
        self.last = Some(kind);
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Success { messages: usize },
    Failure { kind: ErrorKind, user_notified: bool },
}

pub struct Poller<S, C> {
    source: S,
    notifier: Notifier<C>,
    cursor: i64,
    memo: FailureMemo,
    policy: SuppressionPolicy,
    retry_period: Duration,
}

impl<S: StatusSource, C: ChatSender> Poller<S, C> {
    pub fn new(source: S, sender: C, config: &Config, cursor: i64) -> Self {
        Self {
            source,
            notifier: Notifier::new(sender),
            cursor,
            memo: FailureMemo::default(),
            policy: config.suppression,
            retry_period: config.retry_period,
        }
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Polls forever. Only a process signal ends this.
    pub async fn run(mut self) {
        loop {
            self.run_cycle().await;
            tokio::time::sleep(self.retry_period).await;
        }
    }

    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let from_date = self.cursor;
        logger::cycle_started(from_date);

        match self.poll(from_date).await {
            Ok((messages, server_date)) => {
                self.memo.clear();
                let mut delivered = 0;
                for message in &messages {
                    if self.notifier.notify(message).await {
                        delivered += 1;
                    }
                }
                self.advance(server_date);
                logger::cycle_succeeded(from_date, self.cursor, delivered);
                CycleOutcome::Success {
                    messages: messages.len(),
                }
            }
            Err(err) => {
                let kind = err.kind();
                let user_notified = self.memo.should_notify(kind, self.policy);
                if user_notified {
                    self.notifier
                        .notify(&format!("Сбой в работе программы: {err}"))
                        .await;
                }
                self.memo.record(kind);
                logger::cycle_failed(&err, user_notified);
                CycleOutcome::Failure {
                    kind,
                    user_notified,
                }
            }
        }
    }

    /// Fetches, validates and renders one batch. Every record is rendered
    /// before anything is sent, so a bad record fails the whole batch.
    async fn poll(&self, from_date: i64) -> Result<(Vec<String>, Option<i64>), CycleError> {
        let response = self.source.fetch(from_date).await?;
        let homeworks = check_response(&response)?;

        let messages = if homeworks.is_empty() {
            vec![EMPTY_LIST_MESSAGE.to_string()]
        } else {
            homeworks
                .iter()
                .map(parse_status)
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok((messages, current_date(&response)))
    }

    fn advance(&mut self, server_date: Option<i64>) {
        match server_date {
            Some(date) => self.cursor = self.cursor.max(date),
            None => logger::cursor_not_reported(self.cursor),
        }
    }
}
