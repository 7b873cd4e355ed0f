use std::time::Duration;

use tokio::sync::mpsc;

/// Applies only the last value of each burst of input.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    wait: Duration,
}

impl Debouncer {
    pub fn new(wait: Duration) -> Self {
        Self { wait }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Run until `rx` closes. A value still pending at close is applied
    /// immediately.
    pub async fn run<T, F>(self, mut rx: mpsc::Receiver<T>, mut apply: F)
    where
        F: FnMut(T),
    {
        let mut pending: Option<T> = None;

        loop {
            if pending.is_none() {
                match rx.recv().await {
                    Some(value) => pending = Some(value),
                    None => return,
                }
                continue;
            }

            tokio::select! {
                value = rx.recv() => match value {
                    Some(value) => pending = Some(value),
                    None => {
                        if let Some(value) = pending.take() {
                            apply(value);
                        }
                        return;
                    }
                },
                _ = tokio::time::sleep(self.wait) => {
                    if let Some(value) = pending.take() {
                        apply(value);
                    }
                }
            }
        }
    }
}
