//! Operator interrupts (Ctrl-C).
//!
//! While a render runs, an interrupt cancels it; at the prompt it ends the
//! loop.

use tokio::sync::mpsc;

/// Stream of interrupt requests consumed by the loop.
#[derive(Debug)]
pub struct Interrupts {
    rx: Option<mpsc::UnboundedReceiver<()>>,
}

impl Interrupts {
    /// Never fires.
    pub fn none() -> Self {
        Self { rx: None }
    }

    /// Fires once per message received on `rx`.
    pub fn from_channel(rx: mpsc::UnboundedReceiver<()>) -> Self {
        Self { rx: Some(rx) }
    }

    /// Fires once per Ctrl-C. Must be called inside a tokio runtime.
    pub fn ctrl_c() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if tx.send(()).is_err() {
                    break;
                }
            }
        });
        Self::from_channel(rx)
    }

    /// Resolve at the next interrupt. Pends forever once the source is gone.
    pub async fn next(&mut self) {
        if let Some(rx) = self.rx.as_mut() {
            if rx.recv().await.is_some() {
                return;
            }
            self.rx = None;
        }
        std::future::pending::<()>().await
    }
}
