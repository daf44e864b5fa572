//! Result stream between probe tasks and the metrics consumer
//!
//! A many-producer, single-consumer channel decouples probe cadence from the
//! consumer's drain cadence. Probe tasks are the only producers; per-target
//! metric state is mutated exclusively by the single draining consumer, so no
//! per-target locking is needed anywhere else.

use tokio::sync::mpsc;

/// A completed probe delivered from an executor task to the consumer side
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    /// Probe target
    pub target: String,
    /// Wall-clock timestamp of probe dispatch, epoch seconds
    pub timestamp: f64,
    /// Parsed round-trip time in milliseconds, absent on timeout or failure
    pub rtt_ms: Option<f64>,
    /// Raw probe output retained for diagnostics
    pub raw_output: String,
}

/// Sending half held by probe tasks (cheaply cloneable)
#[derive(Debug, Clone)]
pub struct ResultSender {
    tx: mpsc::UnboundedSender<ProbeResult>,
}

impl ResultSender {
    /// Deliver a completed probe result.
    ///
    /// Delivery failure means the consumer is gone (run stopped); the result
    /// is silently dropped, matching cooperative shutdown semantics.
    pub fn send(&self, result: ProbeResult) {
        let _ = self.tx.send(result);
    }
}

/// Receiving half held by the single consumer
#[derive(Debug)]
pub struct ResultReceiver {
    rx: mpsc::UnboundedReceiver<ProbeResult>,
}

impl ResultReceiver {
    /// Wait for the next probe result; `None` once all senders are dropped
    pub async fn recv(&mut self) -> Option<ProbeResult> {
        self.rx.recv().await
    }

    /// Drain any already-delivered results without waiting
    pub fn try_recv(&mut self) -> Option<ProbeResult> {
        self.rx.try_recv().ok()
    }
}

/// Create a connected result stream pair
pub fn result_stream() -> (ResultSender, ResultReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ResultSender { tx }, ResultReceiver { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(target: &str, rtt_ms: Option<f64>) -> ProbeResult {
        ProbeResult {
            target: target.to_string(),
            timestamp: 100.0,
            rtt_ms,
            raw_output: String::new(),
        }
    }

    #[tokio::test]
    async fn test_multi_producer_single_consumer() {
        let (tx, mut rx) = result_stream();

        let mut handles = Vec::new();
        for i in 0..4 {
            let tx = tx.clone();
            handles.push(tokio::spawn(async move {
                tx.send(result(&format!("t{}", i), Some(i as f64)));
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        drop(tx);

        let mut seen = Vec::new();
        while let Some(r) = rx.recv().await {
            seen.push(r.target);
        }
        seen.sort();
        assert_eq!(seen, vec!["t0", "t1", "t2", "t3"]);
    }

    #[tokio::test]
    async fn test_send_after_receiver_dropped_is_silent() {
        let (tx, rx) = result_stream();
        drop(rx);
        // Must not panic or error out
        tx.send(result("a", None));
    }

    #[tokio::test]
    async fn test_try_recv_non_blocking() {
        let (tx, mut rx) = result_stream();
        assert!(rx.try_recv().is_none());
        tx.send(result("a", Some(1.0)));
        assert_eq!(rx.try_recv().unwrap().target, "a");
        assert!(rx.try_recv().is_none());
    }
}
