//! Connection manager: build a client and probe it, a bounded number of times.

use std::future::Future;

use tracing::{info, warn};

use crate::retry::{retry_fixed, Retry, RetryPolicy};
use super::SearchBackend;

#[derive(Debug)]
pub enum Connection<B> {
    Live(B),
    Unavailable { attempts: u32 },
}

/// Calls `build` then `ping` on each attempt. Transport and protocol errors are
/// logged and counted; only exhaustion is reported, as `Connection::Unavailable`.
pub async fn connect_with_retry<B, F, Fut>(policy: RetryPolicy, mut build: F) -> Connection<B>
where
    B: SearchBackend,
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<B>>,
{
    let outcome = retry_fixed(policy, "search engine connection attempt", || {
        let attempt = build();
        async move {
            let backend = attempt.await?;
            backend.ping().await?;
            Ok::<_, anyhow::Error>(backend)
        }
    })
    .await;

    match outcome {
        Retry::Done(backend) => {
            info!("search engine reachable");
            Connection::Live(backend)
        }
        Retry::Exhausted { attempts, .. } => {
            warn!(attempts, "search engine unreachable, giving up");
            Connection::Unavailable { attempts }
        }
    }
}
