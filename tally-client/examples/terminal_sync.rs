//! Minimal wiring of the sync coordinator against a running server.
//!
//! Start tally-server first, then:
//!
//! ```text
//! cargo run -p tally-client --example terminal_sync
//! ```
//!
//! If the server is unreachable the checkout is queued in `terminal.redb`
//! and replayed automatically once connectivity is reported again.

use std::sync::Arc;

use shared::models::{CartLine, CheckoutRequest};
use tally_client::{ClientConfig, Connectivity, HttpClient, OfflineQueue, SyncCoordinator, connectivity};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::new("http://localhost:3000", "./terminal.redb");
    let client = HttpClient::new(&config)?;
    let queue = OfflineQueue::open(&config.store_path)?;
    let (handle, observer) = connectivity::channel(Connectivity::Online);
    let shutdown = CancellationToken::new();

    let coordinator = SyncCoordinator::new(Arc::new(client), queue, observer, shutdown.clone());
    let worker = tokio::spawn(coordinator.clone().run());

    // Ring up a sale: sent directly while online, queued when the server
    // cannot be reached
    let outcome = coordinator
        .submit_checkout(CheckoutRequest {
            items: vec![CartLine {
                id: 1,
                selected_variant_id: None,
                quantity: 2,
                price: 9.99,
            }],
            total: 19.98,
        })
        .await?;
    println!("checkout outcome: {outcome:?}, pending: {}", coordinator.pending()?);

    // Report a connectivity transition; the worker drains the queue on
    // the offline -> online edge
    handle.set_offline();
    handle.set_online();
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    println!("pending after reconnect: {}", coordinator.pending()?);

    shutdown.cancel();
    worker.await?;
    Ok(())
}
