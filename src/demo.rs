//! Scripted online match between two in-process clients.

use anyhow::{Context, Result, bail};
use noughts::{
    MemoryStore, MoveRequest, SessionClient, SyncChannel, create_session, join_session,
    list_waiting,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Moves played in order: (host plays?, cell index). X takes the top row.
const SCRIPT: [(bool, usize); 5] = [(true, 0), (false, 3), (true, 1), (false, 4), (true, 2)];

/// Plays the script over a [`MemoryStore`], printing each client's view.
#[instrument]
pub async fn run(host: &str, guest: &str) -> Result<()> {
    let shared: Arc<dyn SyncChannel> = Arc::new(MemoryStore::new());

    let created = create_session(shared.as_ref(), host);
    println!("{} created {}", host, created.id());

    let waiting = list_waiting(shared.as_ref()).await?;
    let open = waiting
        .first()
        .context("the new session should be listed as waiting")?;
    println!("{} sees {} waiting session(s), joining {}", guest, waiting.len(), open.id());
    join_session(shared.as_ref(), open.id(), guest).await?;

    let mut x = SessionClient::enter(shared.clone(), created.id(), host);
    let mut o = SessionClient::enter(shared.clone(), created.id(), guest);
    x.resolve_identity().await?;
    o.resolve_identity().await?;
    settle(&mut x, &mut o);
    show(&x, &o);

    // Out of turn: O cannot open.
    match o.request_move(8) {
        Err(e) => println!("{} tried to open: {}", guest, e.status_line()),
        Ok(_) => bail!("O was allowed to move first"),
    }

    for (host_moves, index) in SCRIPT {
        let (mover, name) = if host_moves { (&mut x, host) } else { (&mut o, guest) };
        match mover.request_move(index)? {
            MoveRequest::Sent => println!("{} plays cell {}", name, index + 1),
            MoveRequest::NotReady => bail!("{} was not ready to move", name),
        }
        settle(&mut x, &mut o);
        show(&x, &o);
    }

    if let Some(record) = x.record() {
        println!("\nFinal board (version {}):\n{}", record.version(), record.board());
    }
    info!(session_id = %created.id(), "Demo finished");
    x.leave();
    o.leave();
    Ok(())
}

fn settle(x: &mut SessionClient, o: &mut SessionClient) {
    x.drain();
    o.drain();
}

fn show(x: &SessionClient, o: &SessionClient) {
    println!(
        "  [{} as X] {}    [{} as O] {}",
        x.identity(),
        x.status_line(),
        o.identity(),
        o.status_line()
    );
}
