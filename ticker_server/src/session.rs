//! TCP client sessions.
//!
//! Every accepted connection becomes a session served by two threads:
//! - a reader that decodes one `ClientCommand` per line, applies it to the ticker
//!   and queues the reply;
//! - the session thread itself, which multiplexes those replies and the hub's
//!   broadcast events with `select!` and writes them back as JSON lines.
//!
//! A malformed line (bad JSON, bytes that are not UTF-8, or a line over the codec's
//! length cap) is answered with an error message and the session goes on. Any I/O
//! failure ends only that client's session; other clients are unaffected.
//!
//! Both queues feeding the writer are bounded. A client that stops reading first
//! stalls its own reader on the full reply queue; if it is still stuck when its
//! hub queue fills, the hub drops it and the session ends.

use std::io::{BufRead, BufReader, BufWriter};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

use chrono::Utc;
use crossbeam_channel::{Receiver, Sender, bounded, select};
use log::{debug, error, info, warn};
use ticker_common::codec::{read_frame, write_message};
use ticker_common::{ClientCommand, MarketEvent, Result, ServerMessage, TickerError};

use crate::hub::BroadcastHub;
use crate::ticker::StockTicker;

/// Replies queued for one client before its reader stops taking commands.
const REPLY_CAPACITY: usize = 64;

/// Accept connections forever, serving each one on its own thread.
pub fn serve(listener: TcpListener, ticker: Arc<StockTicker>, hub: Arc<BroadcastHub>) -> Result<()> {
    info!("Ticker server is listening on {}", listener.local_addr()?);

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let events = hub.subscribe();
                let ticker = Arc::clone(&ticker);
                thread::spawn(move || {
                    if let Err(e) = handle_client(stream, ticker, events) {
                        error!("Client session error: {}", e);
                    }
                });
            }
            Err(e) => error!("TCP connection error: {}", e),
        }
    }
    Ok(())
}

/// Serve one client until it disconnects.
///
/// `events` should be subscribed before the first command is read so the client
/// sees the consequences of its own commands.
pub fn handle_client(
    stream: TcpStream,
    ticker: Arc<StockTicker>,
    events: Receiver<MarketEvent>,
) -> Result<()> {
    let peer = stream.peer_addr()?;
    info!("Client connected: {}", peer);

    let (reply_tx, reply_rx) = bounded::<ServerMessage>(REPLY_CAPACITY);
    let reader = BufReader::new(stream.try_clone()?);
    thread::spawn(move || {
        if let Err(e) = read_commands(reader, &ticker, &reply_tx) {
            warn!("Reading commands from {} failed: {}", peer, e);
        }
    });

    let control = stream.try_clone()?;
    let result = pump(BufWriter::new(stream), &reply_rx, &events);
    // Unblocks the reader if the writer side failed first.
    let _ = control.shutdown(Shutdown::Both);
    info!("Client disconnected: {}", peer);
    result
}

fn pump(
    mut writer: BufWriter<TcpStream>,
    replies: &Receiver<ServerMessage>,
    events: &Receiver<MarketEvent>,
) -> Result<()> {
    loop {
        select! {
            recv(replies) -> msg => match msg {
                Ok(reply) => write_message(&mut writer, &reply)?,
                // The reader hung up: the client closed its side.
                Err(_) => break,
            },
            recv(events) -> msg => match msg {
                Ok(event) => {
                    let message = ServerMessage::Event {
                        timestamp: Utc::now().timestamp_millis(),
                        event,
                    };
                    write_message(&mut writer, &message)?;
                }
                Err(_) => break,
            },
        }
    }
    Ok(())
}

fn read_commands<R: BufRead>(
    mut reader: R,
    ticker: &StockTicker,
    replies: &Sender<ServerMessage>,
) -> Result<()> {
    while let Some(frame) = read_frame(&mut reader)? {
        let reply = match frame.decode::<ClientCommand>() {
            Ok(command) => {
                debug!("Received command {}", command);
                dispatch(ticker, command)
            }
            Err(e) => ServerMessage::Error {
                message: e.to_string(),
            },
        };
        replies
            .send(reply)
            .map_err(|e| TickerError::ChannelSend(e.to_string()))?;
    }
    Ok(())
}

/// Apply `command` to `ticker` and build the reply.
pub fn dispatch(ticker: &StockTicker, command: ClientCommand) -> ServerMessage {
    match command {
        ClientCommand::GetAllStocks => ServerMessage::Stocks {
            stocks: ticker.all_stocks(),
        },
        ClientCommand::GetMarketState => ServerMessage::MarketState {
            state: ticker.market_state(),
        },
        ClientCommand::OpenMarket => {
            ticker.open();
            ServerMessage::Ack { command }
        }
        ClientCommand::CloseMarket => {
            ticker.close();
            ServerMessage::Ack { command }
        }
        ClientCommand::Reset => match ticker.reset() {
            Ok(()) => ServerMessage::Ack { command },
            Err(e) => ServerMessage::Error {
                message: e.to_string(),
            },
        },
    }
}
