//! Serial number example
//!
//! Plays the native core with a tiny simulator so the request/response flow
//! can be followed in the logs. Run with `RUST_LOG=trace` to see every packet.

use idreader::{ChannelPeer, ChannelTransport, Command, Event, Reader, Regulation};
use tracing_subscriber::EnvFilter;

async fn simulate(mut peer: ChannelPeer, serial: String) {
    while let Some(object) = peer.recv().await {
        let event = match object.command {
            Command::GetRegulation => Event::Regulation {
                current: Regulation::NoneSelected,
                supported: vec![Regulation::Etsi],
            },
            Command::GetSerialNumber => Event::SerialNumber(serial.clone()),
            Command::GetVersion => Event::Version(65),
            _ => continue,
        };
        peer.emit(event);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let serial = std::env::var("READER_SERIAL").unwrap_or_else(|_| "0123456789".to_string());

    let (transport, peer) = ChannelTransport::pair("!D Hand 2");
    tokio::spawn(simulate(peer, serial));

    let mut reader = Reader::new(transport);
    reader.connect().await?;
    println!("✓ Connected!");

    let serial = reader.get_serial_number().await?;
    let version = reader.get_version().await?;
    println!("✓ Serial number: {} (firmware {})", serial, version);
    println!("✓ Reader: {}", reader.info());

    reader.disconnect().await?;
    println!("✓ Disconnected");

    Ok(())
}
