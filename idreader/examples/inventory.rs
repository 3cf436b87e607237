//! Inventory example
//!
//! A simulated reader presses its trigger, reports two tags and presses the
//! trigger again.

use std::time::Duration;

use bytes::Bytes;
use idreader::{
    Action, ChannelPeer, ChannelTransport, Command, Event, InventoryAction, Notice, Reader,
    ReaderSettings, Regulation,
};
use idreader_core::{ButtonEvent, TagObservation};
use idreader_types::OutputPowerRange;
use tracing_subscriber::EnvFilter;

async fn simulate(mut peer: ChannelPeer) {
    while let Some(object) = peer.recv().await {
        match object.command {
            Command::GetRegulation | Command::SetRegulation => {
                peer.emit(Event::Regulation {
                    current: Regulation::Etsi,
                    supported: vec![Regulation::Etsi],
                });
            }
            Command::GetOutputPower => {
                peer.emit(Event::OutputPower {
                    current: 260,
                    range: OutputPowerRange::new(140, 260),
                });
            }
            Command::SetEpcGen2Session => {
                // Settings applied, the user presses the trigger
                peer.emit(Event::Button(ButtonEvent::Up));
            }
            Command::StartInventorySmart => {
                let tags = [[0xE2, 0x80, 0x11, 0x60], [0xE2, 0x80, 0x11, 0x61]]
                    .into_iter()
                    .map(|epc| TagObservation {
                        epc: Bytes::copy_from_slice(&epc),
                        rssi: -48,
                    })
                    .collect();
                peer.emit(Event::InventoryObservation(tags));
                peer.emit(Event::Button(ButtonEvent::Up));
            }
            _ => {}
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = match std::env::args().nth(1) {
        Some(path) => ReaderSettings::load_or_default(path),
        None => ReaderSettings {
            regulation: Some(Regulation::Etsi),
            ..Default::default()
        },
    };

    let (transport, peer) = ChannelTransport::pair("!D Hand 2");
    tokio::spawn(simulate(peer));

    let mut reader = Reader::new(transport);
    reader.connect().await?;

    if !reader.apply_settings(&settings).await? {
        anyhow::bail!("reader does not support {:?}", settings.regulation);
    }

    let mut action = InventoryAction::new();
    reader.apply(action.prepare()).await?;
    reader.apply(action.start()).await?;

    loop {
        for notice in reader.drive(&mut action, Duration::from_secs(2)).await? {
            match notice {
                Notice::Started => println!("Reading..."),
                Notice::Observations { observations, new } => {
                    for observation in &observations {
                        println!("  {}", observation);
                    }
                    println!("  {} new", new);
                }
                Notice::Stopped => {
                    println!(
                        "Stopped: {} unique of {} observations",
                        action.counter().unique_count(),
                        action.counter().total_count()
                    );
                    reader.disconnect().await?;
                    return Ok(());
                }
                other => println!("{:?}", other),
            }
        }
    }
}
