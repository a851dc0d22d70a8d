//! JSON-lines transport over stdin and stdout.
//!
//! Each inbound line addresses one connection:
//! `{"conn":7,"msg":{"type":"fire"}}` carries a client message and
//! `{"conn":7,"disconnect":true}` reports a dropped connection. Each outbound
//! line is an `Outbound` envelope: `{"to":7,"message":{...}}`.

use std::io::{self, BufRead, Write};
use std::sync::mpsc;

use anyhow::{bail, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use broadside_core::commands::{ClientMessage, SessionEvent};
use broadside_core::events::Outbound;
use broadside_core::types::PlayerId;

use crate::game_loop::LoopCommand;

#[derive(Debug, Deserialize)]
struct InboundFrame {
    conn: PlayerId,
    #[serde(default)]
    msg: Option<ClientMessage>,
    #[serde(default)]
    disconnect: bool,
}

/// Decode one inbound line into a session event.
pub fn decode_line(line: &str) -> Result<(PlayerId, SessionEvent)> {
    let frame: InboundFrame = serde_json::from_str(line)?;
    match (frame.msg, frame.disconnect) {
        (_, true) => Ok((frame.conn, SessionEvent::Disconnected)),
        (Some(msg), false) => Ok((frame.conn, SessionEvent::Message(msg))),
        (None, false) => bail!("frame for connection {} has neither msg nor disconnect", frame.conn.0),
    }
}

pub fn encode_outbound(message: &Outbound) -> serde_json::Result<String> {
    serde_json::to_string(message)
}

/// Forward inbound lines to the game loop until EOF or the loop goes away.
///
/// Malformed lines are logged and skipped. Returns the number of events forwarded.
pub fn read_inbound<R: BufRead>(reader: R, commands: &mpsc::Sender<LoopCommand>) -> io::Result<usize> {
    let mut forwarded = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match decode_line(&line) {
            Ok((player, event)) => {
                if commands.send(LoopCommand::Session(player, event)).is_err() {
                    debug!("game loop gone, stopping reader");
                    break;
                }
                forwarded += 1;
            }
            Err(err) => warn!(line = index + 1, error = %err, "skipping malformed frame"),
        }
    }
    Ok(forwarded)
}

/// Write every outbound message as one line until the channel closes.
pub fn write_outbound<W: Write>(mut writer: W, messages: mpsc::Receiver<Outbound>) -> io::Result<()> {
    for message in messages {
        let line = encode_outbound(&message).map_err(io::Error::other)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use broadside_core::enums::{MatchStatus, MoveDir};
    use broadside_core::events::ServerMessage;

    #[test]
    fn test_decode_message_frame() {
        let (player, event) = decode_line(r#"{"conn":7,"msg":{"type":"move","moveDir":1,"angle":0.25}}"#).unwrap();
        assert_eq!(player, PlayerId(7));
        let SessionEvent::Message(ClientMessage::Move(input)) = event else {
            panic!("expected a move, got {event:?}");
        };
        assert_eq!(input.move_dir, MoveDir::Forward);
    }

    #[test]
    fn test_decode_disconnect_frame() {
        let (player, event) = decode_line(r#"{"conn":3,"disconnect":true}"#).unwrap();
        assert_eq!(player, PlayerId(3));
        assert_eq!(event, SessionEvent::Disconnected);
    }

    #[test]
    fn test_decode_rejects_bad_frames() {
        assert!(decode_line("not json").is_err());
        assert!(decode_line(r#"{"conn":3}"#).is_err());
        assert!(decode_line(r#"{"conn":3,"msg":{"type":"teleport"}}"#).is_err());
    }

    #[test]
    fn test_reader_skips_malformed_lines() {
        let input = "{\"conn\":1,\"msg\":{\"type\":\"fire\"}}\n\ngarbage\n{\"conn\":1,\"disconnect\":true}\n";
        let (tx, rx) = mpsc::channel();
        let forwarded = read_inbound(input.as_bytes(), &tx).unwrap();
        assert_eq!(forwarded, 2);
        let received: Vec<LoopCommand> = rx.try_iter().collect();
        assert!(matches!(
            received[0],
            LoopCommand::Session(PlayerId(1), SessionEvent::Message(ClientMessage::Fire))
        ));
        assert!(matches!(received[1], LoopCommand::Session(PlayerId(1), SessionEvent::Disconnected)));
    }

    #[test]
    fn test_writer_emits_one_line_per_message() {
        let (tx, rx) = mpsc::channel();
        tx.send(Outbound {
            to: PlayerId(2),
            message: ServerMessage::MatchOver {
                status: MatchStatus::Win,
            },
        })
        .unwrap();
        tx.send(Outbound {
            to: PlayerId(2),
            message: ServerMessage::Eliminated,
        })
        .unwrap();
        drop(tx);

        let mut buf = Vec::new();
        write_outbound(&mut buf, rx).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["to"], 2);
        assert_eq!(first["message"]["type"], "matchOver");
        assert_eq!(first["message"]["status"], "win");
    }
}
