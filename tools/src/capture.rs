//! Decoding captured engine messages for inspection.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use codec::SessionConfig;
use engine::{MessageFormat, RawMessage};
use protocol::{DecodedRequest, Message, Notification};
use serde::Serialize;

/// One decoded capture, ready for JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeReport {
    pub format: MessageFormat,
    pub len: usize,
    pub truncated: bool,
    pub message: Message,
}

/// Reads capture contents, either raw bytes or hex text.
///
/// Hex may contain whitespace and line breaks.
pub fn parse_capture(contents: &[u8], hex_text: bool) -> Result<Vec<u8>> {
    if !hex_text {
        return Ok(contents.to_vec());
    }
    let digits: Vec<u8> = contents
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    hex::decode(digits).context("capture is not valid hex")
}

/// Decodes one captured message with the codec for `format`.
pub fn decode_capture(
    bytes: &[u8],
    format: MessageFormat,
    config: &SessionConfig,
) -> Result<DecodeReport> {
    let raw = RawMessage {
        format,
        bytes: bytes.to_vec(),
    };
    let decoded = codec::decode_raw(&raw, config).context("decode message")?;
    Ok(DecodeReport {
        format,
        len: bytes.len(),
        truncated: decoded.truncated,
        message: decoded.value,
    })
}

/// A short human-readable rendering of a report.
pub fn format_decode_pretty(report: &DecodeReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "format: {:?} ({} bytes){}",
        report.format,
        report.len,
        if report.truncated { " truncated" } else { "" }
    );
    match &report.message {
        Message::Request(request) => {
            let _ = writeln!(
                out,
                "request: {} for player {}",
                request.kind(),
                request.player()
            );
            describe_request(&mut out, request);
        }
        Message::Notification(notification) => {
            let _ = writeln!(out, "notification: {}", notification.kind());
            if let Notification::Other { body, .. } = notification {
                let _ = writeln!(out, "  body: {}", hex::encode(body));
            } else {
                let _ = writeln!(out, "  {notification:?}");
            }
        }
    }
    out
}

fn describe_request(out: &mut String, request: &DecodedRequest) {
    match request {
        DecodedRequest::Idle(idle) => {
            let sections = [
                ("normal summons", &idle.normal_summons),
                ("special summons", &idle.special_summons),
                ("repositions", &idle.repositions),
                ("monster sets", &idle.monster_sets),
                ("spell/trap sets", &idle.spell_trap_sets),
                ("activations", &idle.activations),
            ];
            for (name, cards) in sections {
                if cards.is_empty() {
                    continue;
                }
                let _ = writeln!(out, "  {name}:");
                for (index, card) in cards.iter().enumerate() {
                    let _ = writeln!(
                        out,
                        "    #{index} code {} zone 0x{:02x} slot {}",
                        card.code, card.zone, card.slot
                    );
                }
            }
            let _ = writeln!(
                out,
                "  battle: {} end: {} shuffle: {}",
                idle.can_enter_battle_phase, idle.can_end_turn, idle.can_shuffle
            );
        }
        DecodedRequest::Chain(chain) => {
            let _ = writeln!(
                out,
                "  {} option(s){}",
                chain.options.len(),
                if chain.forced { ", forced" } else { "" }
            );
        }
        DecodedRequest::Card(card) => {
            let _ = writeln!(
                out,
                "  pick {}..={} of {} card(s)",
                card.min,
                card.max,
                card.cards.len()
            );
        }
        other => {
            let _ = writeln!(out, "  {other:?}");
        }
    }
}
