// Copyright 2026 The OmniCare Project
// SPDX-License-Identifier: Apache-2.0

// Event-frame decoding.
//
// One upstream line in, one decision out. The skip branch is an explicit
// variant rather than an error: a malformed frame is a local, recoverable
// event and must never abort the stream.

/// Literal prefix marking a payload-carrying line in the event stream.
pub const DATA_PREFIX: &str = "data: ";

/// Outcome of decoding one upstream line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The line carried a token fragment to relay.
    Token(String),
    /// The line carries nothing to relay: blank separator, keep-alive
    /// comment, `event:` line, unparseable payload, or a data frame
    /// without a `token` field (e.g. the engine's status frames).
    Skip,
}

/// Decode a single line of upstream output.
///
/// A line is a token frame only if it starts with the literal `data: `
/// prefix and the remainder parses as a JSON object whose `token` field
/// is a string (or null, which stands for the empty fragment).
pub fn decode_frame(line: &str) -> FrameOutcome {
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return FrameOutcome::Skip;
    };

    let Ok(value) = serde_json::from_str::<serde_json::Value>(payload) else {
        return FrameOutcome::Skip;
    };

    let Some(object) = value.as_object() else {
        return FrameOutcome::Skip;
    };

    match object.get("token") {
        Some(serde_json::Value::String(token)) => FrameOutcome::Token(token.clone()),
        Some(serde_json::Value::Null) => FrameOutcome::Token(String::new()),
        _ => FrameOutcome::Skip,
    }
}
