// Copyright 2026 The OmniCare Project
// SPDX-License-Identifier: Apache-2.0

// Token extraction from the engine's event stream.
//
// Responsibilities:
// - Decode the line-oriented event-stream format (`data: <json>` frames)
// - Emit token fragments in upstream order, one channel send per token
// - Drop malformed frames and frames without a token field, silently
// - Stop cleanly on upstream close, mid-stream failure, or client
//   disconnect, releasing the upstream connection in every case

mod extractor;
mod frame;

pub use extractor::{extract_tokens, StreamContext};
pub use frame::{decode_frame, FrameOutcome, DATA_PREFIX};
