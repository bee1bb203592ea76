// Copyright 2026 The OmniCare Project
// SPDX-License-Identifier: Apache-2.0

pub mod config;
pub mod consent;
pub mod query;
pub mod relay;
pub mod stream;
pub mod upstream;
