// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod chat;
pub mod server;

pub use chat::{ChatConfig, DEFAULT_TEMPERATURE, GREETING, SYSTEM_PROMPT};
pub use server::ServerConfig;
