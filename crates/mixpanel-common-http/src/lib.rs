// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for the Mixpanel SDK.
//!
//! Every outgoing request carries the same User-Agent so the ingestion
//! servers can attribute traffic to this library and version.

mod client;

pub use client::{builder, user_agent};
