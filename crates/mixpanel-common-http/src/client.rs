// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTTP client construction with a consistent User-Agent header.

use reqwest::{Client, ClientBuilder};

/// Library name reported in the User-Agent.
const LIB_NAME: &str = "mixpanel-rust";

/// Creates a client builder with the standard User-Agent header.
///
/// Use this when the caller needs further customization (proxies, TLS roots).
///
/// # Example
/// ```ignore
/// let client = mixpanel_common_http::builder()
///     .pool_max_idle_per_host(4)
///     .build()?;
/// ```
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Returns the standard User-Agent string.
///
/// Format: `mixpanel-rust/{version}`
pub fn user_agent() -> String {
	format!("{LIB_NAME}/{}", env!("CARGO_PKG_VERSION"))
}
