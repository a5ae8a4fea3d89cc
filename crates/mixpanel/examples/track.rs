// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example: track a few events through the buffered consumer.
//!
//! Run with:
//!   MIXPANEL_TOKEN=... cargo run --example track -p mixpanel

use std::time::Duration;

use mixpanel::{BufferedAsyncConsumer, Mixpanel, Properties};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mixpanel=debug")),
		)
		.init();

	let token =
		std::env::var("MIXPANEL_TOKEN").expect("MIXPANEL_TOKEN environment variable required");
	let api_host = std::env::var("MIXPANEL_API_HOST")
		.unwrap_or_else(|_| mixpanel::DEFAULT_API_HOST.to_string());

	let consumer = BufferedAsyncConsumer::builder()
		.api_host(&api_host)
		.max_size(5)
		.request_timeout(Duration::from_secs(5))
		.build_buffered()?;
	let mut mp = Mixpanel::new(token, consumer);

	for step in 1..=7 {
		mp.track(
			"example_user",
			"tutorial_step",
			Properties::new().insert("step", step),
		)?;
	}
	mp.people_set(
		"example_user",
		Properties::new().insert("$name", "Example User"),
	)?;

	let outcomes = mp.consumer_mut().wait().await;
	for outcome in outcomes {
		match outcome.result {
			Ok(_) => println!("{}: delivered {} message(s)", outcome.endpoint, outcome.message_count),
			Err(e) => println!("{}: failed to deliver {} message(s): {e}", outcome.endpoint, outcome.message_count),
		}
	}

	Ok(())
}
