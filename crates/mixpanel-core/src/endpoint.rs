// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ingestion endpoints and the table mapping them to URLs.
//!
//! The set of destinations is closed: every message is delivered to exactly
//! one of [`Endpoint::ALL`]. Names arriving from upstream callers as strings
//! are validated through [`FromStr`](std::str::FromStr), which is the only
//! place an unknown destination can be rejected.

use std::fmt;
use std::str::FromStr;

use crate::error::{MixpanelError, Result};

/// Default base URL of the ingestion API.
pub const DEFAULT_API_HOST: &str = "https://api.mixpanel.com";

/// A logical ingestion destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Endpoint {
	/// Tracked events.
	Events,
	/// User profile updates.
	People,
	/// Group profile updates.
	Groups,
	/// Historical event import.
	Imports,
}

impl Endpoint {
	/// Every endpoint, in flush order.
	pub const ALL: [Endpoint; 4] = [
		Endpoint::Events,
		Endpoint::People,
		Endpoint::Groups,
		Endpoint::Imports,
	];

	/// The name upstream callers use for this endpoint.
	pub fn as_str(&self) -> &'static str {
		match self {
			Endpoint::Events => "events",
			Endpoint::People => "people",
			Endpoint::Groups => "groups",
			Endpoint::Imports => "imports",
		}
	}

	/// The URL path under the API host.
	pub fn path(&self) -> &'static str {
		match self {
			Endpoint::Events => "/track",
			Endpoint::People => "/engage",
			Endpoint::Groups => "/groups",
			Endpoint::Imports => "/import",
		}
	}
}

impl fmt::Display for Endpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Endpoint {
	type Err = MixpanelError;

	fn from_str(s: &str) -> Result<Self> {
		Endpoint::ALL
			.into_iter()
			.find(|endpoint| endpoint.as_str() == s)
			.ok_or_else(|| MixpanelError::UnknownEndpoint(s.to_string()))
	}
}

/// Fully resolved URLs for every endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointUrls {
	api_host: String,
	events: String,
	people: String,
	groups: String,
	imports: String,
}

impl EndpointUrls {
	/// Builds the URL table for an API host such as `https://api.mixpanel.com`.
	///
	/// Trailing slashes are dropped. Only `http` and `https` hosts are accepted.
	pub fn new(api_host: &str) -> Result<Self> {
		let api_host = api_host.trim_end_matches('/');

		let parsed = url::Url::parse(api_host)
			.map_err(|e| MixpanelError::InvalidConfig(format!("invalid API host '{api_host}': {e}")))?;
		if !matches!(parsed.scheme(), "http" | "https") {
			return Err(MixpanelError::InvalidConfig(format!(
				"API host must use http or https, got '{}'",
				parsed.scheme()
			)));
		}

		let url_for = |endpoint: Endpoint| format!("{api_host}{}", endpoint.path());

		Ok(Self {
			api_host: api_host.to_string(),
			events: url_for(Endpoint::Events),
			people: url_for(Endpoint::People),
			groups: url_for(Endpoint::Groups),
			imports: url_for(Endpoint::Imports),
		})
	}

	/// The normalized API host the table was built from.
	pub fn api_host(&self) -> &str {
		&self.api_host
	}

	/// The URL requests for `endpoint` are posted to.
	pub fn url(&self, endpoint: Endpoint) -> &str {
		match endpoint {
			Endpoint::Events => &self.events,
			Endpoint::People => &self.people,
			Endpoint::Groups => &self.groups,
			Endpoint::Imports => &self.imports,
		}
	}
}

impl Default for EndpointUrls {
	fn default() -> Self {
		let url_for = |endpoint: Endpoint| format!("{DEFAULT_API_HOST}{}", endpoint.path());
		Self {
			api_host: DEFAULT_API_HOST.to_string(),
			events: url_for(Endpoint::Events),
			people: url_for(Endpoint::People),
			groups: url_for(Endpoint::Groups),
			imports: url_for(Endpoint::Imports),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_known_endpoints() {
		assert_eq!("events".parse::<Endpoint>().unwrap(), Endpoint::Events);
		assert_eq!("people".parse::<Endpoint>().unwrap(), Endpoint::People);
		assert_eq!("groups".parse::<Endpoint>().unwrap(), Endpoint::Groups);
		assert_eq!("imports".parse::<Endpoint>().unwrap(), Endpoint::Imports);
	}

	#[test]
	fn test_parse_unknown_endpoint() {
		let result = "bogus_endpoint".parse::<Endpoint>();
		assert!(matches!(result, Err(MixpanelError::UnknownEndpoint(name)) if name == "bogus_endpoint"));
	}

	#[test]
	fn test_parse_is_case_sensitive() {
		assert!("Events".parse::<Endpoint>().is_err());
	}

	#[test]
	fn test_display_matches_parse() {
		for endpoint in Endpoint::ALL {
			assert_eq!(endpoint.to_string().parse::<Endpoint>().unwrap(), endpoint);
		}
	}

	#[test]
	fn test_default_urls() {
		let urls = EndpointUrls::default();
		assert_eq!(urls.url(Endpoint::Events), "https://api.mixpanel.com/track");
		assert_eq!(urls.url(Endpoint::People), "https://api.mixpanel.com/engage");
		assert_eq!(urls.url(Endpoint::Groups), "https://api.mixpanel.com/groups");
		assert_eq!(urls.url(Endpoint::Imports), "https://api.mixpanel.com/import");
	}

	#[test]
	fn test_new_matches_default_for_default_host() {
		assert_eq!(EndpointUrls::new(DEFAULT_API_HOST).unwrap(), EndpointUrls::default());
	}

	#[test]
	fn test_custom_host_strips_trailing_slash() {
		let urls = EndpointUrls::new("http://127.0.0.1:8080/").unwrap();
		assert_eq!(urls.api_host(), "http://127.0.0.1:8080");
		assert_eq!(urls.url(Endpoint::Events), "http://127.0.0.1:8080/track");
	}

	#[test]
	fn test_rejects_non_http_host() {
		let result = EndpointUrls::new("ftp://api.mixpanel.com");
		assert!(matches!(result, Err(MixpanelError::InvalidConfig(_))));
	}

	#[test]
	fn test_rejects_unparseable_host() {
		let result = EndpointUrls::new("not a url");
		assert!(matches!(result, Err(MixpanelError::InvalidConfig(_))));
	}
}
