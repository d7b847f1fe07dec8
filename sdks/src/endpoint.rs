// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Endpoint URL construction
//!
//! IDs, emails and filenames are appended as single path segments, so
//! characters such as `#`, `?` and `/` are percent-encoded instead of
//! changing which route is called.

use reqwest::Url;

use crate::error::{ApiError, Result};

/// Parse a service base URL. A trailing `/` is ignored.
pub(crate) fn parse_base(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url.trim_end_matches('/')).map_err(|e| ApiError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl {
            url: base_url.to_string(),
            reason: "not a hierarchical URL".to_string(),
        });
    }
    Ok(url)
}

/// `base` followed by `segments`, each encoded as one path segment.
///
/// An empty final segment yields a trailing `/`.
pub(crate) fn join(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
