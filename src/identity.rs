// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Profile URL canonicalization.
//!
//! Maps an arbitrary profile URL string to a `(platform, username)` pair
//! and a stable identity key. The registry contract keys its uniqueness
//! check on `keccak256` of the URL string carried by the mint call, so
//! [`ProfileIdentity::canonical_url`] is both the hash input and the exact
//! string the claim workflow later submits - the two can never diverge.
//!
//! [`identify`] never fails: it runs on raw user-typed text, so malformed
//! input degrades to [`Platform::Unknown`] with the input echoed back as
//! the username.

use alloy::primitives::{keccak256, B256};
use serde::{Deserialize, Serialize};
use url::Url;

/// Social platforms recognized by the canonicalizer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Youtube,
    Linkedin,
    Instagram,
    Tiktok,
    Unknown,
}

impl Platform {
    /// Whether the platform was recognized from the URL host.
    pub fn is_known(&self) -> bool {
        !matches!(self, Platform::Unknown)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Platform::Twitter => "Twitter",
            Platform::Youtube => "Youtube",
            Platform::Linkedin => "Linkedin",
            Platform::Instagram => "Instagram",
            Platform::Tiktok => "TikTok",
            Platform::Unknown => "Unknown",
        };
        write!(f, "{}", name)
    }
}

/// Canonical identity of a profile URL.
///
/// `canonical_url` is the normalized spelling that equivalent inputs
/// converge to; `identity_key` is `keccak256(canonical_url)` and matches
/// the registry's `urlRegistry` key when the same string is minted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileIdentity {
    /// Detected platform, `Unknown` when the host matched no rule.
    pub platform: Platform,
    /// Extracted handle, raw input when the URL could not be parsed.
    pub username: String,
    /// Normalized URL - the exact byte sequence hashed into `identity_key`.
    pub canonical_url: String,
    /// `keccak256(canonical_url)`, the registry's uniqueness key.
    pub identity_key: B256,
}

/// Derive the canonical identity for a profile URL.
///
/// Total over arbitrary strings: unparseable input yields
/// `Platform::Unknown` with the trimmed input as both username and
/// canonical form. Pure and deterministic - safe to call speculatively.
pub fn identify(input: &str) -> ProfileIdentity {
    let raw = input.trim();

    let parsed = match Url::parse(raw) {
        Ok(url) => url,
        Err(_) => return fallback_identity(raw),
    };
    let host = match parsed.host_str() {
        Some(host) => strip_mirror_prefix(host),
        // Scheme-only inputs like `mailto:` have no host to match on.
        None => return fallback_identity(raw),
    };

    let platform = detect_platform(host);
    let segments: Vec<&str> = parsed.path().split('/').filter(|s| !s.is_empty()).collect();
    let username = extract_username(platform, &segments, raw);
    let canonical_url = canonical_url(platform, &username, &parsed);
    let identity_key = keccak256(canonical_url.as_bytes());

    ProfileIdentity {
        platform,
        username,
        canonical_url,
        identity_key,
    }
}

fn fallback_identity(raw: &str) -> ProfileIdentity {
    ProfileIdentity {
        platform: Platform::Unknown,
        username: raw.to_string(),
        canonical_url: raw.to_string(),
        identity_key: keccak256(raw.as_bytes()),
    }
}

/// Drop mirror-host prefixes so `www.`/`mobile.`/`m.` spellings converge.
fn strip_mirror_prefix(host: &str) -> &str {
    for prefix in ["www.", "mobile.", "m."] {
        if let Some(rest) = host.strip_prefix(prefix) {
            return rest;
        }
    }
    host
}

/// First host rule wins; unmatched hosts are `Unknown`.
fn detect_platform(host: &str) -> Platform {
    match host {
        "twitter.com" | "x.com" => Platform::Twitter,
        "youtube.com" | "youtu.be" => Platform::Youtube,
        "linkedin.com" => Platform::Linkedin,
        "instagram.com" => Platform::Instagram,
        "tiktok.com" | "vm.tiktok.com" => Platform::Tiktok,
        _ => Platform::Unknown,
    }
}

/// Platform-specific username extraction from path segments.
///
/// Path grammars differ per platform: `@` marks a handle on youtube and
/// tiktok, linkedin nests profiles under `/in/` or `/company/`, youtube
/// also addresses channels as `/channel/<id>`, `/c/<id>` and `/user/<id>`.
fn extract_username(platform: Platform, segments: &[&str], raw: &str) -> String {
    let first = segments.first().copied().unwrap_or("");
    let second = segments.get(1).copied().unwrap_or("");

    let extracted = match platform {
        Platform::Twitter | Platform::Tiktok => first,
        Platform::Youtube => {
            if first.starts_with('@') {
                first
            } else if matches!(first, "channel" | "c" | "user") {
                second
            } else {
                first
            }
        }
        Platform::Linkedin => {
            if matches!(first, "in" | "company") {
                second
            } else {
                first
            }
        }
        Platform::Instagram => first,
        Platform::Unknown => {
            if first.is_empty() {
                return raw.to_string();
            }
            first
        }
    };

    extracted.trim_matches('@').to_string()
}

/// Rebuild the canonical spelling equivalent inputs converge to.
fn canonical_url(platform: Platform, username: &str, parsed: &Url) -> String {
    match platform {
        Platform::Twitter => format!("https://twitter.com/{}", username),
        Platform::Youtube => format!("https://youtube.com/@{}", username),
        Platform::Linkedin => format!("https://linkedin.com/in/{}", username),
        Platform::Instagram => format!("https://instagram.com/{}", username),
        Platform::Tiktok => format!("https://tiktok.com/@{}", username),
        Platform::Unknown => {
            // Scheme and host are already lowercased by the parser; keep the
            // path but drop trailing slashes, query and fragment.
            let mut canonical = format!(
                "{}://{}",
                parsed.scheme(),
                parsed.host_str().unwrap_or_default()
            );
            if let Some(port) = parsed.port() {
                canonical.push(':');
                canonical.push_str(&port.to_string());
            }
            canonical.push_str(parsed.path().trim_end_matches('/'));
            canonical
        }
    }
}
