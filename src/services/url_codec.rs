//! Public URL <-> (wildcard, domain, file name) conversion.
//!
//! Public URLs look like `https://[<wildcard>.]<domain>/<file name>`.
//! [`LegacyCodec`] reproduces the historical string-splitting parser exactly,
//! mis-splits included, because stored links depend on it. [`StrictCodec`]
//! parses the same syntax with an explicit grammar and is opt-in through
//! [`CodecMode`].

use crate::errors::{IndexError, IndexResult};
use crate::models::object::ObjectAddress;
use clap::ValueEnum;
use std::sync::Arc;

pub trait UrlCodec: Send + Sync {
    fn parse(&self, url: &str) -> IndexResult<ObjectAddress>;

    fn build(&self, address: &ObjectAddress) -> String {
        address.url()
    }
}

/// Which parser the resolver uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum CodecMode {
    #[default]
    Legacy,
    Strict,
}

impl CodecMode {
    pub fn codec(self) -> Arc<dyn UrlCodec> {
        match self {
            CodecMode::Legacy => Arc::new(LegacyCodec),
            CodecMode::Strict => Arc::new(StrictCodec),
        }
    }
}

/// Split-on-dots parser.
///
/// Assumes the host is `label.tld` or `wildcard.label.tld` and the file name
/// has exactly one dot. Anything else yields a wrong, but well-formed, split.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyCodec;

impl UrlCodec for LegacyCodec {
    fn parse(&self, url: &str) -> IndexResult<ObjectAddress> {
        if url.is_empty() || url.matches('.').count() < 2 {
            return Err(IndexError::MalformedUrl(url.to_string()));
        }

        let rest = url.strip_prefix("https://").unwrap_or(url);
        let file_name = rest
            .split('/')
            .nth(1)
            .ok_or_else(|| IndexError::MalformedUrl(url.to_string()))?;

        // Splitting the whole string on '.' does not stop at the '/', so the
        // tld component carries "/<stem>" and has to have it trimmed back off.
        let stem = file_name.split('.').next().unwrap_or(file_name);
        let stem_suffix = format!("/{}", stem);
        let trim = |tail: &str| -> String {
            tail.strip_suffix(stem_suffix.as_str())
                .unwrap_or(tail)
                .to_string()
        };

        let parts: Vec<&str> = rest.split('.').collect();
        let (wildcard, domain) = if parts.len() == 3 {
            (String::new(), format!("{}.{}", parts[0], trim(parts[1])))
        } else {
            (
                parts[0].to_string(),
                format!("{}.{}", parts[1], trim(parts[2])),
            )
        };

        Ok(ObjectAddress {
            wildcard,
            domain,
            file_name: file_name.to_string(),
        })
    }
}

/// Grammar: `["https://" | "http://"] [label "."] label "." label "/" filename`.
///
/// The file name is any non-empty segment without `/`; it may contain any
/// number of dots. The grammar has no notion of public suffixes, so a
/// three-label host is always read as wildcard + domain: `example.co.uk`
/// yields wildcard `example` and domain `co.uk`, the same as [`LegacyCodec`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictCodec;

impl UrlCodec for StrictCodec {
    fn parse(&self, url: &str) -> IndexResult<ObjectAddress> {
        let malformed = || IndexError::MalformedUrl(url.to_string());

        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .unwrap_or(url);
        let (host, file_name) = rest.split_once('/').ok_or_else(malformed)?;
        if file_name.is_empty() || file_name.contains('/') {
            return Err(malformed());
        }

        let (wildcard, domain) = split_host(host).map_err(|_| malformed())?;
        Ok(ObjectAddress {
            wildcard,
            domain,
            file_name: file_name.to_string(),
        })
    }
}

/// Split a full host into (wildcard, domain).
///
/// `cozy.example.com` -> ("cozy", "example.com"); `example.com` ->
/// ("", "example.com"). Hosts with more than two dots are rejected.
pub fn split_host(host: &str) -> IndexResult<(String, String)> {
    let labels: Vec<&str> = host.split('.').collect();
    if !labels.iter().all(|label| is_host_label(label)) {
        return Err(IndexError::InvalidDomain(host.to_string()));
    }
    match labels.as_slice() {
        [label, tld] => Ok((String::new(), format!("{}.{}", label, tld))),
        [wildcard, label, tld] => Ok((wildcard.to_string(), format!("{}.{}", label, tld))),
        _ => Err(IndexError::InvalidDomain(host.to_string())),
    }
}

fn is_host_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && label
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
}
