//! Allow-list of remote image hosts.
//!
//! Hostname patterns follow the remote-pattern convention used by image
//! CDNs: `**.example.com` matches any subdomain depth, `*.example.com`
//! exactly one label, anything else the exact host. Wildcards never match
//! the apex domain itself.

use reqwest::Url;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RemotePattern {
    pub protocol: String,
    pub hostname: String,
}

impl RemotePattern {
    pub fn new(protocol: &str, hostname: &str) -> Self {
        Self {
            protocol: protocol.to_string(),
            hostname: hostname.to_string(),
        }
    }

    pub fn matches(&self, url: &Url) -> bool {
        if !url.scheme().eq_ignore_ascii_case(&self.protocol) {
            return false;
        }

        match url.host_str() {
            Some(host) => self.matches_host(host),
            None => false,
        }
    }

    fn matches_host(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        let pattern = self.hostname.to_ascii_lowercase();

        if let Some(domain) = pattern.strip_prefix("**.") {
            subdomain_labels(&host, domain).is_some()
        } else if let Some(domain) = pattern.strip_prefix("*.") {
            subdomain_labels(&host, domain).is_some_and(|labels| !labels.contains('.'))
        } else {
            host == pattern
        }
    }

    /// Source expression for a CSP directive. CSP wildcards already cover any
    /// subdomain depth, so both `*.` and `**.` collapse to `*.`.
    pub fn csp_source(&self) -> String {
        let domain = self
            .hostname
            .strip_prefix("**.")
            .or_else(|| self.hostname.strip_prefix("*."));

        match domain {
            Some(domain) => format!("{}://*.{}", self.protocol, domain),
            None => format!("{}://{}", self.protocol, self.hostname),
        }
    }
}

/// The labels in front of `.domain`, if `host` is a strict subdomain of it.
fn subdomain_labels<'a>(host: &'a str, domain: &str) -> Option<&'a str> {
    host.strip_suffix(domain)
        .and_then(|prefix| prefix.strip_suffix('.'))
        .filter(|labels| !labels.is_empty())
}

#[derive(Debug, Clone, Default)]
pub struct ImageHostPolicy {
    patterns: Vec<RemotePattern>,
}

impl ImageHostPolicy {
    pub fn new(patterns: Vec<RemotePattern>) -> Self {
        Self { patterns }
    }

    pub fn allows(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(url) => self.patterns.iter().any(|pattern| pattern.matches(&url)),
            Err(_) => false,
        }
    }

    /// Space-separated `protocol://hostname` patterns, for the browser script
    /// to apply the same preview decision as [`ImageHostPolicy::allows`].
    pub fn client_patterns(&self) -> String {
        self.patterns
            .iter()
            .map(|pattern| format!("{}://{}", pattern.protocol, pattern.hostname))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `img-src` source list for the page Content-Security-Policy.
    pub fn csp_img_src(&self) -> String {
        let mut sources = vec!["'self'".to_string(), "data:".to_string()];
        for source in self.patterns.iter().map(RemotePattern::csp_source) {
            if !sources.contains(&source) {
                sources.push(source);
            }
        }
        sources.join(" ")
    }
}
