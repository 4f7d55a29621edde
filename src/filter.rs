//! Navigation gating: decides which navigations are worth a classifier
//! query. Intranet and local addresses cannot meaningfully be classified,
//! and static resource files cannot host a credential-harvesting page.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::domain::{LifecycleStatus, NavigationEvent};

static RESOURCE_EXT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(jpg|jpeg|png|gif|svg|bmp|webp|mp4|mp3|wav|pdf|doc|docx|ppt|pptx|xls|xlsx)$")
        .expect("valid resource extension regex")
});

static PRIVATE_RANGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(192\.168\.\d{1,3}\.\d{1,3}|10\.\d{1,3}\.\d{1,3}\.\d{1,3})$")
        .expect("valid private range regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    /// Loopback, `file://` or otherwise hostless.
    Local,
    /// RFC 1918 ranges 192.168.x.x and 10.x.x.x, any scheme or port.
    PrivateNetwork,
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Page,
    /// Image, video, audio or document file, matched by path extension.
    StaticAsset,
}

pub fn classify_host(url: &Url) -> HostKind {
    if url.scheme() == "file" {
        return HostKind::Local;
    }
    match url.host_str() {
        Some(host) if host.eq_ignore_ascii_case("localhost") || host == "127.0.0.1" => {
            HostKind::Local
        }
        Some(host) if PRIVATE_RANGE_REGEX.is_match(host) => HostKind::PrivateNetwork,
        Some(_) => HostKind::Public,
        None => HostKind::Local,
    }
}

pub fn classify_resource(url: &Url) -> ResourceKind {
    if RESOURCE_EXT_REGEX.is_match(url.path()) {
        ResourceKind::StaticAsset
    } else {
        ResourceKind::Page
    }
}

/// The popup applies this check alone; resource exclusion is a
/// background-only optimization.
pub fn is_scorable_host(url: &Url) -> bool {
    classify_host(url) == HostKind::Public
}

/// Full background eligibility: completed navigation with a parseable URL,
/// public host, and not a static resource.
pub fn should_score(event: &NavigationEvent) -> bool {
    if event.status != LifecycleStatus::Complete || event.url.is_empty() {
        return false;
    }
    let Ok(url) = Url::parse(&event.url) else {
        return false;
    };
    is_scorable_host(&url) && classify_resource(&url) == ResourceKind::Page
}
