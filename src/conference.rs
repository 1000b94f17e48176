//! Conference handles and URL normalization

use std::fmt;
use url::Url;

/// Capability exposed by a live conference: its canonical URL
pub trait ConferenceHandle: fmt::Debug {
    fn canonical_url(&self) -> Url;
}

/// Conference known only by its URL, as decoded from the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlConference {
    url: Url,
}

impl UrlConference {
    pub fn new(url: Url) -> Self {
        Self { url }
    }
}

impl ConferenceHandle for UrlConference {
    fn canonical_url(&self) -> Url {
        self.url.clone()
    }
}

/// Location a config was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationUrl {
    /// Textual URL, passed through untouched
    Text(String),
    Parsed(Url),
    /// Component form (`protocol` includes its trailing colon)
    Parts {
        protocol: String,
        host: String,
        pathname: String,
        search: String,
        hash: String,
    },
}

impl LocationUrl {
    /// Normalized string form of this location
    pub fn to_url_string(&self) -> String {
        match self {
            LocationUrl::Text(s) => s.clone(),
            LocationUrl::Parsed(url) => url.as_str().to_string(),
            LocationUrl::Parts {
                protocol,
                host,
                pathname,
                search,
                hash,
            } => format!("{}//{}{}{}{}", protocol, host, pathname, search, hash),
        }
    }
}

impl From<Url> for LocationUrl {
    fn from(url: Url) -> Self {
        LocationUrl::Parsed(url)
    }
}

/// Normalized URL of a conference handle
pub fn conference_url(conference: &dyn ConferenceHandle) -> String {
    LocationUrl::Parsed(conference.canonical_url()).to_url_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_location_unchanged() {
        let location = LocationUrl::Text("http://cfg/x.json".to_string());
        assert_eq!(location.to_url_string(), "http://cfg/x.json");
    }

    #[test]
    fn test_parts_location_composed() {
        let location = LocationUrl::Parts {
            protocol: "https:".to_string(),
            host: "meet.example.com".to_string(),
            pathname: "/room".to_string(),
            search: "?lang=en".to_string(),
            hash: "#config.startMuted=true".to_string(),
        };
        assert_eq!(
            location.to_url_string(),
            "https://meet.example.com/room?lang=en#config.startMuted=true"
        );
    }

    #[test]
    fn test_conference_url() {
        let url = Url::parse("https://example.com/room").unwrap();
        let conference = UrlConference::new(url);
        assert_eq!(conference_url(&conference), "https://example.com/room");
    }
}
