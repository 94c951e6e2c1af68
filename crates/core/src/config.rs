use std::collections::HashSet;
use std::time::Duration;

use folio_protocol::SectionKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::visibility::Threshold;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config lists no sections")]
    NoSections,
    #[error("section `{0}` is declared more than once")]
    DuplicateSection(SectionKey),
    #[error("certifications carousel needs at least one entry")]
    NoCertifications,
    #[error("`{0}` must be greater than zero")]
    Zero(&'static str),
}

/// One stacked section of the page, in layout order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSpec {
    pub key: SectionKey,
    pub label: String,
    #[serde(default = "default_section_threshold")]
    pub threshold: Threshold,
    /// Listed in the navigation bar.
    #[serde(default = "yes")]
    pub in_nav: bool,
    /// Shown as soon as the page mounts instead of waiting to be scrolled to.
    #[serde(default)]
    pub reveal_on_mount: bool,
}

impl SectionSpec {
    fn new(key: &str, label: &str, threshold: Threshold) -> Self {
        Self {
            key: SectionKey::from(key),
            label: label.to_string(),
            threshold,
            in_nav: true,
            reveal_on_mount: false,
        }
    }
}

fn default_section_threshold() -> Threshold {
    Threshold::SECTION
}

fn yes() -> bool {
    true
}

/// An entry of the certifications carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub title: String,
    pub issuer: String,
    pub date: String,
}

impl Certification {
    fn new(title: &str, issuer: &str, date: &str) -> Self {
        Self {
            title: title.to_string(),
            issuer: issuer.to_string(),
            date: date.to_string(),
        }
    }

    /// First two words of the title, used for the dot tooltips.
    pub fn short_title(&self) -> String {
        self.title
            .split_whitespace()
            .take(2)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A way to get in touch, listed beside the contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactChannel {
    pub label: String,
    pub value: String,
    pub href: String,
}

impl ContactChannel {
    fn new(label: &str, value: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            href: href.to_string(),
        }
    }
}

/// One card of the experience timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub role: String,
    pub company: String,
    pub period: String,
}

impl Experience {
    fn new(role: &str, company: &str, period: &str) -> Self {
        Self {
            role: role.to_string(),
            company: company.to_string(),
            period: period.to_string(),
        }
    }
}

/// Everything that shapes one page: the section catalog, carousel entries
/// and the timing and offset constants the widgets run on.
///
/// Missing fields take the defaults of the published site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub sections: Vec<SectionSpec>,
    pub certifications: Vec<Certification>,
    pub experiences: Vec<Experience>,
    pub contact_channels: Vec<ContactChannel>,
    pub autoplay_interval_ms: u64,
    /// Distance below the viewport top a section must cross to become active.
    pub activation_offset_px: f64,
    /// Scroll depth after which the nav bar gets its solid background.
    pub nav_scrolled_px: f64,
    /// Scroll depth after which the scroll-to-top button shows.
    pub scroll_top_px: f64,
    pub submit_delay_ms: u64,
    pub message_limit: usize,
}

impl Default for FolioConfig {
    fn default() -> Self {
        let mut home = SectionSpec::new("home", "Home", Threshold::SECTION);
        home.reveal_on_mount = true;
        let mut testimonials =
            SectionSpec::new("testimonials", "Testimonials", Threshold::SECTION);
        testimonials.in_nav = false;

        Self {
            sections: vec![
                home,
                SectionSpec::new("skills", "Skills", Threshold::SECTION),
                SectionSpec::new("projects", "Projects", Threshold::SECTION),
                SectionSpec::new("experiences", "Experiences", Threshold::SECTION),
                SectionSpec::new("certifications", "Certifications", Threshold::CARD),
                SectionSpec::new("contact", "Contact", Threshold::CONTACT),
                testimonials,
            ],
            certifications: vec![
                Certification::new(
                    "AWS Certified Solutions Architect",
                    "Amazon Web Services",
                    "Jan 2025",
                ),
                Certification::new(
                    "Certified Kubernetes Administrator",
                    "Cloud Native Computing Foundation",
                    "Dec 2024",
                ),
                Certification::new("TensorFlow Developer Certificate", "Google", "Nov 2024"),
                Certification::new("Azure Data Engineer Associate", "Microsoft", "Oct 2024"),
                Certification::new(
                    "Certified Mid-Level Vue.js Developer",
                    "Certificates.dev",
                    "Aug 2024",
                ),
            ],
            experiences: vec![
                Experience::new("Data Science & ML Intern", "Euron", "Jul 2025 – Present"),
                Experience::new(
                    "Web Development Intern",
                    "Cognifyz Technologies",
                    "Dec 2024 – Jan 2025",
                ),
                Experience::new(
                    "Freelance Web Developer",
                    "VM Polymers",
                    "Sep 2025 – Nov 2025",
                ),
            ],
            contact_channels: vec![
                ContactChannel::new("Email", "hello@example.com", "mailto:hello@example.com"),
                ContactChannel::new("Location", "San Francisco, CA", "#"),
                ContactChannel::new("Phone", "+1 (555) 123-4567", "tel:+15551234567"),
            ],
            autoplay_interval_ms: 4000,
            activation_offset_px: 100.0,
            nav_scrolled_px: 50.0,
            scroll_top_px: 400.0,
            submit_delay_ms: 2000,
            message_limit: 500,
        }
    }
}

impl FolioConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        let config: FolioConfig = serde_json::from_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sections.is_empty() {
            return Err(ConfigError::NoSections);
        }
        let mut seen = HashSet::new();
        for section in &self.sections {
            if !seen.insert(section.key.as_str()) {
                return Err(ConfigError::DuplicateSection(section.key.clone()));
            }
        }
        if self.certifications.is_empty() {
            return Err(ConfigError::NoCertifications);
        }
        if self.autoplay_interval_ms == 0 {
            return Err(ConfigError::Zero("autoplay_interval_ms"));
        }
        if self.submit_delay_ms == 0 {
            return Err(ConfigError::Zero("submit_delay_ms"));
        }
        if self.message_limit == 0 {
            return Err(ConfigError::Zero("message_limit"));
        }
        Ok(())
    }

    pub fn autoplay_interval(&self) -> Duration {
        Duration::from_millis(self.autoplay_interval_ms)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    /// Sections listed in the navigation bar, in layout order.
    pub fn nav_sections(&self) -> impl Iterator<Item = &SectionSpec> {
        self.sections.iter().filter(|s| s.in_nav)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = FolioConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.autoplay_interval(), Duration::from_secs(4));
        assert_eq!(config.sections[0].key, "home");
        assert!(config.sections[0].reveal_on_mount);
        assert_eq!(config.nav_sections().count(), 6);
        assert_eq!(config.experiences[1].company, "Cognifyz Technologies");
        assert_eq!(config.contact_channels.len(), 3);
    }

    #[test]
    fn empty_object_takes_defaults() {
        let config = FolioConfig::from_json(b"{}").unwrap();
        assert_eq!(config, FolioConfig::default());
    }

    #[test]
    fn partial_config_overrides_fields() {
        let json = br#"{
            "autoplay_interval_ms": 2500,
            "sections": [
                {"key": "home", "label": "Home"},
                {"key": "talks", "label": "Talks", "threshold": 0.3, "in_nav": false}
            ]
        }"#;
        let config = FolioConfig::from_json(json).unwrap();
        assert_eq!(config.autoplay_interval_ms, 2500);
        assert_eq!(config.sections.len(), 2);
        assert_eq!(config.sections[0].threshold, Threshold::SECTION);
        assert_eq!(config.sections[1].threshold, Threshold::HEADER);
        assert!(!config.sections[1].in_nav);
        assert_eq!(config.certifications.len(), 5);
    }

    #[test]
    fn rejects_duplicate_sections() {
        let json = br#"{"sections": [
            {"key": "home", "label": "Home"},
            {"key": "home", "label": "Again"}
        ]}"#;
        let err = FolioConfig::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateSection(key) if key == "home"));
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let json = br#"{"sections": [{"key": "home", "label": "Home", "threshold": 1.2}]}"#;
        assert!(matches!(
            FolioConfig::from_json(json),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn rejects_empty_catalogs_and_zero_timings() {
        assert!(matches!(
            FolioConfig::from_json(br#"{"sections": []}"#),
            Err(ConfigError::NoSections)
        ));
        assert!(matches!(
            FolioConfig::from_json(br#"{"certifications": []}"#),
            Err(ConfigError::NoCertifications)
        ));
        assert!(matches!(
            FolioConfig::from_json(br#"{"autoplay_interval_ms": 0}"#),
            Err(ConfigError::Zero("autoplay_interval_ms"))
        ));
    }

    #[test]
    fn short_title_keeps_two_words() {
        let cert = &FolioConfig::default().certifications[0];
        assert_eq!(cert.short_title(), "AWS Certified");
    }

    #[test]
    fn defaults_round_trip_through_json() {
        let config = FolioConfig::default();
        let json = serde_json::to_vec(&config).unwrap();
        assert_eq!(FolioConfig::from_json(&json).unwrap(), config);
    }
}
