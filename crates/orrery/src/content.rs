//! Page content: the person and the sections shown below the hero.

use std::{collections::HashSet, fs, path::Path};

use color_eyre::eyre::{WrapErr, bail};
use orrery_core::SceneKey;
use serde::Deserialize;

/// Everything rendered on the page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Portfolio {
    pub name: String,
    pub tagline: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub email: String,
    /// Profiles shown in the hero and again under contact.
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// An outbound profile link.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

/// One content section, identified by the scene it selects.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Section {
    pub key: SceneKey,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub lines: Vec<String>,
    /// Cards that expand to show their details.
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// A collapsible card: title, subtitle and preview always show; details
/// only while expanded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Entry {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub preview: String,
    #[serde(default)]
    pub details: Vec<String>,
    /// Start expanded.
    #[serde(default)]
    pub open: bool,
}

/// Identifies an entry by its section and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId {
    pub section: SceneKey,
    pub index: usize,
}

impl Section {
    fn new(key: SceneKey, title: &str, subtitle: &str, lines: &[&str]) -> Self {
        Self {
            key,
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            lines: lines.iter().map(|l| l.to_string()).collect(),
            entries: Vec::new(),
        }
    }

    fn with_entries(mut self, entries: Vec<Entry>) -> Self {
        self.entries = entries;
        self
    }
}

impl Entry {
    fn new(title: &str, subtitle: &str, preview: &str, details: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            preview: preview.to_string(),
            details: details.iter().map(|d| d.to_string()).collect(),
            open: false,
        }
    }
}

impl Link {
    fn new(label: &str, url: &str) -> Self {
        Self {
            label: label.to_string(),
            url: url.to_string(),
        }
    }
}

impl Portfolio {
    /// Read content from a TOML file.
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let text = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read content from {}", path.display()))?;
        let portfolio: Portfolio = toml::from_str(&text)
            .wrap_err_with(|| format!("failed to parse content in {}", path.display()))?;
        portfolio.validate()?;
        log::info!(
            "loaded {} sections from {}",
            portfolio.sections.len(),
            path.display()
        );
        Ok(portfolio)
    }

    /// Reject content the page cannot lay out.
    pub fn validate(&self) -> color_eyre::Result<()> {
        let mut seen = HashSet::new();
        for section in &self.sections {
            if section.key == SceneKey::Hero {
                bail!("the hero is built from the top-level fields, not a section");
            }
            if !seen.insert(section.key) {
                bail!("section {} appears more than once", section.key);
            }
        }
        Ok(())
    }

    /// Entries marked to start expanded.
    pub fn initially_open(&self) -> HashSet<EntryId> {
        self.sections
            .iter()
            .flat_map(|section| {
                section
                    .entries
                    .iter()
                    .enumerate()
                    .filter(|(_, entry)| entry.open)
                    .map(|(index, _)| EntryId {
                        section: section.key,
                        index,
                    })
            })
            .collect()
    }

    /// Placeholder content covering every section.
    pub fn sample() -> Self {
        use SceneKey::*;
        Self {
            name: "Your Name".to_string(),
            tagline: "Research engineer. Renewable systems, embedded control, photonics."
                .to_string(),
            location: "Somewhere, Earth".to_string(),
            email: "you@example.com".to_string(),
            links: vec![
                Link::new("GitHub", "https://github.com/your-handle"),
                Link::new("LinkedIn", "https://www.linkedin.com/in/your-handle"),
                Link::new("Scholar", "https://scholar.google.com/citations?user=your-id"),
            ],
            sections: vec![
                Section::new(
                    About,
                    "About",
                    "Who I am",
                    &[
                        "Research-focused electrical engineer working on decentralized hybrid \
                         renewables, small-satellite power systems and thin-film photovoltaics.",
                        "Interests span IoT, control, techno-economics and optical links.",
                    ],
                ),
                Section::new(
                    Interests,
                    "Research Interests",
                    "What keeps me up at night",
                    &[
                        "Renewable energy integration",
                        "Internet of Things",
                        "Decentralized intelligent systems",
                        "Power electronics for small satellites",
                        "Photovoltaic device simulation",
                    ],
                ),
                Section::new(Featured, "Featured Work", "Selected projects. Enter to expand.", &[])
                    .with_entries(vec![
                        Entry::new(
                            "Riverine hybrid microgrid",
                            "Co-optimized scheduling",
                            "PV, hydrokinetic turbines and storage under fluctuating water levels.",
                            &[
                                "Mixed-integer dispatch over a year of river gauge data.",
                                "Storage sizing traded against diesel backup hours.",
                            ],
                        ),
                        Entry::new(
                            "Nanosatellite EPS",
                            "Power for a 1U bus",
                            "Maximum power point tracking and battery management.",
                            &[
                                "Boost converter with perturb-and-observe MPPT.",
                                "Thermal-vacuum tested charge controller firmware.",
                            ],
                        ),
                        Entry::new(
                            "Perovskite back contacts",
                            "Device simulation",
                            "Work-function sweeps for lead-free absorbers.",
                            &["Efficiency maps across contact work function and thickness."],
                        ),
                    ]),
                Section::new(
                    Skills,
                    "Skills",
                    "Tools and methods",
                    &[
                        "Simulation: COMSOL, SCAPS-1D, HOMER Pro, MATLAB/Simulink",
                        "Embedded: C, Rust, microcontroller firmware, PCB bring-up",
                        "Analysis: Python, techno-economic modelling, CFD",
                    ],
                ),
                Section::new(Experience, "Experience", "Where I have worked. Enter to expand.", &[])
                    .with_entries(vec![
                        Entry::new(
                            "Research Assistant",
                            "University Lab, 2024 to present",
                            "Hybrid renewables and smart monitoring.",
                            &[
                                "Built a sensor network for a pilot microgrid.",
                                "Co-supervised two undergraduate theses.",
                            ],
                        ),
                        Entry::new(
                            "Engineering Intern",
                            "Grid Operator, 2023",
                            "Substation protection studies.",
                            &["Relay coordination review for a 132 kV substation."],
                        ),
                    ]),
                Section::new(
                    Publications,
                    "Publications",
                    "Papers and preprints. Enter to expand.",
                    &[],
                )
                .with_entries(vec![
                    Entry::new(
                        "Co-optimized scheduling for riverine hybrid renewables",
                        "Under review",
                        "Joint sizing and dispatch under hydrological uncertainty.",
                        &["Scenario-based stochastic program with seasonal flow profiles."],
                    ),
                    Entry::new(
                        "Reduced graphene oxide back contacts for lead-free perovskites",
                        "Conference proceedings",
                        "Simulation study of contact work function.",
                        &["Identifies an optimal band alignment window."],
                    ),
                ]),
                Section::new(
                    Grants,
                    "Grants",
                    "Funding received",
                    &["Undergraduate research grant for satellite power electronics."],
                ),
                Section::new(Teaching, "Teaching", "Courses assisted. Enter to expand.", &[])
                    .with_entries(vec![
                        Entry::new(
                            "Electrical Circuits I and II",
                            "Teaching assistant",
                            "Tutorials and grading for two cohorts.",
                            &["Wrote weekly problem sets on transient analysis."],
                        ),
                        Entry::new(
                            "Microcontroller Systems",
                            "Lab instructor",
                            "Hands-on embedded labs.",
                            &["Ran interrupt and timer labs on ARM Cortex-M boards."],
                        ),
                    ]),
                Section::new(
                    Awards,
                    "Awards",
                    "Recognition",
                    &[
                        "Dean's list, four semesters.",
                        "Finalist, national renewable energy design challenge.",
                    ],
                ),
                Section::new(
                    Contact,
                    "Contact",
                    "Get in touch",
                    &[
                        "Email: you@example.com",
                        "Open to research collaborations and PhD positions.",
                    ],
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_covers_nav() {
        let portfolio = Portfolio::sample();
        portfolio.validate().unwrap();
        for key in SceneKey::NAV {
            assert!(
                portfolio.sections.iter().any(|s| s.key == key),
                "missing {key}"
            );
        }
    }

    #[test]
    fn test_sample_has_expandable_entries() {
        let portfolio = Portfolio::sample();
        for key in [
            SceneKey::Featured,
            SceneKey::Experience,
            SceneKey::Publications,
            SceneKey::Teaching,
        ] {
            let section = portfolio.sections.iter().find(|s| s.key == key).unwrap();
            assert!(!section.entries.is_empty(), "{key} has no entries");
        }
        assert!(portfolio.initially_open().is_empty());
        assert_eq!(portfolio.links.len(), 3);
    }

    #[test]
    fn test_load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.toml");
        fs::write(
            &path,
            r#"
            name = "Ada"
            tagline = "Engines"

            [[links]]
            label = "GitHub"
            url = "https://github.com/ada"

            [[sections]]
            key = "about"
            title = "About"
            lines = ["Hello"]

            [[sections]]
            key = "featured"
            title = "Featured"

            [[sections.entries]]
            title = "Analytical Engine"
            preview = "Notes"

            [[sections.entries]]
            title = "Difference Engine"
            details = ["Gears"]
            open = true
            "#,
        )
        .unwrap();
        let portfolio = Portfolio::load(&path).unwrap();
        assert_eq!(portfolio.name, "Ada");
        assert_eq!(portfolio.sections.len(), 2);
        assert_eq!(portfolio.sections[0].subtitle, "");
        assert!(portfolio.sections[0].entries.is_empty());
        assert_eq!(portfolio.sections[1].entries.len(), 2);
        assert_eq!(portfolio.links[0].label, "GitHub");
        let open: Vec<_> = portfolio.initially_open().into_iter().collect();
        assert_eq!(
            open,
            [EntryId {
                section: SceneKey::Featured,
                index: 1
            }]
        );
    }

    #[test]
    fn test_duplicate_sections_rejected() {
        let mut portfolio = Portfolio::sample();
        let about = portfolio.sections[0].clone();
        portfolio.sections.push(about);
        assert!(portfolio.validate().is_err());
    }

    #[test]
    fn test_hero_section_rejected() {
        let mut portfolio = Portfolio::sample();
        portfolio.sections[0].key = SceneKey::Hero;
        assert!(portfolio.validate().is_err());
    }
}
