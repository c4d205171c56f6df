//! Layout configuration types and parsing
//!
//! This module provides the declarative data model for trellis sessions:
//! a [`SessionSpec`] owns an ordered sequence of [`PaneSpec`] entries, and a
//! [`LayoutFile`] holds named layouts loaded from `trellis.yaml`.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ProvisionError;

// =============================================================================
// Pane Primitives
// =============================================================================

/// Axis along which an existing pane is divided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitDirection {
    /// Side-by-side split (tmux `-h`)
    Horizontal,
    /// Stacked split (tmux `-v`)
    Vertical,
}

/// Size of a new pane, either absolute or relative to the pane it splits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeConstraint {
    /// Absolute size in lines (columns for horizontal splits)
    Lines(u32),
    /// Percentage of the target pane
    Percent(u32),
}

impl fmt::Display for SizeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeConstraint::Lines(n) => write!(f, "{}", n),
            SizeConstraint::Percent(n) => write!(f, "{}%", n),
        }
    }
}

impl Serialize for SizeConstraint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            SizeConstraint::Lines(n) => serializer.serialize_u32(*n),
            SizeConstraint::Percent(n) => serializer.serialize_str(&format!("{}%", n)),
        }
    }
}

impl<'de> Deserialize<'de> for SizeConstraint {
    /// Accepts a bare integer (line count) or a `"30%"` style string;
    /// zero-sized panes are rejected either way.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct SizeVisitor;

        impl serde::de::Visitor<'_> for SizeVisitor {
            type Value = SizeConstraint;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a line count or a percentage string like \"30%\"")
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                match u32::try_from(v) {
                    Ok(0) | Err(_) => Err(E::custom(format!("pane size {} is out of range", v))),
                    Ok(n) => Ok(SizeConstraint::Lines(n)),
                }
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                match u32::try_from(v) {
                    Ok(0) | Err(_) => Err(E::custom(format!("pane size {} is out of range", v))),
                    Ok(n) => Ok(SizeConstraint::Lines(n)),
                }
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let digits = v
                    .strip_suffix('%')
                    .ok_or_else(|| E::custom(format!("expected \"NN%\", got {:?}", v)))?;
                let pct: u32 = digits
                    .trim()
                    .parse()
                    .map_err(|_| E::custom(format!("invalid percentage {:?}", v)))?;
                if !(1..=100).contains(&pct) {
                    return Err(E::custom(format!(
                        "percentage {} is outside 1-100",
                        pct
                    )));
                }
                Ok(SizeConstraint::Percent(pct))
            }
        }

        deserializer.deserialize_any(SizeVisitor)
    }
}

// =============================================================================
// Session Specification
// =============================================================================

/// One pane within a session layout.
///
/// The first pane of a layout is the root pane, created implicitly with the
/// session; it must not carry a `split`. Every later pane splits off an
/// already-created pane identified by `target` (defaults to the previously
/// created pane).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaneSpec {
    /// Split axis; absent only for the root pane
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitDirection>,
    /// Index of the pane to split from (must already exist)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<usize>,
    /// Size of the new pane
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeConstraint>,
    /// Working directory for the pane (supports ~)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    /// Shell command typed into the pane after creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

/// A fully resolved session description, ready for provisioning
#[derive(Debug, Clone, Serialize)]
pub struct SessionSpec {
    /// Session name (unique per tmux server)
    pub name: String,
    /// Name of the initial window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<String>,
    /// Layout file this spec came from, stored on the live session so
    /// `trellis ls` can tell trellis sessions apart
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Ordered panes; index 0 is the root
    pub panes: Vec<PaneSpec>,
}

impl SessionSpec {
    /// Check the input constraints that must hold before any tmux call.
    pub fn validate(&self) -> Result<(), ProvisionError> {
        if self.name.trim().is_empty() {
            return Err(ProvisionError::InvalidSpec(
                "session name must not be empty".to_string(),
            ));
        }
        let Some(root) = self.panes.first() else {
            return Err(ProvisionError::InvalidSpec(
                "layout has no panes".to_string(),
            ));
        };
        if root.split.is_some() {
            return Err(ProvisionError::InvalidSpec(
                "the root pane is created with the session and cannot be a split".to_string(),
            ));
        }
        for (index, pane) in self.panes.iter().enumerate().skip(1) {
            if pane.split.is_none() {
                return Err(ProvisionError::InvalidSpec(format!(
                    "pane {} needs a split direction (horizontal or vertical)",
                    index
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Layout File
// =============================================================================

/// A named layout inside `trellis.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    /// Name of the initial window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<String>,
    /// Ordered panes; index 0 is the root
    pub panes: Vec<PaneSpec>,
}

/// Parsed `trellis.yaml` with its named layouts in declaration order
#[derive(Debug, Deserialize)]
pub struct LayoutFile {
    /// Default session name; falls back to the file's directory name
    #[serde(default)]
    pub session: Option<String>,
    /// Named layouts ("default" is used when none is asked for)
    pub layouts: IndexMap<String, Layout>,
    /// Where the file was loaded from (set during loading, not from YAML)
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

impl LayoutFile {
    /// Resolve the session name: CLI override, then the `session` field,
    /// then the layout file's directory name.
    pub fn session_name(&self, name_override: Option<&str>) -> String {
        if let Some(name) = name_override {
            return name.to_string();
        }
        if let Some(name) = &self.session {
            return name.clone();
        }
        self.path
            .as_deref()
            .and_then(|p| p.parent())
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "trellis".to_string())
    }

    /// Build the [`SessionSpec`] for a named layout (default: "default").
    pub fn resolve(
        &self,
        layout_name: Option<&str>,
        name_override: Option<&str>,
    ) -> Result<SessionSpec> {
        let layout_name = layout_name.unwrap_or("default");
        let Some(layout) = self.layouts.get(layout_name) else {
            let available: Vec<&str> = self.layouts.keys().map(|s| s.as_str()).collect();
            anyhow::bail!(
                "layout '{}' not found. Available layouts: {}",
                layout_name,
                available.join(", ")
            );
        };

        Ok(SessionSpec {
            name: self.session_name(name_override),
            window: layout.window.clone(),
            origin: self
                .path
                .as_deref()
                .map(|p| p.to_string_lossy().to_string()),
            panes: layout.panes.clone(),
        })
    }
}

/// Load a layout file from disk.
pub fn load_layout_file(path: &Path) -> Result<LayoutFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut file: LayoutFile = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    file.path = Some(path.to_path_buf());
    Ok(file)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Expand ~ to home directory in paths
pub fn expand_path(path: &str) -> String {
    path.strip_prefix("~/")
        .and_then(|stripped| dirs::home_dir().map(|home| home.join(stripped)))
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Generate a starter layout file with a commented default layout
pub fn generate_layout_file(session: &str) -> String {
    format!(
        r#"# trellis layout file
#
# Each layout is an ordered list of panes. The first pane is created with
# the session; every later pane splits off an earlier one:
#   split:   horizontal (side by side) or vertical (stacked)
#   target:  index of the pane to split from (defaults to the previous pane)
#   size:    lines (size: 3) or a percentage (size: "30%")
#   dir:     working directory (supports ~)
#   command: typed into the pane once it exists

session: {session}

layouts:
  default:
    window: main
    panes:
      # Root pane: plain shell
      - dir: .

      # Right half
      - split: horizontal
        target: 0
        dir: .
        # command: rss-reader

      # Three-line strip under the right half
      - split: vertical
        target: 1
        size: 3
        # command: pomodoro

  # Single-pane layout
  solo:
    panes:
      - dir: .
"#,
        session = session,
    )
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> LayoutFile {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_parse_layout_file() {
        let file = parse(
            r#"
session: desktop
layouts:
  default:
    window: main
    panes:
      - dir: /work
      - split: horizontal
        target: 0
        dir: /work
        command: run-reader
      - split: vertical
        target: 1
        size: 3
        command: run-timer
"#,
        );

        assert_eq!(file.session.as_deref(), Some("desktop"));
        let spec = file.resolve(None, None).unwrap();
        assert_eq!(spec.name, "desktop");
        assert_eq!(spec.window.as_deref(), Some("main"));
        assert_eq!(spec.panes.len(), 3);
        assert_eq!(spec.panes[1].split, Some(SplitDirection::Horizontal));
        assert_eq!(spec.panes[1].target, Some(0));
        assert_eq!(spec.panes[2].size, Some(SizeConstraint::Lines(3)));
        assert_eq!(spec.panes[2].command.as_deref(), Some("run-timer"));
    }

    #[test]
    fn test_size_percent_parses() {
        let file = parse(
            r#"
layouts:
  default:
    panes:
      - {}
      - split: vertical
        size: "30%"
"#,
        );
        let spec = file.resolve(None, None).unwrap();
        assert_eq!(spec.panes[1].size, Some(SizeConstraint::Percent(30)));
    }

    #[test]
    fn test_size_over_100_percent_rejected() {
        let err = serde_yaml::from_str::<LayoutFile>(
            r#"
layouts:
  default:
    panes:
      - {}
      - split: vertical
        size: "120%"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("outside 1-100"));
    }

    #[test]
    fn test_zero_percent_rejected() {
        let err = serde_yaml::from_str::<LayoutFile>(
            r#"
layouts:
  default:
    panes:
      - {}
      - split: vertical
        size: "0%"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("outside 1-100"));
    }

    #[test]
    fn test_zero_lines_rejected() {
        let err = serde_yaml::from_str::<LayoutFile>(
            r#"
layouts:
  default:
    panes:
      - {}
      - split: vertical
        size: 0
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_size_without_percent_suffix_rejected() {
        let err = serde_yaml::from_str::<LayoutFile>(
            r#"
layouts:
  default:
    panes:
      - {}
      - split: vertical
        size: "wide"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("NN%"));
    }

    #[test]
    fn test_unknown_layout_lists_available() {
        let file = parse(
            "layouts:\n  default:\n    panes:\n      - {}\n  wide:\n    panes:\n      - {}\n",
        );
        let err = file.resolve(Some("missing"), None).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'missing' not found"));
        assert!(msg.contains("default, wide"));
    }

    #[test]
    fn test_session_name_fallbacks() {
        let mut file = parse("layouts:\n  default:\n    panes:\n      - {}\n");
        file.path = Some(PathBuf::from("/home/user/projects/desk/trellis.yaml"));

        assert_eq!(file.session_name(Some("override")), "override");
        assert_eq!(file.session_name(None), "desk");

        file.session = Some("named".to_string());
        assert_eq!(file.session_name(None), "named");
    }

    #[test]
    fn test_validate_rejects_split_on_root() {
        let spec = SessionSpec {
            name: "s".to_string(),
            window: None,
            origin: None,
            panes: vec![PaneSpec {
                split: Some(SplitDirection::Vertical),
                ..Default::default()
            }],
        };
        assert!(matches!(
            spec.validate(),
            Err(ProvisionError::InvalidSpec(_))
        ));
    }

    #[test]
    fn test_validate_requires_split_after_root() {
        let spec = SessionSpec {
            name: "s".to_string(),
            window: None,
            origin: None,
            panes: vec![PaneSpec::default(), PaneSpec::default()],
        };
        let err = spec.validate().unwrap_err();
        assert!(err.to_string().contains("pane 1"));
    }

    #[test]
    fn test_generated_layout_file_parses() {
        let content = generate_layout_file("desk");
        let file: LayoutFile = serde_yaml::from_str(&content).unwrap();
        assert_eq!(file.session.as_deref(), Some("desk"));

        let spec = file.resolve(None, None).unwrap();
        assert_eq!(spec.panes.len(), 3);
        assert!(spec.validate().is_ok());
        assert_eq!(spec.panes[2].size, Some(SizeConstraint::Lines(3)));

        let solo = file.resolve(Some("solo"), None).unwrap();
        assert_eq!(solo.panes.len(), 1);
    }

    #[test]
    fn test_expand_path() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/work"), home.join("work").to_string_lossy());
        }
        assert_eq!(expand_path("/absolute"), "/absolute");
        assert_eq!(expand_path("relative"), "relative");
    }
}
