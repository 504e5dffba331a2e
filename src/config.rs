use crate::{error::*, loader::LoaderConfig, page_rank::Config};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Nodes to report. Absent means every node, ranked.
    pub nodes: Option<Vec<u64>>,
    /// Cut the ranked listing to the top `top` nodes.
    pub top: Option<usize>,
}

/// Everything one run needs. Defaults can be overlaid by a TOML file:
///
/// ```toml
/// [engine]
/// damping = 0.9
/// max_iterations = 50
///
/// [loader]
/// path = "data/web-Stanford.txt"
///
/// [report]
/// nodes = [1, 2, 3]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub engine: Config,
    pub loader: LoaderConfig,
    pub report: ReportSettings,
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&text).map_err(|e| match e {
            Error::Config { reason, .. } => Error::Config {
                path: path.to_path_buf(),
                reason,
            },
            e => e,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(text).map_err(|e| Error::Config {
            path: "<inline>".into(),
            reason: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        self.loader.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_rank::DanglingPolicy;
    use std::io::Write;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.engine.max_iterations, 100);
        assert_eq!(s.engine.damping, 0.85);
        assert_eq!(s.engine.threshold, 0.0001);
        assert_eq!(s.engine.dangling, DanglingPolicy::Redistribute);
        assert_eq!(s.report.nodes, None);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn partial_overlay() {
        let s = Settings::from_toml(
            r#"
            [engine]
            damping = 0.9
            dangling = "leak"

            [loader]
            path = "edges.tsv"
            delimiter = ","

            [report]
            nodes = [3, 1]
            "#,
        )
        .unwrap();
        assert_eq!(s.engine.damping, 0.9);
        assert_eq!(s.engine.max_iterations, 100);
        assert_eq!(s.engine.dangling, DanglingPolicy::Leak);
        assert_eq!(s.loader.path, Path::new("edges.tsv"));
        assert_eq!(s.loader.delimiter, Some(','));
        assert_eq!(s.loader.comment_prefix, "#");
        assert_eq!(s.report.nodes, Some(vec![3, 1]));
    }

    #[test]
    fn invalid_values() {
        let e = Settings::from_toml("[engine]\nthreshold = -1.0\n").unwrap_err();
        assert!(matches!(e, Error::InvalidParameter { .. }), "{e:?}");
        let e = Settings::from_toml("[engine]\ndamping = \"high\"\n").unwrap_err();
        assert!(matches!(e, Error::Config { .. }), "{e:?}");
        let e = Settings::from_toml("[loader]\ncomment_prefix = \"\"\n").unwrap_err();
        assert!(
            matches!(
                e,
                Error::InvalidParameter {
                    name: "comment_prefix",
                    ..
                }
            ),
            "{e:?}"
        );
        let e = Settings::from_toml("[loader]\ndelimiter = \" \"\n").unwrap_err();
        assert!(
            matches!(
                e,
                Error::InvalidParameter {
                    name: "delimiter",
                    ..
                }
            ),
            "{e:?}"
        );
    }

    #[test]
    fn from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "[engine]\nmax_iterations = 7").unwrap();
        let s = Settings::from_file(f.path()).unwrap();
        assert_eq!(s.engine.max_iterations, 7);

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("ranker.toml");
        match Settings::from_file(&missing) {
            Err(Error::Config { path, .. }) => assert_eq!(path, missing),
            other => panic!("{other:?}"),
        }
    }
}
