// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::error::ConfigError;
use log::debug;
use std::path::PathBuf;

pub const PLACEHOLDER: &str = "{}";

/// Pick the output file for a session.
///
/// A template without `{}` is used as is, even if the file exists. With one
/// `{}`, the lowest non-negative integer giving a path that does not exist yet
/// is substituted. More placeholders are a configuration error.
pub fn resolve_output_path(template: &str) -> Result<PathBuf, ConfigError> {
    match template.matches(PLACEHOLDER).count() {
        0 => Ok(PathBuf::from(template)),
        1 => {
            let mut n: u64 = 0;
            loop {
                let candidate = PathBuf::from(template.replacen(PLACEHOLDER, &n.to_string(), 1));
                if !candidate.exists() {
                    return Ok(candidate);
                }
                debug!("{} exists, trying next", candidate.display());
                n += 1;
            }
        }
        count => Err(ConfigError::TooManyPlaceholders {
            template: template.to_string(),
            count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn template(dir: &tempfile::TempDir, name: &str) -> String {
        dir.path().join(name).to_string_lossy().into_owned()
    }

    #[test]
    fn test_no_placeholder_returned_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let t = template(&dir, "fixed.log");
        fs::write(&t, "old").unwrap();
        assert_eq!(resolve_output_path(&t).unwrap(), PathBuf::from(&t));
    }

    #[test]
    fn test_first_free_slot() {
        let dir = tempfile::tempdir().unwrap();
        let t = template(&dir, "run_{}.log");
        assert_eq!(
            resolve_output_path(&t).unwrap(),
            dir.path().join("run_0.log")
        );

        fs::write(dir.path().join("run_0.log"), "").unwrap();
        assert_eq!(
            resolve_output_path(&t).unwrap(),
            dir.path().join("run_1.log")
        );
    }

    #[test]
    fn test_skips_contiguous_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        for n in 0..3 {
            fs::write(dir.path().join(format!("run_{n}.log")), "").unwrap();
        }
        fs::write(dir.path().join("run_5.log"), "").unwrap();
        let t = template(&dir, "run_{}.log");
        assert_eq!(
            resolve_output_path(&t).unwrap(),
            dir.path().join("run_3.log")
        );
    }

    #[test]
    fn test_idempotent_without_creating_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("run_0.log"), "").unwrap();
        let t = template(&dir, "run_{}.log");
        let first = resolve_output_path(&t).unwrap();
        let second = resolve_output_path(&t).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_existing_directory_counts_as_taken() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("out_0")).unwrap();
        let t = template(&dir, "out_{}");
        assert_eq!(resolve_output_path(&t).unwrap(), dir.path().join("out_1"));
    }

    #[test]
    fn test_two_placeholders_rejected() {
        assert_eq!(
            resolve_output_path("run_{}_{}.log"),
            Err(ConfigError::TooManyPlaceholders {
                template: "run_{}_{}.log".to_string(),
                count: 2,
            })
        );
        assert!(resolve_output_path("{}{}{}").is_err());
    }
}
