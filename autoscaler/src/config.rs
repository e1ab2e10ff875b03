//! Loads cluster definitions from a directory of YAML files, performing
//! `%(NAME)` environment-variable interpolation before parsing and
//! validating the declared bounds.

use std::collections::BTreeMap;
use std::path::Path;

use models::ClusterDefinition;
use regex::Regex;

use crate::error::ConfigError;

/// Loads every `*.yml` file directly inside `dir`. The file stem (sans
/// extension) becomes the cluster name. A config error anywhere aborts
/// the whole load before any cluster is touched.
pub fn load_cluster_defs(dir: &Path) -> Result<BTreeMap<String, ClusterDefinition>, ConfigError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ConfigError::Io {
        dir: dir.display().to_string(),
        source,
    })?;

    let placeholder = Regex::new(r"%\(([A-Za-z_][A-Za-z0-9_]*)\)").unwrap();
    let mut clusters = BTreeMap::new();

    for entry in entries {
        let entry = entry.map_err(|source| ConfigError::Io {
            dir: dir.display().to_string(),
            source,
        })?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("yml") {
            continue;
        }
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            dir: dir.display().to_string(),
            source,
        })?;
        let interpolated = interpolate(&raw, &placeholder)?;

        let mut def: ClusterDefinition =
            serde_yaml::from_str(&interpolated).map_err(|source| ConfigError::Parse {
                file: name.clone(),
                source,
            })?;
        def.name = name.clone();

        validate(&name, &def)?;
        clusters.insert(name, def);
    }

    Ok(clusters)
}

fn interpolate(raw: &str, placeholder: &Regex) -> Result<String, ConfigError> {
    let mut result = String::with_capacity(raw.len());
    let mut last_end = 0;
    for capture in placeholder.captures_iter(raw) {
        let whole = capture.get(0).unwrap();
        let var_name = &capture[1];
        let value = std::env::var(var_name)
            .map_err(|_| ConfigError::MissingEnvVar(var_name.to_string()))?;
        result.push_str(&raw[last_end..whole.start()]);
        result.push_str(&value);
        last_end = whole.end();
    }
    result.push_str(&raw[last_end..]);
    Ok(result)
}

fn validate(name: &str, def: &ClusterDefinition) -> Result<(), ConfigError> {
    if def.min < 0 || def.min > def.max {
        return Err(ConfigError::Invalid {
            file: name.to_string(),
            reason: format!("min/max out of order: min={}, max={}", def.min, def.max),
        });
    }
    for (service_name, service) in &def.services {
        if service.min < 0 || service.min > service.max {
            return Err(ConfigError::Invalid {
                file: name.to_string(),
                reason: format!(
                    "service {service_name}: min/max out of order: min={}, max={}",
                    service.min, service.max
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_cluster(dir: &Path, name: &str, body: &str) {
        let mut file = std::fs::File::create(dir.join(format!("{name}.yml"))).unwrap();
        file.write_all(body.as_bytes()).unwrap();
    }

    #[test]
    fn loads_and_validates_a_cluster() {
        let tmp = tempdir();
        write_cluster(
            &tmp,
            "prod",
            "enabled: true\nautoscale_group: prod-asg\nmin: 1\nmax: 3\n",
        );
        let clusters = load_cluster_defs(&tmp).unwrap();
        assert!(clusters.contains_key("prod"));
        assert_eq!(clusters["prod"].name, "prod");
    }

    #[test]
    fn rejects_inverted_bounds() {
        let tmp = tempdir();
        write_cluster(
            &tmp,
            "broken",
            "enabled: true\nautoscale_group: a\nmin: 5\nmax: 1\n",
        );
        assert!(matches!(
            load_cluster_defs(&tmp).unwrap_err(),
            ConfigError::Invalid { .. }
        ));
    }

    #[test]
    fn interpolates_env_placeholder() {
        std::env::set_var("AUTOSCALER_TEST_GROUP", "interpolated-asg");
        let tmp = tempdir();
        write_cluster(
            &tmp,
            "env",
            "enabled: true\nautoscale_group: \"%(AUTOSCALER_TEST_GROUP)\"\nmin: 0\nmax: 1\n",
        );
        let clusters = load_cluster_defs(&tmp).unwrap();
        assert_eq!(clusters["env"].autoscale_group, "interpolated-asg");
    }

    #[test]
    fn missing_env_var_is_a_hard_error() {
        let tmp = tempdir();
        write_cluster(
            &tmp,
            "env",
            "enabled: true\nautoscale_group: \"%(AUTOSCALER_DOES_NOT_EXIST)\"\nmin: 0\nmax: 1\n",
        );
        assert!(matches!(
            load_cluster_defs(&tmp).unwrap_err(),
            ConfigError::MissingEnvVar(_)
        ));
    }

    fn tempdir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "autoscaler-config-test-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }
}
