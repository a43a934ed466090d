// SPDX-License-Identifier: MIT

//! Semantic validation on top of YAML parsing.
//!
//! Parsing already rejects unknown keys and type mismatches; the checks here
//! catch configurations that are well-formed but cannot produce a usable
//! node run. All checks are fatal: a node never continues with a partially
//! valid configuration.

use crate::config::{CatalogConfig, InstanceConfig, NodeConfig};
use crate::errors::ConfigError;
use crate::platform::OsFamily;

/// Validate a loaded node configuration of either role.
pub fn validate_config(config: &NodeConfig) -> Result<(), ConfigError> {
    match config {
        NodeConfig::Instance(instance) => validate_instance(instance),
        NodeConfig::Catalog(catalog) => validate_catalog(catalog),
    }
}

fn validate_instance(instance: &InstanceConfig) -> Result<(), ConfigError> {
    if instance.version.is_none() && instance.binary.is_none() {
        return Err(ConfigError::MissingBinary {
            instance: instance.id().to_string(),
        });
    }

    if let Some(groups) = &instance.host_groups {
        if groups.is_empty() {
            return Err(ConfigError::EmptyHostGroups {
                instance: instance.id().to_string(),
            });
        }
    }

    for group in instance.target_groups() {
        if group.is_empty() {
            return Err(ConfigError::EmptyGroupName {
                node: instance.fqdn.clone(),
            });
        }
    }

    if let Some(family) = &instance.os_family {
        // parse gate; the capability table itself is total over OsFamily
        family.parse::<OsFamily>()?;
    }

    Ok(())
}

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    if catalog.group().is_empty() {
        return Err(ConfigError::EmptyGroupName {
            node: catalog.fqdn.clone(),
        });
    }

    if let Some(family) = &catalog.os_family {
        family.parse::<OsFamily>()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn instance_without_version_or_binary_is_rejected() {
        let yaml = "role: instance\nfqdn: psql.localhost\n";
        let config = parse_config(yaml).unwrap();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("must set either 'version' or 'binary'"));
    }

    #[test]
    fn custom_binary_satisfies_the_version_requirement() {
        let yaml = "role: instance\nfqdn: psql.localhost\nbinary: /opt/pgpro/bin/pg_probackup\n";
        let config = parse_config(yaml).unwrap();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn explicit_empty_host_groups_are_rejected() {
        let yaml = "role: instance\nfqdn: psql.localhost\nversion: '12'\nhost_groups: []\n";
        let config = parse_config(yaml).unwrap();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("empty host_groups"));
    }

    #[test]
    fn unsupported_os_family_is_rejected() {
        let yaml = "role: instance\nfqdn: psql.localhost\nversion: '12'\nos_family: Solaris\n";
        let config = parse_config(yaml).unwrap();
        let err = validate_config(&config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported managed repository for osfamily Solaris"
        );
    }

    #[test]
    fn empty_catalog_group_is_rejected() {
        let yaml = "role: catalog\nfqdn: backup.localhost\ngroup: ''\n";
        let config = parse_config(yaml).unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn valid_catalog_passes() {
        let yaml = "role: catalog\nfqdn: backup.localhost\nos_family: RedHat\n";
        let config = parse_config(yaml).unwrap();
        assert!(validate_config(&config).is_ok());
    }
}
