// SPDX-License-Identifier: MIT

use super::OsFamily;

/// A package to keep at a given state on the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub ensure: String,
}

/// Per-family naming: base package name and debug-symbol suffix.
fn naming(family: OsFamily) -> (&'static str, &'static str) {
    match family {
        OsFamily::Debian => ("pg-probackup", "-dbg"),
        OsFamily::RedHat => ("pg_probackup", "-debuginfo"),
    }
}

/// Packages for one server version: the tool itself and, when requested,
/// its debug symbols.
pub fn packages_for(
    family: OsFamily,
    version: &str,
    ensure: Option<&str>,
    debug_symbols: bool,
) -> Vec<Package> {
    let (base, debug_suffix) = naming(family);
    let ensure = ensure.unwrap_or("present").to_string();
    let name = format!("{base}-{version}");

    let mut packages = vec![Package {
        name: name.clone(),
        ensure: ensure.clone(),
    }];
    if debug_symbols {
        packages.push(Package {
            name: format!("{name}{debug_suffix}"),
            ensure,
        });
    }
    packages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debian_names_use_dashes() {
        let packages = packages_for(OsFamily::Debian, "12", None, false);
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "pg-probackup-12");
        assert_eq!(packages[0].ensure, "present");
    }

    #[test]
    fn redhat_names_use_underscores() {
        let packages = packages_for(OsFamily::RedHat, "12", None, false);
        assert_eq!(packages[0].name, "pg_probackup-12");
    }

    #[test]
    fn debug_symbols_add_a_family_specific_package() {
        let deb = packages_for(OsFamily::Debian, "12", None, true);
        assert_eq!(deb[1].name, "pg-probackup-12-dbg");

        let rpm = packages_for(OsFamily::RedHat, "13", None, true);
        assert_eq!(rpm[1].name, "pg_probackup-13-debuginfo");
    }

    #[test]
    fn ensure_override_applies_to_every_package() {
        let packages = packages_for(OsFamily::Debian, "12", Some("latest"), true);
        assert!(packages.iter().all(|p| p.ensure == "latest"));
    }
}
