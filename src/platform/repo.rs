// SPDX-License-Identifier: MIT

use super::OsFamily;

const APT_LOCATION: &str = "https://repo.postgrespro.ru/pg_probackup/deb/";
const YUM_BASEURL: &str = "https://repo.postgrespro.ru/pg_probackup/rpm/";

/// Vendor repository definition for the node's package manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoSource {
    Apt { location: String, release: String },
    Yum { baseurl: String },
}

/// The vendor repository to configure for `family`. `release` is the
/// distribution codename and only matters on apt systems.
pub fn repo_for(family: OsFamily, release: &str) -> RepoSource {
    match family {
        OsFamily::Debian => RepoSource::Apt {
            location: APT_LOCATION.to_string(),
            release: release.to_string(),
        },
        OsFamily::RedHat => RepoSource::Yum {
            baseurl: YUM_BASEURL.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debian_gets_an_apt_source_with_the_codename() {
        let repo = repo_for(OsFamily::Debian, "bullseye");
        assert_eq!(
            repo,
            RepoSource::Apt {
                location: "https://repo.postgrespro.ru/pg_probackup/deb/".to_string(),
                release: "bullseye".to_string(),
            }
        );
    }

    #[test]
    fn redhat_gets_a_yum_baseurl() {
        let repo = repo_for(OsFamily::RedHat, "8");
        assert_eq!(
            repo,
            RepoSource::Yum {
                baseurl: "https://repo.postgrespro.ru/pg_probackup/rpm/".to_string(),
            }
        );
    }
}
