use std::fmt;

/// Non-fatal conditions found while planning a release.
/// These are reported to the user but never stop the run.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanWarning {
    /// HEAD already carries a tag; nothing is released
    AlreadyTagged { tag: String },
    /// An auto-release asked for a patch bump; releases start a new minor
    PatchCoercedToMinor,
    /// Release branches only ever get patch bumps
    ReleaseBranchPatchOnly,
    /// The release branch name and its latest tag disagree on major.minor
    ReleaseFamilyMismatch {
        branch_family: String,
        tag_family: String,
    },
    /// Pushing is disabled, so `what` stays local
    PushSkipped { what: String },
    /// A remote release was wanted but the tag never reaches the remote
    RemoteReleaseSkipped { tag: String },
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanWarning::AlreadyTagged { tag } => {
                write!(f, "HEAD is already tagged as '{}', skipping release", tag)
            }
            PlanWarning::PatchCoercedToMinor => {
                write!(f, "Patch bump requested on a release, using minor instead")
            }
            PlanWarning::ReleaseBranchPatchOnly => {
                write!(f, "Release branches only receive patch bumps")
            }
            PlanWarning::ReleaseFamilyMismatch {
                branch_family,
                tag_family,
            } => write!(
                f,
                "Release branch family '{}' does not match latest tag family '{}'",
                branch_family, tag_family
            ),
            PlanWarning::PushSkipped { what } => {
                write!(f, "Git push disabled, {} stays local", what)
            }
            PlanWarning::RemoteReleaseSkipped { tag } => write!(
                f,
                "Skipping remote release for '{}' because git push is disabled",
                tag
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let warning = PlanWarning::ReleaseFamilyMismatch {
            branch_family: "0.1".into(),
            tag_family: "1.0".into(),
        };
        assert_eq!(
            warning.to_string(),
            "Release branch family '0.1' does not match latest tag family '1.0'"
        );

        let warning = PlanWarning::AlreadyTagged {
            tag: "v1.0.0".into(),
        };
        assert!(warning.to_string().contains("v1.0.0"));
    }
}
