/// A prebuilt release target: where its binary lives and how its wheel is tagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub triple: &'static str,
    pub binary_name: &'static str,
    pub platform_tag: &'static str,
}

impl Target {
    pub fn is_windows(&self) -> bool {
        self.binary_name.ends_with(".exe")
    }
}

/// Every target a release ships, in the order wheels are built.
pub const TARGETS: [Target; 6] = [
    // Linux targets
    Target {
        triple: "x86_64-unknown-linux-gnu",
        binary_name: "xurl",
        platform_tag: "manylinux2014_x86_64",
    },
    Target {
        triple: "aarch64-unknown-linux-gnu",
        binary_name: "xurl",
        platform_tag: "manylinux2014_aarch64",
    },
    // macOS targets
    Target {
        triple: "x86_64-apple-darwin",
        binary_name: "xurl",
        platform_tag: "macosx_11_0_x86_64",
    },
    Target {
        triple: "aarch64-apple-darwin",
        binary_name: "xurl",
        platform_tag: "macosx_11_0_arm64",
    },
    // Windows targets
    Target {
        triple: "x86_64-pc-windows-msvc",
        binary_name: "xurl.exe",
        platform_tag: "win_amd64",
    },
    Target {
        triple: "aarch64-pc-windows-msvc",
        binary_name: "xurl.exe",
        platform_tag: "win_arm64",
    },
];

pub fn find_target(triple: &str) -> Option<&'static Target> {
    TARGETS.iter().find(|target| target.triple == triple)
}

pub fn supported_triples() -> Vec<&'static str> {
    TARGETS.iter().map(|target| target.triple).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_order() {
        assert_eq!(
            supported_triples(),
            vec![
                "x86_64-unknown-linux-gnu",
                "aarch64-unknown-linux-gnu",
                "x86_64-apple-darwin",
                "aarch64-apple-darwin",
                "x86_64-pc-windows-msvc",
                "aarch64-pc-windows-msvc",
            ]
        );
    }

    #[test]
    fn test_common_lookups() {
        let linux = find_target("aarch64-unknown-linux-gnu").unwrap();
        assert_eq!(linux.binary_name, "xurl");
        assert_eq!(linux.platform_tag, "manylinux2014_aarch64");
        assert!(!linux.is_windows());

        let mac = find_target("aarch64-apple-darwin").unwrap();
        assert_eq!(mac.platform_tag, "macosx_11_0_arm64");

        let windows = find_target("x86_64-pc-windows-msvc").unwrap();
        assert_eq!(windows.binary_name, "xurl.exe");
        assert_eq!(windows.platform_tag, "win_amd64");
        assert!(windows.is_windows());
    }

    #[test]
    fn test_unknown_target() {
        assert_eq!(find_target("x86_64-unknown-freebsd"), None);
    }

    #[test]
    fn test_platform_tags_are_unique() {
        let mut tags: Vec<&str> = TARGETS.iter().map(|t| t.platform_tag).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), TARGETS.len());
    }
}
