crate::define_id_enum! {
    /// Application runtime family inferred from manifests
    Framework (fallback = Unknown) {
        Unknown => "Unknown",
        Node => "Node.js" | "node" | "nodejs",
        Python => "Python" | "python",
        FastApi => "FastAPI" | "fastapi",
        Flask => "Flask" | "flask",
        Java => "Java" | "java",
    }
}

crate::define_id_enum! {
    /// Build tool used for the compiled ecosystem
    JavaBuildTool (fallback = Maven) {
        Maven => "Maven" | "maven",
        Gradle => "Gradle" | "gradle",
    }
}

/// Shim flavour a framework gets injected with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShimKind {
    /// Preloaded module that patches the module loader
    NodePreload,
    /// `sitecustomize` hook that patches name resolution
    PythonSiteCustomize,
}

impl Framework {
    /// Default exposed port when no family-specific port applies.
    pub const DEFAULT_PORT: u16 = 3000;

    pub fn default_port(&self) -> u16 {
        match self {
            Framework::Node | Framework::Unknown => Self::DEFAULT_PORT,
            Framework::FastApi => 8000,
            Framework::Python | Framework::Flask => 5000,
            Framework::Java => 8080,
        }
    }

    pub fn is_python(&self) -> bool {
        matches!(
            self,
            Framework::Python | Framework::FastApi | Framework::Flask
        )
    }

    pub fn shim(&self) -> Option<ShimKind> {
        match self {
            Framework::Node => Some(ShimKind::NodePreload),
            f if f.is_python() => Some(ShimKind::PythonSiteCustomize),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framework_serialization() {
        assert_eq!(
            serde_json::to_string(&Framework::Node).unwrap(),
            "\"Node.js\""
        );
        assert_eq!(
            serde_json::to_string(&Framework::FastApi).unwrap(),
            "\"FastAPI\""
        );
    }

    #[test]
    fn test_unrecognized_framework_deserializes_to_unknown() {
        let framework: Framework = serde_json::from_str("\"Elixir\"").unwrap();
        assert_eq!(framework, Framework::Unknown);
    }

    #[test]
    fn test_from_name_with_aliases() {
        assert_eq!(Framework::from_name("Node.js"), Some(Framework::Node));
        assert_eq!(Framework::from_name("nodejs"), Some(Framework::Node));
        assert_eq!(Framework::from_name("fastapi"), Some(Framework::FastApi));
        assert_eq!(Framework::from_name("rails"), None);
    }

    #[test]
    fn test_default_ports() {
        assert_eq!(Framework::Node.default_port(), 3000);
        assert_eq!(Framework::FastApi.default_port(), 8000);
        assert_eq!(Framework::Flask.default_port(), 5000);
        assert_eq!(Framework::Python.default_port(), 5000);
        assert_eq!(Framework::Java.default_port(), 8080);
        assert_eq!(Framework::Unknown.default_port(), 3000);
    }

    #[test]
    fn test_shim_kinds() {
        assert_eq!(Framework::Node.shim(), Some(ShimKind::NodePreload));
        assert_eq!(
            Framework::Flask.shim(),
            Some(ShimKind::PythonSiteCustomize)
        );
        assert_eq!(Framework::Java.shim(), None);
        assert_eq!(Framework::Unknown.shim(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Framework::Java), "Java");
        assert_eq!(format!("{}", JavaBuildTool::Gradle), "Gradle");
    }
}
