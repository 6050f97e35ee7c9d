//! Exclusion predicate for build contents

use serde::{Deserialize, Serialize};

use contentscope_core::AssetKind;
use contentscope_store::path::{get_extension, has_segment};

/// Rules deciding which dependency paths can become table rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionRules {
    /// Extensions (no dot, case-insensitive) that denote scripts
    pub script_extensions: Vec<String>,
    /// Directory names whose contents are editor-only
    pub editor_segments: Vec<String>,
    /// Extensions (no dot, case-insensitive) that denote scenes
    pub scene_extensions: Vec<String>,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self {
            script_extensions: ["cs", "js", "boo"]
                .into_iter()
                .map(String::from)
                .collect(),
            editor_segments: vec!["Editor".to_string()],
            scene_extensions: vec!["unity".to_string()],
        }
    }
}

impl ExclusionRules {
    /// Classify a logical path
    ///
    /// Script extensions win over editor segments, which win over scenes.
    pub fn classify(&self, path: &str) -> AssetKind {
        let ext = get_extension(path);
        let ext_in = |list: &[String]| {
            ext.is_some_and(|e| list.iter().any(|x| x.eq_ignore_ascii_case(e)))
        };

        if ext_in(&self.script_extensions) {
            AssetKind::Script
        } else if self.editor_segments.iter().any(|s| has_segment(path, s)) {
            AssetKind::EditorOnly
        } else if ext_in(&self.scene_extensions) {
            AssetKind::Scene
        } else {
            AssetKind::Content
        }
    }

    /// Whether `path` must never become a row
    pub fn is_excluded(&self, path: &str) -> bool {
        !self.classify(path).is_shippable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripts_excluded() {
        let rules = ExclusionRules::default();
        assert!(rules.is_excluded("Assets/Scripts/Player.cs"));
        assert!(rules.is_excluded("Assets/Scripts/Legacy.JS"));
        assert_eq!(rules.classify("Assets/Scripts/Player.cs"), AssetKind::Script);
    }

    #[test]
    fn test_plugins_are_content() {
        let rules = ExclusionRules::default();
        assert_eq!(rules.classify("Assets/Plugins/Native.DLL"), AssetKind::Content);
        assert!(!rules.is_excluded("Assets/Plugins/x86_64/libaudio.so"));
        assert!(!rules.is_excluded("Assets/Scripts/Game.asmdef"));
    }

    #[test]
    fn test_editor_segment_excluded() {
        let rules = ExclusionRules::default();
        assert!(rules.is_excluded("Assets/Editor/Icons/tool.png"));
        assert!(rules.is_excluded("Assets/Plugins/Editor/gizmo.png"));
        assert!(!rules.is_excluded("Assets/EditorArt/tool.png"));
        assert_eq!(rules.classify("Assets/Editor/icon.png"), AssetKind::EditorOnly);
    }

    #[test]
    fn test_content_and_scenes_kept() {
        let rules = ExclusionRules::default();
        assert_eq!(rules.classify("Assets/Scenes/Main.unity"), AssetKind::Scene);
        assert_eq!(rules.classify("Assets/Textures/rock.png"), AssetKind::Content);
        assert_eq!(rules.classify("Assets/LICENSE"), AssetKind::Content);
        assert!(!rules.is_excluded("Assets/Scenes/Main.unity"));
    }

    #[test]
    fn test_custom_rules() {
        let rules = ExclusionRules {
            script_extensions: vec!["lua".into()],
            editor_segments: vec!["Tools".into()],
            scene_extensions: vec![],
        };
        assert!(rules.is_excluded("Assets/ai.lua"));
        assert!(rules.is_excluded("Assets/Tools/x.png"));
        assert!(!rules.is_excluded("Assets/Player.cs"));
    }
}
