use serde::{Deserialize, Serialize};

/// The structured documentation contract the writer model is asked to emit.
///
/// All fields default so a partially filled object from the model still
/// deserializes; the section layout is part of the writer prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Documentation {
    #[serde(default)]
    pub overview: Overview,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub tech_stack: TechStack,
    #[serde(default)]
    pub structure: Structure,
    #[serde(default)]
    pub activity: Activity,
    #[serde(default)]
    pub getting_started: GettingStarted,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Overview {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub default_branch: String,
    #[serde(default)]
    pub visibility: String,
    #[serde(default)]
    pub license: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechStack {
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub dependencies: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Structure {
    #[serde(default)]
    pub main_files: Vec<MainFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainFile {
    pub name: String,
    #[serde(default)]
    pub purpose: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub stars: u64,
    #[serde(default)]
    pub forks: u64,
    #[serde(default)]
    pub open_issues: u64,
    #[serde(default)]
    pub last_activity: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GettingStarted {
    #[serde(default)]
    pub installation: String,
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub project_url: String,
}

/// Final output of a generation run.
///
/// When the writer model produces valid JSON it becomes `Structured`; when
/// it does not, the raw text is kept instead of being thrown away.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum GeneratedDoc {
    Structured {
        project: String,
        documentation: Documentation,
    },
    Text {
        project: String,
        documentation: String,
        note: String,
    },
}

impl GeneratedDoc {
    pub fn project(&self) -> &str {
        match self {
            GeneratedDoc::Structured { project, .. } => project,
            GeneratedDoc::Text { project, .. } => project,
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, GeneratedDoc::Structured { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documentation_deserializes_from_partial_json() {
        let doc: Documentation = serde_json::from_value(serde_json::json!({
            "overview": {"name": "app", "description": "does things"},
            "features": ["fast"]
        }))
        .unwrap();
        assert_eq!(doc.overview.name, "app");
        assert_eq!(doc.features, vec!["fast"]);
        assert!(doc.structure.main_files.is_empty());
    }

    #[test]
    fn generated_doc_tags_format() {
        let doc = GeneratedDoc::Text {
            project: "ns/app".into(),
            documentation: "plain text".into(),
            note: "writer output was not valid JSON".into(),
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["format"], "text");
        assert_eq!(doc.project(), "ns/app");
        assert!(!doc.is_structured());
    }
}
