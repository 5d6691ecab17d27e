use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// A graph participant as supplied by the data layer. The layout core never
/// changes an entity; it only attaches simulation state to it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub category_tags: Vec<String>,
    #[serde(default)]
    pub cross_ref_ids: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl Entity {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cross_refs<I, S>(mut self, refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cross_ref_ids = refs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// First non-empty category tag; the key entities are grouped by.
    pub fn primary_tag(&self) -> Option<&str> {
        self.category_tags
            .iter()
            .map(|tag| tag.trim())
            .find(|tag| !tag.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LoadWarning {
    #[error("entity at position {position} ({display_name:?}) has no id and was skipped")]
    MissingId {
        position: usize,
        display_name: String,
    },
    #[error("entity id {id:?} at position {position} duplicates an earlier entity and was skipped")]
    DuplicateId { id: String, position: usize },
}

impl LoadWarning {
    pub fn position(&self) -> usize {
        match self {
            Self::MissingId { position, .. } | Self::DuplicateId { position, .. } => *position,
        }
    }
}

/// Result of filtering one incoming entity list.
#[derive(Clone, Debug, Default)]
pub struct EntityLoad {
    pub accepted: Vec<Entity>,
    pub warnings: Vec<LoadWarning>,
}

/// Drops entities without an id and later duplicates of an id, keeping the rest
/// in their original order.
pub fn validate_entities(entities: Vec<Entity>) -> EntityLoad {
    let mut seen = HashSet::with_capacity(entities.len());
    let mut load = EntityLoad {
        accepted: Vec::with_capacity(entities.len()),
        warnings: Vec::new(),
    };

    for (position, mut entity) in entities.into_iter().enumerate() {
        let id = entity.id.trim().to_owned();
        if id.is_empty() {
            let warning = LoadWarning::MissingId {
                position,
                display_name: entity.display_name.clone(),
            };
            warn!(%warning, "rejected entity");
            load.warnings.push(warning);
            continue;
        }

        if seen.contains(&id) {
            let warning = LoadWarning::DuplicateId { id, position };
            warn!(%warning, "rejected entity");
            load.warnings.push(warning);
            continue;
        }

        seen.insert(id.clone());
        entity.id = id;
        load.accepted.push(entity);
    }

    load
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_duplicate_ids_are_skipped() {
        let load = validate_entities(vec![
            Entity::new("a", "Alpha"),
            Entity::new("  ", "Blank"),
            Entity::new("b", "Beta"),
            Entity::new("a", "Alpha again"),
        ]);

        let ids = load
            .accepted
            .iter()
            .map(|entity| entity.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(
            load.warnings,
            vec![
                LoadWarning::MissingId {
                    position: 1,
                    display_name: "Blank".to_owned(),
                },
                LoadWarning::DuplicateId {
                    id: "a".to_owned(),
                    position: 3,
                },
            ]
        );
    }

    #[test]
    fn ids_are_trimmed_before_comparison() {
        let load = validate_entities(vec![Entity::new(" x ", "X"), Entity::new("x", "X2")]);
        assert_eq!(load.accepted.len(), 1);
        assert_eq!(load.accepted[0].id, "x");
        assert_eq!(load.warnings[0].position(), 1);
    }

    #[test]
    fn primary_tag_skips_blank_tags() {
        let entity = Entity::new("a", "A").with_tags(["", " Land ", "Story"]);
        assert_eq!(entity.primary_tag(), Some("Land"));
        assert_eq!(Entity::new("b", "B").primary_tag(), None);
    }

    #[test]
    fn entity_reads_camel_case_shape() {
        let entity: Entity = serde_json::from_str(
            r#"{"id":"o1","displayName":"Org","categoryTags":["Education"],"crossRefIds":["r1"],"imageUrl":"https://example.org/logo.png"}"#,
        )
        .expect("valid entity json");
        assert_eq!(entity.display_name, "Org");
        assert_eq!(entity.category_tags, ["Education"]);
        assert_eq!(entity.cross_ref_ids, ["r1"]);
        assert_eq!(entity.image_url.as_deref(), Some("https://example.org/logo.png"));
    }
}
