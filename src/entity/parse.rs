use serde::Deserialize;

use super::model::Entity;

const UNNAMED_ORGANISATION: &str = "Unnamed Organisation";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub url: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OrganisationRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub org_name: Option<String>,
    #[serde(default)]
    pub website_link: Option<String>,
    #[serde(default)]
    pub how_connected: Option<String>,
    #[serde(default, alias = "impact_reporting")]
    pub impact_reporting_ids: Vec<String>,
    #[serde(default)]
    pub impact_domain: Vec<String>,
    #[serde(default, alias = "Logo")]
    pub logo: Option<Attachment>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TeamMemberRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub pod: Option<String>,
    #[serde(default)]
    pub areas: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Everything a data file may carry. Each list is optional.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataFile {
    #[serde(default)]
    pub organisations: Vec<OrganisationRecord>,
    #[serde(default)]
    pub team: Vec<TeamMemberRecord>,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl DataFile {
    /// Organisation records followed by any generic entities.
    pub fn organisation_entities(&self) -> Vec<Entity> {
        self.organisations
            .iter()
            .cloned()
            .map(Entity::from)
            .chain(self.entities.iter().cloned())
            .collect()
    }

    pub fn team_entities(&self) -> Vec<Entity> {
        self.team.iter().cloned().map(Entity::from).collect()
    }
}

impl From<OrganisationRecord> for Entity {
    fn from(record: OrganisationRecord) -> Self {
        let display_name = record
            .org_name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNNAMED_ORGANISATION.to_owned());

        Entity {
            id: record.id,
            display_name,
            category_tags: record.impact_domain,
            cross_ref_ids: record.impact_reporting_ids,
            image_url: record
                .logo
                .map(|logo| logo.url)
                .filter(|url| !url.is_empty()),
            summary: record.how_connected.or(record.website_link),
        }
    }
}

impl From<TeamMemberRecord> for Entity {
    fn from(record: TeamMemberRecord) -> Self {
        let mut category_tags = Vec::with_capacity(record.areas.len() + 1);
        for tag in record.areas.into_iter().chain(record.pod) {
            let tag = tag.trim().to_owned();
            if !tag.is_empty() && !category_tags.contains(&tag) {
                category_tags.push(tag);
            }
        }

        Entity {
            id: record.id,
            display_name: record.name,
            category_tags,
            cross_ref_ids: Vec::new(),
            image_url: record.image.filter(|url| !url.is_empty()),
            summary: record.role,
        }
    }
}
