mod collect;
mod model;
mod parse;

pub use collect::{parse_data_file, read_data_file};
pub use model::{Entity, EntityLoad, LoadWarning, validate_entities};
pub use parse::{Attachment, DataFile, OrganisationRecord, TeamMemberRecord};
