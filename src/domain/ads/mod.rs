// Ads domain module
// Listings, their catalogue (categories and locations) and dynamic fields

pub mod attachment;
pub mod category;
pub mod job;
pub mod location;
pub mod optional_field;

pub use attachment::{AttachmentInput, AttachmentView, OptionalFieldThrough, ReconciliationPlan};
pub use category::Category;
pub use job::{Job, JobDraft, JobFilter, JobFlags, JobStatus};
pub use location::{City, CityWithCountry, Country};
pub use optional_field::{FieldType, OptionalField, OptionalFieldDefinition};
