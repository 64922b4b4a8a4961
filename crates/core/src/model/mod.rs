mod course;
mod ids;
mod material;

pub use ids::{CourseId, MaterialId, ParseIdError, QuestionId};

pub use course::{Course, CourseError, normalize_name};
pub use material::{Material, MaterialDraft, MaterialError, ValidatedMaterial, combined_notes};
