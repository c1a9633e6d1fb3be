pub mod resume;

pub use resume::{
    BulletRef, CustomEntry, EducationEntry, ExperienceEntry, ResumeDocument, Section,
};
