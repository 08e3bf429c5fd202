pub mod resume;
pub mod template;

pub use resume::{
    Achievement, Certification, CustomSection, Education, Entry, Experience, FontFamily,
    PersonalInfo, Project, ResumeDocument, SectionDescriptor, SectionKind, Skill, SkillLevel,
};
pub use template::default_template;
