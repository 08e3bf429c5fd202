//! The starter resume a fresh session opens with, and what `reset` restores.

use super::resume::{
    Achievement, Certification, Education, Experience, FontFamily, PersonalInfo, Project,
    ResumeDocument, SectionDescriptor, SectionKind, Skill, SkillLevel,
};

/// Built-in section descriptors in their default display order.
pub fn default_sections() -> Vec<SectionDescriptor> {
    [
        ("personal", SectionKind::Personal, "Contact Details"),
        ("summary", SectionKind::Summary, "Profile Summary"),
        ("education", SectionKind::Education, "Academic Details"),
        ("experience", SectionKind::Experience, "Work Experience"),
        ("skills", SectionKind::Skills, "Skills"),
        ("certifications", SectionKind::Certifications, "Course Certification"),
        ("projects", SectionKind::Projects, "Academic Projects"),
        ("achievements", SectionKind::Achievements, "Academic Achievements"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (id, kind, title))| SectionDescriptor::new(id, kind, title, i as i64 + 1))
    .collect()
}

pub fn default_template() -> ResumeDocument {
    ResumeDocument {
        personal_info: PersonalInfo {
            full_name: "John Smith".to_string(),
            email: "john.smith@email.com".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            address: "New York, NY, USA".to_string(),
            linkedin: Some("https://www.linkedin.com/in/johnsmith".to_string()),
            website: Some("https://johnsmith.dev".to_string()),
        },
        summary: "Experienced Software Engineer with 3+ years in full-stack development, \
                  specializing in React, Node and cloud technologies. Passionate about creating \
                  scalable web applications and delivering exceptional user experiences. Proven \
                  track record of leading development teams and implementing best practices."
            .to_string(),
        experience: vec![
            experience(
                "1",
                "TechCorp Solutions",
                "Senior Software Engineer",
                ("January 2023", "Present", true),
                &[
                    "Led development of scalable web applications using React, Node and AWS, serving 100k+ users",
                    "Implemented CI/CD pipelines reducing deployment time by 60% and improving code quality",
                    "Mentored junior developers and conducted code reviews ensuring best practices and knowledge sharing",
                    "Collaborated with product managers and designers to deliver user-centric features on time",
                ],
            ),
            experience(
                "2",
                "Digital Innovations Inc",
                "Full Stack Developer",
                ("June 2021", "December 2022", false),
                &[
                    "Developed and maintained multiple client projects using React, Vue and Express",
                    "Built RESTful APIs and integrated third-party services improving application functionality",
                    "Optimized database queries and implemented caching strategies reducing load times by 40%",
                    "Participated in agile development processes and sprint planning sessions",
                ],
            ),
            experience(
                "3",
                "StartupXYZ",
                "Junior Developer",
                ("August 2020", "May 2021", false),
                &[
                    "Contributed to front-end development using HTML, CSS, JavaScript and React",
                    "Assisted in debugging and testing applications ensuring high-quality deliverables",
                    "Learned modern development practices including version control with Git",
                    "Collaborated with senior developers to implement new features and fix bugs",
                ],
            ),
        ],
        education: vec![
            Education {
                id: "1".to_string(),
                institution: "University of Technology".to_string(),
                degree: "Bachelor of Science".to_string(),
                field: "Computer Science".to_string(),
                start_date: "2016".to_string(),
                end_date: "2020".to_string(),
                gpa: Some("3.8".to_string()),
            },
            Education {
                id: "2".to_string(),
                institution: "Metro High School".to_string(),
                degree: "High School Diploma".to_string(),
                field: "General Studies".to_string(),
                start_date: "2012".to_string(),
                end_date: "2016".to_string(),
                gpa: Some("3.9".to_string()),
            },
        ],
        skills: [
            ("JavaScript", SkillLevel::Advanced),
            ("React", SkillLevel::Advanced),
            ("Node", SkillLevel::Advanced),
            ("TypeScript", SkillLevel::Intermediate),
            ("Python", SkillLevel::Intermediate),
            ("AWS", SkillLevel::Intermediate),
            ("Docker", SkillLevel::Intermediate),
            ("MongoDB", SkillLevel::Intermediate),
            ("PostgreSQL", SkillLevel::Intermediate),
            ("Git", SkillLevel::Advanced),
            ("Agile/Scrum", SkillLevel::Advanced),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (name, level))| Skill {
            id: (i + 1).to_string(),
            name: name.to_string(),
            level,
        })
        .collect(),
        projects: vec![
            Project {
                id: "1".to_string(),
                name: "E-Commerce Platform".to_string(),
                description: "Full-stack e-commerce application with user authentication, product \
                              catalog, shopping cart and payment integration. Built with modern web \
                              technologies and deployed on AWS."
                    .to_string(),
                technologies: strings(&["React", "Node", "MongoDB", "Stripe API", "AWS"]),
                link: Some("https://github.com/johnsmith/ecommerce-platform".to_string()),
            },
            Project {
                id: "2".to_string(),
                name: "Task Management App".to_string(),
                description: "Collaborative task management application with real-time updates, \
                              team collaboration features and project tracking capabilities."
                    .to_string(),
                technologies: strings(&["Vue", "Express", "Socket.io", "PostgreSQL"]),
                link: Some("https://github.com/johnsmith/task-manager".to_string()),
            },
        ],
        certifications: vec![
            certification("1", "AWS Certified Developer - Associate", "Amazon Web Services", "2023"),
            certification("2", "React Developer Certification", "Meta", "2022"),
            certification("3", "Professional Scrum Master I", "Scrum.org", "2021"),
        ],
        achievements: vec![
            Achievement {
                id: "1".to_string(),
                title: "Employee of the Year Award for outstanding contribution to product \
                        development and team leadership"
                    .to_string(),
                description: "Recognized for leading a critical project that improved system \
                              performance by 50%"
                    .to_string(),
                date: Some("2023".to_string()),
            },
            Achievement {
                id: "2".to_string(),
                title: "Best Innovation Award at TechCorp Hackathon for developing an AI-powered \
                        code review tool"
                    .to_string(),
                description: "Created a tool that automated code quality checks and reduced \
                              review time by 30%"
                    .to_string(),
                date: Some("2022".to_string()),
            },
            Achievement {
                id: "3".to_string(),
                title: "Dean's List for Academic Excellence".to_string(),
                description: "Maintained GPA above 3.7 for four consecutive semesters".to_string(),
                date: Some("2018-2020".to_string()),
            },
        ],
        custom_sections: Vec::new(),
        sections: default_sections(),
        font_family: FontFamily::Times,
        font_size: 11.0,
    }
}

fn experience(
    id: &str,
    company: &str,
    position: &str,
    (start, end, current): (&str, &str, bool),
    bullets: &[&str],
) -> Experience {
    Experience {
        id: id.to_string(),
        company: company.to_string(),
        position: position.to_string(),
        start_date: start.to_string(),
        end_date: end.to_string(),
        current,
        description: strings(bullets),
    }
}

fn certification(id: &str, name: &str, issuer: &str, date: &str) -> Certification {
    Certification {
        id: id.to_string(),
        name: name.to_string(),
        issuer: issuer.to_string(),
        date: Some(date.to_string()),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
