mod config;
mod errors;
mod export;
mod layout;
mod models;
mod preview;
mod session;
mod state;
mod storage;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::errors::AppError;
use crate::models::{
    Achievement, Certification, Education, Experience, FontFamily, Project, ResumeDocument,
    SectionDescriptor, Skill, SkillLevel,
};
use crate::preview::text::render_text;
use crate::session::Session;
use crate::state::AppState;
use crate::storage::DebouncedSaver;

#[derive(Debug, Parser)]
#[command(name = "resume-studio", version, about = "Edit, preview and export a resume")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the paginated preview
    Show {
        /// Include page-break markers
        #[arg(long)]
        chrome: bool,
    },
    /// Print the document as JSON
    Dump,
    /// Replace the document with a JSON snapshot
    Import { path: PathBuf },
    /// Restore the starter template
    Reset,
    /// Set one personal, summary or font field
    Set { field: Field, value: String },
    /// List sections in display order
    Sections,
    /// Show or hide a section
    Toggle { id: String },
    /// Move a section from one display position to another (0-based)
    Move { from: usize, to: usize },
    /// Manage custom sections
    #[command(subcommand)]
    Custom(CustomCommand),
    /// Add an entry
    #[command(subcommand)]
    Add(AddCommand),
    /// Remove an entry by id
    Remove { category: Category, id: String },
    /// Export the resume
    #[command(subcommand)]
    Export(ExportCommand),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Field {
    Name,
    Email,
    Phone,
    Address,
    Linkedin,
    Website,
    Summary,
    Font,
    FontSize,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Category {
    Experience,
    Education,
    Skill,
    Project,
    Certification,
    Achievement,
}

#[derive(Debug, Subcommand)]
enum CustomCommand {
    Add {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    Remove {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
enum AddCommand {
    Experience {
        company: String,
        position: String,
        #[arg(long, default_value = "")]
        start: String,
        #[arg(long, default_value = "")]
        end: String,
        #[arg(long)]
        current: bool,
        /// One description line; repeat for more
        #[arg(long = "bullet")]
        bullets: Vec<String>,
    },
    Education {
        institution: String,
        degree: String,
        #[arg(long, default_value = "")]
        field: String,
        #[arg(long, default_value = "")]
        start: String,
        #[arg(long, default_value = "")]
        end: String,
        #[arg(long)]
        gpa: Option<String>,
    },
    Skill {
        name: String,
        #[arg(long, default_value = "intermediate")]
        level: SkillLevel,
    },
    Project {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long = "tech", value_delimiter = ',')]
        technologies: Vec<String>,
        #[arg(long)]
        link: Option<String>,
    },
    Certification {
        name: String,
        #[arg(long, default_value = "")]
        issuer: String,
        #[arg(long)]
        date: Option<String>,
    },
    Achievement {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum ExportCommand {
    Pdf(ExportArgs),
    Docx(ExportArgs),
}

#[derive(Debug, Args)]
struct ExportArgs {
    /// Output directory (defaults to RESUME_OUTPUT_DIR)
    #[arg(long)]
    out: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("resume_studio={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting Resume Studio v{}", env!("CARGO_PKG_VERSION"));

    let mut state = AppState::new(config);
    let saver = DebouncedSaver::spawn(state.store.clone(), state.config.save_debounce);
    let mut session = Session::open(state.store.clone(), saver);
    for advisory in session.advisories() {
        eprintln!("warning: {advisory}");
    }

    let exporting = matches!(cli.command, Command::Export(_));
    let outcome = run(cli.command, &mut session, &mut state).await;

    if let Some(advisory) = session.close().await {
        eprintln!("warning: {advisory}");
    }

    match outcome {
        Ok(()) => Ok(()),
        Err(e) => {
            let (code, message) = e.advisory();
            if exporting {
                Err(anyhow!("{code}: {message}"))
            } else {
                eprintln!("error: {message}");
                Ok(())
            }
        }
    }
}

async fn run(command: Command, session: &mut Session, state: &mut AppState) -> Result<(), AppError> {
    match command {
        Command::Show { chrome } => {
            let surface = session.preview_surface(state);
            surface.set_chrome_visible(chrome);
            print!("{}", render_text(surface.pages(), surface.chrome_visible()));
            info!(
                pages = surface.page_count(),
                strategy = ?surface.strategy(),
                "rendered preview"
            );
        }
        Command::Dump => {
            println!("{}", serde_json::to_string_pretty(session.document())?);
        }
        Command::Import { path } => {
            let raw = std::fs::read_to_string(&path)?;
            let doc: ResumeDocument = serde_json::from_str(&raw)?;
            session.replace_document(doc);
            println!("Imported {}", path.display());
        }
        Command::Reset => {
            session.reset()?;
            println!("Resume reset to the starter template");
        }
        Command::Set { field, value } => set_field(session, field, value)?,
        Command::Sections => print_sections(session.document()),
        Command::Toggle { id } => {
            let visible = session.toggle_section(&id)?;
            println!("{id}: {}", if visible { "visible" } else { "hidden" });
        }
        Command::Move { from, to } => {
            session.move_section(from, to)?;
            print_sections(session.document());
        }
        Command::Custom(custom) => match custom {
            CustomCommand::Add { title, content } => {
                let id = session.add_custom_section(&title, &content);
                println!("{id}");
            }
            CustomCommand::Edit { id, title, content } => {
                session.update_custom_section(&id, |cs| {
                    if let Some(title) = title {
                        cs.title = title;
                    }
                    if let Some(content) = content {
                        cs.content = content;
                    }
                })?;
            }
            CustomCommand::Remove { id } => {
                session.remove_custom_section(&id)?;
            }
        },
        Command::Add(add) => {
            let id = add_entry(session, add);
            println!("{id}");
        }
        Command::Remove { category, id } => match category {
            Category::Experience => {
                session.remove_experience(&id)?;
            }
            Category::Education => {
                session.remove_education(&id)?;
            }
            Category::Skill => {
                session.remove_skill(&id)?;
            }
            Category::Project => {
                session.remove_project(&id)?;
            }
            Category::Certification => {
                session.remove_certification(&id)?;
            }
            Category::Achievement => {
                session.remove_achievement(&id)?;
            }
        },
        Command::Export(export) => {
            let (args, pdf) = match export {
                ExportCommand::Pdf(args) => (args, true),
                ExportCommand::Docx(args) => (args, false),
            };
            if let Some(out) = args.out {
                state.config.output_dir = out;
            }
            let path = if pdf {
                session.export_pdf(state).await?
            } else {
                session.export_docx(state)?
            };
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn set_field(session: &mut Session, field: Field, value: String) -> Result<(), AppError> {
    let doc = session.document();
    let mut personal = doc.personal_info.clone();
    let optional = |v: String| (!v.trim().is_empty()).then_some(v);

    match field {
        Field::Name => personal.full_name = value,
        Field::Email => personal.email = value,
        Field::Phone => personal.phone = value,
        Field::Address => personal.address = value,
        Field::Linkedin => personal.linkedin = optional(value),
        Field::Website => personal.website = optional(value),
        Field::Summary => {
            session.set_summary(value);
            return Ok(());
        }
        Field::Font => {
            let family = value.parse::<FontFamily>().map_err(AppError::Validation)?;
            let size = doc.font_size;
            return session.set_font(family, size);
        }
        Field::FontSize => {
            let size = value
                .parse::<f32>()
                .map_err(|_| AppError::Validation(format!("'{value}' is not a font size")))?;
            let family = doc.font_family;
            return session.set_font(family, size);
        }
    }
    session.update_personal(personal);
    Ok(())
}

fn add_entry(session: &mut Session, add: AddCommand) -> String {
    match add {
        AddCommand::Experience {
            company,
            position,
            start,
            end,
            current,
            bullets,
        } => session.add_experience(Experience {
            company,
            position,
            start_date: start,
            end_date: end,
            current,
            description: bullets,
            ..Experience::default()
        }),
        AddCommand::Education {
            institution,
            degree,
            field,
            start,
            end,
            gpa,
        } => session.add_education(Education {
            institution,
            degree,
            field,
            start_date: start,
            end_date: end,
            gpa,
            ..Education::default()
        }),
        AddCommand::Skill { name, level } => session.add_skill(Skill {
            name,
            level,
            ..Skill::default()
        }),
        AddCommand::Project {
            name,
            description,
            technologies,
            link,
        } => session.add_project(Project {
            name,
            description,
            technologies,
            link,
            ..Project::default()
        }),
        AddCommand::Certification { name, issuer, date } => {
            session.add_certification(Certification {
                name,
                issuer,
                date,
                ..Certification::default()
            })
        }
        AddCommand::Achievement {
            title,
            description,
            date,
        } => session.add_achievement(Achievement {
            title,
            description,
            date,
            ..Achievement::default()
        }),
    }
}

fn print_sections(doc: &ResumeDocument) {
    let mut ordered: Vec<(usize, &SectionDescriptor)> = doc.sections.iter().enumerate().collect();
    ordered.sort_by_key(|(index, s)| s.order.unwrap_or(*index as i64));
    for (position, (_, section)) in ordered.iter().enumerate() {
        println!(
            "{position:>2}  {:<24} {:<28} {}",
            section.id,
            section.title,
            if section.visible { "visible" } else { "hidden" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_export_with_output_dir() {
        let cli = Cli::try_parse_from(["resume-studio", "export", "pdf", "--out", "/tmp/out"]).unwrap();
        match cli.command {
            Command::Export(ExportCommand::Pdf(args)) => {
                assert_eq!(args.out, Some(PathBuf::from("/tmp/out")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parses_project_technologies_list() {
        let cli = Cli::try_parse_from([
            "resume-studio",
            "add",
            "project",
            "Compiler",
            "--tech",
            "Rust,LLVM",
        ])
        .unwrap();
        match cli.command {
            Command::Add(AddCommand::Project { technologies, .. }) => {
                assert_eq!(technologies, vec!["Rust", "LLVM"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
