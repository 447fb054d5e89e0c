//! Résumé Data and Assistant Persona
//!
//! The portfolio owner's résumé is static data. The presentational sections
//! of the site render it directly; the chat widget only needs it to build
//! the system instruction, the greeting and the assistant's display name.

use serde::{Deserialize, Serialize};

/// One position in the experience timeline
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Employer
    pub company: String,
    /// Title held
    pub role: String,
    /// Human-readable date range
    pub period: String,
    /// City / region
    pub location: String,
    /// Bullet-point accomplishments
    pub highlights: Vec<String>,
}

/// A degree, certificate or program
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    /// Institution
    pub school: String,
    /// Degree or certificate name
    pub degree: String,
    /// Completion date, when shown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// Notable coursework
    #[serde(default)]
    pub courses: Vec<String>,
}

/// A named group of skills
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCategory {
    /// Category label (e.g. "Frontend")
    pub name: String,
    /// Skills in display order
    pub skills: Vec<String>,
}

/// The portfolio owner's résumé
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Full name
    pub name: String,
    /// Headline title
    pub title: String,
    /// Summary paragraph
    pub summary: String,
    /// Work history, most recent first
    pub experience: Vec<Job>,
    /// Education and certifications
    pub education: Vec<Education>,
    /// Skill categories
    pub skills: Vec<SkillCategory>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Profile {
    /// The site owner's résumé
    #[must_use]
    pub fn owner() -> Self {
        Self {
            name: "Spencer Ng".to_string(),
            title: "Full Stack Software Engineer".to_string(),
            summary: "Full Stack Software Engineer with 4 years of experience building scalable \
                      microservices and enterprise applications. Demonstrated ability in API design \
                      using JavaScript, React, and backend technologies, with proven success in \
                      resolving high-severity incidents and streamlining operations."
                .to_string(),
            experience: vec![
                Job {
                    company: "Amazon Web Services (AWS)".to_string(),
                    role: "Full Stack Software Engineer".to_string(),
                    period: "Jan 2023 - Present".to_string(),
                    location: "Santa Clara, CA".to_string(),
                    highlights: strings(&[
                        "Resolved a SEV-2 incident by implementing a UI fix to prevent freezes and data loss during WebSocket disconnections.",
                        "Designed and developed the Auto Shut Down feature for the Code Editor in React.",
                        "Engineered RStudio Region Build Automation (RBA), reducing development effort from 28 to 7 days.",
                        "Optimized resource limits for SageMaker data plane cells with automation scripts.",
                        "Led cross-functional initiatives on On-call Ops Tools, runbooks, and training materials.",
                    ]),
                },
                Job {
                    company: "PatientPop".to_string(),
                    role: "Frontend Software Engineer".to_string(),
                    period: "Jul 2021 - Dec 2022".to_string(),
                    location: "Santa Monica, CA".to_string(),
                    highlights: strings(&[
                        "Developed management settings, including User and Roles pages, with VueJS and VueX.",
                        "Achieved over 90% test coverage with Jest unit tests and Cypress tests for StorybookJS.",
                        "Planned sprints with Product Designers, UX/UI Designers, and Project Managers.",
                        "Coordinated sprint planning with SaaS, Automation, and Dashboard teams.",
                    ]),
                },
            ],
            education: vec![
                Education {
                    school: "University of Southern California".to_string(),
                    degree: "Master of Science, Global Medicine".to_string(),
                    year: None,
                    courses: strings(&["Healthcare Informatics", "Epidemiology"]),
                },
                Education {
                    school: "University of California, Los Angeles".to_string(),
                    degree: "Bachelor of Science, Biological Sciences".to_string(),
                    year: None,
                    courses: strings(&[
                        "Mathematics for Life Scientists",
                        "Statistics for Life Scientists",
                    ]),
                },
                Education {
                    school: "Google".to_string(),
                    degree: "Google AI Essentials Specialization".to_string(),
                    year: Some("Oct 2025".to_string()),
                    courses: strings(&[
                        "Maximize Productivity With AI Tools",
                        "Discover the Art of Prompting",
                        "Use AI Responsibly",
                    ]),
                },
                Education {
                    school: "Galvanize".to_string(),
                    degree: "Advanced, Full-Stack Software Engineering Program".to_string(),
                    year: None,
                    courses: strings(&[
                        "1000+ hour residency in SDLC and production-grade engineering",
                    ]),
                },
            ],
            skills: vec![
                SkillCategory {
                    name: "Frontend".to_string(),
                    skills: strings(&[
                        "CSS3", "Cypress", "HTML5", "JavaScript", "React", "Redux", "TypeScript",
                        "VueJS", "VueX", "Webpack",
                    ]),
                },
                SkillCategory {
                    name: "Backend".to_string(),
                    skills: strings(&[
                        "Express", "GraphQL", "Java", "Microservices", "Node.js", "NoSQL (DDB)",
                        "Python", "SQL (MySQL, Postgres)",
                    ]),
                },
                SkillCategory {
                    name: "Cloud & DevOps".to_string(),
                    skills: strings(&[
                        "AWS CloudFormation", "AWS CloudWatch", "AWS DynamoDB", "AWS EC2",
                        "AWS Lambda", "AWS S3", "Docker", "Jenkins",
                    ]),
                },
            ],
        }
    }

    /// First name, used in the persona copy
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    /// Render the résumé as plain text for the model's context
    #[must_use]
    pub fn to_prompt_text(&self) -> String {
        let mut text = format!(
            "{} - {}\n\n{}\n\nExperience:\n",
            self.name, self.title, self.summary
        );

        for job in &self.experience {
            text.push_str(&format!(
                "- {} at {} ({}, {})\n",
                job.role, job.company, job.period, job.location
            ));
            for highlight in &job.highlights {
                text.push_str(&format!("  * {highlight}\n"));
            }
        }

        text.push_str("\nEducation:\n");
        for edu in &self.education {
            match &edu.year {
                Some(year) => {
                    text.push_str(&format!("- {}, {} ({year})\n", edu.degree, edu.school));
                }
                None => text.push_str(&format!("- {}, {}\n", edu.degree, edu.school)),
            }
        }

        text.push_str("\nSkills:\n");
        for category in &self.skills {
            text.push_str(&format!("- {}: {}\n", category.name, category.skills.join(", ")));
        }

        text
    }
}

/// The assistant's copy: who it speaks for and what it says unprompted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Persona {
    /// Display name shown in the widget header
    pub assistant_name: String,
    /// System instruction sent with every remote request
    pub system_instruction: String,
    /// First bot message of every session
    pub greeting: String,
    /// Reply used when no credential is configured
    pub demo_reply: String,
    /// Appended when a stream fails to open or dies mid-flight
    pub apology: String,
}

impl Persona {
    /// Build the persona for a profile
    #[must_use]
    pub fn for_profile(profile: &Profile) -> Self {
        let first = profile.first_name();
        Self {
            assistant_name: format!("Ask AI {first}"),
            system_instruction: format!(
                "You are an AI assistant representing {name}, a {title}. \
                 Answer visitors' questions about his work history and technical stack \
                 in a friendly, concise, professional tone. Speak about {first} in the third person. \
                 Only use the résumé below; if something is not covered, say you don't know \
                 and suggest reaching out through the contact section.\n\n{resume}",
                name = profile.name,
                title = profile.title,
                resume = profile.to_prompt_text(),
            ),
            greeting: format!(
                "Hi! I'm {first}'s AI assistant. Ask me anything about his experience at AWS or his tech stack!"
            ),
            demo_reply: format!(
                "I'm currently in demo mode (no API Key configured). However, I can tell you that \
                 {first} is an expert in React, AWS, and Node.js!"
            ),
            apology: "I'm sorry, I'm having trouble connecting to the brain right now. \
                      Please try again later."
                .to_string(),
        }
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self::for_profile(&Profile::owner())
    }
}
