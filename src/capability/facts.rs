//! The fixed table of candidate facts
//!
//! Each fact backs exactly one resource and one tool. The table order is
//! the registration order.

use std::fmt;

use crate::config::{present, CandidateProfile};

/// One optional fact about the candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Fact {
    ResumeText,
    ResumeUrl,
    LinkedinUrl,
    GithubUrl,
    WebsiteUrl,
    WebsiteText,
}

/// Static description of how a fact is exposed
#[derive(Debug, Clone, Copy)]
pub struct FactSpec {
    pub fact: Fact,
    /// Configuration key, e.g. `resumeText`
    pub key: &'static str,
    pub resource_uri: &'static str,
    pub resource_name: &'static str,
    pub tool_name: &'static str,
    /// Lowercase noun phrase used in descriptions
    pub label: &'static str,
    /// Text returned when the fact is absent
    pub placeholder: &'static str,
}

/// All facts, in registration order
pub static FACTS: [FactSpec; 6] = [
    FactSpec {
        fact: Fact::ResumeText,
        key: "resumeText",
        resource_uri: "candidate-info://resume-text",
        resource_name: "Resume Text",
        tool_name: "get_resume_text",
        label: "resume text",
        placeholder: "Resume text not available",
    },
    FactSpec {
        fact: Fact::ResumeUrl,
        key: "resumeUrl",
        resource_uri: "candidate-info://resume-url",
        resource_name: "Resume URL",
        tool_name: "get_resume_url",
        label: "resume URL",
        placeholder: "Resume URL not available",
    },
    FactSpec {
        fact: Fact::LinkedinUrl,
        key: "linkedinUrl",
        resource_uri: "candidate-info://linkedin-url",
        resource_name: "LinkedIn Profile URL",
        tool_name: "get_linkedin_url",
        label: "LinkedIn URL",
        placeholder: "LinkedIn URL not available",
    },
    FactSpec {
        fact: Fact::GithubUrl,
        key: "githubUrl",
        resource_uri: "candidate-info://github-url",
        resource_name: "GitHub Profile URL",
        tool_name: "get_github_url",
        label: "GitHub URL",
        placeholder: "GitHub URL not available",
    },
    FactSpec {
        fact: Fact::WebsiteUrl,
        key: "websiteUrl",
        resource_uri: "candidate-info://website-url",
        resource_name: "Website URL",
        tool_name: "get_website_url",
        label: "website URL",
        placeholder: "Website URL not available",
    },
    FactSpec {
        fact: Fact::WebsiteText,
        key: "websiteText",
        resource_uri: "candidate-info://website-text",
        resource_name: "Website Text",
        tool_name: "get_website_text",
        label: "website text",
        placeholder: "Website text not available",
    },
];

impl Fact {
    /// All facts, in registration order
    pub const ALL: [Fact; 6] = [
        Fact::ResumeText,
        Fact::ResumeUrl,
        Fact::LinkedinUrl,
        Fact::GithubUrl,
        Fact::WebsiteUrl,
        Fact::WebsiteText,
    ];

    pub fn spec(self) -> &'static FactSpec {
        &FACTS[self as usize]
    }

    /// The fact's value in `profile`, if present and non-blank
    pub fn value(self, profile: &CandidateProfile) -> Option<&str> {
        let value = match self {
            Fact::ResumeText => &profile.resume_text,
            Fact::ResumeUrl => &profile.resume_url,
            Fact::LinkedinUrl => &profile.linkedin_url,
            Fact::GithubUrl => &profile.github_url,
            Fact::WebsiteUrl => &profile.website_url,
            Fact::WebsiteText => &profile.website_text,
        };
        present(value)
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec().key)
    }
}
